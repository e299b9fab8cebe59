use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewardError {
    #[error("Challenge is not completed yet")]
    ChallengeNotCompleted,

    #[error("Challenge reward was already claimed")]
    AlreadyClaimed,

    #[error("Reward was already used")]
    AlreadyUsed,

    #[error("Reward not found: {0}")]
    NotFound(String),

    #[error("Goal already has an active boost until {0}")]
    BoostStillActive(String),
}
