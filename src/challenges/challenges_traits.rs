use async_trait::async_trait;
use tokio::sync::watch;

use crate::challenges::challenges_model::{ChallengeSnapshot, ChallengeWeek, WeeklyChallenge};
use crate::errors::Result;

/// Trait for weekly challenge repository operations
#[async_trait]
pub trait ChallengeRepositoryTrait: Send + Sync {
    fn get_by_id(&self, challenge_id: &str) -> Result<Option<WeeklyChallenge>>;

    /// Atomic read-modify-write: creates the week's row with `delta` as the
    /// starting progress, or adds `delta` to the existing row. Concurrent
    /// contributions within the same week must not lose updates.
    async fn upsert_with_delta(
        &self,
        user_id: &str,
        week: &ChallengeWeek,
        delta: f64,
        default_target: f64,
    ) -> Result<WeeklyChallenge>;
}

/// Trait for weekly challenge service operations
#[async_trait]
pub trait ChallengeServiceTrait: Send + Sync {
    /// Current week's state, or a non-persisted placeholder.
    fn get_current(&self, user_id: &str) -> Result<ChallengeSnapshot>;

    /// Records a contribution toward the current week's target. The caller
    /// decides whether an income counts; negative deltas are not rejected.
    async fn update_progress(&self, user_id: &str, delta: f64) -> Result<ChallengeSnapshot>;

    /// Continuously observes the current week. Dropping the receiver ends
    /// the subscription.
    fn observe(&self, user_id: &str) -> Result<watch::Receiver<ChallengeSnapshot>>;

    /// Reloads the current week and republishes it to observers. Used after
    /// out-of-band mutations such as a reward claim flipping the claim flag.
    fn refresh(&self, user_id: &str) -> Result<ChallengeSnapshot>;
}
