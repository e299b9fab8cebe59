pub mod challenges_model;
pub mod challenges_repository;
pub mod challenges_service;
pub mod challenges_traits;

pub use challenges_model::{ChallengeSnapshot, ChallengeWeek, WeeklyChallenge};
pub use challenges_repository::ChallengeRepository;
pub use challenges_service::ChallengeService;
pub use challenges_traits::{ChallengeRepositoryTrait, ChallengeServiceTrait};
