pub mod lottery;
pub mod rewards_errors;
pub mod rewards_model;
pub mod rewards_repository;
pub mod rewards_service;
pub mod rewards_traits;

pub use lottery::{tier_for_draw, DrawSource, RewardTier, ThreadRngDraw};
pub use rewards_errors::RewardError;
pub use rewards_model::{Reward, RewardType};
pub use rewards_repository::RewardRepository;
pub use rewards_service::RewardService;
pub use rewards_traits::{RewardRepositoryTrait, RewardServiceTrait};
