use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::watch;

use crate::errors::Result;
use crate::goals::boost::BoostProjection;
use crate::goals::goals_model::SavingsGoal;
use crate::rewards::rewards_model::Reward;

/// Trait for reward ledger repository operations
#[async_trait]
pub trait RewardRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str, reward_id: &str) -> Result<Option<Reward>>;

    fn load_rewards(&self, user_id: &str) -> Result<Vec<Reward>>;

    /// Appends a reward to the ledger without touching any challenge.
    async fn add(&self, reward: &Reward) -> Result<Reward>;

    /// Persists `reward` and flips the challenge's claim flag in one
    /// transaction. Fails with `RewardError::AlreadyClaimed` when a
    /// concurrent claim won the race.
    async fn claim_atomic(&self, challenge_id: &str, reward: &Reward) -> Result<Reward>;

    /// Conditional mark-used: compare-and-set on `is_used == false`, so a
    /// reward is applied at most once even under concurrent callers.
    async fn mark_used(
        &self,
        user_id: &str,
        reward_id: &str,
        goal_id: Option<&str>,
    ) -> Result<Reward>;

    /// Mark-used plus the goal's boost mutation in a single transaction, so
    /// the ledger and the goal can never end up inconsistent. The goal write
    /// re-checks the stored expiry against `today`; an unexpired boost rolls
    /// the whole transaction back with `RewardError::BoostStillActive`.
    async fn apply_to_goal(
        &self,
        user_id: &str,
        reward_id: &str,
        goal: &SavingsGoal,
        projection: &BoostProjection,
        today: NaiveDate,
    ) -> Result<Reward>;
}

/// Trait for reward service operations
#[async_trait]
pub trait RewardServiceTrait: Send + Sync {
    /// Draws the lottery for a completed, unclaimed challenge. A retry-chance
    /// draw is returned without being persisted and without marking the
    /// challenge claimed, so the caller may claim again immediately.
    async fn claim(&self, user_id: &str, challenge_id: &str) -> Result<Reward>;

    /// The user's meaningful rewards: used ones stay visible, empty-handed
    /// (NONE) draws are filtered out.
    fn get_rewards(&self, user_id: &str) -> Result<Vec<Reward>>;

    /// Continuously observes [`RewardServiceTrait::get_rewards`]. Dropping
    /// the receiver ends the subscription.
    fn observe_rewards(&self, user_id: &str) -> Result<watch::Receiver<Vec<Reward>>>;

    /// Consumes a reward, and for an APR boost aimed at a goal also freezes
    /// the profit snapshot onto that goal. Returns the projection when a
    /// boost landed, `None` when the reward was merely consumed.
    async fn apply_to_goal(
        &self,
        user_id: &str,
        reward_id: &str,
        goal_id: Option<&str>,
    ) -> Result<Option<BoostProjection>>;

    /// Projection the user would get from applying `reward_id` to `goal_id`
    /// right now. Same arithmetic as the apply path; no writes.
    fn preview_boost(
        &self,
        user_id: &str,
        reward_id: &str,
        goal_id: &str,
    ) -> Result<BoostProjection>;
}
