use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use log::warn;
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::ensure_user;
use crate::challenges::challenges_traits::{ChallengeRepositoryTrait, ChallengeServiceTrait};
use crate::errors::Result;
use crate::goals::boost::{self, BoostProjection};
use crate::goals::goals_errors::GoalError;
use crate::goals::goals_model::SavingsGoal;
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::rewards::lottery::{tier_for_draw, DrawSource};
use crate::rewards::rewards_errors::RewardError;
use crate::rewards::rewards_model::{Reward, RewardType};
use crate::rewards::rewards_traits::{RewardRepositoryTrait, RewardServiceTrait};

pub struct RewardService<R, C, G>
where
    R: RewardRepositoryTrait,
    C: ChallengeRepositoryTrait,
    G: GoalRepositoryTrait,
{
    reward_repo: Arc<R>,
    challenge_repo: Arc<C>,
    goal_repo: Arc<G>,
    challenges: Arc<dyn ChallengeServiceTrait>,
    draw_source: Arc<dyn DrawSource>,
    observers: DashMap<String, watch::Sender<Vec<Reward>>>,
}

impl<R, C, G> RewardService<R, C, G>
where
    R: RewardRepositoryTrait,
    C: ChallengeRepositoryTrait,
    G: GoalRepositoryTrait,
{
    pub fn new(
        reward_repo: Arc<R>,
        challenge_repo: Arc<C>,
        goal_repo: Arc<G>,
        challenges: Arc<dyn ChallengeServiceTrait>,
        draw_source: Arc<dyn DrawSource>,
    ) -> Self {
        RewardService {
            reward_repo,
            challenge_repo,
            goal_repo,
            challenges,
            draw_source,
            observers: DashMap::new(),
        }
    }

    fn visible_rewards(&self, user_id: &str) -> Result<Vec<Reward>> {
        Ok(self
            .reward_repo
            .load_rewards(user_id)?
            .into_iter()
            .filter(|reward| reward.kind() != RewardType::None)
            .collect())
    }

    /// Best-effort: a failed observer refresh never fails the write that
    /// preceded it.
    fn publish(&self, user_id: &str) {
        let rewards = match self.visible_rewards(user_id) {
            Ok(rewards) => rewards,
            Err(e) => {
                warn!("Failed to reload rewards for observers: {}", e);
                return;
            }
        };
        let closed = match self.observers.get(user_id) {
            Some(tx) => tx.send(rewards).is_err(),
            None => false,
        };
        if closed {
            self.observers.remove(user_id);
        }
    }

    fn load_reward(&self, user_id: &str, reward_id: &str) -> Result<Reward> {
        self.reward_repo
            .get_by_id(user_id, reward_id)?
            .ok_or_else(|| RewardError::NotFound(reward_id.to_string()).into())
    }

    fn load_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        self.goal_repo
            .get_by_id(user_id, goal_id)?
            .ok_or_else(|| GoalError::NotFound(goal_id.to_string()).into())
    }

    /// Consume the reward without touching any goal.
    async fn consume_only(
        &self,
        user_id: &str,
        reward_id: &str,
        goal_id: Option<&str>,
    ) -> Result<()> {
        self.reward_repo.mark_used(user_id, reward_id, goal_id).await?;
        self.publish(user_id);
        Ok(())
    }
}

#[async_trait]
impl<R, C, G> RewardServiceTrait for RewardService<R, C, G>
where
    R: RewardRepositoryTrait,
    C: ChallengeRepositoryTrait,
    G: GoalRepositoryTrait,
{
    async fn claim(&self, user_id: &str, challenge_id: &str) -> Result<Reward> {
        ensure_user(user_id)?;

        let challenge = self
            .challenge_repo
            .get_by_id(challenge_id)?
            .ok_or_else(|| RewardError::NotFound(challenge_id.to_string()))?;
        // Another user's challenge is indistinguishable from a missing one.
        if challenge.user_id != user_id {
            return Err(RewardError::NotFound(challenge_id.to_string()).into());
        }
        if !challenge.is_completed() {
            return Err(RewardError::ChallengeNotCompleted.into());
        }
        if challenge.is_reward_claimed {
            return Err(RewardError::AlreadyClaimed.into());
        }

        let tier = tier_for_draw(self.draw_source.draw());
        let reward = tier.grant(user_id);

        // A retry chance is consumed on the spot: nothing is persisted and
        // the challenge stays claimable.
        if reward.kind() == RewardType::RetryChance {
            return Ok(reward);
        }

        let stored = self.reward_repo.claim_atomic(challenge_id, &reward).await?;
        self.publish(user_id);
        if let Err(e) = self.challenges.refresh(user_id) {
            warn!("Failed to refresh challenge observers after claim: {}", e);
        }
        Ok(stored)
    }

    fn get_rewards(&self, user_id: &str) -> Result<Vec<Reward>> {
        ensure_user(user_id)?;
        self.visible_rewards(user_id)
    }

    fn observe_rewards(&self, user_id: &str) -> Result<watch::Receiver<Vec<Reward>>> {
        ensure_user(user_id)?;
        let rewards = self.visible_rewards(user_id)?;

        let tx = self
            .observers
            .entry(user_id.to_string())
            .or_insert_with(|| watch::channel(rewards.clone()).0);
        let rx = tx.subscribe();
        let _ = tx.send_replace(rewards);
        Ok(rx)
    }

    async fn apply_to_goal(
        &self,
        user_id: &str,
        reward_id: &str,
        goal_id: Option<&str>,
    ) -> Result<Option<BoostProjection>> {
        ensure_user(user_id)?;

        let reward = self.load_reward(user_id, reward_id)?;
        if reward.is_used {
            return Err(RewardError::AlreadyUsed.into());
        }

        let Some(goal_id) = goal_id else {
            self.consume_only(user_id, reward_id, None).await?;
            return Ok(None);
        };

        if reward.kind() != RewardType::AprBoost {
            self.consume_only(user_id, reward_id, Some(goal_id)).await?;
            return Ok(None);
        }

        let goal = match self.goal_repo.get_by_id(user_id, goal_id)? {
            Some(goal) => goal,
            None => {
                // The ledger write still happens; the goal side is a no-op.
                warn!(
                    "Goal {} not found; reward {} consumed without a boost",
                    goal_id, reward_id
                );
                self.consume_only(user_id, reward_id, Some(goal_id)).await?;
                return Ok(None);
            }
        };

        let today = Utc::now().date_naive();
        if goal.has_active_boost(today) {
            let expiry = goal
                .boost_expiry_date
                .clone()
                .unwrap_or_default();
            return Err(RewardError::BoostStillActive(expiry).into());
        }

        // Single principal read feeds both the stored snapshot and the value
        // returned to the caller.
        let projection = boost::project(reward.value, reward.duration_days, goal.saved_amount, today)?;
        self.reward_repo
            .apply_to_goal(user_id, reward_id, &goal, &projection, today)
            .await?;
        self.publish(user_id);
        Ok(Some(projection))
    }

    fn preview_boost(
        &self,
        user_id: &str,
        reward_id: &str,
        goal_id: &str,
    ) -> Result<BoostProjection> {
        ensure_user(user_id)?;
        let reward = self.load_reward(user_id, reward_id)?;
        let goal = self.load_goal(user_id, goal_id)?;
        boost::project(
            reward.value,
            reward.duration_days,
            goal.saved_amount,
            Utc::now().date_naive(),
        )
    }
}
