use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use std::sync::Arc;

use crate::constants::DATE_FORMAT;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::goals::boost::BoostProjection;
use crate::goals::goals_model::SavingsGoal;
use crate::rewards::rewards_errors::RewardError;
use crate::rewards::rewards_model::Reward;
use crate::rewards::rewards_traits::RewardRepositoryTrait;
use crate::schema::{rewards, savings_goals, weekly_challenges};

pub struct RewardRepository {
    pool: Arc<DbPool>,
}

impl RewardRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        RewardRepository { pool }
    }
}

#[async_trait]
impl RewardRepositoryTrait for RewardRepository {
    fn get_by_id(&self, user_id: &str, reward_id: &str) -> Result<Option<Reward>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(rewards::table
            .find(reward_id)
            .filter(rewards::user_id.eq(user_id))
            .first(&mut conn)
            .optional()?)
    }

    fn load_rewards(&self, user_id: &str) -> Result<Vec<Reward>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(rewards::table
            .filter(rewards::user_id.eq(user_id))
            .order(rewards::earned_date.desc())
            .load::<Reward>(&mut conn)?)
    }

    async fn add(&self, reward: &Reward) -> Result<Reward> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::insert_into(rewards::table)
            .values(reward)
            .returning(rewards::all_columns)
            .get_result(&mut conn)?)
    }

    async fn claim_atomic(&self, challenge_id: &str, reward: &Reward) -> Result<Reward> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        conn.transaction::<Reward, Error, _>(|conn| {
            let claimed = diesel::update(
                weekly_challenges::table
                    .find(challenge_id)
                    .filter(weekly_challenges::is_reward_claimed.eq(false)),
            )
            .set((
                weekly_challenges::is_reward_claimed.eq(true),
                weekly_challenges::last_updated.eq(now),
            ))
            .execute(conn)?;

            if claimed == 0 {
                return Err(RewardError::AlreadyClaimed.into());
            }

            Ok(diesel::insert_into(rewards::table)
                .values(reward)
                .returning(rewards::all_columns)
                .get_result(conn)?)
        })
    }

    async fn mark_used(
        &self,
        user_id: &str,
        reward_id: &str,
        goal_id: Option<&str>,
    ) -> Result<Reward> {
        let mut conn = get_connection(&self.pool)?;

        let updated = diesel::update(
            rewards::table
                .find(reward_id)
                .filter(rewards::user_id.eq(user_id))
                .filter(rewards::is_used.eq(false)),
        )
        .set((
            rewards::is_used.eq(true),
            rewards::applied_to_goal_id.eq(goal_id),
        ))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(already_used_or_missing(&mut conn, user_id, reward_id));
        }

        Ok(rewards::table.find(reward_id).first(&mut conn)?)
    }

    async fn apply_to_goal(
        &self,
        user_id: &str,
        reward_id: &str,
        goal: &SavingsGoal,
        projection: &BoostProjection,
        today: NaiveDate,
    ) -> Result<Reward> {
        let mut conn = get_connection(&self.pool)?;
        let today_str = today.format(DATE_FORMAT).to_string();

        conn.transaction::<Reward, Error, _>(|conn| {
            let used = diesel::update(
                rewards::table
                    .find(reward_id)
                    .filter(rewards::user_id.eq(user_id))
                    .filter(rewards::is_used.eq(false)),
            )
            .set((
                rewards::is_used.eq(true),
                rewards::applied_to_goal_id.eq(goal.id.as_str()),
            ))
            .execute(conn)?;

            if used == 0 {
                return Err(already_used_or_missing(conn, user_id, reward_id));
            }

            // The expiry guard sits in the same statement as the write, so
            // two applications racing on one goal cannot both land even when
            // each one read the goal before the other committed.
            let boosted = diesel::update(
                savings_goals::table.find(goal.id.as_str()).filter(
                    savings_goals::boost_expiry_date
                        .is_null()
                        .or(savings_goals::boost_expiry_date
                            .assume_not_null()
                            .le(today_str.as_str())),
                ),
            )
            .set((
                savings_goals::active_boost_id.eq(Some(reward_id)),
                savings_goals::active_boost_apr.eq(Some(projection.apr_f64())),
                savings_goals::boost_expiry_date
                    .eq(Some(projection.end_date.format(DATE_FORMAT).to_string())),
                savings_goals::active_boost_profit.eq(Some(projection.profit_f64())),
            ))
            .execute(conn)?;

            if boosted == 0 {
                let expiry = savings_goals::table
                    .find(goal.id.as_str())
                    .select(savings_goals::boost_expiry_date)
                    .first::<Option<String>>(conn)
                    .optional()?
                    .flatten()
                    .unwrap_or_default();
                return Err(RewardError::BoostStillActive(expiry).into());
            }

            Ok(rewards::table.find(reward_id).first(conn)?)
        })
    }
}

fn already_used_or_missing(
    conn: &mut diesel::SqliteConnection,
    user_id: &str,
    reward_id: &str,
) -> Error {
    let lookup = rewards::table
        .find(reward_id)
        .filter(rewards::user_id.eq(user_id))
        .count()
        .get_result::<i64>(conn);

    match lookup {
        Ok(0) => RewardError::NotFound(reward_id.to_string()).into(),
        Ok(_) => RewardError::AlreadyUsed.into(),
        Err(e) => e.into(),
    }
}
