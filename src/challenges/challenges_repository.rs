use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use crate::challenges::challenges_model::{ChallengeWeek, WeeklyChallenge};
use crate::challenges::challenges_traits::ChallengeRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::weekly_challenges;

pub struct ChallengeRepository {
    pool: Arc<DbPool>,
}

impl ChallengeRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ChallengeRepository { pool }
    }
}

#[async_trait]
impl ChallengeRepositoryTrait for ChallengeRepository {
    fn get_by_id(&self, challenge_id: &str) -> Result<Option<WeeklyChallenge>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(weekly_challenges::table
            .find(challenge_id)
            .first(&mut conn)
            .optional()?)
    }

    async fn upsert_with_delta(
        &self,
        user_id: &str,
        week: &ChallengeWeek,
        delta: f64,
        default_target: f64,
    ) -> Result<WeeklyChallenge> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        let row = WeeklyChallenge {
            id: week.record_id(user_id),
            user_id: user_id.to_string(),
            week_id: week.week_id.clone(),
            target_amount: default_target,
            current_amount: delta,
            start_date: week.start_str(),
            end_date: week.end_str(),
            is_reward_claimed: false,
            last_updated: now,
        };

        // Single upsert statement, so concurrent contributions serialize at
        // the storage layer. The target is only written on first creation.
        diesel::insert_into(weekly_challenges::table)
            .values(&row)
            .on_conflict(weekly_challenges::id)
            .do_update()
            .set((
                weekly_challenges::current_amount
                    .eq(weekly_challenges::current_amount + delta),
                weekly_challenges::last_updated.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(weekly_challenges::table.find(&row.id).first(&mut conn)?)
    }
}
