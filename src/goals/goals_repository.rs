use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::goals::goals_errors::GoalError;
use crate::goals::goals_model::{NewSavingsGoal, SavingsGoal};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::schema::savings_goals;

pub struct GoalRepository {
    pool: Arc<DbPool>,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        GoalRepository { pool }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn get_by_id(&self, user_id: &str, goal_id: &str) -> Result<Option<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_goals::table
            .find(goal_id)
            .filter(savings_goals::user_id.eq(user_id))
            .first(&mut conn)
            .optional()?)
    }

    fn load_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_goals::table
            .filter(savings_goals::user_id.eq(user_id))
            .load::<SavingsGoal>(&mut conn)?)
    }

    async fn insert_new_goal(&self, mut new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let mut conn = get_connection(&self.pool)?;

        new_goal.id = Some(Uuid::new_v4().to_string());

        Ok(diesel::insert_into(savings_goals::table)
            .values(&new_goal)
            .returning(savings_goals::all_columns)
            .get_result(&mut conn)?)
    }

    async fn update_goal(&self, goal_update: SavingsGoal) -> Result<SavingsGoal> {
        let mut conn = get_connection(&self.pool)?;
        let goal_id = goal_update.id.clone();

        diesel::update(savings_goals::table.find(&goal_id))
            .set(&goal_update)
            .execute(&mut conn)?;

        Ok(savings_goals::table.find(&goal_id).first(&mut conn)?)
    }

    async fn add_saved_amount(
        &self,
        user_id: &str,
        goal_id: &str,
        delta: f64,
    ) -> Result<SavingsGoal> {
        let mut conn = get_connection(&self.pool)?;

        let updated = diesel::update(
            savings_goals::table
                .find(goal_id)
                .filter(savings_goals::user_id.eq(user_id)),
        )
        .set(savings_goals::saved_amount.eq(savings_goals::saved_amount + delta))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(GoalError::NotFound(goal_id.to_string()).into());
        }

        Ok(savings_goals::table.find(goal_id).first(&mut conn)?)
    }
}
