use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::ensure_user;
use crate::errors::Result;
use crate::goals::goals_model::{NewSavingsGoal, SavingsGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};

pub struct GoalService<T: GoalRepositoryTrait> {
    goal_repo: Arc<T>,
}

impl<T: GoalRepositoryTrait> GoalService<T> {
    pub fn new(goal_repo: Arc<T>) -> Self {
        GoalService { goal_repo }
    }
}

#[async_trait]
impl<T: GoalRepositoryTrait> GoalServiceTrait for GoalService<T> {
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Option<SavingsGoal>> {
        ensure_user(user_id)?;
        self.goal_repo.get_by_id(user_id, goal_id)
    }

    fn get_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        ensure_user(user_id)?;
        self.goal_repo.load_goals(user_id)
    }

    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        ensure_user(&new_goal.user_id)?;
        self.goal_repo.insert_new_goal(new_goal).await
    }

    async fn update_goal(&self, updated_goal_data: SavingsGoal) -> Result<SavingsGoal> {
        ensure_user(&updated_goal_data.user_id)?;
        self.goal_repo.update_goal(updated_goal_data).await
    }

    async fn add_saved_amount(
        &self,
        user_id: &str,
        goal_id: &str,
        delta: f64,
    ) -> Result<SavingsGoal> {
        ensure_user(user_id)?;
        self.goal_repo.add_saved_amount(user_id, goal_id, delta).await
    }
}
