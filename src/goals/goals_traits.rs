use async_trait::async_trait;

use crate::errors::Result;
use crate::goals::goals_model::{NewSavingsGoal, SavingsGoal};

/// Trait for savings goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str, goal_id: &str) -> Result<Option<SavingsGoal>>;
    fn load_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>>;
    async fn insert_new_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(&self, goal_update: SavingsGoal) -> Result<SavingsGoal>;
    async fn add_saved_amount(&self, user_id: &str, goal_id: &str, delta: f64)
        -> Result<SavingsGoal>;
}

/// Trait for savings goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Option<SavingsGoal>>;
    fn get_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>>;
    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(&self, updated_goal_data: SavingsGoal) -> Result<SavingsGoal>;
    async fn add_saved_amount(&self, user_id: &str, goal_id: &str, delta: f64)
        -> Result<SavingsGoal>;
}
