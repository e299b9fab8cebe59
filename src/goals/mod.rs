pub mod boost;
pub mod goals_errors;
pub mod goals_model;
pub mod goals_repository;
pub mod goals_service;
pub mod goals_traits;

pub use boost::BoostProjection;
pub use goals_errors::GoalError;
pub use goals_model::{NewSavingsGoal, SavingsGoal};
pub use goals_repository::GoalRepository;
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
