use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use ahorro_core::challenges::{ChallengeRepository, ChallengeService};
use ahorro_core::db;
use ahorro_core::goals::{GoalRepository, GoalService};
use ahorro_core::rewards::{DrawSource, RewardRepository, RewardService};
use ahorro_core::settings::{SettingsRepository, SettingsService};

/// Scripted lottery draws, consumed in order.
pub struct FixedDraws {
    draws: Mutex<VecDeque<f64>>,
}

impl FixedDraws {
    pub fn new() -> Self {
        FixedDraws {
            draws: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, r: f64) {
        self.draws.lock().unwrap().push_back(r);
    }
}

impl DrawSource for FixedDraws {
    fn draw(&self) -> f64 {
        self.draws
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted draw left")
    }
}

pub struct TestApp {
    pub _data_dir: TempDir,
    pub pool: Arc<db::DbPool>,
    pub draws: Arc<FixedDraws>,
    pub settings: Arc<SettingsService>,
    pub challenge_repo: Arc<ChallengeRepository>,
    pub reward_repo: Arc<RewardRepository>,
    pub challenges: Arc<ChallengeService<ChallengeRepository>>,
    pub goals: Arc<GoalService<GoalRepository>>,
    pub rewards: Arc<RewardService<RewardRepository, ChallengeRepository, GoalRepository>>,
}

pub fn setup() -> TestApp {
    let data_dir = tempfile::tempdir().expect("create temp dir");
    let db_path = db::init(data_dir.path().to_str().expect("utf-8 path"))
        .expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let settings = Arc::new(SettingsService::new(Arc::new(SettingsRepository::new(
        pool.clone(),
    ))));

    let challenge_repo = Arc::new(ChallengeRepository::new(pool.clone()));
    let challenges = Arc::new(ChallengeService::new(
        challenge_repo.clone(),
        settings.clone(),
    ));

    let goal_repo = Arc::new(GoalRepository::new(pool.clone()));
    let goals = Arc::new(GoalService::new(goal_repo.clone()));

    let reward_repo = Arc::new(RewardRepository::new(pool.clone()));
    let draws = Arc::new(FixedDraws::new());
    let rewards = Arc::new(RewardService::new(
        reward_repo.clone(),
        challenge_repo.clone(),
        goal_repo,
        challenges.clone(),
        draws.clone(),
    ));

    TestApp {
        _data_dir: data_dir,
        pool,
        draws,
        settings,
        challenge_repo,
        reward_repo,
        challenges,
        goals,
        rewards,
    }
}
