use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::rewards::rewards_model::{Reward, RewardType};

/// Source of lottery draws in `[0, 1)`. A seam so the catalog mapping stays
/// deterministic under test.
pub trait DrawSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Default draw source backed by the thread-local RNG. Draws are independent
/// of each other; there are no decaying odds.
pub struct ThreadRngDraw;

impl DrawSource for ThreadRngDraw {
    fn draw(&self) -> f64 {
        rand::rng().random()
    }
}

/// One entry of the weighted reward catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardTier {
    pub kind: RewardType,
    pub value: f64,
    pub duration_days: i32,
    pub description: &'static str,
}

impl RewardTier {
    /// Materializes the tier as a ledger entry with a fresh id and an
    /// earned-at timestamp.
    pub fn grant(&self, user_id: &str) -> Reward {
        Reward {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            reward_type: self.kind.as_str().to_string(),
            value: self.value,
            duration_days: self.duration_days,
            description: self.description.to_string(),
            earned_date: Utc::now().naive_utc(),
            is_used: false,
            applied_to_goal_id: None,
        }
    }
}

const APR_20_FOR_7_DAYS: RewardTier = RewardTier {
    kind: RewardType::AprBoost,
    value: 20.0,
    duration_days: 7,
    description: "APR 20% por 7 días",
};

const APR_350_FOR_3_DAYS: RewardTier = RewardTier {
    kind: RewardType::AprBoost,
    value: 350.0,
    duration_days: 3,
    description: "APR 350% por 3 días",
};

const APR_5_FOR_10_DAYS: RewardTier = RewardTier {
    kind: RewardType::AprBoost,
    value: 5.0,
    duration_days: 10,
    description: "APR 5% por 10 días",
};

const RETRY: RewardTier = RewardTier {
    kind: RewardType::RetryChance,
    value: 1.0,
    duration_days: 0,
    description: "Tira otra vez",
};

const NOTHING: RewardTier = RewardTier {
    kind: RewardType::None,
    value: 0.0,
    duration_days: 0,
    description: "¡Sigue intentando!",
};

/// Maps a draw to its tier by cumulative cut:
///
/// | draw          | tier         |
/// |---------------|--------------|
/// | [0.00, 0.30)  | APR 20%, 7d  |
/// | [0.30, 0.40)  | APR 350%, 3d |
/// | [0.40, 0.60)  | APR 5%, 10d  |
/// | [0.60, 0.70)  | retry chance |
/// | [0.70, 1.00)  | nothing      |
pub fn tier_for_draw(r: f64) -> &'static RewardTier {
    debug_assert!((0.0..1.0).contains(&r), "draw out of range: {}", r);

    if r < 0.30 {
        &APR_20_FOR_7_DAYS
    } else if r < 0.40 {
        &APR_350_FOR_3_DAYS
    } else if r < 0.60 {
        &APR_5_FOR_10_DAYS
    } else if r < 0.70 {
        &RETRY
    } else {
        &NOTHING
    }
}
