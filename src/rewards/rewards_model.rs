use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};

/// Closed reward catalog. Stored as text; anything unrecognized decodes to
/// `None` so the ledger read path stays total.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    AprBoost,
    RetryChance,
    None,
}

impl RewardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::AprBoost => "APR_BOOST",
            RewardType::RetryChance => "RETRY_CHANCE",
            RewardType::None => "NONE",
        }
    }

    pub fn decode(raw: &str) -> RewardType {
        match raw {
            "APR_BOOST" => RewardType::AprBoost,
            "RETRY_CHANCE" => RewardType::RetryChance,
            "NONE" => RewardType::None,
            other => {
                debug!("Unknown reward type '{}', treating as NONE", other);
                RewardType::None
            }
        }
    }
}

/// Ledger entry for a granted reward. `is_used` transitions false to true
/// exactly once; `applied_to_goal_id` is set at that moment.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::rewards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub user_id: String,
    pub reward_type: String,
    pub value: f64,
    pub duration_days: i32,
    pub description: String,
    pub earned_date: NaiveDateTime,
    pub is_used: bool,
    pub applied_to_goal_id: Option<String>,
}

impl Reward {
    pub fn kind(&self) -> RewardType {
        RewardType::decode(&self.reward_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn unknown_stored_type_decodes_to_none() {
        assert_eq!(RewardType::decode("APR_BOOST"), RewardType::AprBoost);
        assert_eq!(RewardType::decode("RETRY_CHANCE"), RewardType::RetryChance);
        assert_eq!(RewardType::decode("NONE"), RewardType::None);
        assert_eq!(RewardType::decode("MYSTERY_BOX"), RewardType::None);
        assert_eq!(RewardType::decode(""), RewardType::None);
    }

    #[test]
    fn serializes_with_camel_case_fields_and_screaming_types() {
        let reward = Reward {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            reward_type: RewardType::AprBoost.as_str().to_string(),
            value: 20.0,
            duration_days: 7,
            description: "APR 20% por 7 días".to_string(),
            earned_date: Utc::now().naive_utc(),
            is_used: false,
            applied_to_goal_id: None,
        };

        let json = serde_json::to_value(&reward).unwrap();
        assert_eq!(json["rewardType"], "APR_BOOST");
        assert_eq!(json["durationDays"], 7);
        assert_eq!(json["isUsed"], false);
        assert!(json["appliedToGoalId"].is_null());

        assert_eq!(
            serde_json::to_value(RewardType::RetryChance).unwrap(),
            "RETRY_CHANCE"
        );
    }
}
