use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DATE_FORMAT;

/// Savings goal with its boost fields. `active_boost_profit` is a frozen
/// snapshot taken when the boost was applied; it is never recomputed when
/// `saved_amount` changes afterwards.
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_amount: f64,
    pub saved_amount: f64,
    pub active_boost_id: Option<String>,
    pub active_boost_apr: Option<f64>,
    pub boost_expiry_date: Option<String>,
    pub active_boost_profit: Option<f64>,
}

impl SavingsGoal {
    /// Expiry of the active boost, if one is stored and readable.
    pub fn boost_expiry(&self) -> Option<NaiveDate> {
        self.boost_expiry_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
    }

    pub fn has_active_boost(&self, today: NaiveDate) -> bool {
        self.boost_expiry().is_some_and(|expiry| expiry > today)
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub target_amount: f64,
    pub saved_amount: f64,
}
