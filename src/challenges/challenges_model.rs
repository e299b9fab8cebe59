use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DATE_FORMAT;

/// One row per user per calendar week. Completion is never stored; it is
/// derived from the two amounts on every read.
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
#[diesel(table_name = crate::schema::weekly_challenges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct WeeklyChallenge {
    pub id: String,
    pub user_id: String,
    pub week_id: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub is_reward_claimed: bool,
    pub last_updated: NaiveDateTime,
}

impl WeeklyChallenge {
    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn snapshot(&self) -> ChallengeSnapshot {
        ChallengeSnapshot {
            id: self.id.clone(),
            week_id: self.week_id.clone(),
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            is_completed: self.is_completed(),
            is_reward_claimed: self.is_reward_claimed,
            is_persisted: true,
        }
    }
}

/// Read-only view pushed to observers. Carries the derived completion flag
/// and whether the row actually exists yet, so the UI can render the current
/// week before the first contribution.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSnapshot {
    pub id: String,
    pub week_id: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub is_completed: bool,
    pub is_reward_claimed: bool,
    pub is_persisted: bool,
}

/// The Monday-to-Monday window a challenge lives in, keyed by ISO year and
/// week number, e.g. `2024_W51`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeWeek {
    pub week_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ChallengeWeek {
    pub fn containing(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        let start = date.week(Weekday::Mon).first_day();
        ChallengeWeek {
            week_id: format!("{}_W{:02}", iso.year(), iso.week()),
            start,
            end: start + Duration::days(7),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    /// Deterministic record id. The primary key is what enforces the
    /// one-challenge-per-user-per-week invariant.
    pub fn record_id(&self, user_id: &str) -> String {
        format!("{}:{}", user_id, self.week_id)
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Non-persisted stand-in for a week without contributions yet.
    pub fn placeholder(&self, user_id: &str, target_amount: f64) -> ChallengeSnapshot {
        ChallengeSnapshot {
            id: self.record_id(user_id),
            week_id: self.week_id.clone(),
            target_amount,
            current_amount: 0.0,
            start_date: self.start_str(),
            end_date: self.end_str(),
            is_completed: 0.0 >= target_amount,
            is_reward_claimed: false,
            is_persisted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_id_uses_iso_year_and_week() {
        // 2024-12-18 is a Wednesday in ISO week 51
        let week = ChallengeWeek::containing(NaiveDate::from_ymd_opt(2024, 12, 18).unwrap());
        assert_eq!(week.week_id, "2024_W51");
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2024, 12, 16).unwrap());
        assert_eq!(week.end, NaiveDate::from_ymd_opt(2024, 12, 23).unwrap());
    }

    #[test]
    fn week_id_follows_iso_year_at_january_boundary() {
        // 2025-01-01 belongs to ISO week 2025-W01 starting Monday 2024-12-30
        let week = ChallengeWeek::containing(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(week.week_id, "2025_W01");
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    }

    #[test]
    fn window_is_monday_to_monday() {
        let week = ChallengeWeek::containing(NaiveDate::from_ymd_opt(2025, 8, 27).unwrap());
        assert_eq!(week.start.weekday(), Weekday::Mon);
        assert_eq!(week.end.weekday(), Weekday::Mon);
        assert_eq!(week.end - week.start, Duration::days(7));
    }

    #[test]
    fn completion_is_derived_from_amounts() {
        let mut challenge = WeeklyChallenge {
            id: "u:2025_W35".to_string(),
            user_id: "u".to_string(),
            week_id: "2025_W35".to_string(),
            target_amount: 200.0,
            current_amount: 199.99,
            start_date: "2025-08-25".to_string(),
            end_date: "2025-09-01".to_string(),
            is_reward_claimed: false,
            last_updated: chrono::Utc::now().naive_utc(),
        };
        assert!(!challenge.is_completed());

        challenge.current_amount = 200.0;
        assert!(challenge.is_completed());
        assert!(challenge.snapshot().is_completed);
    }

    #[test]
    fn placeholder_has_zero_progress_and_matching_window() {
        let week = ChallengeWeek::containing(NaiveDate::from_ymd_opt(2025, 8, 27).unwrap());
        let snapshot = week.placeholder("u1", 200.0);
        assert_eq!(snapshot.id, "u1:2025_W35");
        assert_eq!(snapshot.current_amount, 0.0);
        assert_eq!(snapshot.start_date, "2025-08-25");
        assert_eq!(snapshot.end_date, "2025-09-01");
        assert!(!snapshot.is_completed);
        assert!(!snapshot.is_persisted);
    }
}
