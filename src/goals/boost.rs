use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::errors::{Error, Result, ValidationError};

/// 365 days x 100 percentage points: divides an APR percentage into a
/// daily rate.
const PERCENT_DAYS_PER_YEAR: Decimal = dec!(36500);

/// Outcome of applying an APR boost to a goal: simple, non-compounding
/// interest on the principal observed at projection time. The same value is
/// shown as a preview and frozen onto the goal at application time, so both
/// must come from a single principal read.
#[derive(Serialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoostProjection {
    pub apr: Decimal,
    pub principal: Decimal,
    pub profit: Decimal,
    pub end_date: NaiveDate,
}

impl BoostProjection {
    pub fn apr_f64(&self) -> f64 {
        self.apr.to_f64().unwrap_or_default()
    }

    pub fn profit_f64(&self) -> f64 {
        self.profit.to_f64().unwrap_or_default()
    }
}

/// `profit = principal * apr / 36500 * duration_days`,
/// `end_date = today + duration_days`. Pure: same inputs, same projection.
pub fn project(
    apr_percent: f64,
    duration_days: i32,
    principal: f64,
    today: NaiveDate,
) -> Result<BoostProjection> {
    let apr = decimal_from(apr_percent, "APR")?;
    let principal = decimal_from(principal, "principal")?;
    let days = Decimal::from(duration_days);

    Ok(BoostProjection {
        apr,
        principal,
        profit: principal * apr / PERCENT_DAYS_PER_YEAR * days,
        end_date: today + Duration::days(i64::from(duration_days)),
    })
}

fn decimal_from(value: f64, field: &str) -> Result<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid {} value: {}",
            field, value
        )))
    })
}
