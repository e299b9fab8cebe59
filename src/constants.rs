/// Weekly savings target used when no value is configured
pub const DEFAULT_WEEKLY_TARGET: f64 = 200.0;

/// Settings key holding the configured weekly savings target
pub const SETTING_WEEKLY_TARGET: &str = "weekly_challenge_target";

/// Storage format for calendar-date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";
