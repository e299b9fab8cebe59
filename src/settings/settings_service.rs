use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::constants::{DEFAULT_WEEKLY_TARGET, SETTING_WEEKLY_TARGET};
use crate::errors::Result;
use crate::settings::settings_repository::SettingsRepositoryTrait;

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    /// Configured weekly savings target. Falls back to [`DEFAULT_WEEKLY_TARGET`]
    /// when the value is missing or unreadable; the fallback is never surfaced
    /// as an error.
    fn get_weekly_target(&self) -> f64;

    async fn set_weekly_target(&self, target: f64) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_weekly_target(&self) -> f64 {
        match self.settings_repository.get_setting(SETTING_WEEKLY_TARGET) {
            Ok(raw) => match raw.parse::<f64>() {
                Ok(target) => target,
                Err(e) => {
                    debug!(
                        "Unreadable weekly target '{}' ({}), using default {}",
                        raw, e, DEFAULT_WEEKLY_TARGET
                    );
                    DEFAULT_WEEKLY_TARGET
                }
            },
            Err(e) => {
                debug!(
                    "Weekly target unavailable ({}), using default {}",
                    e, DEFAULT_WEEKLY_TARGET
                );
                DEFAULT_WEEKLY_TARGET
            }
        }
    }

    async fn set_weekly_target(&self, target: f64) -> Result<()> {
        self.settings_repository
            .update_setting(SETTING_WEEKLY_TARGET, &target.to_string())
            .await
    }
}
