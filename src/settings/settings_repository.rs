use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::settings;
use crate::settings::settings_model::Setting;

#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    fn get_setting(&self, setting_key: &str) -> Result<String>;
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;
}

pub struct SettingsRepository {
    pool: Arc<DbPool>,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SettingsRepository { pool }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_setting(&self, setting_key: &str) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        Ok(settings::table
            .find(setting_key)
            .select(settings::value)
            .first(&mut conn)?)
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let row = Setting {
            key: setting_key.to_string(),
            value: setting_value.to_string(),
        };

        diesel::insert_into(settings::table)
            .values(&row)
            .on_conflict(settings::key)
            .do_update()
            .set(settings::value.eq(setting_value))
            .execute(&mut conn)?;

        Ok(())
    }
}
