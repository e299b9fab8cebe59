pub mod settings_model;
pub mod settings_repository;
pub mod settings_service;

pub use settings_model::Setting;
pub use settings_repository::{SettingsRepository, SettingsRepositoryTrait};
pub use settings_service::{SettingsService, SettingsServiceTrait};
