pub mod auth;
pub mod challenges;
pub mod constants;
pub mod db;
pub mod errors;
pub mod goals;
pub mod rewards;
pub mod schema;
pub mod settings;

pub use errors::{Error, Result};
