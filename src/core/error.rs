//! Core error types
//!
//! Only settings persistence can fail here; notifications and app state are
//! plain in-memory bookkeeping.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading or writing `settings.json` failed
    #[error("Could not access settings file: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// `BoardSettings` could not be encoded as JSON
    #[error("Could not encode settings: {0}")]
    SettingsSerialization(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
