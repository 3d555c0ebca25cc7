//! Core module - configuration and application-wide infrastructure
//!
//! - [`BoardSettings`] - persisted user preferences
//! - [`Notifier`] - transient toast notifications
//! - [`AppState`] - shared drawer/layout state behind narrow capability handles

pub mod app_state;
pub mod error;
pub mod notifications;
pub mod resources;
pub mod settings_persistence;

pub use app_state::{AppState, DrawerToggle, Layout, LayoutReader, LayoutWriter};
pub use error::{CoreError, CoreResult};
pub use notifications::{Notification, NotificationLevel, Notifier};
pub use resources::*;
