//! User-facing board configuration

use crate::game::types::Orientation;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lifetime of a toast notification
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 3000;

/// Settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// Side drawn at the bottom when the board mounts
    pub orientation: Orientation,

    /// Flip the board to the side to move after every move
    pub rotation: bool,

    /// Whether to draw file letters and rank digits
    pub show_notation: bool,

    /// How long transient notifications stay up
    pub notification_timeout_ms: u64,
}

impl BoardSettings {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            orientation: Orientation::White,
            rotation: false,
            show_notation: true,
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BoardSettings::default();
        assert_eq!(settings.orientation, Orientation::White);
        assert!(!settings.rotation);
        assert!(settings.show_notation);
        assert_eq!(settings.notification_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: BoardSettings =
            serde_json::from_str(r#"{"orientation": "black", "rotation": true}"#)
                .expect("Should deserialize");
        assert_eq!(settings.orientation, Orientation::Black);
        assert!(settings.rotation);
        assert!(settings.show_notation);
        assert_eq!(settings.notification_timeout_ms, DEFAULT_NOTIFICATION_TIMEOUT_MS);
    }
}
