//! Hook configuration.
//!
//! Serializable to JSON so the owning application can keep it next to its own
//! settings. Loading a missing file yields the defaults.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::constants::{APP_MESSAGE_LAST, WM_APP, WM_USER};
use crate::error::HookResult;

/// Default private message used as the tray icon callback (`WM_APP + 1`).
pub const DEFAULT_TRAY_CALLBACK: u32 = WM_APP + 1;

/// Notification-icon protocol the tray icon was registered with.
///
/// The owner negotiates the version with `NIM_SETVERSION`; the hook does not
/// infer it from traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrayProtocol {
    /// `NOTIFYICON_VERSION_4`: event in LOWORD(lParam), icon id in
    /// HIWORD(lParam), anchor point in wParam.
    #[default]
    Version4,
    /// Pre-version-4 layout: event in lParam, icon id in wParam, no anchor.
    /// Selection is derived from left-button-up.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Message code the tray icon was registered with (`uCallbackMessage`).
    /// `None` when the window hosts no tray icon.
    pub tray_callback_message: Option<u32>,
    pub tray_protocol: TrayProtocol,
    /// Emit DragStarted / DragEnded around a move-size loop.
    pub emit_drag_markers: bool,
    /// Trace every unclassified code. Noisy; off by default.
    pub log_unclassified: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            tray_callback_message: Some(DEFAULT_TRAY_CALLBACK),
            tray_protocol: TrayProtocol::Version4,
            emit_drag_markers: true,
            log_unclassified: false,
        }
    }
}

impl HookConfig {
    /// Config for a window that hosts no tray icon.
    pub fn without_tray() -> Self {
        Self {
            tray_callback_message: None,
            ..Self::default()
        }
    }

    /// Config for a window whose tray icon reports through `callback_message`.
    ///
    /// The callback is validated; an out-of-range code disables tray events.
    pub fn with_tray(callback_message: u32, protocol: TrayProtocol) -> Self {
        let mut config = Self {
            tray_callback_message: Some(callback_message),
            tray_protocol: protocol,
            ..Self::default()
        };
        config.validate();
        config
    }

    /// Drops a tray callback outside the private message range.
    ///
    /// A callback inside the system range would shadow real window messages.
    pub fn validate(&mut self) {
        if let Some(code) = self.tray_callback_message {
            if !(WM_USER..=APP_MESSAGE_LAST).contains(&code) {
                warn!(
                    "[config] Tray callback {:#06x} outside {:#06x}..={:#06x}, tray events disabled",
                    code, WM_USER, APP_MESSAGE_LAST
                );
                self.tray_callback_message = None;
            }
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> HookResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.validate();
        Ok(config)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> HookResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file. A missing file is not an error.
    pub fn load(path: &Path) -> HookResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("[config] {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> HookResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookError;

    #[test]
    fn config_default_values() {
        let config = HookConfig::default();
        assert_eq!(config.tray_callback_message, Some(WM_APP + 1));
        assert_eq!(config.tray_protocol, TrayProtocol::Version4);
        assert!(config.emit_drag_markers);
        assert!(!config.log_unclassified);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = HookConfig::from_json(r#"{ "tray_protocol": "legacy" }"#).unwrap();
        assert_eq!(config.tray_protocol, TrayProtocol::Legacy);
        assert_eq!(config.tray_callback_message, Some(DEFAULT_TRAY_CALLBACK));
    }

    #[test]
    fn system_range_callback_is_dropped() {
        let config = HookConfig::from_json(r#"{ "tray_callback_message": 512 }"#).unwrap();
        assert_eq!(config.tray_callback_message, None);

        let config = HookConfig::with_tray(WM_USER + 9, TrayProtocol::Version4);
        assert_eq!(config.tray_callback_message, Some(WM_USER + 9));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = HookConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, HookError::Config(_)));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("winmsg-hook-config-{}", std::process::id()));
        let path = dir.join("hook.json");

        let config = HookConfig {
            tray_callback_message: Some(WM_APP + 7),
            tray_protocol: TrayProtocol::Legacy,
            emit_drag_markers: false,
            log_unclassified: true,
        };
        config.save(&path).unwrap();
        assert_eq!(HookConfig::load(&path).unwrap(), config);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("winmsg-hook-does-not-exist.json");
        assert_eq!(HookConfig::load(&path).unwrap(), HookConfig::default());
    }
}
