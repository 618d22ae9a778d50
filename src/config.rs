// src/config.rs

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::InputError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Repeats per second once repeat kicks in.
    pub repeat_rate: u32,
    /// Milliseconds a key must stay held before the first repeat.
    pub repeat_delay: u32,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            repeat_rate: 25,
            repeat_delay: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Linear acceleration factor. 0.0 means 1x speed, >0 increases,
    /// <0 decreases.
    pub acceleration_factor: f64,
    /// Multiplier applied to axis (scroll) deltas.
    pub scroll_factor: f64,
    pub natural_scrolling: bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            acceleration_factor: 0.0,
            scroll_factor: 1.0,
            natural_scrolling: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutsConfig {
    /// Master switch for the shortcut-related filters (global shortcuts,
    /// screen edges, VT switching).
    pub enabled: bool,
    /// Whether the compositor controls the session and may switch virtual
    /// terminals on Ctrl+Alt+Fn.
    pub session_control: bool,
    /// Whether pointer motion is offered to the screen-edge handler.
    pub screen_edges: bool,
}

impl Default for ShortcutsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_control: false,
            screen_edges: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub shortcuts: ShortcutsConfig,
}

impl InputConfig {
    /// Loads the configuration from a TOML file. A missing file is not an
    /// error: the defaults apply.
    pub fn load_from_file(path: &Path) -> Result<Self, InputError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "InputConfig: '{}' not found, using default configuration",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(InputError::ConfigRead {
                    path: path.to_owned(),
                    source: e,
                })
            }
        };
        let config: Self = toml::from_str(&contents).map_err(|e| InputError::ConfigParse {
            path: path.to_owned(),
            source: e,
        })?;
        debug!("InputConfig: loaded from '{}': {:?}", path.display(), config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = InputConfig::load_from_file(Path::new("/nonexistent/input.toml")).unwrap();
        assert_eq!(config.keyboard.repeat_rate, 25);
        assert_eq!(config.keyboard.repeat_delay, 600);
        assert!(config.shortcuts.enabled);
        assert!(!config.shortcuts.session_control);
    }

    #[test]
    fn partial_config_parses_with_defaults() {
        let config: InputConfig = toml::from_str(
            r#"
            [pointer]
            acceleration_factor = 0.5
            scroll_factor = 1.0
            natural_scrolling = true
            "#,
        )
        .unwrap();
        assert_eq!(config.pointer.acceleration_factor, 0.5);
        assert!(config.pointer.natural_scrolling);
        assert_eq!(config.keyboard.repeat_delay, 600);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = std::env::temp_dir().join("novade-input-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[pointer\nacceleration_factor = ").unwrap();
        let err = InputConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, InputError::ConfigParse { .. }));
    }
}
