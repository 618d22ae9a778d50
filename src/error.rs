use std::path::PathBuf;

use thiserror::Error;

use crate::event::DeviceId;

/// Errors surfaced by the input core.
///
/// Event routing itself never fails: an event that cannot be routed is
/// dropped, not reported. Only the administrative surface (configuration
/// loading, device bookkeeping) returns errors.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input configuration '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input configuration '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("input device {0} is not registered")]
    DeviceNotFound(DeviceId),
}
