//! Error types.

use std::path::PathBuf;

/// Errors reported by the keyer session and runtime.
#[derive(Debug, thiserror::Error)]
pub enum KeyerError {
    /// A keyer chain or another send holds the session token.
    #[error("keyer busy")]
    Busy,

    /// The text contains no character from the Morse table.
    #[error("nothing to send")]
    NothingToSend,

    /// The runtime task is gone; commands can no longer be delivered.
    #[error("keyer runtime stopped")]
    RuntimeStopped,
}

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
