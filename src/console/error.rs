//! Console error types

use crate::error::KeyerError;

/// Console error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Invalid value format
    InvalidValue,
    /// E03: Missing required argument
    MissingArg,
    /// E04: Value out of allowed range
    OutOfRange,
    /// E05: Keyer chain or send already running
    Busy,
    /// E06: Command not available with this driver
    Unsupported,
    /// E07: Keyer runtime has stopped
    Stopped,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidValue => "E02",
            Self::MissingArg => "E03",
            Self::OutOfRange => "E04",
            Self::Busy => "E05",
            Self::Unsupported => "E06",
            Self::Stopped => "E07",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidValue => "invalid value",
            Self::MissingArg => "missing argument",
            Self::OutOfRange => "out of range",
            Self::Busy => "keyer busy",
            Self::Unsupported => "not supported here",
            Self::Stopped => "keyer stopped",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ConsoleError {}

impl From<KeyerError> for ConsoleError {
    fn from(err: KeyerError) -> Self {
        match err {
            KeyerError::Busy => Self::Busy,
            KeyerError::NothingToSend => Self::InvalidValue,
            KeyerError::RuntimeStopped => Self::Stopped,
        }
    }
}
