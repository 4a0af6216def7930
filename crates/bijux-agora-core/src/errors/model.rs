// SPDX-License-Identifier: Apache-2.0

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    InvalidIdentifier,
    InvalidConfig,
    Source,
    Serialization,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid_identifier",
            Self::InvalidConfig => "invalid_config",
            Self::Source => "source_error",
            Self::Serialization => "serialization_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
    Source {
        item: String,
        message: String,
    },
    SerdeJson(serde_json::Error),
}

impl Error {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidIdentifier { .. } => ErrorCode::InvalidIdentifier,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::Source { .. } => ErrorCode::Source,
            Self::SerdeJson(_) => ErrorCode::Serialization,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier {
                kind,
                value,
                reason,
            } => write!(f, "invalid {kind} `{value}`: {reason}"),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config `{field}`: {reason}")
            }
            Self::Source { item, message } => write!(f, "source failure for {item}: {message}"),
            Self::SerdeJson(err) => write!(f, "serde json error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerdeJson(err) => Some(err),
            Self::InvalidIdentifier { .. }
            | Self::InvalidConfig { .. }
            | Self::Source { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::SerdeJson(value)
    }
}
