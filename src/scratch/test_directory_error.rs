//! TestDirectoryError is used to report failures of the scratch directory operations.
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TestDirectoryError>;

/// Errors raised by [`TestDirectory`](crate::TestDirectory) and its configuration.
///
/// The first three variants are kept apart so callers can tell a bad argument from
/// an unexpected filesystem state and from a failed filesystem call.
#[derive(Debug, Error)]
pub enum TestDirectoryError {
    /// A caller supplied name or path is empty or otherwise unusable.
    /// Detected before the filesystem is touched.
    #[error("{0}")]
    InvalidArgument(String),

    /// The path the operation needs does not exist or has the wrong kind.
    #[error("{0}")]
    IllegalState(String),

    /// The filesystem call itself failed.
    #[error("{message}")]
    OperationFailed {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("The configuration should not be empty.")]
    EmptyConfig,

    #[error("The configuration is not valid JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("The configuration is not valid YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
}

impl TestDirectoryError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        TestDirectoryError::InvalidArgument(message.into())
    }

    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        TestDirectoryError::IllegalState(message.into())
    }

    pub(crate) fn operation_failed(message: impl Into<String>, source: io::Error) -> Self {
        TestDirectoryError::OperationFailed {
            message: message.into(),
            source,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, TestDirectoryError::InvalidArgument(_))
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, TestDirectoryError::IllegalState(_))
    }

    pub fn is_operation_failed(&self) -> bool {
        matches!(self, TestDirectoryError::OperationFailed { .. })
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TestDirectoryError::EmptyConfig
                | TestDirectoryError::ParseJson(_)
                | TestDirectoryError::ParseYaml(_)
        )
    }
}
