//! Error types for the panelmenu daemon.

use panelmenu_types::ControlResponse;

/// Errors that can occur in the daemon
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] panelmenu_core::Error),

    /// Line framing error on the control socket
    #[error("Codec error: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    /// File watcher error
    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// A control line that is not a valid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The engine thread is gone
    #[error("Menu engine stopped")]
    EngineStopped,
}

impl From<DaemonError> for ControlResponse {
    fn from(err: DaemonError) -> Self {
        ControlResponse::Error {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DaemonError::Io(io_err);
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_daemon_error_display_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err = DaemonError::Json(json_err);
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_daemon_error_display_core() {
        let err = DaemonError::Core(panelmenu_core::Error::UnknownSurface(4));
        assert_eq!(err.to_string(), "Core error: Unknown surface: 4");
    }

    #[test]
    fn test_daemon_error_display_invalid_request() {
        let err = DaemonError::InvalidRequest("missing type".to_string());
        assert_eq!(err.to_string(), "Invalid request: missing type");
    }

    #[test]
    fn test_codec_error_converts() {
        let err: DaemonError = tokio_util::codec::LinesCodecError::MaxLineLengthExceeded.into();
        assert!(matches!(err, DaemonError::Codec(_)));
    }

    #[test]
    fn test_error_becomes_error_response() {
        let response: ControlResponse = DaemonError::EngineStopped.into();
        assert_eq!(
            response,
            ControlResponse::Error {
                message: "Menu engine stopped".to_string()
            }
        );
    }
}
