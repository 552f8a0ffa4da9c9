use reqwest::StatusCode;
use std::fmt;

/// Why a humidity read failed.
#[derive(Debug)]
pub enum FetchError {
    /// Unreachable host, timeout, reset connection.
    Transport(reqwest::Error),
    /// Appliance answered with a non-2xx status.
    Status(StatusCode),
    /// Body was not `{"humidity": <int>}`.
    Payload(serde_json::Error),
}

/// Cloneable summary of a [`FetchError`], kept in the control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    Transport,
    Status(u16),
    Payload,
}

impl FetchError {
    pub fn kind(&self) -> FetchFailure {
        match self {
            FetchError::Transport(_) => FetchFailure::Transport,
            FetchError::Status(code) => FetchFailure::Status(code.as_u16()),
            FetchError::Payload(_) => FetchFailure::Payload,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request to appliance failed: {e}"),
            FetchError::Status(code) => write!(f, "appliance returned {code}"),
            FetchError::Payload(e) => write!(f, "invalid humidity payload: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::Status(_) => None,
            FetchError::Payload(e) => Some(e),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Transport => f.write_str("appliance unreachable"),
            FetchFailure::Status(code) => write!(f, "appliance returned HTTP {code}"),
            FetchFailure::Payload => f.write_str("bad sensor payload"),
        }
    }
}

/// Why a watering command was not applied.
#[derive(Debug)]
pub enum CommandError {
    Transport(reqwest::Error),
    /// Anything other than 200 OK. The body is kept for the log line.
    Rejected { status: StatusCode, body: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Transport(e) => write!(f, "request to appliance failed: {e}"),
            CommandError::Rejected { status, body } if body.is_empty() => {
                write!(f, "appliance rejected command with {status}")
            }
            CommandError::Rejected { status, body } => {
                write!(f, "appliance rejected command with {status}: {body}")
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Transport(e) => Some(e),
            CommandError::Rejected { .. } => None,
        }
    }
}
