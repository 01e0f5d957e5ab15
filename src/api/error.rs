use std::path::PathBuf;

use reqwest::StatusCode;

/// Coarse classification of a failed backend call.
///
/// Most call sites only need to know that *something* went wrong, but the
/// classification is kept so logs and tests can tell the cases apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server could not be reached, or the connection dropped / timed out.
    Transport,
    /// The server answered with a 4xx status (validation, not found).
    Rejection,
    /// The server answered with a 5xx status, or with a body we could not parse.
    Fault,
    /// The request never left the machine (e.g. unreadable upload file).
    Local,
}

/// Errors returned by every [`AgentApi`](super::AgentApi) operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("resource not found")]
    NotFound,
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("server error ({status}): {detail}")]
    Fault { status: u16, detail: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("could not read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Builds the error matching a non-success HTTP status.
    ///
    /// FastAPI style bodies (`{"detail": "..."}`) are unwrapped so the log line
    /// carries the server's message instead of raw JSON.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::NOT_FOUND {
            return ApiError::NotFound;
        }
        let detail = extract_detail(body);
        if status.is_server_error() {
            ApiError::Fault {
                status: status.as_u16(),
                detail,
            }
        } else {
            ApiError::Rejected {
                status: status.as_u16(),
                detail,
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::NotFound | ApiError::Rejected { .. } => ErrorKind::Rejection,
            ApiError::Fault { .. } | ApiError::Decode(_) => ErrorKind::Fault,
            ApiError::File { .. } => ErrorKind::Local,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

fn extract_detail(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed)
        && let Some(detail) = value.get("detail")
    {
        return match detail {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
    }
    trimmed.to_string()
}
