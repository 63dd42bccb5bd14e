use reqwest::StatusCode;
use thiserror::Error;

/// A failed call as seen by the resource client.
///
/// Every variant names the action that failed (`list books`, `update book 7`)
/// so the message is readable without further context.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The gateway answered with a non-success status.
    #[error("{action} failed with status {}: {message}", status.as_u16())]
    Status {
        action: String,
        status: StatusCode,
        message: String,
    },

    /// The gateway could not be reached or the body could not be read.
    #[error("{action} failed: {source}")]
    Transport {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    /// A success body that is not the expected JSON shape.
    #[error("{action} returned an unexpected body: {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RequestError {
    /// The gateway status, for failures that got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport { source, .. } => source.status(),
            RequestError::Decode { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_embeds_status() {
        let err = RequestError::Status {
            action: "fetch book 999".to_string(),
            status: StatusCode::NOT_FOUND,
            message: "Book not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fetch book 999 failed with status 404: Book not found"
        );
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
