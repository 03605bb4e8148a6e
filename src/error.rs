//! Error type shared by the generation pipeline and both front ends.
//!
//! The variants mirror the ways a news run can go wrong: the outbound call
//! never completed, the API answered with a failure, the API answered with
//! something that was not a usable envelope, or the model's text was not the
//! JSON object we asked for. The interactive flow collapses all of them into
//! a single error banner; the batch flow lets them terminate the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("request to generation API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation API returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("model reply is not a news JSON object: {0}")]
    Parse(String),

    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_includes_code() {
        let err = NewsError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generation API returned HTTP 429: rate limited"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: NewsError = io.into();
        assert!(matches!(err, NewsError::Io(_)));
    }
}
