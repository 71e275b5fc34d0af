use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckinError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("csrf token not found in page")]
    TokenNotFound,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{message}")]
    Rejected { code: i64, message: String },
    #[error("check-in failed after {attempts} attempts: {last}")]
    AttemptsExhausted {
        attempts: u32,
        last: Box<CheckinError>,
    },
}

impl CheckinError {
    /// True for errors a retry cannot fix (missing or malformed configuration).
    pub fn is_fatal(&self) -> bool {
        matches!(self, CheckinError::Config(_))
    }
}
