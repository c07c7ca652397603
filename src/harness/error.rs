use super::expectation::AssertionFailure;

#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    #[error("no value has been stored under `{key}`")]
    MissingCapture { key: String },
    #[error("response has no value at `{path}` to store as `{key}`")]
    CaptureNotFound { key: String, path: String },
    #[error("path `{path}` still has unbound parameters")]
    UnboundPathParam { path: String },
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
