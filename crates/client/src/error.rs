#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
