use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataForSeoError>;

#[derive(Debug, Error)]
pub enum DataForSeoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("API error (status code {status_code}): {message}")]
    Api { status_code: i64, message: String },

    #[error("Response is missing {0}")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for DataForSeoError {
    fn from(err: reqwest::Error) -> Self {
        DataForSeoError::Network(err.to_string())
    }
}
