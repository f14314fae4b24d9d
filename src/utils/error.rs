use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Unparseable price text: '{input}'")]
    Normalize { input: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

impl AppError {
    pub fn parse(message: impl Into<String>) -> Self {
        AppError::Parse { message: message.into() }
    }

    /// Configuration and lookup errors are caller mistakes; everything else
    /// is a scraping-time condition that the engine absorbs.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AppError::Configuration(_) | AppError::Config(_) | AppError::NotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
