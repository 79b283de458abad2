use std::{fmt, io};

/// Crate-wide `Result` type using [`KatafindError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, KatafindError>;

/// Top-level error type for katafind operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum KatafindError {
    /// Catalog server errors.
    Server(ServerError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON serialization errors.
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Catalog-server specific errors.
#[derive(Debug)]
pub enum ServerError {
    /// The configured base URL is not usable.
    InvalidBaseUrl(String),

    /// The HTTP request could not be completed.
    RequestFailed(String),

    /// The server answered with a non-success status.
    BadStatus(u16),

    /// The response body was not the expected suggestion JSON.
    MalformedResponse(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for KatafindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KatafindError::Server(e) => write!(f, "Server error: {e}"),
            KatafindError::Config(e) => write!(f, "Configuration error: {e}"),
            KatafindError::Io(e) => write!(f, "I/O error: {e}"),
            KatafindError::Json(e) => write!(f, "JSON error: {e}"),
            KatafindError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::InvalidBaseUrl(url) => write!(f, "Invalid server URL: {url}"),
            ServerError::RequestFailed(msg) => write!(f, "Request failed: {msg}"),
            ServerError::BadStatus(code) => write!(f, "Server returned status {code}"),
            ServerError::MalformedResponse(msg) => {
                write!(f, "Malformed suggestion response: {msg}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for KatafindError {}
impl std::error::Error for ServerError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to KatafindError ========================= */

impl From<io::Error> for KatafindError {
    fn from(err: io::Error) -> Self {
        KatafindError::Io(err)
    }
}

impl From<serde_json::Error> for KatafindError {
    fn from(err: serde_json::Error) -> Self {
        KatafindError::Json(err)
    }
}

impl From<ServerError> for KatafindError {
    fn from(err: ServerError) -> Self {
        KatafindError::Server(err)
    }
}

impl From<ConfigError> for KatafindError {
    fn from(err: ConfigError) -> Self {
        KatafindError::Config(err)
    }
}

impl From<String> for KatafindError {
    fn from(msg: String) -> Self {
        KatafindError::Generic(msg)
    }
}

impl From<&str> for KatafindError {
    fn from(msg: &str) -> Self {
        KatafindError::Generic(msg.to_owned())
    }
}
