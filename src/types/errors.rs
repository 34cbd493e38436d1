use thiserror::Error;

// === TabError ===

/// Errors related to tab management operations.
#[derive(Debug, Error, PartialEq)]
pub enum TabError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(String),
}

// === SearchError ===

/// Failures talking to the search backend.
///
/// All of these surface to the user as the same "network failure" state;
/// the variants only matter for logging.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("Search network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("Search backend returned HTTP {status} for {url}")]
    Http { status: u16, url: String },
    /// The response body could not be decoded.
    #[error("Search response decode error: {0}")]
    Decode(String),
}

// === BrowseError ===

/// Errors returned by the browse controller before any request is issued.
#[derive(Debug, Error, PartialEq)]
pub enum BrowseError {
    /// The query was empty after trimming.
    #[error("Search query is empty")]
    EmptyQuery,
    /// The address bar input was empty after trimming.
    #[error("Address bar input is empty")]
    EmptyInput,
    #[error(transparent)]
    Tab(#[from] TabError),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
