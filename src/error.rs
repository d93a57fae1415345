//! Error types shared by the page controllers and their capabilities.

use thiserror::Error;

/// Failure while constructing or wiring a controller against the page.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("missing page element: {0}")]
    MissingElement(&'static str),

    #[error("invalid site configuration: {0}")]
    Config(String),
}

/// Failure reading or writing the persisted preference store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Typed failure returned by a contact-form submission backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),
}

/// Failure registering the background service worker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("service worker registration failed for {script}: {reason}")]
pub struct RegistrationError {
    pub script: String,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, SiteError>;
