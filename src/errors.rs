//! # Error Types Module
//!
//! This module defines the error types for the I/O edges of the planner:
//! persistent storage and recipe fetching. The pure shopping list components
//! never fail.

use std::error::Error;
use std::fmt;

/// Errors raised by a key-value storage backend
#[derive(Debug)]
pub enum StorageError {
    /// Underlying file system error
    Io(std::io::Error),
    /// Stored value could not be encoded or decoded
    Serialization(serde_json::Error),
    /// Backend cannot be used (e.g. poisoned lock, invalid key)
    Unavailable(String),
}

/// Errors raised while fetching recipe data from the remote API
#[derive(Debug)]
pub enum FetchError {
    /// Transport-level failure
    Network(reqwest::Error),
    /// Non-success HTTP status
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Response body did not match the expected shape
    Serialization(serde_json::Error),
    /// Request did not complete in time
    Timeout(String),
    /// Client could not be built from the configuration
    InvalidConfig(String),
}

impl FetchError {
    /// Whether retrying the request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => true,
            FetchError::Api { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::Serialization(_) | FetchError::InvalidConfig(_) => false,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "Storage I/O error: {err}"),
            StorageError::Serialization(err) => write!(f, "Storage serialization error: {err}"),
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {msg}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Serialization(err) => Some(err),
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(err) => write!(f, "Network error: {err}"),
            FetchError::Api { status, body } => write!(f, "API error {status}: {body}"),
            FetchError::Serialization(err) => write!(f, "Serialization error: {err}"),
            FetchError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            FetchError::InvalidConfig(msg) => write!(f, "Invalid client configuration: {msg}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Network(err) => Some(err),
            FetchError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Network(err)
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Serialization(err)
    }
}
