//! Error types for the poster.
//!
//! Only `ConfigError`, `InputError` and `PlatformError` are fatal. Caption and
//! media errors are recovered where they are produced.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Caption file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading caption file '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("{kind} not found: {}", .path.display())]
    NotFound { kind: &'static str, path: PathBuf },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("TWEET_TEXT is set but empty")]
    EmptyText,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Media upload failed: {0}")]
    Upload(String),

    #[error("Post creation failed: {0}")]
    Post(String),
}
