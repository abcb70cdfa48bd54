// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for websess
//!
//! Transport failures are surfaced verbatim; the session layer adds no
//! retry, wrapping, or suppression of its own. Cookie persistence errors
//! never appear here at all - they are recovered locally by design.

use thiserror::Error;

/// Result type alias for websess operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for websess
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (connect, timeout, TLS, malformed headers)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error (multipart file reads, content downloads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (JSON request bodies, response decoding)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unexpected HTTP status, raised only where a 2xx is required
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body is not valid UTF-8
    #[error("Response body is not valid UTF-8: {0}")]
    BodyEncoding(#[from] std::string::FromUtf8Error),
}
