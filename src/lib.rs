// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # websess - HTTP session manager with persistent cookies
//!
//! A mutable HTTP client session that durably remembers cookies across
//! process runs and derives content-type and body encoding from the
//! shape of the data supplied. Sync and async variants over a shared
//! request-assembly core.
//!
//! ## Features
//!
//! - Persistent cookies: flat `key=value` file, loaded at construction,
//!   flushed at teardown (best-effort, never an error)
//! - Tagged request bodies: raw / form / JSON / multipart-with-files,
//!   each deriving its content-type unless the caller overrides it
//! - Multipart uploads with WebKit-style boundaries and extension-based
//!   MIME inference
//! - Opt-in response history, per-instance and append-only
//! - Transport errors surfaced verbatim: no retries, no wrapping
//!
//! ## Example
//!
//! ```rust,no_run
//! use websess::AsyncSessionManager;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = AsyncSessionManager::new("./cookie");
//!
//!     session
//!         .post("https://example.com/login")
//!         .form("user", "me")
//!         .form("pass", "secret")
//!         .send()
//!         .await?;
//!
//!     // The session cookie set by the login response rides along.
//!     let profile = session.get("https://example.com/me").send().await?;
//!     println!("{}", profile.text()?);
//!
//!     session.close();
//!     Ok(())
//! }
//! ```

pub mod content;
pub mod error;
pub mod http;
pub mod session;

// Re-exports for convenience

// Sessions
pub use session::{
    AsyncSessionManager, AsyncSessionRequest, CookieStore, HistoryEntry, HistoryLog,
    SessionConfig, SessionManager, SessionRequest,
};

// HTTP building blocks
pub use http::{Body, MultipartForm, Response};

// Content fetching
pub use content::WebContent;

// Errors
pub use error::{Error, Result};

/// websess version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
