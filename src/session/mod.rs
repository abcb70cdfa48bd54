// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP session managers with persistent cookie state
//!
//! A session owns one cookie jar, loaded from a flat file at
//! construction and flushed back at teardown, plus a mutable set of
//! default headers and an optional response history log. Sync
//! ([`SessionManager`]) and async ([`AsyncSessionManager`]) variants
//! share the same per-call surface; cookie state is the only thing
//! carried across requests.

mod async_impl;
mod blocking;
mod cookie;
mod history;

pub use async_impl::{AsyncSessionManager, AsyncSessionRequest};
pub use blocking::{SessionManager, SessionRequest};
pub use cookie::CookieStore;
pub use history::{HistoryEntry, HistoryLog};

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use crate::http::{Body, Response, DEFAULT_USER_AGENT};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Path of the flat `key=value` cookie file
    pub cookie_path: PathBuf,
    /// Retain every response in an in-memory history log
    pub history_mode: bool,
    /// Whole-request timeout for the async variant, connection setup
    /// included. The sync variant applies timeouts per call only.
    pub timeout: Duration,
    /// User agent sent as a session default header
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_path: PathBuf::from("./cookie"),
            history_mode: false,
            timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// State shared by both session variants
///
/// Exclusively owned by one session instance; never shared or locked.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) default_headers: HashMap<String, String>,
    pub(crate) cookies: CookieStore,
    pub(crate) history: Option<HistoryLog>,
    closed: bool,
}

impl SessionState {
    pub(crate) fn new(config: &SessionConfig) -> Self {
        Self {
            default_headers: HashMap::from([(
                "user-agent".to_string(),
                config.user_agent.clone(),
            )]),
            cookies: CookieStore::load(&config.cookie_path),
            history: config.history_mode.then(HistoryLog::new),
            closed: false,
        }
    }

    /// Absorb a response: merge its cookies, record it if history is on
    pub(crate) fn absorb(&mut self, response: &Response) {
        self.cookies.merge(response.cookie_pairs());
        if let Some(history) = &mut self.history {
            history.push(response.clone());
        }
    }

    pub(crate) fn histories(&self) -> &[HistoryEntry] {
        self.history.as_ref().map(HistoryLog::entries).unwrap_or(&[])
    }

    /// Flush cookies to disk, exactly once
    pub(crate) fn flush(&mut self) {
        if !self.closed {
            self.cookies.save();
            self.closed = true;
        }
    }
}

/// Per-call arguments, accumulated by the request builders
#[derive(Debug, Default)]
pub(crate) struct CallArgs {
    pub(crate) headers: HashMap<String, String>,
    pub(crate) cookies: BTreeMap<String, String>,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) body: Body,
    pub(crate) timeout: Option<Duration>,
    pub(crate) accept_invalid_certs: bool,
}

impl CallArgs {
    /// Attach a file part, switching the body to multipart
    ///
    /// Form fields accumulated so far become multipart text fields;
    /// files win over any earlier content-type decision.
    pub(crate) fn add_file(&mut self, field: String, path: PathBuf) {
        let body = std::mem::take(&mut self.body);
        let (fields, mut files) = match body {
            Body::Multipart { fields, files } => (fields, files),
            Body::Form(pairs) => (pairs, Vec::new()),
            _ => (Vec::new(), Vec::new()),
        };
        files.push((field, path));
        self.body = Body::Multipart { fields, files };
    }
}
