// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response history log
//!
//! Opt-in append-only record of every response a session sees. Entries
//! are never mutated or removed for the life of the session. Each
//! session owns its own log; logs are never shared across instances.

use chrono::{DateTime, Utc};

use crate::http::Response;

/// An immutable captured response record
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// The response as returned to the caller
    pub response: Response,
    /// When the response was captured
    pub captured_at: DateTime<Utc>,
}

/// Append-only in-memory response log
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a response snapshot
    pub fn push(&mut self, response: Response) {
        self.entries.push(HistoryEntry {
            response,
            captured_at: Utc::now(),
        });
    }

    /// Get the recorded entries
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
