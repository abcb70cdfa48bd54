// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Flat-file cookie store
//!
//! Persists the session's cookies as newline-separated `key=value`
//! records. Persistence is a convenience, not a durability guarantee:
//! a missing or unreadable file loads as an empty jar, and a failed save
//! is dropped with a warning. Neither ever surfaces as an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// In-memory cookie jar with best-effort file persistence
#[derive(Debug)]
pub struct CookieStore {
    path: PathBuf,
    cookies: BTreeMap<String, String>,
}

impl CookieStore {
    /// Load a store from the given path
    ///
    /// An unopenable file (missing, permissions) yields an empty jar.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut cookies = BTreeMap::new();

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines() {
                    if line.is_empty() {
                        continue;
                    }
                    // Value is everything after the first '='; values may
                    // themselves contain '='.
                    if let Some((key, value)) = line.split_once('=') {
                        cookies.insert(key.to_string(), value.to_string());
                    }
                }
                debug!(path = %path.display(), count = cookies.len(), "loaded cookies");
            }
            Err(_) => {
                debug!(path = %path.display(), "no cookie file, starting empty");
            }
        }

        Self { path, cookies }
    }

    /// Persist the jar, fully rewriting the file
    ///
    /// Write failures are swallowed.
    pub fn save(&self) {
        let contents = self
            .cookies
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("\n");

        if let Err(e) = std::fs::write(&self.path, contents) {
            warn!(path = %self.path.display(), error = %e, "cookie save dropped");
        }
    }

    /// Upsert cookies: existing keys overwritten, new keys added
    pub fn merge(&mut self, cookies: impl IntoIterator<Item = (String, String)>) {
        self.cookies.extend(cookies);
    }

    /// Get a cookie value; absent keys yield an empty string
    pub fn get(&self, key: &str) -> String {
        self.cookies.get(key).cloned().unwrap_or_default()
    }

    /// Replace the jar's contents with only the named keys
    pub fn retain_only(&mut self, keys: &[&str]) {
        self.cookies.retain(|k, _| keys.contains(&k.as_str()));
    }

    /// View the jar as a map
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// Number of cookies in the jar
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Check if the jar is empty
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Path the jar loads from and saves to
    pub fn path(&self) -> &Path {
        &self.path
    }
}
