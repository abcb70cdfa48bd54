// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Synchronous session manager
//!
//! Each call blocks until the transport completes. Verbs take `&mut
//! self`, so concurrent mutation of the jar or history log is ruled out
//! at compile time (single-writer by construction).

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use super::{CallArgs, HistoryEntry, SessionConfig, SessionState};
use crate::error::Result;
use crate::http::{assemble, headers, Body, Response};

/// Synchronous HTTP session with persistent cookies
///
/// Cookies load at construction and flush to disk on [`close`] or drop,
/// best-effort. Transport failures propagate verbatim; non-2xx statuses
/// are not errors here.
///
/// [`close`]: SessionManager::close
#[derive(Debug)]
pub struct SessionManager {
    config: SessionConfig,
    state: SessionState,
}

impl SessionManager {
    /// Create a session persisting cookies at the given path
    pub fn new(cookie_path: impl Into<PathBuf>) -> Self {
        Self::with_config(SessionConfig {
            cookie_path: cookie_path.into(),
            ..SessionConfig::default()
        })
    }

    /// Create a session with custom configuration
    pub fn with_config(config: SessionConfig) -> Self {
        let state = SessionState::new(&config);
        Self { config, state }
    }

    /// Start a GET request
    pub fn get(&mut self, url: impl Into<String>) -> SessionRequest<'_> {
        self.request(reqwest::Method::GET, url)
    }

    /// Start a POST request
    pub fn post(&mut self, url: impl Into<String>) -> SessionRequest<'_> {
        self.request(reqwest::Method::POST, url)
    }

    /// Start a PUT request
    pub fn put(&mut self, url: impl Into<String>) -> SessionRequest<'_> {
        self.request(reqwest::Method::PUT, url)
    }

    /// Start a PATCH request
    pub fn patch(&mut self, url: impl Into<String>) -> SessionRequest<'_> {
        self.request(reqwest::Method::PATCH, url)
    }

    /// Start a DELETE request
    pub fn delete(&mut self, url: impl Into<String>) -> SessionRequest<'_> {
        self.request(reqwest::Method::DELETE, url)
    }

    fn request(&mut self, method: reqwest::Method, url: impl Into<String>) -> SessionRequest<'_> {
        SessionRequest {
            session: self,
            method,
            url: url.into(),
            args: CallArgs::default(),
        }
    }

    /// Upsert cookies into the session jar
    pub fn add_cookies(&mut self, cookies: impl IntoIterator<Item = (String, String)>) {
        self.state.cookies.merge(cookies);
    }

    /// Get a cookie value; absent keys yield an empty string
    pub fn get_cookie(&self, key: &str) -> String {
        self.state.cookies.get(key)
    }

    /// Keep only the named cookies, dropping the rest of the jar
    pub fn retain_cookies(&mut self, keys: &[&str]) {
        self.state.cookies.retain_only(keys);
    }

    /// Set a session default header (lowercased; caller headers win)
    pub fn set_default_header(&mut self, name: &str, value: impl Into<String>) {
        self.state
            .default_headers
            .insert(name.to_lowercase(), value.into());
    }

    /// Recorded responses; empty when history mode is off
    pub fn get_histories(&self) -> &[HistoryEntry] {
        self.state.histories()
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Close the session, flushing cookies to disk
    pub fn close(mut self) {
        self.state.flush();
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.state.flush();
    }
}

/// Builder for one session request
#[derive(Debug)]
pub struct SessionRequest<'a> {
    session: &'a mut SessionManager,
    method: reqwest::Method,
    url: String,
    args: CallArgs,
}

impl SessionRequest<'_> {
    /// Set a header for this call
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.headers.insert(name.into(), value.into());
        self
    }

    /// Set a cookie for this call, overriding the jar on conflict
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.cookies.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.params.push((key.into(), value.into()));
        self
    }

    /// Set a raw string body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.args.body = Body::Raw(body.into());
        self
    }

    /// Add a form field (body becomes form-urlencoded)
    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let field = (key.into(), value.into());
        match &mut self.args.body {
            Body::Form(pairs) => pairs.push(field),
            Body::Multipart { fields, .. } => fields.push(field),
            _ => self.args.body = Body::Form(vec![field]),
        }
        self
    }

    /// Set a JSON body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        self.args.body = Body::Json(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Attach a file as a multipart part (body becomes multipart)
    pub fn file(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.args.add_file(field.into(), path.into());
        self
    }

    /// Set a timeout for this call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.args.timeout = Some(timeout);
        self
    }

    /// Accept invalid TLS certificates for this call (dangerous!)
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.args.accept_invalid_certs = accept;
        self
    }

    /// Send the request
    ///
    /// Builds the request, performs the transport call, merges response
    /// cookies into the jar, records history if enabled, and returns the
    /// response untouched.
    pub fn send(self) -> Result<Response> {
        let Self {
            session,
            method,
            url,
            args,
        } = self;

        let parts = assemble(
            method,
            &url,
            &session.state.default_headers,
            session.state.cookies.as_map(),
            &args.headers,
            &args.cookies,
            args.params,
            args.body,
        )?;
        let url = Url::parse(&parts.url)?;

        let mut builder = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(args.accept_invalid_certs);
        if let Some(timeout) = args.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let mut req = client.request(parts.method.clone(), url);
        if !parts.params.is_empty() {
            req = req.query(&parts.params);
        }
        for (name, value) in &parts.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = parts.cookie_header() {
            req = req.header(headers::COOKIE, cookie);
        }
        if let Some(payload) = parts.payload {
            req = req.body(payload);
        }

        let resp = req.send()?;
        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let final_url = resp.url().clone();
        let body = resp.bytes()?;

        let response = Response::new(status, resp_headers, body, final_url);
        session.state.absorb(&response);
        Ok(response)
    }
}
