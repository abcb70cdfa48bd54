// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Asynchronous session manager
//!
//! Every request opens an ephemeral client bound by the configured
//! timeout and tears it down when the request completes, so no
//! connection reuse is guaranteed across calls; the cookie jar is the
//! only cross-request state. Suspension happens only at the transport
//! boundary. When calls interleave, the jar merge after each response
//! is last-write-wins per key.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use super::{CallArgs, HistoryEntry, SessionConfig, SessionState};
use crate::error::Result;
use crate::http::{assemble, headers, Body, Response};

/// Asynchronous HTTP session with persistent cookies
///
/// Same contract as [`SessionManager`](super::SessionManager) with a
/// construction-time whole-request timeout (default 5 seconds). Timeout
/// errors propagate as the transport's own error; nothing is retried.
#[derive(Debug)]
pub struct AsyncSessionManager {
    config: SessionConfig,
    state: SessionState,
}

impl AsyncSessionManager {
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
    pub fn get(&mut self, url: impl Into<String>) -> AsyncSessionRequest<'_> {
        self.request(reqwest::Method::GET, url)
    }

    /// Start a POST request
    pub fn post(&mut self, url: impl Into<String>) -> AsyncSessionRequest<'_> {
        self.request(reqwest::Method::POST, url)
    }

    /// Start a PUT request
    pub fn put(&mut self, url: impl Into<String>) -> AsyncSessionRequest<'_> {
        self.request(reqwest::Method::PUT, url)
    }

    /// Start a PATCH request
    pub fn patch(&mut self, url: impl Into<String>) -> AsyncSessionRequest<'_> {
        self.request(reqwest::Method::PATCH, url)
    }

    /// Start a DELETE request
    pub fn delete(&mut self, url: impl Into<String>) -> AsyncSessionRequest<'_> {
        self.request(reqwest::Method::DELETE, url)
    }

    fn request(
        &mut self,
        method: reqwest::Method,
        url: impl Into<String>,
    ) -> AsyncSessionRequest<'_> {
        AsyncSessionRequest {
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

impl Drop for AsyncSessionManager {
    fn drop(&mut self) {
        self.state.flush();
    }
}

/// Builder for one async session request
#[derive(Debug)]
pub struct AsyncSessionRequest<'a> {
    session: &'a mut AsyncSessionManager,
    method: reqwest::Method,
    url: String,
    args: CallArgs,
}

impl AsyncSessionRequest<'_> {
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

    /// Override the session timeout for this call
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
    /// The only suspension point is the transport call itself; request
    /// assembly before it and the cookie/history bookkeeping after it
    /// run synchronously relative to the await.
    pub async fn send(self) -> Result<Response> {
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

        // Ephemeral client, dropped when this request completes.
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(args.accept_invalid_certs)
            .timeout(args.timeout.unwrap_or(session.config.timeout))
            .build()?;

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

        let resp = req.send().await?;
        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let final_url = resp.url().clone();
        let body = resp.bytes().await?;

        let response = Response::new(status, resp_headers, body, final_url);
        session.state.absorb(&response);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(dir: &tempfile::TempDir) -> AsyncSessionManager {
        AsyncSessionManager::new(dir.path().join("cookie"))
    }

    #[tokio::test]
    async fn test_json_body_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "application/json;charset=UTF-8"))
            .and(body_string_contains("\"a\":1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let resp = s
            .post(server.uri())
            .json(&serde_json::json!({"a": 1}))
            .unwrap()
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status_code(), 200);
    }

    #[tokio::test]
    async fn test_form_body_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("a=1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let resp = s.post(server.uri()).form("a", "1").send().await.unwrap();
        assert_eq!(resp.status_code(), 200);
    }

    #[tokio::test]
    async fn test_multipart_upload() {
        let mut tmp = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
        tmp.write_all(b"zipbytes").unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("name=\"caption\""))
            .and(body_string_contains("application/x-zip-compressed"))
            .and(body_string_contains("zipbytes"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let resp = s
            .post(server.uri())
            .form("caption", "archive")
            .file("f", tmp.path())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status_code(), 200);
    }

    #[tokio::test]
    async fn test_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "abc"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let resp = s.get(server.uri()).param("q", "abc").send().await.unwrap();
        assert_eq!(resp.status_code(), 200);
    }

    #[tokio::test]
    async fn test_cookie_accumulation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "session=xyz; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("cookie", "session=xyz"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        s.get(format!("{}/login", server.uri())).send().await.unwrap();
        assert_eq!(s.get_cookie("session"), "xyz");

        let resp = s.get(format!("{}/me", server.uri())).send().await.unwrap();
        assert_eq!(resp.status_code(), 200);
    }

    #[tokio::test]
    async fn test_per_call_cookie_overrides_jar() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("cookie", "session=other"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        s.add_cookies([("session".to_string(), "xyz".to_string())]);
        let resp = s
            .get(server.uri())
            .cookie("session", "other")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status_code(), 200);
    }

    #[tokio::test]
    async fn test_history_grows_per_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = AsyncSessionManager::with_config(SessionConfig {
            cookie_path: dir.path().join("cookie"),
            history_mode: true,
            ..SessionConfig::default()
        });
        for _ in 0..3 {
            s.get(server.uri()).send().await.unwrap();
        }
        assert_eq!(s.get_histories().len(), 3);
    }

    #[tokio::test]
    async fn test_timeout_propagates_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let err = s
            .get(server.uri())
            .timeout(Duration::from_millis(50))
            .send()
            .await
            .unwrap_err();
        match err {
            crate::error::Error::Http(e) => assert!(e.is_timeout()),
            other => panic!("expected transport timeout, got {other:?}"),
        }
    }
}
