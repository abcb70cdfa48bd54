// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! One-shot web content fetcher
//!
//! Fetches a URL eagerly at construction and holds the body for
//! inspection or download to disk. Unlike the session layer, a non-2xx
//! status here is an error: there is no partial result worth keeping.

use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::http::DEFAULT_USER_AGENT;

/// A fetched piece of web content
#[derive(Debug)]
pub struct WebContent {
    url: String,
    content_type: String,
    body: Bytes,
}

impl WebContent {
    /// Fetch a URL with default headers
    pub fn fetch(url: &str) -> Result<Self> {
        Self::fetch_with_headers(url, &HashMap::new())
    }

    /// Fetch a URL with extra headers, blocking until the body arrives
    ///
    /// Errors on any transport failure or non-2xx status.
    pub fn fetch_with_headers(url: &str, headers: &HashMap<String, String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        let mut req = client.get(url);
        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.send()?;
        if !resp.status().is_success() {
            return Err(Error::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp.bytes()?;

        Ok(Self {
            url: url.to_string(),
            content_type,
            body,
        })
    }

    /// The fetched URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response content-type, empty if the server sent none
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The response body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Write the body to a file
    pub fn download(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn serve(template: ResponseTemplate) -> (tokio::runtime::Runtime, MockServer) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(template)
                .mount(&server)
                .await;
            server
        });
        (rt, server)
    }

    #[test]
    fn test_fetch_and_download() {
        let (_rt, server) = serve(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"pngdata".as_slice()),
        );

        let content = WebContent::fetch(&server.uri()).unwrap();
        assert_eq!(content.content_type(), "image/png");
        assert_eq!(content.body().as_ref(), b"pngdata");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        content.download(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"pngdata");
    }

    #[test]
    fn test_non_2xx_is_error() {
        let (_rt, server) = serve(ResponseTemplate::new(404));
        let err = WebContent::fetch(&server.uri()).unwrap_err();
        assert!(matches!(err, Error::Status { status: 404, .. }));
    }
}
