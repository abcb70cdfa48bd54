// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Result;

/// Captured HTTP response
///
/// The session layer hands this back to the caller untouched: status,
/// headers, and body are exactly what the transport returned.
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
    /// Final URL (after redirects)
    pub url: Url,
}

impl Response {
    /// Create a new response
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes, url: Url) -> Self {
        Self {
            status,
            headers,
            body,
            url,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get a header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get body as text
    pub fn text(&self) -> Result<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Deserialize body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Extract `name=value` pairs from the response's `set-cookie` headers
    ///
    /// Only the leading pair of each header is taken; attributes
    /// (Path, Expires, Secure, ...) are dropped because the session jar
    /// is a flat name-to-value mapping.
    pub fn cookie_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for value in self.headers.get_all(super::headers::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let first = raw.split(';').next().unwrap_or("").trim();
            if let Some((name, val)) = first.split_once('=') {
                pairs.push((name.trim().to_string(), val.trim().to_string()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response_with_headers(headers: HeaderMap) -> Response {
        Response::new(
            StatusCode::OK,
            headers,
            Bytes::from_static(b"{\"ok\":true}"),
            Url::parse("https://example.com").unwrap(),
        )
    }

    #[test]
    fn test_cookie_pairs_strip_attributes() {
        let mut headers = HeaderMap::new();
        headers.append(
            "set-cookie",
            HeaderValue::from_static("session=xyz; Path=/; HttpOnly"),
        );
        headers.append("set-cookie", HeaderValue::from_static("lang=en"));

        let pairs = response_with_headers(headers).cookie_pairs();
        assert_eq!(
            pairs,
            vec![
                ("session".to_string(), "xyz".to_string()),
                ("lang".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_decoding() {
        let resp = response_with_headers(HeaderMap::new());
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_text_decoding() {
        let resp = response_with_headers(HeaderMap::new());
        assert_eq!(resp.text().unwrap(), "{\"ok\":true}");
    }
}
