// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Outgoing request assembly
//!
//! Turns session state plus per-call arguments into a fully materialized
//! request description. Header merge order, later wins on conflict:
//! session defaults < derived type headers < caller headers. Cookies:
//! session jar < per-call cookies. All header keys are lowercased so the
//! merge is case-insensitive.

use std::collections::{BTreeMap, HashMap};

use reqwest::Method;

use super::body::{urlencode_pairs, Body, MultipartForm};
use super::{content_types, headers};
use crate::error::Result;

/// A fully materialized outgoing request, ready to hand to a transport
#[derive(Debug)]
pub struct RequestParts {
    /// Request method
    pub method: Method,
    /// Request URL, unparsed (validation is the transport's job)
    pub url: String,
    /// Merged headers, lowercase keys
    pub headers: HashMap<String, String>,
    /// Merged cookies sent on the wire
    pub cookies: BTreeMap<String, String>,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// Encoded body payload, if any
    pub payload: Option<Vec<u8>>,
}

impl RequestParts {
    /// Render the merged cookies as a `cookie` header value
    ///
    /// Returns None when there is nothing to send.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Assemble an outgoing request
///
/// Content-type derivation by body shape, applied before the caller's
/// headers so an explicit caller content-type always wins:
/// - non-empty raw/form body -> `application/x-www-form-urlencoded`
/// - json body -> `application/json;charset=UTF-8`
/// - multipart -> generated boundary content-type, plus
///   `connection: keep-alive`
///
/// No network I/O happens here; multipart file reads are the only
/// filesystem access and their failures propagate.
pub fn assemble(
    method: Method,
    url: &str,
    defaults: &HashMap<String, String>,
    jar: &BTreeMap<String, String>,
    caller_headers: &HashMap<String, String>,
    caller_cookies: &BTreeMap<String, String>,
    params: Vec<(String, String)>,
    body: Body,
) -> Result<RequestParts> {
    let mut merged: HashMap<String, String> = defaults
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect();

    let (derived, payload) = encode_body(body)?;
    merged.extend(derived);

    for (k, v) in caller_headers {
        merged.insert(k.to_lowercase(), v.clone());
    }

    let mut cookies = jar.clone();
    cookies.extend(caller_cookies.clone());

    Ok(RequestParts {
        method,
        url: url.to_string(),
        headers: merged,
        cookies,
        params,
        payload,
    })
}

/// Encode the body and compute its derived headers
fn encode_body(body: Body) -> Result<(Vec<(String, String)>, Option<Vec<u8>>)> {
    let mut derived = Vec::new();

    let payload = match body {
        Body::Empty => None,
        Body::Raw(s) => {
            if s.is_empty() {
                None
            } else {
                derived.push((
                    headers::CONTENT_TYPE.to_string(),
                    content_types::FORM_URLENCODED.to_string(),
                ));
                Some(s.into_bytes())
            }
        }
        Body::Form(pairs) => {
            if pairs.is_empty() {
                None
            } else {
                derived.push((
                    headers::CONTENT_TYPE.to_string(),
                    content_types::FORM_URLENCODED.to_string(),
                ));
                Some(urlencode_pairs(&pairs).into_bytes())
            }
        }
        Body::Json(value) => {
            derived.push((
                headers::CONTENT_TYPE.to_string(),
                content_types::JSON_UTF8.to_string(),
            ));
            Some(serde_json::to_vec(&value)?)
        }
        Body::Multipart { fields, files } => {
            let mut form = MultipartForm::new();
            for (name, value) in &fields {
                form.text(name, value);
            }
            for (name, path) in &files {
                form.file(name, path)?;
            }
            derived.push((headers::CONTENT_TYPE.to_string(), form.content_type()));
            derived.push((
                headers::CONNECTION.to_string(),
                "keep-alive".to_string(),
            ));
            Some(form.finish())
        }
    };

    Ok((derived, payload))
}
