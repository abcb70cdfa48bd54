// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for websess
//!
//! Provides the tagged request-body variants, content-type derivation,
//! and the pure request-assembly step that turns session state plus
//! per-call arguments into a fully materialized outgoing request.
//! No network I/O happens in this module.

mod body;
mod request;
mod response;

pub use body::{mime_for_path, Body, MultipartForm};
pub use request::{assemble, RequestParts};
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Common HTTP headers
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CONNECTION: &str = "connection";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
}

/// Content-type values derived from body shape
pub mod content_types {
    pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
    pub const JSON_UTF8: &str = "application/json;charset=UTF-8";
}
