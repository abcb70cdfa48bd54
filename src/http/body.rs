// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body variants and encoders
//!
//! The body shape drives content-type derivation, so it is modeled as a
//! tagged enum rather than a loose bytes blob. Multipart encoding is done
//! by hand because the boundary token format is part of the contract.

use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::Result;

/// Prefix of every generated multipart boundary
pub const BOUNDARY_PREFIX: &str = "----WebKitFormBoundary";

/// Request body, tagged by shape
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body
    #[default]
    Empty,
    /// Raw string sent as-is
    Raw(String),
    /// Key-value pairs, urlencoded on the wire
    Form(Vec<(String, String)>),
    /// JSON document
    Json(serde_json::Value),
    /// Multipart form: text fields plus file parts keyed by field name
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<(String, PathBuf)>,
    },
}

impl Body {
    /// Whether the body derives a form-urlencoded content-type
    ///
    /// Empty strings and empty field lists count as absent.
    pub fn is_form_like(&self) -> bool {
        match self {
            Body::Raw(s) => !s.is_empty(),
            Body::Form(pairs) => !pairs.is_empty(),
            _ => false,
        }
    }
}

/// Infer a MIME type from a file path's extension
///
/// Fixed table; unknown extensions map to the empty string and the
/// multipart part is then emitted without a content-type header.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "zip" => "application/x-zip-compressed",
        _ => "",
    }
}

/// Generate a fresh multipart boundary token
pub fn random_boundary() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("{}{}", BOUNDARY_PREFIX, suffix)
}

/// Percent-encode a string for form-urlencoded bodies
pub fn percent_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                for byte in c.to_string().bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

/// Encode key-value pairs as a form-urlencoded string
pub fn urlencode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Multipart/form-data encoder (RFC 2046)
///
/// Parts are appended in call order; `finish` adds the terminal marker.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartForm {
    /// Create a form with a freshly generated boundary
    pub fn new() -> Self {
        Self::with_boundary(random_boundary())
    }

    /// Create a form with an explicit boundary
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
        }
    }

    /// Get the boundary token
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the Content-Type header value for this form
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a text field
    pub fn text(&mut self, name: &str, value: &str) {
        self.open_part();
        self.buf.extend_from_slice(
            format!("content-disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    /// Append a file part, reading the file contents from disk
    ///
    /// The filename is the final path component; the part content-type
    /// comes from [`mime_for_path`] and is omitted when unknown.
    pub fn file(&mut self, name: &str, path: &Path) -> Result<()> {
        let contents = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or_default();
        let mime = mime_for_path(path);

        self.open_part();
        self.buf.extend_from_slice(
            format!(
                "content-disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        if !mime.is_empty() {
            self.buf
                .extend_from_slice(format!("content-type: {}\r\n", mime).as_bytes());
        }
        self.buf.extend_from_slice(b"\r\n");
        self.buf.extend_from_slice(&contents);
        self.buf.extend_from_slice(b"\r\n");
        Ok(())
    }

    /// Finish the form, returning the encoded body bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.buf
    }

    fn open_part(&mut self) {
        self.buf
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_for_path(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("photo.JPEG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("icon.png")), "image/png");
        assert_eq!(
            mime_for_path(Path::new("report.xlsx")),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            mime_for_path(Path::new("legacy.xls")),
            "application/vnd.ms-excel"
        );
        assert_eq!(
            mime_for_path(Path::new("archive.zip")),
            "application/x-zip-compressed"
        );
        assert_eq!(mime_for_path(Path::new("unknown.xyz")), "");
        assert_eq!(mime_for_path(Path::new("noext")), "");
    }

    #[test]
    fn test_boundary_format() {
        let b = random_boundary();
        assert!(b.starts_with(BOUNDARY_PREFIX));
        let suffix = &b[BOUNDARY_PREFIX.len()..];
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_boundaries_differ() {
        assert_ne!(random_boundary(), random_boundary());
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("a b"), "a+b");
        assert_eq!(percent_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(percent_encode("safe-_.~"), "safe-_.~");
    }

    #[test]
    fn test_urlencode_pairs() {
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "x y".to_string()),
        ];
        assert_eq!(urlencode_pairs(&pairs), "a=1&b=x+y");
    }

    #[test]
    fn test_multipart_text_parts() {
        let mut form = MultipartForm::with_boundary("XYZ");
        form.text("a", "1");
        let body = String::from_utf8(form.finish()).unwrap();
        assert_eq!(
            body,
            "--XYZ\r\ncontent-disposition: form-data; name=\"a\"\r\n\r\n1\r\n--XYZ--\r\n"
        );
    }

    #[test]
    fn test_multipart_file_part() {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(b"fakepng").unwrap();

        let mut form = MultipartForm::with_boundary("XYZ");
        form.file("upload", tmp.path()).unwrap();
        let body = String::from_utf8(form.finish()).unwrap();

        assert!(body.contains("content-disposition: form-data; name=\"upload\"; filename=\""));
        assert!(body.contains("content-type: image/png\r\n"));
        assert!(body.contains("fakepng"));
        assert!(body.ends_with("--XYZ--\r\n"));
    }

    #[test]
    fn test_multipart_unknown_mime_omits_content_type() {
        let mut tmp = tempfile::Builder::new().suffix(".xyz").tempfile().unwrap();
        tmp.write_all(b"data").unwrap();

        let mut form = MultipartForm::with_boundary("XYZ");
        form.file("f", tmp.path()).unwrap();
        let body = String::from_utf8(form.finish()).unwrap();
        assert!(!body.contains("content-type:"));
    }

    #[test]
    fn test_multipart_missing_file_is_io_error() {
        let mut form = MultipartForm::new();
        let err = form.file("f", Path::new("/no/such/file.png")).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_body_form_like() {
        assert!(!Body::Empty.is_form_like());
        assert!(!Body::Raw(String::new()).is_form_like());
        assert!(Body::Raw("a=1".to_string()).is_form_like());
        assert!(!Body::Form(Vec::new()).is_form_like());
        assert!(Body::Form(vec![("a".into(), "1".into())]).is_form_like());
        assert!(!Body::Json(serde_json::json!({"a": 1})).is_form_like());
    }
}
