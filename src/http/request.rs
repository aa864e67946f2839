// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types
//!
//! A request body keeps the shape the caller built it with (text, JSON,
//! urlencoded form, multipart form or raw bytes) so the capture layer can
//! render it as text without guessing.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::headers;
use crate::error::Result;

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Body>,
    /// Request timeout
    pub timeout: Option<Duration>,
}

/// Request body in the shape it was built
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Plain text
    Text(String),
    /// Structured JSON value
    Json(serde_json::Value),
    /// application/x-www-form-urlencoded pairs
    Form(Vec<(String, String)>),
    /// multipart/form-data parts
    Multipart {
        boundary: String,
        parts: Vec<FormPart>,
    },
    /// Opaque bytes
    Bytes(Bytes),
}

/// One part of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// Text field
    Field { name: String, value: String },
    /// File upload
    File {
        name: String,
        filename: String,
        content_type: String,
        data: Bytes,
    },
}

impl Request {
    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
            timeout: Some(Duration::from_secs(30)),
        })
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a plain text body
    pub fn text(self, text: impl Into<String>) -> Self {
        self.body(Body::Text(text.into()))
    }

    /// Set a raw byte body
    pub fn bytes(self, data: impl Into<Bytes>) -> Self {
        self.body(Body::Bytes(data.into()))
    }

    /// Set JSON body
    pub fn json<T: Serialize>(self, data: &T) -> Result<Self> {
        let value = serde_json::to_value(data)?;
        Ok(self
            .body(Body::Json(value))
            .header(headers::CONTENT_TYPE, "application/json"))
    }

    /// Set urlencoded form body
    pub fn form<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body(Body::Form(pairs))
            .header(headers::CONTENT_TYPE, "application/x-www-form-urlencoded")
    }

    /// Set multipart form body
    pub fn multipart(self, parts: Vec<FormPart>) -> Self {
        let boundary = format!(
            "----NuottaFormBoundary{:016x}",
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        let content_type = format!("multipart/form-data; boundary={}", boundary);
        self.body(Body::Multipart { boundary, parts })
            .header(headers::CONTENT_TYPE, content_type)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable timeout
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Get a query parameter by name
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

impl FormPart {
    /// Create a text field part
    pub fn field(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Field {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a file part
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        FormPart::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

impl Body {
    /// Render the body as text for capture.
    ///
    /// Text-like shapes keep their content. Binary content is replaced by a
    /// marker carrying its size (and type, for file parts).
    pub fn to_capture_text(&self) -> String {
        match self {
            Body::Text(text) => text.clone(),
            Body::Json(value) => value.to_string(),
            Body::Form(pairs) => encode_form(pairs),
            Body::Multipart { parts, .. } => parts
                .iter()
                .map(|part| match part {
                    FormPart::Field { name, value } => {
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value)
                    }
                    FormPart::File {
                        name,
                        filename,
                        content_type,
                        data,
                    } => format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n[file {} {} bytes {}]\r\n",
                        name,
                        filename,
                        data.len(),
                        content_type
                    ),
                })
                .collect(),
            Body::Bytes(data) => format!("[binary {} bytes]", data.len()),
        }
    }

    /// Encode the body for the wire
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Body::Text(text) => Bytes::from(text.clone()),
            Body::Json(value) => Bytes::from(value.to_string()),
            Body::Form(pairs) => Bytes::from(encode_form(pairs)),
            Body::Multipart { boundary, parts } => encode_multipart(boundary, parts),
            Body::Bytes(data) => data.clone(),
        }
    }
}

fn encode_form(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn encode_multipart(boundary: &str, parts: &[FormPart]) -> Bytes {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match part {
            FormPart::Field { name, value } => {
                out.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                out.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                filename,
                content_type,
                data,
            } => {
                out.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(data);
            }
        }
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    Bytes::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://app.slack.com/api/users.info?user=U1").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.host(), Some("app.slack.com"));
        assert_eq!(req.query_param("user").as_deref(), Some("U1"));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn test_form_body_text() {
        let req = Request::post("https://app.slack.com/api/users.profile.get")
            .unwrap()
            .form([("user", "U42"), ("token", "a b")]);

        let body = req.body.as_ref().unwrap();
        assert_eq!(body.to_capture_text(), "user=U42&token=a+b");
        assert_eq!(
            req.headers.get("content-type").unwrap(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_multipart_capture_text_keeps_fields_and_marks_files() {
        let req = Request::post("https://app.slack.com/api/users.profile.get")
            .unwrap()
            .multipart(vec![
                FormPart::field("user", "U42"),
                FormPart::file("avatar", "me.png", "image/png", vec![0u8; 10]),
            ]);

        let text = req.body.as_ref().unwrap().to_capture_text();
        assert!(text.contains("name=\"user\"\r\n\r\nU42"));
        assert!(text.contains("[file me.png 10 bytes image/png]"));
        assert!(!text.contains('\0'));
    }

    #[test]
    fn test_multipart_wire_encoding() {
        let body = Body::Multipart {
            boundary: "XYZ".to_string(),
            parts: vec![FormPart::field("user", "U42")],
        };
        let wire = body.to_bytes();
        assert_eq!(
            &wire[..],
            b"--XYZ\r\nContent-Disposition: form-data; name=\"user\"\r\n\r\nU42\r\n--XYZ--\r\n"
        );
    }

    #[test]
    fn test_binary_body_marker() {
        let body = Body::Bytes(Bytes::from_static(&[0xff, 0x00, 0x10]));
        assert_eq!(body.to_capture_text(), "[binary 3 bytes]");
        assert_eq!(body.to_bytes().len(), 3);
    }

    #[test]
    fn test_json_body() {
        let req = Request::post("https://app.slack.com/api/users.list")
            .unwrap()
            .json(&serde_json::json!({"limit": 2}))
            .unwrap();
        assert_eq!(req.body.unwrap().to_capture_text(), r#"{"limit":2}"#);
    }
}
