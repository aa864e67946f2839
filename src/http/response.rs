// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use super::headers;

/// HTTP response representation
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
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl Response {
    /// Create a new response
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        url: Url,
        response_time_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            response_time_ms,
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

    /// Canonical reason phrase for the status, empty if unknown
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    /// Check if the declared content type is JSON (`application/json` or `+json`)
    pub fn is_json(&self) -> bool {
        self.content_type().map(is_json_content_type).unwrap_or(false)
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

/// Check whether a content type header value declares JSON
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response_with_type(content_type: &str) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_str(content_type).unwrap());
        Response::new(
            StatusCode::OK,
            headers,
            Bytes::from_static(b"{\"ok\":true}"),
            Url::parse("https://app.slack.com/api/users.info").unwrap(),
            12,
        )
    }

    #[test]
    fn test_response_status() {
        let resp = response_with_type("application/json");
        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.status_text(), "OK");
    }

    #[test]
    fn test_json_content_types() {
        assert!(response_with_type("application/json; charset=utf-8").is_json());
        assert!(response_with_type("application/problem+json").is_json());
        assert!(!response_with_type("text/html").is_json());
        assert!(!response_with_type("text/plain; note=application/json").is_json());
    }
}
