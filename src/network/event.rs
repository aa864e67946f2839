// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Captured exchange types
//!
//! The serialized form of [`CapturedEntry`] is the line format of the
//! exported capture log, so field names are camelCase and stable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header name -> value mapping as retained in a captured entry
pub type Headers = BTreeMap<String, String>;

/// One observed request/response exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedEntry {
    /// Which surface carried the call
    #[serde(rename = "type")]
    pub kind: TransportKind,
    /// Request URL
    pub url: String,
    /// HTTP method
    pub method: String,
    pub request: RequestInfo,
    pub response: ResponseInfo,
    /// Time from issue to settlement
    pub duration_ms: u64,
    /// When the request was issued
    pub timestamp: DateTime<Utc>,
}

/// Transport surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Fetch,
    Xhr,
}

/// Request leg of an exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub body_text: Option<String>,
}

/// Response leg of an exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInfo {
    pub status: u16,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub body_text: Option<String>,
    /// Parsed body; only set for JSON content types that parsed
    #[serde(default)]
    pub json: Option<serde_json::Value>,
}

impl CapturedEntry {
    /// Create an entry with empty legs
    pub fn new(kind: TransportKind, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            method: method.into(),
            request: RequestInfo::default(),
            response: ResponseInfo::default(),
            duration_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Set request leg
    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = request;
        self
    }

    /// Set response leg
    pub fn with_response(mut self, response: ResponseInfo) -> Self {
        self.response = response;
        self
    }

    /// Set duration
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set issue timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Response body as a JSON object, if it is one
    pub fn json_object(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.response.json.as_ref().and_then(|v| v.as_object())
    }

    /// Look up a query parameter of the request URL
    pub fn query_param(&self, name: &str) -> Option<String> {
        url::Url::parse(&self.url).ok().and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        })
    }

    /// Serialized length, used for advisory memory accounting
    pub fn approx_size(&self) -> usize {
        serde_json::to_string(self).map(|s| s.len()).unwrap_or(0)
    }
}

impl RequestInfo {
    pub fn new(headers: Headers, body_text: Option<String>) -> Self {
        Self { headers, body_text }
    }
}

impl ResponseInfo {
    /// Create a response leg with only a status
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Set body text and parsed JSON
    pub fn with_body(mut self, body_text: impl Into<String>, json: Option<serde_json::Value>) -> Self {
        self.body_text = Some(body_text.into());
        self.json = json;
        self
    }
}
