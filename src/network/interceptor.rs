// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capturing wrappers around the two transport surfaces
//!
//! A wrapper takes the original entry point and returns a replacement with
//! the same contract. The request leg is read from a borrow before the call
//! is issued; the response leg is read after the call settles. The inner
//! result (or event stream) reaches the caller unchanged.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::event::{CapturedEntry, RequestInfo, ResponseInfo, TransportKind};
use super::redact::{header_map_to_headers, Redactor};
use super::transport::{Fetch, ReadyStateListener, Transports, XhrEvent, XhrTransport};
use crate::capture::CaptureContext;
use crate::error::Result;
use crate::http::{Request, Response};

/// Build capturing replacements for both entry points
pub fn wrap(originals: &Transports, context: &CaptureContext) -> Transports {
    Transports {
        fetch: Arc::new(FetchInterceptor::new(originals.fetch.clone(), context.clone())),
        xhr: Arc::new(XhrInterceptor::new(originals.xhr.clone(), context.clone())),
    }
}

/// Request leg captured before the call is issued
struct PendingCapture {
    kind: TransportKind,
    method: String,
    url: String,
    request: RequestInfo,
    redactor: Redactor,
    started: Instant,
    timestamp: DateTime<Utc>,
}

impl PendingCapture {
    fn begin(kind: TransportKind, request: &Request, redactor: Redactor) -> Self {
        let headers = redactor.sanitize_headers(header_map_to_headers(&request.headers));
        let body_text = request
            .body
            .as_ref()
            .map(|body| redactor.sanitize_body_text(&body.to_capture_text()).into_owned());

        Self {
            kind,
            method: request.method.to_string(),
            url: redactor.sanitize_body_text(request.url.as_str()).into_owned(),
            request: RequestInfo::new(headers, body_text),
            redactor,
            started: Instant::now(),
            timestamp: Utc::now(),
        }
    }

    fn settle(self, response: &Response) -> CapturedEntry {
        let body_text = match std::str::from_utf8(&response.body) {
            Ok(text) => self.redactor.sanitize_body_text(text).into_owned(),
            Err(_) => format!("[binary {} bytes]", response.body_len()),
        };

        // Parsed from the redacted text so masked tokens stay masked in `json`.
        let json = if response.is_json() {
            serde_json::from_str::<serde_json::Value>(&body_text)
                .ok()
                .filter(|v| !v.is_null())
        } else {
            None
        };

        let response_info = ResponseInfo {
            status: response.status_code(),
            status_text: response.status_text().to_string(),
            headers: self
                .redactor
                .sanitize_headers(header_map_to_headers(&response.headers)),
            body_text: Some(body_text),
            json,
        };

        CapturedEntry::new(self.kind, self.method, self.url)
            .with_request(self.request)
            .with_response(response_info)
            .with_duration_ms(self.started.elapsed().as_millis() as u64)
            .with_timestamp(self.timestamp)
    }
}

/// Capturing wrapper for the fetch surface
pub struct FetchInterceptor {
    inner: Arc<dyn Fetch>,
    context: CaptureContext,
}

impl FetchInterceptor {
    pub fn new(inner: Arc<dyn Fetch>, context: CaptureContext) -> Self {
        Self { inner, context }
    }
}

#[async_trait]
impl Fetch for FetchInterceptor {
    async fn fetch(&self, request: Request) -> Result<Response> {
        if !self.context.admits(&request.url) {
            return self.inner.fetch(request).await;
        }

        let pending = PendingCapture::begin(TransportKind::Fetch, &request, self.context.redactor());
        let result = self.inner.fetch(request).await;

        match &result {
            Ok(response) => self.context.record(pending.settle(response)),
            Err(e) => tracing::debug!(url = %pending.url, error = %e, "fetch rejected, nothing recorded"),
        }

        result
    }
}

/// Capturing wrapper for the XHR surface
pub struct XhrInterceptor {
    inner: Arc<dyn XhrTransport>,
    context: CaptureContext,
}

impl XhrInterceptor {
    pub fn new(inner: Arc<dyn XhrTransport>, context: CaptureContext) -> Self {
        Self { inner, context }
    }
}

#[async_trait]
impl XhrTransport for XhrInterceptor {
    async fn send(&self, request: Request, listener: Arc<dyn ReadyStateListener>) {
        if !self.context.admits(&request.url) {
            return self.inner.send(request, listener).await;
        }

        let pending = PendingCapture::begin(TransportKind::Xhr, &request, self.context.redactor());
        let capturing = Arc::new(CapturingListener {
            inner: listener,
            context: self.context.clone(),
            pending: Mutex::new(Some(pending)),
        });

        self.inner.send(request, capturing).await
    }
}

/// Forwards every event to the caller's listener and records on `Done`
struct CapturingListener {
    inner: Arc<dyn ReadyStateListener>,
    context: CaptureContext,
    pending: Mutex<Option<PendingCapture>>,
}

impl ReadyStateListener for CapturingListener {
    fn on_ready_state_change(&self, event: &XhrEvent) {
        self.inner.on_ready_state_change(event);

        if !event.is_done() {
            return;
        }

        // Taken once: a transport repeating `Done` still records a single entry.
        let Some(pending) = self.pending.lock().take() else {
            return;
        };

        match event.response {
            Some(ref response) => self.context.record(pending.settle(response)),
            None => tracing::debug!(
                url = %pending.url,
                error = event.error.as_deref().unwrap_or("aborted"),
                "xhr ended without response, nothing recorded"
            ),
        }
    }
}
