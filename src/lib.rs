// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Nuotta - Redacting Traffic Capture for Slack Web Clients
//!
//! Wraps the fetch and XHR entry points of a [`TransportHost`], keeps a
//! redacted, bounded log of every in-scope exchange, and optionally builds
//! a registry of workspace members from the user-bearing API responses
//! that pass through.
//!
//! ## Features
//!
//! - Transparent interception: callers see the exact inner result
//! - Redaction: credential headers dropped, workspace tokens masked
//! - Bounded log buffer with NDJSON export
//! - User capture: people search, user info, profile and member list
//!   responses normalized and merged per member id
//! - Offline replay of exported capture logs
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nuotta::{Capture, CaptureConfig, HttpClient, Request, TransportHost};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = Arc::new(TransportHost::with_client(HttpClient::new()?));
//!     let capture = Capture::install(host.clone(), CaptureConfig::for_user_capture())?;
//!
//!     host.fetch(Request::post("https://app.slack.com/api/users.info")?.form([("user", "U1")]))
//!         .await?;
//!
//!     println!("{:?}", capture.status());
//!     capture.download_users(None)?;
//!     capture.stop();
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod error;
pub mod http;
pub mod ndjson;
pub mod network;
pub mod users;

// Re-exports for convenience

// Capture
pub use capture::{Capture, CaptureConfig, CaptureContext, CaptureStatus, ConfigUpdate};
pub use capture::{DirectorySaver, FileSaver, LogBuffer};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{Body, FormPart, HttpClient, HttpClientConfig, Request, Response};

// Network
pub use network::{CapturedEntry, RequestInfo, ResponseInfo, TransportKind};
pub use network::{Fetch, ReadyState, ReadyStateListener, Transports, XhrEvent, XhrTransport};
pub use network::{InstallOutcome, Redactor, TransportHost, UrlScope};

// Users
pub use users::{Endpoint, Payload, UserRecord, UserRegistry};
pub use users::{import_users, replay_logs, ReplayCounts};

/// Nuotta version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
