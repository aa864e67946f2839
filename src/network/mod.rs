// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network interception
//!
//! Transport surfaces, the capturing wrappers around them, redaction and
//! the host that owns the replaceable entry points.

mod event;
mod host;
mod interceptor;
mod redact;
mod scope;
mod transport;

pub use event::{CapturedEntry, Headers, RequestInfo, ResponseInfo, TransportKind};
pub use host::{InstallOutcome, TransportHost};
pub use interceptor::{wrap, FetchInterceptor, XhrInterceptor};
pub use redact::{header_map_to_headers, mask_tokens, normalize_exclusions, Redactor, ALWAYS_EXCLUDED};
pub use scope::{UrlScope, DEFAULT_HOST_PATTERN};
pub use transport::{
    Fetch, ReadyState, ReadyStateListener, Transports, XhrEvent, XhrEventLog, XhrTransport,
};
