// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The two transport surfaces a host exposes
//!
//! `Fetch` is promise-shaped: one call, one settled result.
//! `XhrTransport` is event-shaped: progress is reported as ready-state
//! changes to a listener, and the exchange settles when `Done` arrives.
//! Dropping the `send` future aborts the exchange; no `Done` is delivered.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::http::{Request, Response};

/// Promise-shaped transport surface
///
/// # Example
///
/// ```rust,no_run
/// use nuotta::network::Fetch;
/// use nuotta::http::{HttpClient, Request};
///
/// # async fn run() -> nuotta::Result<()> {
/// let client = HttpClient::new()?;
/// let response = client.fetch(Request::get("https://app.slack.com/api/users.info")?).await?;
/// println!("{}", response.status_code());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Issue the request and resolve with its response
    async fn fetch(&self, request: Request) -> Result<Response>;
}

/// Event-shaped transport surface
#[async_trait]
pub trait XhrTransport: Send + Sync {
    /// Issue the request, reporting progress to `listener`.
    ///
    /// Resolves once the exchange has reached `ReadyState::Done`.
    async fn send(&self, request: Request, listener: Arc<dyn ReadyStateListener>);
}

/// Receiver of ready-state changes
pub trait ReadyStateListener: Send + Sync {
    fn on_ready_state_change(&self, event: &XhrEvent);
}

impl<F> ReadyStateListener for F
where
    F: Fn(&XhrEvent) + Send + Sync,
{
    fn on_ready_state_change(&self, event: &XhrEvent) {
        self(event)
    }
}

/// XHR ready states
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

/// One ready-state change
#[derive(Debug, Clone)]
pub struct XhrEvent {
    pub ready_state: ReadyState,
    /// Set on `Done` when the exchange produced a response
    pub response: Option<Response>,
    /// Set on `Done` when the exchange failed
    pub error: Option<String>,
}

impl XhrEvent {
    /// Intermediate state change without payload
    pub fn state(ready_state: ReadyState) -> Self {
        Self {
            ready_state,
            response: None,
            error: None,
        }
    }

    /// Terminal state with a response
    pub fn done(response: Response) -> Self {
        Self {
            ready_state: ReadyState::Done,
            response: Some(response),
            error: None,
        }
    }

    /// Terminal state after a network failure
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ready_state: ReadyState::Done,
            response: None,
            error: Some(error.into()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.ready_state == ReadyState::Done
    }
}

/// Listener that keeps every event it sees
#[derive(Debug, Default)]
pub struct XhrEventLog {
    events: Mutex<Vec<XhrEvent>>,
}

impl XhrEventLog {
    /// All events received so far
    pub fn events(&self) -> Vec<XhrEvent> {
        self.events.lock().clone()
    }

    /// The terminal event, if the exchange has settled
    pub fn done(&self) -> Option<XhrEvent> {
        self.events.lock().iter().find(|e| e.is_done()).cloned()
    }
}

impl ReadyStateListener for XhrEventLog {
    fn on_ready_state_change(&self, event: &XhrEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Capability record holding one entry point per surface
#[derive(Clone)]
pub struct Transports {
    pub fetch: Arc<dyn Fetch>,
    pub xhr: Arc<dyn XhrTransport>,
}

impl Transports {
    pub fn new(fetch: Arc<dyn Fetch>, xhr: Arc<dyn XhrTransport>) -> Self {
        Self { fetch, xhr }
    }

    /// Use one value for both surfaces
    pub fn from_shared<T>(transport: Arc<T>) -> Self
    where
        T: Fetch + XhrTransport + 'static,
    {
        Self {
            fetch: transport.clone(),
            xhr: transport,
        }
    }

    /// Whether both entry points are the same allocations as `other`'s
    pub fn same_as(&self, other: &Transports) -> bool {
        Arc::ptr_eq(&self.fetch, &other.fetch) && Arc::ptr_eq(&self.xhr, &other.xhr)
    }
}

impl std::fmt::Debug for Transports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transports").finish_non_exhaustive()
    }
}
