// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host-owned transport entry points
//!
//! Callers go through the host, which always dispatches to whatever entry
//! points are current. Installing a capture swaps in the wrapped record
//! and keeps the originals; uninstalling puts the originals back.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::interceptor::wrap;
use super::transport::{ReadyStateListener, Transports};
use crate::capture::CaptureContext;
use crate::error::Result;
use crate::http::{HttpClient, Request, Response};

/// Result of an install attempt
#[derive(Clone)]
pub enum InstallOutcome {
    /// Wrappers installed with the given context
    Installed(CaptureContext),
    /// The host was already wrapped; the existing context is returned untouched
    AlreadyInstalled(CaptureContext),
}

impl InstallOutcome {
    /// Context that is live on the host
    pub fn context(&self) -> &CaptureContext {
        match self {
            InstallOutcome::Installed(ctx) | InstallOutcome::AlreadyInstalled(ctx) => ctx,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, InstallOutcome::Installed(_))
    }
}

struct Installation {
    originals: Transports,
    context: CaptureContext,
}

/// Owner of the fetch and XHR entry points
pub struct TransportHost {
    current: RwLock<Transports>,
    installation: Mutex<Option<Installation>>,
}

impl TransportHost {
    /// Create a host over the given entry points
    pub fn new(transports: Transports) -> Self {
        Self {
            current: RwLock::new(transports),
            installation: Mutex::new(None),
        }
    }

    /// Create a host whose both surfaces are served by one HTTP client
    pub fn with_client(client: HttpClient) -> Self {
        Self::new(Transports::from_shared(Arc::new(client)))
    }

    /// Entry points currently in effect
    pub fn entry_points(&self) -> Transports {
        self.current.read().clone()
    }

    /// Call the current fetch entry point
    pub async fn fetch(&self, request: Request) -> Result<Response> {
        let fetch = self.current.read().fetch.clone();
        fetch.fetch(request).await
    }

    /// Call the current XHR entry point
    pub async fn xhr(&self, request: Request, listener: Arc<dyn ReadyStateListener>) {
        let xhr = self.current.read().xhr.clone();
        xhr.send(request, listener).await
    }

    /// Wrap both entry points with capture bound to `context`
    pub fn install(&self, context: &CaptureContext) -> InstallOutcome {
        let mut installation = self.installation.lock();

        if let Some(ref existing) = *installation {
            tracing::warn!("capture already installed on this host, leaving it untouched");
            return InstallOutcome::AlreadyInstalled(existing.context.clone());
        }

        let originals = self.entry_points();
        *self.current.write() = wrap(&originals, context);
        *installation = Some(Installation {
            originals,
            context: context.clone(),
        });

        tracing::info!("capture installed on fetch and xhr");
        InstallOutcome::Installed(context.clone())
    }

    /// Restore the original entry points. Returns false if nothing was installed.
    pub fn uninstall(&self) -> bool {
        match self.installation.lock().take() {
            Some(installation) => {
                *self.current.write() = installation.originals;
                tracing::info!("capture removed, original transports restored");
                true
            }
            None => false,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installation.lock().is_some()
    }

    /// Context of the live installation, if any
    pub fn installed_context(&self) -> Option<CaptureContext> {
        self.installation.lock().as_ref().map(|i| i.context.clone())
    }
}

impl std::fmt::Debug for TransportHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportHost")
            .field("installed", &self.is_installed())
            .finish()
    }
}
