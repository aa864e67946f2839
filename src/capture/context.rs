// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared state of one capture installation
//!
//! The context is cloned into both interceptors and the control handle.
//! Recording an entry (append, dispatch, merge) happens under one critical
//! section with no await inside; locks are taken log first, then users.
//! Configuration changes hold the config write guard for the whole
//! read-modify-write, taking scope or log after it.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use url::Url;

use super::buffer::LogBuffer;
use super::config::CaptureConfig;
use crate::error::Result;
use crate::network::{CapturedEntry, Redactor, UrlScope};
use crate::users::{dispatch, UserRecord, UserRegistry};

struct Inner {
    config: RwLock<CaptureConfig>,
    scope: RwLock<UrlScope>,
    log: Mutex<LogBuffer>,
    users: Mutex<UserRegistry>,
}

/// Handle to the log, registry and settings of a capture
#[derive(Clone)]
pub struct CaptureContext {
    inner: Arc<Inner>,
}

impl CaptureContext {
    /// Create a context; fails on an invalid host pattern or filter
    pub fn new(config: CaptureConfig) -> Result<Self> {
        let scope = UrlScope::new(config.host_pattern.as_deref(), &config.filter)?;
        Ok(Self {
            inner: Arc::new(Inner {
                config: RwLock::new(config),
                scope: RwLock::new(scope),
                log: Mutex::new(LogBuffer::new()),
                users: Mutex::new(UserRegistry::new()),
            }),
        })
    }

    /// Whether a call to `url` should be captured
    pub fn admits(&self, url: &Url) -> bool {
        self.inner.scope.read().admits(url)
    }

    /// Redaction settings in effect now
    pub fn redactor(&self) -> Redactor {
        self.inner.config.read().redactor()
    }

    /// Append a settled entry and, when enabled, feed it to the registry
    pub fn record(&self, entry: CapturedEntry) {
        let (cap, verbose, user_capture) = {
            let config = self.inner.config.read();
            (config.max_log_size, config.verbose, config.user_capture_enabled)
        };

        if verbose {
            tracing::info!(kind = ?entry.kind, method = %entry.method, url = %entry.url, status = entry.response.status, "captured");
        } else {
            tracing::debug!(kind = ?entry.kind, method = %entry.method, url = %entry.url, status = entry.response.status, "captured");
        }

        let mut log = self.inner.log.lock();
        if user_capture {
            let mut users = self.inner.users.lock();
            dispatch(&entry, &mut users);
        }
        log.append(entry, cap);
    }

    /// Snapshot of retained entries, oldest first
    pub fn entries(&self) -> Vec<CapturedEntry> {
        self.inner.log.lock().iter().cloned().collect()
    }

    /// Snapshot of registry records in insertion order
    pub fn users(&self) -> Vec<UserRecord> {
        self.inner.users.lock().iter().cloned().collect()
    }

    /// Look up one user record
    pub fn user(&self, id: &str) -> Option<UserRecord> {
        self.inner.users.lock().get(id).cloned()
    }

    pub fn entry_count(&self) -> usize {
        self.inner.log.lock().len()
    }

    pub fn user_count(&self) -> usize {
        self.inner.users.lock().len()
    }

    pub fn approx_bytes(&self) -> usize {
        self.inner.log.lock().approx_bytes()
    }

    pub fn config(&self) -> CaptureConfig {
        self.inner.config.read().clone()
    }

    /// Change the configuration in place and trim the log to the resulting cap.
    ///
    /// The change and the trim run under one config write guard, so
    /// concurrent updates never overwrite each other.
    pub fn update_config<R>(&self, change: impl FnOnce(&mut CaptureConfig) -> R) -> R {
        let mut config = self.inner.config.write();
        let result = change(&mut config);
        self.inner.log.lock().trim_to(config.max_log_size);
        result
    }

    /// Replace the URL include patterns; on error the old filter stays
    pub fn set_filters<S: AsRef<str>>(&self, patterns: impl IntoIterator<Item = S>) -> Result<()> {
        let mut config = self.inner.config.write();
        let mut scope = self.inner.scope.write();

        let mut next = scope.clone();
        next.set_filters(patterns)?;
        config.filter = next.filters();
        *scope = next;
        Ok(())
    }

    pub fn clear_log(&self) {
        self.inner.log.lock().clear();
    }

    pub fn clear_users(&self) {
        self.inner.users.lock().clear();
    }

    pub fn export_log(&self) -> Result<String> {
        self.inner.log.lock().export()
    }

    pub fn export_users(&self) -> Result<String> {
        self.inner.users.lock().export_ndjson()
    }

    /// Dispatch every retained entry into the registry. Returns candidates merged.
    pub fn reprocess(&self) -> usize {
        let log = self.inner.log.lock();
        let mut users = self.inner.users.lock();
        log.iter().map(|entry| dispatch(entry, &mut users)).sum()
    }

    /// Whether two handles share the same state
    pub fn same_as(&self, other: &CaptureContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for CaptureContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureContext")
            .field("entries", &self.entry_count())
            .field("users", &self.user_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{ResponseInfo, TransportKind};
    use serde_json::json;

    fn users_info(id: &str) -> CapturedEntry {
        let body = json!({"user": {"id": id, "name": id.to_lowercase()}});
        CapturedEntry::new(TransportKind::Fetch, "POST", "https://app.slack.com/api/users.info")
            .with_response(ResponseInfo::new(200).with_body(body.to_string(), Some(body)))
    }

    #[test]
    fn test_record_respects_user_capture_flag() {
        let ctx = CaptureContext::new(CaptureConfig::default()).unwrap();
        ctx.record(users_info("U1"));
        assert_eq!(ctx.entry_count(), 1);
        assert_eq!(ctx.user_count(), 0);

        let ctx = CaptureContext::new(CaptureConfig::for_user_capture()).unwrap();
        ctx.record(users_info("U1"));
        assert_eq!(ctx.user_count(), 1);
        assert_eq!(ctx.user("U1").unwrap().username.as_deref(), Some("u1"));
    }

    #[test]
    fn test_cap_applies_on_record_and_on_change() {
        let ctx = CaptureContext::new(CaptureConfig::default().max_log_size(2)).unwrap();
        for n in 0..5 {
            ctx.record(users_info(&format!("U{}", n)));
            assert!(ctx.entry_count() <= 2);
        }

        ctx.update_config(|config| config.max_log_size = 1);
        assert_eq!(ctx.entry_count(), 1);
    }

    #[test]
    fn test_reprocess_is_idempotent() {
        let ctx = CaptureContext::new(CaptureConfig::default()).unwrap();
        ctx.record(users_info("U1"));
        ctx.record(users_info("U2"));

        assert_eq!(ctx.reprocess(), 2);
        ctx.reprocess();
        assert_eq!(ctx.user_count(), 2);
    }

    #[test]
    fn test_bad_filter_keeps_old_one() {
        let ctx = CaptureContext::new(CaptureConfig::default()).unwrap();
        ctx.set_filters(["/api/users"]).unwrap();
        assert!(ctx.set_filters(["("]).is_err());
        assert_eq!(ctx.config().filter, vec!["/api/users".to_string()]);

        let users = Url::parse("https://app.slack.com/api/users.info").unwrap();
        let other = Url::parse("https://app.slack.com/api/chat.postMessage").unwrap();
        assert!(ctx.admits(&users));
        assert!(!ctx.admits(&other));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let ctx = CaptureContext::new(CaptureConfig::default()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let ctx = ctx.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        match n % 3 {
                            0 => ctx.update_config(|config| config.user_capture_enabled = true),
                            1 => ctx.update_config(|config| config.max_log_size = 7),
                            _ => ctx.set_filters(["/api/"]).unwrap(),
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let config = ctx.config();
        assert!(config.user_capture_enabled);
        assert_eq!(config.max_log_size, 7);
        assert_eq!(config.filter, vec!["/api/".to_string()]);
    }

    #[test]
    fn test_filter_survives_later_config_update() {
        let ctx = CaptureContext::new(CaptureConfig::default()).unwrap();
        ctx.set_filters(["/api/users"]).unwrap();
        ctx.update_config(|config| config.apply(&crate::capture::ConfigUpdate::new().verbose(true)));

        assert_eq!(ctx.config().filter, vec!["/api/users".to_string()]);
        let other = Url::parse("https://app.slack.com/api/chat.postMessage").unwrap();
        assert!(!ctx.admits(&other));
    }

    #[test]
    fn test_invalid_host_pattern() {
        let err = CaptureContext::new(CaptureConfig::default().host_pattern(Some("["))).unwrap_err();
        assert!(err.is_misuse());
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = CaptureContext::new(CaptureConfig::default()).unwrap();
        let other = ctx.clone();
        other.record(users_info("U1"));
        assert_eq!(ctx.entry_count(), 1);
        assert!(ctx.same_as(&other));
        assert!(!ctx.same_as(&CaptureContext::new(CaptureConfig::default()).unwrap()));
    }
}
