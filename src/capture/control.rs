// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Control handle for an installed capture

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::config::{CaptureConfig, ConfigUpdate};
use super::context::CaptureContext;
use crate::error::{Error, Result};
use crate::network::{InstallOutcome, TransportHost};
use crate::users::UserRecord;

/// Snapshot returned by [`Capture::status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureStatus {
    pub entries: usize,
    pub users: usize,
    /// Advisory size of the retained log
    pub approx_bytes: usize,
    pub user_capture_enabled: bool,
}

/// Destination for downloaded exports
pub trait FileSaver: Send + Sync {
    /// Persist `contents` under `filename`, returning where it went
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf>;
}

/// Writes downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for DirectorySaver {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        // Only the final component is used so a name cannot escape the directory.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| Error::invalid_argument(format!("invalid download name '{}'", filename)))?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Handle to a capture installed on a [`TransportHost`]
#[derive(Clone)]
pub struct Capture {
    host: Arc<TransportHost>,
    context: CaptureContext,
    saver: Arc<dyn FileSaver>,
}

impl Capture {
    /// Install capture on both entry points of `host`.
    ///
    /// If the host already carries a capture, a warning is logged and the
    /// returned handle controls the existing installation; `config` is unused
    /// and not validated.
    pub fn install(host: Arc<TransportHost>, config: CaptureConfig) -> Result<Self> {
        if let Some(context) = host.installed_context() {
            tracing::warn!("capture already installed on this host, returning the live one");
            return Ok(Self {
                host,
                context,
                saver: Arc::new(DirectorySaver::default()),
            });
        }

        let context = CaptureContext::new(config)?;
        let context = match host.install(&context) {
            InstallOutcome::Installed(ctx) | InstallOutcome::AlreadyInstalled(ctx) => ctx,
        };

        Ok(Self {
            host,
            context,
            saver: Arc::new(DirectorySaver::default()),
        })
    }

    /// Use a different destination for downloads
    pub fn with_saver(mut self, saver: Arc<dyn FileSaver>) -> Self {
        self.saver = saver;
        self
    }

    /// Shared capture state
    pub fn context(&self) -> &CaptureContext {
        &self.context
    }

    /// Whether this handle's capture is live on the host
    pub fn is_active(&self) -> bool {
        self.host
            .installed_context()
            .map_or(false, |ctx| ctx.same_as(&self.context))
    }

    pub fn status(&self) -> CaptureStatus {
        CaptureStatus {
            entries: self.context.entry_count(),
            users: self.context.user_count(),
            approx_bytes: self.context.approx_bytes(),
            user_capture_enabled: self.context.config().user_capture_enabled,
        }
    }

    /// Snapshot of the configuration
    pub fn get_config(&self) -> CaptureConfig {
        self.context.config()
    }

    /// Apply a partial configuration change.
    ///
    /// A lower `max_log_size` trims immediately. Turning user capture on
    /// reprocesses the retained log the same way [`Capture::enable_user_capture`] does.
    pub fn set_config(&self, update: ConfigUpdate) {
        let switched_on = self.context.update_config(|config| {
            let was_enabled = config.user_capture_enabled;
            config.apply(&update);
            config.user_capture_enabled && !was_enabled
        });

        if switched_on {
            self.context.reprocess();
        }
    }

    /// Apply a configuration change given as a JSON object
    pub fn set_config_json(&self, value: &Value) -> Result<()> {
        self.set_config(ConfigUpdate::from_json(value)?);
        Ok(())
    }

    /// Replace the URL include filter from a JSON array of regex strings
    pub fn set_filter(&self, value: &Value) -> Result<()> {
        let items = value
            .as_array()
            .ok_or_else(|| Error::invalid_argument("filter must be an array of strings"))?;
        let patterns = items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| Error::invalid_argument(format!("filter item {} is not a string", item)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.set_filter_patterns(patterns)
    }

    /// Replace the URL include filter; an empty list removes it
    pub fn set_filter_patterns<S: AsRef<str>>(&self, patterns: impl IntoIterator<Item = S>) -> Result<()> {
        self.context.set_filters(patterns)
    }

    pub fn clear(&self) {
        self.context.clear_log();
        tracing::info!("capture log cleared");
    }

    pub fn clear_users(&self) {
        self.context.clear_users();
        tracing::info!("user registry cleared");
    }

    /// Retained entries as NDJSON, oldest first
    pub fn export_ndjson(&self) -> Result<String> {
        self.context.export_log()
    }

    /// Registry records as NDJSON, in insertion order
    pub fn export_users_ndjson(&self) -> Result<String> {
        self.context.export_users()
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.context.users()
    }

    /// Save the log export; defaults to `slack_capture_<timestamp>.ndjson`
    pub fn download(&self, filename: Option<&str>) -> Result<PathBuf> {
        let name = filename.map_or_else(|| default_name("slack_capture"), str::to_string);
        let path = self.saver.save(&name, &self.export_ndjson()?)?;
        tracing::info!(path = %path.display(), entries = self.context.entry_count(), "capture log exported");
        Ok(path)
    }

    /// Save the users export; defaults to `slack_users_<timestamp>.ndjson`
    pub fn download_users(&self, filename: Option<&str>) -> Result<PathBuf> {
        let name = filename.map_or_else(|| default_name("slack_users"), str::to_string);
        let path = self.saver.save(&name, &self.export_users_ndjson()?)?;
        tracing::info!(path = %path.display(), users = self.context.user_count(), "users exported");
        Ok(path)
    }

    /// Start feeding the registry and reprocess every retained entry.
    /// Returns the number of candidates merged from the backlog.
    pub fn enable_user_capture(&self) -> usize {
        self.context.update_config(|config| config.user_capture_enabled = true);
        let merged = self.context.reprocess();
        tracing::info!(merged, users = self.context.user_count(), "user capture enabled");
        merged
    }

    /// Stop feeding the registry; collected records are kept
    pub fn disable_user_capture(&self) {
        self.context.update_config(|config| config.user_capture_enabled = false);
        tracing::info!("user capture disabled");
    }

    /// Uninstall both wrappers. Returns false if this capture was not live.
    pub fn stop(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.host.uninstall()
    }
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("context", &self.context)
            .field("active", &self.is_active())
            .finish()
    }
}

fn default_name(prefix: &str) -> String {
    format!("{}_{}.ndjson", prefix, Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}
