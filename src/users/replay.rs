// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Offline replay of exported NDJSON files into a registry
//!
//! Capture logs are read leniently: only `url`, `method`, the request body
//! and the parsed response body matter, so logs written by older exporters
//! (or trimmed by hand) still replay.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::dispatch::{dispatch, endpoint_from_url};
use super::payload::Endpoint;
use super::record::UserRecord;
use super::registry::{MergeOutcome, UserRegistry};
use crate::error::{ErrorContext, Result};
use crate::ndjson;
use crate::network::{CapturedEntry, RequestInfo, ResponseInfo, TransportKind};

/// Tally of a replay or import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayCounts {
    pub files: usize,
    /// Non-blank lines read
    pub lines: usize,
    /// Candidates merged into the registry
    pub users: usize,
    /// Lines that were malformed or carried nothing usable
    pub skipped: usize,
}

/// Subset of a captured entry needed for dispatch
#[derive(Debug, Deserialize)]
struct LoggedExchange {
    #[serde(default)]
    url: String,
    #[serde(default)]
    method: String,
    #[serde(default)]
    request: Option<RequestInfo>,
    #[serde(default)]
    response: Option<LoggedResponse>,
}

#[derive(Debug, Deserialize)]
struct LoggedResponse {
    #[serde(default)]
    status: u16,
    #[serde(default)]
    json: Option<serde_json::Value>,
}

impl LoggedExchange {
    fn into_entry(self) -> CapturedEntry {
        let mut response = ResponseInfo::default();
        if let Some(logged) = self.response {
            response.status = logged.status;
            response.json = logged.json;
        }
        CapturedEntry::new(TransportKind::Fetch, self.method, self.url)
            .with_request(self.request.unwrap_or_default())
            .with_response(response)
    }
}

/// Replay capture log text into the registry, adding to `counts`
pub fn replay_text(text: &str, registry: &mut UserRegistry, counts: &mut ReplayCounts) {
    let parsed = ndjson::parse::<LoggedExchange>(text);
    counts.lines += parsed.lines;
    counts.skipped += parsed.skipped;

    for exchange in parsed.items {
        let entry = exchange.into_entry();
        let recognized = endpoint_from_url(&entry.url)
            .and_then(Endpoint::from_name)
            .is_some();
        let has_object = entry.json_object().is_some();

        if !recognized || !has_object {
            counts.skipped += 1;
            continue;
        }
        counts.users += dispatch(&entry, registry);
    }
}

/// Replay exported capture logs into the registry
pub fn replay_logs<P: AsRef<Path>>(paths: &[P], registry: &mut UserRegistry) -> Result<ReplayCounts> {
    let mut counts = ReplayCounts::default();

    for path in paths {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .context(&format!("failed to read capture log {}", path.display()))?;
        replay_text(&text, registry, &mut counts);
        counts.files += 1;
    }

    tracing::info!(
        files = counts.files,
        lines = counts.lines,
        users = counts.users,
        skipped = counts.skipped,
        "capture logs replayed"
    );
    Ok(counts)
}

/// Merge exported users NDJSON back into a registry. Lines without an id are skipped.
pub fn import_users<P: AsRef<Path>>(paths: &[P], registry: &mut UserRegistry) -> Result<ReplayCounts> {
    let mut counts = ReplayCounts::default();

    for path in paths {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .context(&format!("failed to read users file {}", path.display()))?;

        let parsed = ndjson::parse::<UserRecord>(&text);
        counts.lines += parsed.lines;
        counts.skipped += parsed.skipped;
        for record in parsed.items {
            match registry.add_or_merge(record) {
                MergeOutcome::Rejected => counts.skipped += 1,
                _ => counts.users += 1,
            }
        }
        counts.files += 1;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_lines(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_replay_counts() {
        let log = write_lines(&[
            r#"{"url":"https://app.slack.com/api/users.info","response":{"status":200,"json":{"user":{"id":"U1","name":"alice"}}}}"#,
            "",
            "not json",
            r#"{"url":"https://app.slack.com/api/search.modules.people","response":{"json":{"items":[{"id":"U2"},{"id":"U3"}]}}}"#,
            r#"{"url":"https://app.slack.com/api/conversations.history","response":{"json":{"messages":[]}}}"#,
            r#"{"url":"https://app.slack.com/api/users.list","response":{"json":null}}"#,
        ]);

        let mut registry = UserRegistry::new();
        let counts = replay_logs(&[log.path()], &mut registry).unwrap();

        assert_eq!(
            counts,
            ReplayCounts {
                files: 1,
                lines: 5,
                users: 3,
                skipped: 3,
            }
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_replay_profile_uses_request_body() {
        let log = write_lines(&[
            r#"{"url":"https://app.slack.com/api/users.profile.get","method":"POST","request":{"bodyText":"user=U9&token=xoxc-****"},"response":{"json":{"profile":{"real_name":"Nine"}}}}"#,
        ]);

        let mut registry = UserRegistry::new();
        replay_logs(&[log.path()], &mut registry).unwrap();
        assert_eq!(registry.get("U9").unwrap().real_name.as_deref(), Some("Nine"));
    }

    #[test]
    fn test_replay_of_exported_entry() {
        let body = serde_json::json!({"user": {"id": "U1", "name": "alice"}});
        let entry = CapturedEntry::new(TransportKind::Xhr, "POST", "https://app.slack.com/api/users.info")
            .with_response(ResponseInfo::new(200).with_body(body.to_string(), Some(body)));
        let text = crate::ndjson::to_string([&entry]).unwrap();

        let mut registry = UserRegistry::new();
        let mut counts = ReplayCounts::default();
        replay_text(&text, &mut registry, &mut counts);

        assert_eq!(counts.users, 1);
        assert_eq!(registry.get("U1").unwrap().username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut registry = UserRegistry::new();
        assert!(replay_logs(&["/nonexistent/capture.ndjson"], &mut registry).is_err());
    }

    #[test]
    fn test_import_users() {
        let first = write_lines(&[
            r#"{"id":"U1","username":"alice"}"#,
            r#"{"id":"","username":"ghost"}"#,
            r#"{"username":"no-id"}"#,
        ]);
        let second = write_lines(&[r#"{"id":"U1","username":"other","real_name":"Alice A"}"#]);

        let mut registry = UserRegistry::new();
        let counts = import_users(&[first.path(), second.path()], &mut registry).unwrap();

        assert_eq!(counts.files, 2);
        assert_eq!(counts.lines, 4);
        assert_eq!(counts.users, 2);
        assert_eq!(counts.skipped, 2);

        let record = registry.get("U1").unwrap();
        assert_eq!(record.username.as_deref(), Some("alice"));
        assert_eq!(record.real_name.as_deref(), Some("Alice A"));
    }
}
