// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Entry dispatcher: captured entry -> normalizer -> registry

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::normalize;
use super::payload::{Endpoint, Payload};
use super::record::UserRecord;
use super::registry::{MergeOutcome, UserRegistry};
use crate::network::CapturedEntry;

lazy_static! {
    static ref API_PATH: Regex = Regex::new(r"/api/([A-Za-z0-9._-]+)").unwrap();
}

/// API method name: the path segment after `/api/`
pub fn endpoint_from_url(url: &str) -> Option<&str> {
    API_PATH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Candidate records carried by an entry; empty for anything unrecognized
pub fn candidates(entry: &CapturedEntry) -> Vec<UserRecord> {
    let Some(name) = endpoint_from_url(&entry.url) else {
        return Vec::new();
    };
    let Some(endpoint) = Endpoint::from_name(name) else {
        tracing::trace!(endpoint = name, "no normalizer for endpoint");
        return Vec::new();
    };
    let Some(body) = entry.response.json.as_ref().filter(|v| v.is_object()) else {
        return Vec::new();
    };

    match Payload::parse(endpoint, body) {
        Ok(payload) => normalize(&payload, Some(entry)),
        Err(e) => {
            tracing::debug!(endpoint = name, error = %e, "unexpected payload shape");
            Vec::new()
        }
    }
}

/// Route an entry to its normalizer and merge the candidates.
///
/// Returns the number of candidates merged. Never fails; anything
/// unrecognized or malformed contributes zero.
pub fn dispatch(entry: &CapturedEntry, registry: &mut UserRegistry) -> usize {
    candidates(entry)
        .into_iter()
        .map(|candidate| registry.add_or_merge(candidate))
        .filter(|outcome| *outcome != MergeOutcome::Rejected)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{ResponseInfo, TransportKind};
    use serde_json::{json, Value};

    fn entry(url: &str, body: Value) -> CapturedEntry {
        CapturedEntry::new(TransportKind::Fetch, "POST", url)
            .with_response(ResponseInfo::new(200).with_body(body.to_string(), Some(body)))
    }

    #[test]
    fn test_endpoint_from_url() {
        assert_eq!(
            endpoint_from_url("https://app.slack.com/api/users.info?user=U1"),
            Some("users.info")
        );
        assert_eq!(
            endpoint_from_url("https://edgeapi.slack.com/cache/T1/users/info"),
            None
        );
        assert_eq!(endpoint_from_url("https://x/api/"), None);
    }

    #[test]
    fn test_users_info_scenario() {
        let mut registry = UserRegistry::new();
        let e = entry(
            "https://app.slack.com/api/users.info",
            json!({"user": {"id": "U1", "name": "alice", "profile": {"display_name": "Alice"}}}),
        );

        assert_eq!(dispatch(&e, &mut registry), 1);
        assert_eq!(registry.len(), 1);
        let record = registry.get("U1").unwrap();
        assert_eq!(record.username.as_deref(), Some("alice"));
        assert_eq!(record.name.as_deref(), Some("Alice"));

        dispatch(&e, &mut registry);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_people_search_adds_two() {
        let mut registry = UserRegistry::new();
        registry.add_or_merge(UserRecord::new("U0"));

        let e = entry(
            "https://app.slack.com/api/search.modules.people?slack_route=T1",
            json!({"items": [{"id": "U1", "name": "a"}, {"id": "U2", "name": "b"}]}),
        );
        dispatch(&e, &mut registry);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_ignored_entries() {
        let mut registry = UserRegistry::new();

        let no_api = entry("https://app.slack.com/client/T1", json!({"user": {"id": "U1"}}));
        let unknown = entry("https://app.slack.com/api/conversations.history", json!({"messages": []}));
        let array_body = entry("https://app.slack.com/api/users.info", json!([{"id": "U1"}]));
        let no_json = CapturedEntry::new(TransportKind::Xhr, "GET", "https://app.slack.com/api/users.info");

        for e in [no_api, unknown, array_body, no_json] {
            assert_eq!(dispatch(&e, &mut registry), 0);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_bad_payload_does_not_stop_later_entries() {
        let mut registry = UserRegistry::new();
        let bad = entry("https://app.slack.com/api/users.list", json!({"members": "garbage"}));
        let good = entry("https://app.slack.com/api/users.list", json!({"members": [{"id": "U5"}]}));

        assert_eq!(dispatch(&bad, &mut registry), 0);
        assert_eq!(dispatch(&good, &mut registry), 1);
        assert!(registry.get("U5").is_some());
    }
}
