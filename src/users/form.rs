// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Best-effort field lookup in captured request bodies
//!
//! Grammar, tried in order:
//!
//! 1. multipart part: `name="<key>"` followed by one blank line, value is
//!    the next line (`\n` or `\r\n` line endings)
//! 2. urlencoded pair: `<key>=<value>` at the start of the body or after
//!    `&`/`;`, value runs to the next `&`, `;` or line break
//!
//! No match yields `None`. Values are returned as they appear in the body.

use regex::Regex;

use crate::network::CapturedEntry;

/// Look up `key` in a form-encoded body text
pub fn extract_form_value(body: &str, key: &str) -> Option<String> {
    if body.is_empty() || key.is_empty() {
        return None;
    }

    let key = regex::escape(key);
    let multipart = Regex::new(&format!(r#"name="{}"\r?\n\r?\n([^\r\n]+)"#, key)).ok()?;
    if let Some(caps) = multipart.captures(body) {
        return Some(caps[1].to_string());
    }

    let urlencoded = Regex::new(&format!(r"(?:^|[&;]){}=([^&;\n\r]+)", key)).ok()?;
    urlencoded.captures(body).map(|caps| caps[1].to_string())
}

/// Id of the user a profile lookup was about: request body first, then URL query
pub fn subject_user_id(entry: &CapturedEntry) -> Option<String> {
    entry
        .request
        .body_text
        .as_deref()
        .and_then(|body| extract_form_value(body, "user"))
        .or_else(|| entry.query_param("user"))
        .filter(|id| !id.trim().is_empty())
}
