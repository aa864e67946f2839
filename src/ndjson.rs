// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Newline-delimited JSON helpers
//!
//! Writing: one compact object per line, each line terminated by `\n`.
//! Reading: blank lines and lines that fail to parse are skipped and counted.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Serialize items as NDJSON text
pub fn to_string<'a, T, I>(items: I) -> Result<String>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut out = String::new();
    for item in items {
        out.push_str(&serde_json::to_string(item)?);
        out.push('\n');
    }
    Ok(out)
}

/// Lines read from an NDJSON source
#[derive(Debug)]
pub struct Parsed<T> {
    pub items: Vec<T>,
    /// Non-blank lines seen
    pub lines: usize,
    /// Non-blank lines that did not parse as `T`
    pub skipped: usize,
}

/// Parse NDJSON text, skipping blank and malformed lines
pub fn parse<T: DeserializeOwned>(text: &str) -> Parsed<T> {
    let mut parsed = Parsed {
        items: Vec::new(),
        lines: 0,
        skipped: 0,
    };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        parsed.lines += 1;
        match serde_json::from_str(line) {
            Ok(item) => parsed.items.push(item),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed NDJSON line");
                parsed.skipped += 1;
            }
        }
    }

    parsed
}
