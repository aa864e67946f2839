// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bounded FIFO of captured entries

use std::collections::VecDeque;

use crate::error::Result;
use crate::ndjson;
use crate::network::CapturedEntry;

/// Entries in settlement order, oldest first
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    entries: VecDeque<CapturedEntry>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail, evicting from the head while over a positive cap
    pub fn append(&mut self, entry: CapturedEntry, cap: i64) {
        self.entries.push_back(entry);
        self.trim_to(cap);
    }

    /// Evict the oldest entries until at most `cap` remain. No-op for `cap <= 0`.
    pub fn trim_to(&mut self, cap: i64) {
        if cap <= 0 {
            return;
        }
        let cap = usize::try_from(cap).unwrap_or(usize::MAX);
        if self.entries.len() <= cap {
            return;
        }

        let evicted = self.entries.len() - cap;
        self.entries.drain(..evicted);
        tracing::trace!(evicted, cap, "log buffer trimmed");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in retention order
    pub fn iter(&self) -> impl Iterator<Item = &CapturedEntry> {
        self.entries.iter()
    }

    /// Retained entries as NDJSON, oldest first
    pub fn export(&self) -> Result<String> {
        ndjson::to_string(&self.entries)
    }

    /// Sum of serialized entry lengths
    pub fn approx_bytes(&self) -> usize {
        self.entries.iter().map(CapturedEntry::approx_size).sum()
    }
}
