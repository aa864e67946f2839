// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Which calls get captured
//!
//! A call is in scope when its host passes the host gate and its URL
//! matches at least one include pattern (or no include patterns are set).

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

/// Default host gate: the workspace web client and its API hosts
pub const DEFAULT_HOST_PATTERN: &str = r"(^|\.)slack\.com$";

/// URL include filter plus host gate
#[derive(Debug, Clone)]
pub struct UrlScope {
    host: Option<Regex>,
    filters: Vec<Regex>,
}

impl Default for UrlScope {
    fn default() -> Self {
        Self {
            host: Some(Regex::new(DEFAULT_HOST_PATTERN).expect("default host pattern is valid")),
            filters: Vec::new(),
        }
    }
}

impl UrlScope {
    /// Scope that admits every URL
    pub fn everything() -> Self {
        Self {
            host: None,
            filters: Vec::new(),
        }
    }

    /// Build a scope from an optional host pattern and include patterns
    pub fn new<S: AsRef<str>>(host_pattern: Option<&str>, filters: impl IntoIterator<Item = S>) -> Result<Self> {
        let host = host_pattern
            .map(|p| {
                Regex::new(p).map_err(|e| Error::config(format!("invalid host pattern '{}': {}", p, e)))
            })
            .transpose()?;
        Ok(Self {
            host,
            filters: compile_filters(filters)?,
        })
    }

    /// Replace the include patterns
    pub fn set_filters<S: AsRef<str>>(&mut self, patterns: impl IntoIterator<Item = S>) -> Result<()> {
        self.filters = compile_filters(patterns)?;
        Ok(())
    }

    /// Current include patterns
    pub fn filters(&self) -> Vec<String> {
        self.filters.iter().map(|r| r.as_str().to_string()).collect()
    }

    /// Current host pattern
    pub fn host_pattern(&self) -> Option<&str> {
        self.host.as_ref().map(|r| r.as_str())
    }

    /// Decide whether a call to `url` is captured
    pub fn admits(&self, url: &Url) -> bool {
        if let Some(ref gate) = self.host {
            match url.host_str() {
                Some(host) if gate.is_match(host) => {}
                _ => return false,
            }
        }

        self.filters.is_empty() || self.filters.iter().any(|f| f.is_match(url.as_str()))
    }
}

fn compile_filters<S: AsRef<str>>(patterns: impl IntoIterator<Item = S>) -> Result<Vec<Regex>> {
    patterns
        .into_iter()
        .map(|p| {
            let p = p.as_ref();
            Regex::new(p).map_err(|e| Error::invalid_argument(format!("invalid filter '{}': {}", p, e)))
        })
        .collect()
}
