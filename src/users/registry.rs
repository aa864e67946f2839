// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Keyed store of canonical user records

use std::collections::HashMap;

use super::record::UserRecord;
use crate::error::Result;
use crate::ndjson;

/// What `add_or_merge` did with a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First record for the key
    Inserted,
    /// Existing record gained at least one attribute
    Updated,
    /// Nothing new in the candidate
    Unchanged,
    /// Candidate had no key
    Rejected,
}

/// One record per member id, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    records: Vec<UserRecord>,
    index: HashMap<String, usize>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-create the record for the candidate's key and merge into it
    pub fn add_or_merge(&mut self, candidate: UserRecord) -> MergeOutcome {
        if !candidate.has_key() {
            return MergeOutcome::Rejected;
        }

        match self.index.get(&candidate.id) {
            Some(&slot) => {
                if self.records[slot].merge(&candidate) {
                    MergeOutcome::Updated
                } else {
                    MergeOutcome::Unchanged
                }
            }
            None => {
                // Merging into an empty record drops blank attributes the same
                // way a later merge would.
                let mut record = UserRecord::new(candidate.id.clone());
                record.merge(&candidate);
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
                MergeOutcome::Inserted
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// One record per line, in insertion order
    pub fn export_ndjson(&self) -> Result<String> {
        ndjson::to_string(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: &str) -> UserRecord {
        UserRecord {
            name: Some(name.into()),
            ..UserRecord::new(id)
        }
    }

    #[test]
    fn test_one_record_per_key() {
        let mut registry = UserRegistry::new();
        assert_eq!(registry.add_or_merge(named("U1", "Alice")), MergeOutcome::Inserted);
        assert_eq!(registry.add_or_merge(named("U2", "Bob")), MergeOutcome::Inserted);
        assert_eq!(registry.add_or_merge(named("U1", "Other")), MergeOutcome::Unchanged);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("U1").unwrap().name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_update_and_rejection() {
        let mut registry = UserRegistry::new();
        registry.add_or_merge(UserRecord::new("U1"));
        assert_eq!(registry.add_or_merge(named("U1", "Alice")), MergeOutcome::Updated);
        assert_eq!(registry.add_or_merge(named("", "Ghost")), MergeOutcome::Rejected);
        assert_eq!(registry.add_or_merge(named("  ", "Ghost")), MergeOutcome::Rejected);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_blank_attributes_not_stored() {
        let mut registry = UserRegistry::new();
        registry.add_or_merge(named("U1", ""));
        assert_eq!(registry.get("U1").unwrap().name, None);
    }

    #[test]
    fn test_export_round_trip() {
        let mut registry = UserRegistry::new();
        registry.add_or_merge(named("U2", "Bob"));
        registry.add_or_merge(named("U1", "Alice"));

        let text = registry.export_ndjson().unwrap();
        let parsed = crate::ndjson::parse::<UserRecord>(&text);
        let stored: Vec<UserRecord> = registry.iter().cloned().collect();

        assert_eq!(parsed.items, stored);
        assert_eq!(parsed.items[0].id, "U2");
    }

    #[test]
    fn test_clear() {
        let mut registry = UserRegistry::new();
        registry.add_or_merge(named("U1", "Alice"));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get("U1").is_none());
    }
}
