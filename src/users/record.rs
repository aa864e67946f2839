// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Canonical user record and its merge rule

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalized profile of one workspace member, keyed by member id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    /// Handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_restricted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ultra_restricted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub avatars: Avatars,
    /// Custom profile field id -> value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// Avatar URLs at the fixed size tiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatars {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_24: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_32: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_48: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_72: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_192: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_512: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_1024: Option<String>,
}

/// Values that can be "empty" for merge purposes
trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for bool {
    fn is_blank(&self) -> bool {
        false
    }
}

/// Set `slot` from `value` if `slot` is empty and `value` is not
fn fill<T: Blank + Clone>(slot: &mut Option<T>, value: &Option<T>) -> bool {
    let slot_empty = slot.as_ref().map_or(true, Blank::is_blank);
    match value {
        Some(v) if slot_empty && !v.is_blank() => {
            *slot = Some(v.clone());
            true
        }
        _ => false,
    }
}

impl UserRecord {
    /// Create an empty record for a key
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Whether the record carries a usable key
    pub fn has_key(&self) -> bool {
        !self.id.is_blank()
    }

    /// Merge `candidate` into `self`, first non-empty value wins.
    ///
    /// Only attributes that are empty here and non-empty on the candidate
    /// change. Returns whether anything changed.
    pub fn merge(&mut self, candidate: &UserRecord) -> bool {
        let mut changed = false;

        changed |= fill(&mut self.username, &candidate.username);
        changed |= fill(&mut self.name, &candidate.name);
        changed |= fill(&mut self.real_name, &candidate.real_name);
        changed |= fill(&mut self.team_id, &candidate.team_id);
        changed |= fill(&mut self.is_bot, &candidate.is_bot);
        changed |= fill(&mut self.deleted, &candidate.deleted);
        changed |= fill(&mut self.is_restricted, &candidate.is_restricted);
        changed |= fill(&mut self.is_ultra_restricted, &candidate.is_ultra_restricted);
        changed |= fill(&mut self.email, &candidate.email);
        changed |= fill(&mut self.phone, &candidate.phone);
        changed |= fill(&mut self.first_name, &candidate.first_name);
        changed |= fill(&mut self.last_name, &candidate.last_name);
        changed |= fill(&mut self.title, &candidate.title);
        changed |= self.avatars.merge(&candidate.avatars);

        if self.fields.is_empty() && !candidate.fields.is_empty() {
            self.fields = candidate.fields.clone();
            changed = true;
        }

        changed
    }
}

impl Avatars {
    /// Per-tier first-non-empty merge
    pub fn merge(&mut self, other: &Avatars) -> bool {
        let mut changed = false;
        changed |= fill(&mut self.image_24, &other.image_24);
        changed |= fill(&mut self.image_32, &other.image_32);
        changed |= fill(&mut self.image_48, &other.image_48);
        changed |= fill(&mut self.image_72, &other.image_72);
        changed |= fill(&mut self.image_192, &other.image_192);
        changed |= fill(&mut self.image_512, &other.image_512);
        changed |= fill(&mut self.image_1024, &other.image_1024);
        changed
    }

    pub fn is_empty(&self) -> bool {
        *self == Avatars::default()
    }
}
