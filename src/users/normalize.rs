// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Payload normalizers
//!
//! Each normalizer maps one endpoint shape to candidate records. Several
//! upstream fields carry near-duplicate values; the precedence chains
//! below decide which one is authoritative and must stay in this order.

use super::form::subject_user_id;
use super::payload::{Payload, Profile, SlackUser};
use super::record::{Avatars, UserRecord};
use crate::network::CapturedEntry;

/// Candidates for one payload. Candidates without a key are discarded.
pub fn normalize(payload: &Payload, entry: Option<&CapturedEntry>) -> Vec<UserRecord> {
    match payload {
        Payload::PeopleSearch(search) => search.items.iter().filter_map(from_people_search_item).collect(),
        Payload::UserInfo(info) => info.user.as_ref().and_then(from_user).into_iter().collect(),
        Payload::MemberList(list) => list.members.iter().filter_map(from_user).collect(),
        Payload::ProfileGet(get) => get
            .profile
            .as_ref()
            .and_then(|profile| from_profile(profile, entry))
            .into_iter()
            .collect(),
    }
}

/// User object from `users.info` or a `users.list` member
pub fn from_user(user: &SlackUser) -> Option<UserRecord> {
    let id = first_of([user.id.as_ref()])?;
    let profile = user.profile.as_ref();

    let mut record = base_record(id, user, profile);
    record.username = first_of([user.name.as_ref()]);
    record.name = first_of([
        profile.and_then(|p| p.display_name_normalized.as_ref()),
        profile.and_then(|p| p.display_name.as_ref()),
        user.name.as_ref(),
    ]);
    record.real_name = first_of([
        profile.and_then(|p| p.real_name_normalized.as_ref()),
        profile.and_then(|p| p.real_name.as_ref()),
        user.real_name.as_ref(),
    ]);
    record.team_id = first_of([user.team_id.as_ref(), profile.and_then(|p| p.team.as_ref())]);

    Some(record)
}

/// Item of a `search.modules.people` listing
pub fn from_people_search_item(item: &SlackUser) -> Option<UserRecord> {
    let id = first_of([item.id.as_ref()])?;
    let profile = item.profile.as_ref();

    let mut record = base_record(id, item, profile);
    record.username = first_of([item.username.as_ref(), item.name.as_ref()]);
    record.name = first_of([
        profile.and_then(|p| p.display_name_normalized.as_ref()),
        profile.and_then(|p| p.display_name.as_ref()),
        item.name.as_ref(),
    ]);
    record.real_name = first_of([
        profile.and_then(|p| p.real_name_normalized.as_ref()),
        profile.and_then(|p| p.real_name.as_ref()),
        item.real_name.as_ref(),
    ]);
    record.team_id = first_of([
        item.team_id.as_ref(),
        item.team.as_ref(),
        profile.and_then(|p| p.team.as_ref()),
    ]);

    Some(record)
}

/// `users.profile.get` profile; the subject id may only be in the request
pub fn from_profile(profile: &Profile, entry: Option<&CapturedEntry>) -> Option<UserRecord> {
    let id = first_of([profile.id.as_ref()]).or_else(|| entry.and_then(subject_user_id))?;

    let mut record = UserRecord::new(id);
    apply_profile(&mut record, profile);
    record.username = first_of([profile.username.as_ref()]);
    record.name = first_of([
        profile.display_name_normalized.as_ref(),
        profile.display_name.as_ref(),
    ]);
    record.real_name = first_of([
        profile.real_name_normalized.as_ref(),
        profile.real_name.as_ref(),
    ]);
    record.team_id = first_of([profile.team.as_ref()]);

    Some(record)
}

/// Key, flags, and everything the nested profile carries
fn base_record(id: String, user: &SlackUser, profile: Option<&Profile>) -> UserRecord {
    let mut record = UserRecord {
        is_bot: user.is_bot,
        deleted: user.deleted,
        is_restricted: user.is_restricted,
        is_ultra_restricted: user.is_ultra_restricted,
        ..UserRecord::new(id)
    };
    if let Some(profile) = profile {
        apply_profile(&mut record, profile);
    }
    record
}

/// Contact fields, title, avatars and custom fields from a profile
fn apply_profile(record: &mut UserRecord, profile: &Profile) {
    record.email = first_of([profile.email.as_ref()]);
    record.phone = first_of([profile.phone.as_ref()]);
    record.first_name = first_of([profile.first_name.as_ref()]);
    record.last_name = first_of([profile.last_name.as_ref()]);
    record.title = first_of([profile.title.as_ref()]);
    record.avatars = Avatars {
        image_24: first_of([profile.image_24.as_ref()]),
        image_32: first_of([profile.image_32.as_ref()]),
        image_48: first_of([profile.image_48.as_ref()]),
        image_72: first_of([profile.image_72.as_ref()]),
        image_192: first_of([profile.image_192.as_ref()]),
        image_512: first_of([profile.image_512.as_ref()]),
        image_1024: first_of([profile.image_1024.as_ref()]),
    };
    record.fields = profile.fields.clone();
}

/// First candidate that is present and not blank
fn first_of<'a, const N: usize>(candidates: [Option<&'a String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .cloned()
}
