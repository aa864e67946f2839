// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! User capture: payload shapes, normalizers, merge registry and dispatch
//!
//! Captured entries whose URL names a known people endpoint are parsed into
//! typed payloads, normalized into [`UserRecord`] candidates, and merged into
//! a [`UserRegistry`] keyed by member id.

mod dispatch;
mod form;
mod normalize;
mod payload;
mod record;
mod registry;
mod replay;

pub use dispatch::{candidates, dispatch, endpoint_from_url};
pub use form::{extract_form_value, subject_user_id};
pub use normalize::{from_people_search_item, from_profile, from_user, normalize};
pub use payload::{
    coerce_bool, Endpoint, MemberList, Payload, PeopleSearch, ProfileGet, Profile, SlackUser, UserInfo,
};
pub use record::{Avatars, UserRecord};
pub use registry::{MergeOutcome, UserRegistry};
pub use replay::{import_users, replay_logs, replay_text, ReplayCounts};
