// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Typed shapes of the user-bearing API responses
//!
//! Every field is optional and parsed leniently: a field of the wrong type
//! reads as absent, and list items are parsed one by one so a malformed
//! item never takes its siblings down with it.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Endpoints that carry user data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `search.modules.people`: bulk people search
    PeopleSearch,
    /// `users.info`: single user lookup
    UserInfo,
    /// `users.profile.get`: single profile lookup
    ProfileGet,
    /// `users.list`: bulk member listing
    MemberList,
}

impl Endpoint {
    /// Map an API method name to a known endpoint
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "search.modules.people" => Some(Endpoint::PeopleSearch),
            "users.info" => Some(Endpoint::UserInfo),
            "users.profile.get" => Some(Endpoint::ProfileGet),
            "users.list" => Some(Endpoint::MemberList),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::PeopleSearch => "search.modules.people",
            Endpoint::UserInfo => "users.info",
            Endpoint::ProfileGet => "users.profile.get",
            Endpoint::MemberList => "users.list",
        }
    }
}

/// Response payload tagged by endpoint
#[derive(Debug, Clone)]
pub enum Payload {
    PeopleSearch(PeopleSearch),
    UserInfo(UserInfo),
    ProfileGet(ProfileGet),
    MemberList(MemberList),
}

impl Payload {
    /// Parse a response body for `endpoint`
    pub fn parse(endpoint: Endpoint, body: &Value) -> serde_json::Result<Self> {
        Ok(match endpoint {
            Endpoint::PeopleSearch => Payload::PeopleSearch(PeopleSearch::deserialize(body)?),
            Endpoint::UserInfo => Payload::UserInfo(UserInfo::deserialize(body)?),
            Endpoint::ProfileGet => Payload::ProfileGet(ProfileGet::deserialize(body)?),
            Endpoint::MemberList => Payload::MemberList(MemberList::deserialize(body)?),
        })
    }
}

/// `search.modules.people` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PeopleSearch {
    #[serde(deserialize_with = "lenient_list")]
    pub items: Vec<SlackUser>,
}

/// `users.info` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    #[serde(deserialize_with = "lenient")]
    pub user: Option<SlackUser>,
}

/// `users.profile.get` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileGet {
    #[serde(deserialize_with = "lenient")]
    pub profile: Option<Profile>,
}

/// `users.list` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberList {
    #[serde(deserialize_with = "lenient_list")]
    pub members: Vec<SlackUser>,
}

/// User object as returned by user lookups, member listings and people search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackUser {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub real_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub team_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub team: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub is_bot: Option<bool>,
    #[serde(deserialize_with = "flag")]
    pub deleted: Option<bool>,
    #[serde(deserialize_with = "flag")]
    pub is_restricted: Option<bool>,
    #[serde(deserialize_with = "flag")]
    pub is_ultra_restricted: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub profile: Option<Profile>,
}

/// Profile object nested in users or returned by profile lookups
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub display_name_normalized: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub real_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub real_name_normalized: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub team: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_24: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_32: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_48: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_72: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_192: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_512: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_1024: Option<String>,
    /// Custom fields flattened to id -> value
    #[serde(deserialize_with = "custom_fields")]
    pub fields: BTreeMap<String, String>,
}

/// Any value; `None` if it does not fit `T`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Array of `T`, dropping items that do not fit; non-arrays read as empty
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Strings as-is; any other type is absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Strict boolean coercion of a present value; `null` reads as absent
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => Some(coerce_bool(&value)),
    })
}

/// `true`/`false` as-is, non-zero numbers, and `1`/`true`/`yes` strings are true
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

/// `{id: {value, alt}}` or `{id: "value"}` -> `{id: value}`, empties dropped
fn custom_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(id, field)| {
            let value = match field {
                Value::String(s) => s,
                Value::Object(mut inner) => match inner.remove("value") {
                    Some(Value::String(s)) => s,
                    _ => return None,
                },
                _ => return None,
            };
            (!value.trim().is_empty()).then_some((id, value))
        })
        .collect())
}
