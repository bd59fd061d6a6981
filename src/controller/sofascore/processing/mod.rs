//! Upstream JSON -> normalized records.
//!
//! Every function here is total: missing optional fields get a default,
//! a record without its identifier is skipped, and a response with an
//! unexpected shape yields an empty result rather than an error.

pub mod incidents;
pub mod lineups;
pub mod matches;
pub mod players;
pub mod standings;
pub mod statistics;
pub mod teams;

pub use incidents::normalize_incidents;
pub use lineups::normalize_lineups;
pub use matches::{
    normalize_event, normalize_last_fixtures, normalize_match, normalize_matches, normalize_rounds,
};
pub use players::{normalize_player, normalize_player_stats, normalize_top_players};
pub use standings::normalize_standings;
pub use statistics::normalize_statistics;
pub use teams::{normalize_squad, normalize_team};

use crate::model::{PersonRef, TeamRef};
use serde_json::Value;

pub(crate) const UNKNOWN: &str = "Unknown";

/// Integer field, accepting floats and numeric strings the way upstream
/// sometimes sends them.
pub(crate) fn int(v: &Value, key: &str) -> Option<i64> {
    match v.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn float(v: &Value, key: &str) -> Option<f64> {
    match v.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-empty string field. Empty strings count as absent.
pub(crate) fn text<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub(crate) fn array<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

/// Record identifier. Zero and negative ids are treated as missing.
pub(crate) fn id(v: &Value) -> Option<i64> {
    int(v, "id").filter(|id| *id > 0)
}

/// Leading-integer parse: `"55%"` -> 55, `"12/20"` -> 12, junk -> 0.
pub(crate) fn leading_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

/// `name` with `shortName` falling back to it.
fn names(v: &Value, fallback: &str) -> (String, String) {
    let name = text(v, "name").unwrap_or(fallback).to_string();
    let short_name = text(v, "shortName").map_or_else(|| name.clone(), str::to_string);
    (name, short_name)
}

/// Team summary; `None` without an id.
pub(crate) fn team_ref(v: &Value) -> Option<TeamRef> {
    let id = id(v)?;
    let (name, short_name) = names(v, UNKNOWN);
    Some(TeamRef {
        id,
        name,
        short_name,
        slug: text(v, "slug").unwrap_or_default().to_string(),
    })
}

/// Team summary for a slot that must be filled (e.g. a match side).
pub(crate) fn team_ref_or_unknown(v: Option<&Value>) -> TeamRef {
    v.and_then(team_ref).unwrap_or_else(|| TeamRef {
        id: 0,
        name: UNKNOWN.to_string(),
        short_name: UNKNOWN.to_string(),
        slug: String::new(),
    })
}

pub(crate) fn person_ref(v: &Value) -> Option<PersonRef> {
    let id = id(v)?;
    let (name, short_name) = names(v, UNKNOWN);
    Some(PersonRef {
        id,
        name,
        short_name,
    })
}
