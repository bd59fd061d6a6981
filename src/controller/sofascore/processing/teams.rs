use super::players::normalize_player_object;
use super::{array, id, int, text, UNKNOWN};
use crate::model::{Player, Team};
use chrono::{DateTime, Datelike};
use serde_json::Value;

/// `/team/{id}`.
#[must_use]
pub fn normalize_team(response: &Value) -> Option<Team> {
    let team = response.get("team")?;
    let id = id(team)?;
    let name = text(team, "name").unwrap_or(UNKNOWN).to_string();
    let short_name = text(team, "shortName").map_or_else(|| name.clone(), str::to_string);

    let venue = team.get("venue");
    let stadium = venue
        .and_then(|v| v.get("stadium"))
        .and_then(|s| text(s, "name"))
        .or_else(|| venue.and_then(|v| v.get("city")).and_then(|c| text(c, "name")))
        .map(str::to_string);

    let founded = int(team, "foundationDateTimestamp")
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.year());

    Some(Team {
        id,
        name,
        short_name,
        slug: text(team, "slug").unwrap_or_default().to_string(),
        stadium,
        manager: team
            .get("manager")
            .and_then(|m| text(m, "name"))
            .map(str::to_string),
        founded,
    })
}

/// `players[].player` of `/team/{id}/players`.
#[must_use]
pub fn normalize_squad(response: &Value) -> Vec<Player> {
    array(response, "players")
        .iter()
        .filter_map(|entry| entry.get("player"))
        .filter_map(normalize_player_object)
        .collect()
}
