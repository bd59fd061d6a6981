use super::{int, team_ref};
use crate::model::Standing;
use serde_json::Value;
use tracing::warn;

/// `standings[0].rows` of `/unique-tournament/{league}/season/{season}/standings/total`.
///
/// Counters default to 0; goal difference is always recomputed. Rows with no
/// team id are dropped.
#[must_use]
pub fn normalize_standings(response: &Value) -> Vec<Standing> {
    let Some(rows) = response
        .get("standings")
        .and_then(|s| s.get(0))
        .and_then(|s| s.get("rows"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut standings = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let Some(team) = row.get("team").and_then(team_ref) else {
            warn!(row = idx, "standings row without team id skipped");
            continue;
        };
        let scores_for = int(row, "scoresFor").unwrap_or(0);
        let scores_against = int(row, "scoresAgainst").unwrap_or(0);
        let position = int(row, "position")
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or_else(|| u32::try_from(idx + 1).unwrap_or(u32::MAX));

        standings.push(Standing {
            position,
            team,
            matches: int(row, "matches").unwrap_or(0),
            wins: int(row, "wins").unwrap_or(0),
            draws: int(row, "draws").unwrap_or(0),
            losses: int(row, "losses").unwrap_or(0),
            scores_for,
            scores_against,
            points: int(row, "points").unwrap_or(0),
            goal_difference: scores_for - scores_against,
        });
    }
    standings
}
