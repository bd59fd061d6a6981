use super::players::jersey;
use super::{array, float, id, person_ref, text, UNKNOWN};
use crate::model::{LineupPlayer, LineupSide, MatchLineup};
use serde_json::Value;

const STARTERS: usize = 11;

fn lineup_player(entry: &Value, listed_as_substitute: bool) -> Option<LineupPlayer> {
    let p = entry.get("player")?;
    let id = id(p)?;
    let name = text(p, "name").unwrap_or(UNKNOWN).to_string();
    let short_name = text(p, "shortName").map_or_else(|| name.clone(), str::to_string);
    Some(LineupPlayer {
        id,
        name,
        short_name,
        jersey_number: jersey(p, "jerseyNumber")
            .or_else(|| jersey(entry, "shirtNumber"))
            .unwrap_or_default(),
        position: text(entry, "position")
            .or_else(|| text(p, "position"))
            .unwrap_or_default()
            .to_string(),
        substitute: entry
            .get("substitute")
            .and_then(Value::as_bool)
            .unwrap_or(listed_as_substitute),
        rating: entry
            .get("statistics")
            .and_then(|s| float(s, "rating"))
            .map(|r| format!("{r:.1}")),
    })
}

fn side(lineup: &Value, coach: Option<&Value>) -> LineupSide {
    let listed = array(lineup, "players");
    let listed_subs = array(lineup, "substitutes");

    let (players, substitutes) = if listed_subs.is_empty() {
        // one combined list: slots 0..11 start unless flagged as substitutes
        let mut starters = Vec::new();
        let mut subs = Vec::new();
        for (idx, entry) in listed.iter().enumerate() {
            let Some(player) = lineup_player(entry, false) else {
                continue;
            };
            if !player.substitute && idx < STARTERS {
                starters.push(player);
            } else {
                subs.push(player);
            }
        }
        (starters, subs)
    } else {
        let players = listed
            .iter()
            .filter_map(|p| lineup_player(p, false))
            .collect();
        let subs = listed_subs
            .iter()
            .filter_map(|p| lineup_player(p, true))
            .collect();
        (players, subs)
    };

    LineupSide {
        formation: text(lineup, "formation").unwrap_or_default().to_string(),
        coach: coach.and_then(person_ref),
        players,
        substitutes,
    }
}

/// Combines `/event/{id}/lineups` with `/event/{id}` (for the coaches).
/// `None` when either side is missing from the lineups payload.
#[must_use]
pub fn normalize_lineups(lineups: &Value, event: &Value) -> Option<MatchLineup> {
    let home = lineups.get("home").filter(|v| v.is_object())?;
    let away = lineups.get("away").filter(|v| v.is_object())?;
    let teams = event.get("event");
    let manager = |team: &str| teams.and_then(|e| e.get(team)).and_then(|t| t.get("manager"));

    Some(MatchLineup {
        home: side(home, manager("homeTeam")),
        away: side(away, manager("awayTeam")),
    })
}
