use super::{array, float, id, int, team_ref, team_ref_or_unknown, text, UNKNOWN};
use crate::model::{Country, Player, PlayerSeasonStats, TopPlayer, TopPlayerStats, TopPlayers};
use serde_json::Value;

const TOP_PLAYERS_LIMIT: usize = 20;

/// Jersey numbers come as strings or numbers depending on the endpoint.
pub(crate) fn jersey(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn normalize_player_object(p: &Value) -> Option<Player> {
    let id = id(p)?;
    let name = text(p, "name").unwrap_or(UNKNOWN).to_string();
    let short_name = text(p, "shortName").map_or_else(|| name.clone(), str::to_string);
    let country = p.get("country").and_then(|c| {
        text(c, "name").map(|name| Country {
            name: name.to_string(),
            alpha2: text(c, "alpha2").map(str::to_string),
        })
    });

    Some(Player {
        id,
        name,
        short_name,
        slug: text(p, "slug").unwrap_or_default().to_string(),
        position: text(p, "position").unwrap_or(UNKNOWN).to_string(),
        jersey_number: jersey(p, "jerseyNumber"),
        height: int(p, "height"),
        date_of_birth_timestamp: int(p, "dateOfBirthTimestamp"),
        country,
        team: p.get("team").and_then(team_ref),
    })
}

/// `/player/{id}`.
#[must_use]
pub fn normalize_player(response: &Value) -> Option<Player> {
    normalize_player_object(response.get("player")?)
}

#[derive(Clone, Copy)]
enum Leaderboard {
    Goals,
    Assists,
    Rating,
}

fn top_list(entries: &[Value], board: Leaderboard) -> Vec<TopPlayer> {
    entries
        .iter()
        .filter_map(|item| {
            let player = item.get("player").and_then(normalize_player_object)?;
            let stats = item.get("statistics");
            let stat_int = |key: &str| stats.and_then(|s| int(s, key));
            let statistics = TopPlayerStats {
                goals: matches!(board, Leaderboard::Goals).then(|| stat_int("goals")).flatten(),
                assists: matches!(board, Leaderboard::Assists)
                    .then(|| stat_int("assists"))
                    .flatten(),
                rating: matches!(board, Leaderboard::Rating)
                    .then(|| stats.and_then(|s| float(s, "rating")))
                    .flatten(),
                appearances: stat_int("appearances"),
                yellow_cards: stat_int("yellowCards"),
                red_cards: stat_int("redCards"),
            };
            Some(TopPlayer {
                player,
                statistics,
                team: team_ref_or_unknown(item.get("team")),
            })
        })
        .take(TOP_PLAYERS_LIMIT)
        .collect()
}

/// `topPlayers.{goals,assists,rating}` of `.../top-players/overall`.
#[must_use]
pub fn normalize_top_players(response: &Value) -> TopPlayers {
    let Some(top) = response.get("topPlayers") else {
        return TopPlayers::default();
    };
    TopPlayers {
        scorers: top_list(array(top, "goals"), Leaderboard::Goals),
        assists: top_list(array(top, "assists"), Leaderboard::Assists),
        rating: top_list(array(top, "rating"), Leaderboard::Rating),
    }
}

/// `statistics` of `/player/{id}/unique-tournament/{league}/season/{season}/statistics/overall`.
#[must_use]
pub fn normalize_player_stats(response: &Value) -> Option<PlayerSeasonStats> {
    let stats = response.get("statistics").filter(|s| s.is_object())?;
    let count = |key: &str| int(stats, key).unwrap_or(0);
    Some(PlayerSeasonStats {
        appearances: count("appearances"),
        minutes_played: count("minutesPlayed"),
        goals: count("goals"),
        assists: count("assists"),
        yellow_cards: count("yellowCards"),
        red_cards: count("redCards"),
        rating: float(stats, "rating"),
    })
}
