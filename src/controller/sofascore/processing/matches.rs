use super::{array, id, int, team_ref_or_unknown, text};
use crate::model::{Match, MatchStatus, RoundsInfo, Score};
use serde_json::Value;

fn score(v: Option<&Value>) -> Score {
    let Some(v) = v else {
        return Score {
            current: 0,
            display: 0,
            period1: None,
            period2: None,
        };
    };
    let current = int(v, "current").unwrap_or(0);
    Score {
        current,
        display: int(v, "display").unwrap_or(current),
        period1: int(v, "period1"),
        period2: int(v, "period2"),
    }
}

/// One upstream event object. `round_override` wins over `roundInfo.round`
/// when the caller already knows the round it asked for.
#[must_use]
pub fn normalize_match(event: &Value, round_override: Option<u32>) -> Option<Match> {
    let match_id = id(event)?;
    let round = round_override
        .or_else(|| {
            event
                .get("roundInfo")
                .and_then(|r| int(r, "round"))
                .and_then(|r| u32::try_from(r).ok())
        })
        .unwrap_or(0);

    let status = event.get("status");
    let status = MatchStatus {
        code: status.and_then(|s| int(s, "code")).unwrap_or(0),
        description: status
            .and_then(|s| text(s, "description"))
            .unwrap_or("Unknown")
            .to_string(),
        status_type: status
            .and_then(|s| text(s, "type"))
            .unwrap_or("unknown")
            .to_string(),
    };

    Some(Match {
        id: match_id,
        slug: text(event, "slug").unwrap_or_default().to_string(),
        round,
        status,
        start_timestamp: int(event, "startTimestamp").unwrap_or(0),
        home_team: team_ref_or_unknown(event.get("homeTeam")),
        away_team: team_ref_or_unknown(event.get("awayTeam")),
        home_score: score(event.get("homeScore")),
        away_score: score(event.get("awayScore")),
        winner_code: int(event, "winnerCode"),
        tournament_id: event
            .get("tournament")
            .and_then(|t| t.get("uniqueTournament"))
            .and_then(id),
    })
}

/// `events[]` of a round or fixtures listing.
#[must_use]
pub fn normalize_matches(response: &Value, round_override: Option<u32>) -> Vec<Match> {
    array(response, "events")
        .iter()
        .filter_map(|event| normalize_match(event, round_override))
        .collect()
}

/// Finished matches only, most recent first.
#[must_use]
pub fn normalize_last_fixtures(response: &Value) -> Vec<Match> {
    let mut matches: Vec<Match> = normalize_matches(response, None)
        .into_iter()
        .filter(|m| m.status.is_finished())
        .collect();
    matches.sort_by(|a, b| b.start_timestamp.cmp(&a.start_timestamp));
    matches
}

/// `/event/{id}`.
#[must_use]
pub fn normalize_event(response: &Value) -> Option<Match> {
    normalize_match(response.get("event")?, None)
}

/// `/unique-tournament/{league}/season/{season}/rounds`.
#[must_use]
pub fn normalize_rounds(response: &Value) -> RoundsInfo {
    let current_round = response
        .get("currentRound")
        .and_then(|r| int(r, "round"))
        .and_then(|r| u32::try_from(r).ok())
        .filter(|r| *r > 0)
        .unwrap_or(1);
    let rounds = array(response, "rounds")
        .iter()
        .filter_map(|r| int(r, "round"))
        .filter_map(|r| u32::try_from(r).ok())
        .collect();
    RoundsInfo {
        current_round,
        rounds,
    }
}
