use super::{array, id, int, person_ref, text};
use crate::model::{CardType, IncidentKind, MatchEvent, Side};
use serde_json::Value;

fn parse_kind(raw: &str) -> Option<IncidentKind> {
    match raw {
        "goal" => Some(IncidentKind::Goal),
        "card" => Some(IncidentKind::Card),
        "substitution" => Some(IncidentKind::Substitution),
        _ => None,
    }
}

fn card_type(incident_class: Option<&str>) -> CardType {
    match incident_class {
        Some("yellow") => CardType::Yellow,
        Some("red") => CardType::Red,
        _ => CardType::YellowRed,
    }
}

/// `incidents[]` of `/event/{id}/incidents`.
///
/// Only goals, cards and substitutions are kept; period markers and
/// anything with a negative minute are dropped.
#[must_use]
pub fn normalize_incidents(response: &Value) -> Vec<MatchEvent> {
    array(response, "incidents")
        .iter()
        .filter_map(|inc| {
            let kind = text(inc, "incidentType").and_then(parse_kind)?;
            let id = id(inc)?;
            let time = int(inc, "time").unwrap_or(0);
            if time < 0 {
                return None;
            }
            let class = text(inc, "incidentClass");
            let is_home = inc
                .get("isHome")
                .and_then(Value::as_bool)
                .unwrap_or(class == Some("home"));
            let person = |key: &str| inc.get(key).and_then(person_ref);

            let mut event = MatchEvent {
                id,
                kind,
                time,
                added_time: int(inc, "addedTime"),
                side: if is_home { Side::Home } else { Side::Away },
                player: None,
                assist: None,
                player_in: None,
                player_out: None,
                is_own_goal: false,
                is_penalty: false,
                card_type: None,
            };
            match kind {
                IncidentKind::Goal => {
                    event.player = person("player");
                    event.assist = person("assist1");
                    event.is_own_goal = class == Some("ownGoal");
                    event.is_penalty = class == Some("penalty");
                }
                IncidentKind::Card => {
                    event.player = person("player");
                    event.card_type = Some(card_type(class));
                }
                IncidentKind::Substitution => {
                    event.player_in = person("playerIn");
                    event.player_out = person("playerOut");
                }
            }
            Some(event)
        })
        .collect()
}
