use super::{array, leading_int};
use crate::model::{MatchStatistics, StatPair};
use serde_json::Value;

fn side_value(item: &Value, key: &str) -> i64 {
    match item.get(key) {
        Some(Value::String(s)) => leading_int(s),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        _ => 0,
    }
}

/// First item across `groups` whose name contains `needle`, case-insensitively.
fn find_stat(groups: &[Value], needle: &str) -> StatPair {
    let needle = needle.to_lowercase();
    groups
        .iter()
        .flat_map(|group| array(group, "statisticsItems"))
        .find(|item| {
            item.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .map(|item| StatPair {
            home: side_value(item, "home"),
            away: side_value(item, "away"),
        })
        .unwrap_or_default()
}

/// Groups of the first period of `/event/{id}/statistics`. Every pair
/// defaults to 0/0.
#[must_use]
pub fn normalize_statistics(response: &Value) -> MatchStatistics {
    let groups = response
        .get("statistics")
        .and_then(|s| s.get(0))
        .map_or(&[][..], |period| array(period, "groups"));

    MatchStatistics {
        possession: find_stat(groups, "possession"),
        shots: find_stat(groups, "total shots"),
        shots_on_target: find_stat(groups, "shots on target"),
        corners: find_stat(groups, "corner"),
        fouls: find_stat(groups, "fouls"),
        yellow_cards: find_stat(groups, "yellow"),
        red_cards: find_stat(groups, "red"),
        offsides: find_stat(groups, "offside"),
        passes: find_stat(groups, "passes"),
        pass_accuracy: find_stat(groups, "pass accuracy"),
    }
}
