#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusty_liga::cache::clock::ManualClock;
use rusty_liga::error::CoreError;
use rusty_liga::{ClientConfig, HttpGet};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE: &str = "http://fake.test";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 5, 18, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start_time()))
}

pub fn fake_config() -> ClientConfig {
    ClientConfig {
        api_base: BASE.to_string(),
        ..ClientConfig::default()
    }
}

/// Scripted upstream: canned bodies per path, a hit counter per path, and
/// switches for failures and latency.
#[derive(Default)]
pub struct FakeHttp {
    responses: Mutex<HashMap<String, Value>>,
    calls: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
    seen_headers: Mutex<Vec<(String, String)>>,
}

impl FakeHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{BASE}{path}"), body);
    }

    pub fn fail(&self, path: &str) {
        self.failing.lock().unwrap().insert(format!("{BASE}{path}"));
    }

    pub fn recover(&self, path: &str) {
        self.failing.lock().unwrap().remove(&format!("{BASE}{path}"));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&format!("{BASE}{path}"))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn seen_headers(&self) -> Vec<(String, String)> {
        self.seen_headers.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpGet for FakeHttp {
    async fn get_json(&self, url: &str, headers: &[(String, String)]) -> Result<Value, CoreError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        self.seen_headers
            .lock()
            .unwrap()
            .extend(headers.iter().cloned());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(url) {
            return Err(CoreError::Network(format!("connection refused: {url}")));
        }
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CoreError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

// ---- upstream payloads ----

pub fn team_json(id: i64, name: &str, short_name: Option<&str>) -> Value {
    let mut team = json!({"id": id, "name": name, "slug": name.to_lowercase().replace(' ', "-")});
    if let Some(short_name) = short_name {
        team["shortName"] = json!(short_name);
    }
    team
}

pub fn standing_row(position: i64, team: Value, points: i64) -> Value {
    json!({
        "position": position,
        "team": team,
        "matches": 8,
        "wins": points / 3,
        "draws": points % 3,
        "losses": 8 - points / 3 - points % 3,
        "scoresFor": 15,
        "scoresAgainst": 6,
        "points": points
    })
}

pub fn standings_json() -> Value {
    json!({
        "standings": [{
            "rows": [
                standing_row(1, team_json(2829, "Real Madrid", Some("R. Madrid")), 20),
                standing_row(2, team_json(2817, "Barcelona", None), 19),
                standing_row(3, team_json(2836, "Atlético Madrid", Some("Atlético")), 17),
            ]
        }]
    })
}

pub fn event_json(id: i64, round: i64, home: i64, away: i64, finished: bool, start: i64) -> Value {
    let (code, description, kind) = if finished {
        (100, "Ended", "finished")
    } else {
        (0, "Not started", "notstarted")
    };
    json!({
        "id": id,
        "slug": format!("match-{id}"),
        "roundInfo": {"round": round},
        "status": {"code": code, "description": description, "type": kind},
        "startTimestamp": start,
        "homeTeam": team_json(home, &format!("Team {home}"), None),
        "awayTeam": team_json(away, &format!("Team {away}"), None),
        "homeScore": {"current": 2, "period1": 1},
        "awayScore": {"current": 1, "display": 1},
        "winnerCode": 1,
        "tournament": {"uniqueTournament": {"id": 8}}
    })
}

pub fn round_path(season: i64, round: u32) -> String {
    format!("/unique-tournament/8/season/{season}/events/round/{round}")
}

pub fn standings_path(season: i64) -> String {
    format!("/unique-tournament/8/season/{season}/standings/total")
}
