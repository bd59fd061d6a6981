//! Normalized view models.
//!
//! Records are produced once by `controller::sofascore::processing` and never
//! mutated afterwards. Cross-record relationships are carried as ids (or as a
//! small `TeamRef` snapshot), never as owned sub-records.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub slug: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub slug: String,
    pub stadium: Option<String>,
    pub manager: Option<String>,
    pub founded: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub position: u32,
    pub team: TeamRef,
    pub matches: i64,
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    pub scores_for: i64,
    pub scores_against: i64,
    pub points: i64,
    pub goal_difference: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatus {
    pub code: i64,
    pub description: String,
    #[serde(rename = "type")]
    pub status_type: String,
}

impl MatchStatus {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status_type == "finished"
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub current: i64,
    pub display: i64,
    pub period1: Option<i64>,
    pub period2: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub slug: String,
    pub round: u32,
    pub status: MatchStatus,
    pub start_timestamp: i64,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub home_score: Score,
    pub away_score: Score,
    pub winner_code: Option<i64>,
    pub tournament_id: Option<i64>,
}

impl Match {
    #[must_use]
    pub fn home_team_id(&self) -> i64 {
        self.home_team.id
    }

    #[must_use]
    pub fn away_team_id(&self) -> i64 {
        self.away_team.id
    }

    #[must_use]
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team_id() == team_id || self.away_team_id() == team_id
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundsInfo {
    pub current_round: u32,
    pub rounds: Vec<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub id: i64,
    pub name: String,
    pub short_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub alpha2: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub slug: String,
    pub position: String,
    pub jersey_number: Option<String>,
    pub height: Option<i64>,
    pub date_of_birth_timestamp: Option<i64>,
    pub country: Option<Country>,
    pub team: Option<TeamRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopPlayerStats {
    pub goals: Option<i64>,
    pub assists: Option<i64>,
    pub rating: Option<f64>,
    pub appearances: Option<i64>,
    pub yellow_cards: Option<i64>,
    pub red_cards: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopPlayer {
    pub player: Player,
    pub statistics: TopPlayerStats,
    pub team: TeamRef,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct TopPlayers {
    pub scorers: Vec<TopPlayer>,
    pub assists: Vec<TopPlayer>,
    pub rating: Vec<TopPlayer>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSeasonStats {
    pub appearances: i64,
    pub minutes_played: i64,
    pub goals: i64,
    pub assists: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub rating: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Home,
    Away,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IncidentKind {
    Goal,
    Card,
    Substitution,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CardType {
    Yellow,
    Red,
    YellowRed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    pub id: i64,
    pub kind: IncidentKind,
    pub time: i64,
    pub added_time: Option<i64>,
    pub side: Side,
    pub player: Option<PersonRef>,
    pub assist: Option<PersonRef>,
    pub player_in: Option<PersonRef>,
    pub player_out: Option<PersonRef>,
    pub is_own_goal: bool,
    pub is_penalty: bool,
    pub card_type: Option<CardType>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineupPlayer {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub jersey_number: String,
    pub position: String,
    pub substitute: bool,
    pub rating: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineupSide {
    pub formation: String,
    pub coach: Option<PersonRef>,
    pub players: Vec<LineupPlayer>,
    pub substitutes: Vec<LineupPlayer>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MatchLineup {
    pub home: LineupSide,
    pub away: LineupSide,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StatPair {
    pub home: i64,
    pub away: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatistics {
    pub possession: StatPair,
    pub shots: StatPair,
    pub shots_on_target: StatPair,
    pub corners: StatPair,
    pub fouls: StatPair,
    pub yellow_cards: StatPair,
    pub red_cards: StatPair,
    pub offsides: StatPair,
    pub passes: StatPair,
    pub pass_accuracy: StatPair,
}
