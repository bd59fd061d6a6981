mod common;

use common::{event_json, standing_row, team_json};
use rusty_liga::controller::sofascore::processing::{
    normalize_event, normalize_incidents, normalize_last_fixtures, normalize_lineups,
    normalize_matches, normalize_player, normalize_player_stats, normalize_rounds,
    normalize_squad, normalize_standings, normalize_statistics, normalize_team,
    normalize_top_players,
};
use rusty_liga::model::{CardType, IncidentKind, Side, StatPair};
use serde_json::json;

#[test]
fn test4_short_name_defaults_to_name() {
    let standings = normalize_standings(&common::standings_json());
    let barcelona = &standings[1];
    assert_eq!(barcelona.team.name, "Barcelona");
    assert_eq!(barcelona.team.short_name, "Barcelona");
    assert_eq!(standings[0].team.short_name, "R. Madrid");
}

#[test]
fn test4_rows_without_team_id_are_skipped() {
    let response = json!({
        "standings": [{
            "rows": [
                standing_row(1, team_json(1, "A", None), 20),
                standing_row(2, team_json(2, "B", None), 18),
                standing_row(3, json!({"name": "No Id"}), 16),
                standing_row(4, team_json(4, "D", None), 14),
                standing_row(5, team_json(5, "E", None), 12),
            ]
        }]
    });
    let standings = normalize_standings(&response);
    assert_eq!(standings.len(), 4);
    assert_eq!(
        standings.iter().map(|s| s.position).collect::<Vec<_>>(),
        vec![1, 2, 4, 5]
    );
}

#[test]
fn test4_standing_counters_default_and_goal_difference_is_recomputed() {
    let response = json!({
        "standings": [{
            "rows": [
                {"team": {"id": 9, "name": "Sparse"}, "scoresFor": 4, "goalDifference": "+99"},
                {"team": {"id": 10, "name": "Empty"}}
            ]
        }]
    });
    let standings = normalize_standings(&response);
    assert_eq!(standings[0].position, 1);
    assert_eq!(standings[0].goal_difference, 4);
    assert_eq!(standings[0].points, 0);
    assert_eq!(standings[1].position, 2);
    assert_eq!(standings[1].matches, 0);
}

#[test]
fn test4_unexpected_shapes_yield_empty() {
    assert!(normalize_standings(&json!({"error": {"code": 404}})).is_empty());
    assert!(normalize_standings(&json!({"standings": []})).is_empty());
    assert!(normalize_matches(&json!(null), None).is_empty());
    assert!(normalize_incidents(&json!({"incidents": "nope"})).is_empty());
    assert_eq!(normalize_top_players(&json!({})).scorers.len(), 0);
    assert!(normalize_team(&json!({})).is_none());
    assert!(normalize_player_stats(&json!({"statistics": []})).is_none());
}

#[test]
fn test4_match_fields_and_round_override() {
    let response = json!({"events": [
        event_json(11, 3, 2829, 2817, true, 1_700_000_000),
        {"slug": "no-id"},
        {"id": 12, "homeTeam": {"name": "Ghost"}}
    ]});

    let matches = normalize_matches(&response, Some(7));
    assert_eq!(matches.len(), 2);
    let first = &matches[0];
    assert_eq!(first.round, 7);
    assert_eq!(first.home_score.current, 2);
    assert_eq!(first.home_score.display, 2);
    assert_eq!(first.home_score.period1, Some(1));
    assert_eq!(first.away_score.display, 1);
    assert_eq!(first.tournament_id, Some(8));
    assert!(first.involves(2817));

    let sparse = &matches[1];
    assert_eq!(sparse.home_team.id, 0);
    assert_eq!(sparse.home_team.name, "Unknown");
    assert_eq!(sparse.status.description, "Unknown");
    assert_eq!(sparse.status.status_type, "unknown");
    assert_eq!(sparse.home_score.current, 0);

    assert_eq!(normalize_matches(&response, None)[0].round, 3);
}

#[test]
fn test4_last_fixtures_are_finished_and_newest_first() {
    let response = json!({"events": [
        event_json(1, 1, 1, 2, true, 100),
        event_json(2, 2, 3, 4, false, 300),
        event_json(3, 3, 5, 6, true, 200),
    ]});
    let ids: Vec<i64> = normalize_last_fixtures(&response)
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec![3, 1]);
}

#[test]
fn test4_event_and_rounds() {
    let event = normalize_event(&json!({"event": event_json(5, 9, 1, 2, false, 10)})).unwrap();
    assert_eq!(event.round, 9);
    assert!(!event.status.is_finished());

    let rounds = normalize_rounds(&json!({
        "currentRound": {"round": 12},
        "rounds": [{"round": 1}, {"round": 2}, {"name": "playoff"}]
    }));
    assert_eq!(rounds.current_round, 12);
    assert_eq!(rounds.rounds, vec![1, 2]);
    assert_eq!(normalize_rounds(&json!({})).current_round, 1);
}

#[test]
fn test4_team_and_squad() {
    let team = normalize_team(&json!({"team": {
        "id": 2829,
        "name": "Real Madrid",
        "venue": {"city": {"name": "Madrid"}},
        "manager": {"id": 1, "name": "Carlo Ancelotti"},
        "foundationDateTimestamp": -2_127_081_600i64
    }}))
    .unwrap();
    assert_eq!(team.short_name, "Real Madrid");
    assert_eq!(team.stadium.as_deref(), Some("Madrid"));
    assert_eq!(team.manager.as_deref(), Some("Carlo Ancelotti"));
    assert_eq!(team.founded, Some(1902));

    let squad = normalize_squad(&json!({"players": [
        {"player": {"id": 7, "name": "Vinícius Júnior", "jerseyNumber": "7", "position": "F"}},
        {"player": {"name": "Trialist"}},
        {"player": {"id": 1, "name": "Thibaut Courtois", "jerseyNumber": 1}}
    ]}));
    assert_eq!(squad.len(), 2);
    assert_eq!(squad[0].jersey_number.as_deref(), Some("7"));
    assert_eq!(squad[1].jersey_number.as_deref(), Some("1"));
    assert_eq!(squad[1].position, "Unknown");
}

#[test]
fn test4_player_and_stats() {
    let player = normalize_player(&json!({"player": {
        "id": 934235,
        "name": "Jude Bellingham",
        "shortName": "J. Bellingham",
        "country": {"name": "England", "alpha2": "EN"},
        "team": team_json(2829, "Real Madrid", None)
    }}))
    .unwrap();
    assert_eq!(player.short_name, "J. Bellingham");
    assert_eq!(player.country.unwrap().name, "England");
    assert_eq!(player.team.unwrap().id, 2829);

    let stats = normalize_player_stats(&json!({"statistics": {
        "appearances": 28, "goals": 19, "rating": 7.62
    }}))
    .unwrap();
    assert_eq!(stats.goals, 19);
    assert_eq!(stats.assists, 0);
    assert_eq!(stats.rating, Some(7.62));
}

#[test]
fn test4_top_players_are_capped() {
    let scorer = |id: i64| {
        json!({
            "player": {"id": id, "name": format!("Player {id}")},
            "team": team_json(2829, "Real Madrid", None),
            "statistics": {"goals": 30 - id, "appearances": 20, "yellowCards": id % 3}
        })
    };
    let goals: Vec<_> = (1..=25).map(scorer).collect();
    let top = normalize_top_players(&json!({"topPlayers": {"goals": goals}}));
    assert_eq!(top.scorers.len(), 20);
    assert_eq!(top.scorers[0].statistics.goals, Some(29));
    assert_eq!(top.scorers[0].statistics.assists, None);
    assert_eq!(top.scorers[0].statistics.yellow_cards, Some(1));
    assert_eq!(top.scorers[0].statistics.red_cards, None);
    assert!(top.assists.is_empty());
}

#[test]
fn test4_incidents_keep_goals_cards_and_substitutions() {
    let response = json!({"incidents": [
        {"id": 1, "incidentType": "period", "time": 45},
        {"id": 2, "incidentType": "goal", "time": 23, "isHome": true,
         "player": {"id": 10, "name": "Kylian Mbappé"}, "assist1": {"id": 11, "name": "Vinícius Júnior"}},
        {"id": 3, "incidentType": "card", "time": 55, "incidentClass": "yellow", "isHome": false,
         "player": {"id": 20, "name": "Gavi"}},
        {"id": 4, "incidentType": "substitution", "time": 70, "incidentClass": "home",
         "playerIn": {"id": 30, "name": "Arda Güler"}, "playerOut": {"id": 31, "name": "Luka Modrić"}},
        {"id": 5, "incidentType": "goal", "time": -1},
        {"incidentType": "goal", "time": 80},
        {"id": 6, "incidentType": "goal", "time": 90, "addedTime": 3, "incidentClass": "penalty", "isHome": false}
    ]});
    let events = normalize_incidents(&response);
    assert_eq!(
        events.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![2, 3, 4, 6]
    );

    assert_eq!(events[0].kind, IncidentKind::Goal);
    assert_eq!(events[0].side, Side::Home);
    assert_eq!(events[0].assist.as_ref().unwrap().id, 11);

    assert_eq!(events[1].card_type, Some(CardType::Yellow));
    assert_eq!(events[1].side, Side::Away);

    assert_eq!(events[2].side, Side::Home);
    assert_eq!(events[2].player_in.as_ref().unwrap().name, "Arda Güler");

    assert!(events[3].is_penalty);
    assert_eq!(events[3].added_time, Some(3));
}

#[test]
fn test4_lineups_split_combined_list_and_attach_coaches() {
    let entry = |id: i64, sub: bool| {
        json!({"player": {"id": id, "name": format!("P{id}")}, "shirtNumber": id, "substitute": sub,
               "statistics": {"rating": 7.04}})
    };
    let home_players: Vec<_> = (1..=14).map(|id| entry(id, false)).collect();
    let away_players: Vec<_> = (21..=31).map(|id| entry(id, false)).collect();
    let away_subs: Vec<_> = (32..=34).map(|id| entry(id, true)).collect();

    let lineups = json!({
        "home": {"formation": "4-3-3", "players": home_players},
        "away": {"formation": "4-4-2", "players": away_players, "substitutes": away_subs}
    });
    let event = json!({"event": {
        "homeTeam": {"manager": {"id": 100, "name": "Carlo Ancelotti"}},
        "awayTeam": {}
    }});

    let lineup = normalize_lineups(&lineups, &event).unwrap();
    assert_eq!(lineup.home.players.len(), 11);
    assert_eq!(lineup.home.substitutes.len(), 3);
    assert_eq!(lineup.home.players[0].jersey_number, "1");
    assert_eq!(lineup.home.players[0].rating.as_deref(), Some("7.0"));
    assert_eq!(lineup.home.coach.as_ref().unwrap().name, "Carlo Ancelotti");
    assert_eq!(lineup.away.players.len(), 11);
    assert_eq!(lineup.away.substitutes.len(), 3);
    assert!(lineup.away.coach.is_none());

    assert!(normalize_lineups(&json!({"home": {}}), &event).is_none());
}

#[test]
fn test4_lineups_split_combined_list_by_position() {
    // id 4 sits among the first eleven but is flagged as a substitute
    let players: Vec<_> = (1..=13)
        .map(|id: i64| {
            json!({"player": {"id": id, "name": format!("P{id}")}, "shirtNumber": id, "substitute": id == 4})
        })
        .collect();
    let lineups = json!({
        "home": {"formation": "4-3-3", "players": players},
        "away": {"formation": "4-4-2", "players": []}
    });

    let lineup = normalize_lineups(&lineups, &json!({})).unwrap();
    let ids = |side: &[rusty_liga::model::LineupPlayer]| side.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids(&lineup.home.players), vec![1, 2, 3, 5, 6, 7, 8, 9, 10, 11]);
    assert_eq!(ids(&lineup.home.substitutes), vec![4, 12, 13]);
}

#[test]
fn test4_statistics_lookup_and_defaults() {
    let response = json!({"statistics": [{"groups": [
        {"statisticsItems": [
            {"name": "Ball possession", "home": "61%", "away": "39%"},
            {"name": "Total shots", "home": 14, "away": 9}
        ]},
        {"statisticsItems": [
            {"name": "Corner kicks", "home": "5", "away": "2"},
            {"name": "Yellow cards", "home": "2", "away": "n/a"}
        ]}
    ]}]});
    let stats = normalize_statistics(&response);
    assert_eq!(stats.possession, StatPair { home: 61, away: 39 });
    assert_eq!(stats.shots, StatPair { home: 14, away: 9 });
    assert_eq!(stats.corners, StatPair { home: 5, away: 2 });
    assert_eq!(stats.yellow_cards, StatPair { home: 2, away: 0 });
    assert_eq!(stats.offsides, StatPair::default());
    assert_eq!(normalize_statistics(&json!({})).fouls, StatPair::default());
}
