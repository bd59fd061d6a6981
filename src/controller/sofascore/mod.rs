pub mod client;
pub mod processing;

pub use client::{HttpGet, ReqwestHttp};

use crate::cache::clock::Clock;
use crate::cache::{build_key, CacheStore, CACHE_DURATION};
use crate::controller::gate::FetchGate;
use crate::controller::season::{InvalidationPolicy, ListenerId, SeasonSelector};
use crate::error::CoreError;
use crate::model::{
    known_seasons, Match, MatchEvent, MatchLineup, MatchStatistics, Player, PlayerSeasonStats,
    RoundsInfo, SeasonInfo, Standing, Team, TopPlayers, LEAGUE_ID, ROUNDS_PER_SEASON,
};
use chrono::Duration;
use futures::future::{join_all, try_join_all};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

pub const API_BASE: &str = "https://api.sofascore.com/api/v1";
pub const IMG_BASE: &str = "https://img.sofascore.com/api/v1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub img_base: String,
    pub league_id: i64,
    pub ttl: Duration,
    /// Sent with every request, e.g. an API key header.
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            img_base: IMG_BASE.to_string(),
            league_id: LEAGUE_ID,
            ttl: CACHE_DURATION,
            headers: Vec::new(),
        }
    }
}

/// Query surface over the league data provider. Every query goes through
/// the fetch gate, so repeated and concurrent calls share one request per
/// cache key until the entry expires or the season changes.
#[derive(Clone)]
pub struct LigaClient {
    http: Arc<dyn HttpGet>,
    gate: FetchGate,
    seasons: Arc<SeasonSelector>,
    config: Arc<ClientConfig>,
}

impl LigaClient {
    #[must_use]
    pub fn new(
        http: Arc<dyn HttpGet>,
        store: Arc<CacheStore>,
        seasons: Arc<SeasonSelector>,
        config: ClientConfig,
    ) -> Self {
        Self {
            http,
            gate: FetchGate::new(store),
            seasons,
            config: Arc::new(config),
        }
    }

    /// A client with an in-memory cache and the known season table,
    /// starting at the newest season.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the known season table is empty
    pub fn in_memory(
        http: Arc<dyn HttpGet>,
        clock: Arc<dyn Clock>,
        config: ClientConfig,
    ) -> Result<Self, CoreError> {
        let store = Arc::new(CacheStore::new(clock));
        let seasons = Arc::new(SeasonSelector::new(
            known_seasons(),
            None,
            Arc::clone(&store),
            InvalidationPolicy::All,
        )?);
        Ok(Self::new(http, store, seasons, config))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<CacheStore> {
        self.gate.store()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ---- season context ----

    #[must_use]
    pub fn current_season(&self) -> SeasonInfo {
        self.seasons.current()
    }

    /// # Errors
    ///
    /// Will return `Err` if `season_id` is not a known season
    pub fn select_season(&self, season_id: i64) -> Result<SeasonInfo, CoreError> {
        self.seasons.select(season_id)
    }

    pub fn on_season_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SeasonInfo) + Send + Sync + 'static,
    {
        self.seasons.on_change(listener)
    }

    pub fn remove_season_listener(&self, id: ListenerId) -> bool {
        self.seasons.remove_listener(id)
    }

    #[must_use]
    pub fn subscribe_season(&self) -> watch::Receiver<SeasonInfo> {
        self.seasons.subscribe()
    }

    #[must_use]
    pub fn seasons(&self) -> &[SeasonInfo] {
        self.seasons.seasons()
    }

    #[must_use]
    pub fn is_current_season(&self) -> bool {
        self.seasons.is_current_season()
    }

    // ---- image urls ----

    #[must_use]
    pub fn team_image_url(&self, team_id: i64) -> String {
        format!("{}/team/{team_id}/image", self.config.img_base)
    }

    #[must_use]
    pub fn player_image_url(&self, player_id: i64) -> String {
        format!("{}/player/{player_id}/image", self.config.img_base)
    }

    #[must_use]
    pub fn league_image_url(&self) -> String {
        format!(
            "{}/unique-tournament/{}/image",
            self.config.img_base, self.config.league_id
        )
    }

    // ---- plumbing ----

    fn season_or_current(&self, season_id: Option<i64>) -> i64 {
        season_id.unwrap_or_else(|| self.seasons.current().id)
    }

    fn season_path(&self, season: i64, rest: &str) -> String {
        format!(
            "/unique-tournament/{}/season/{season}/{rest}",
            self.config.league_id
        )
    }

    fn season_params(&self, season: i64) -> Vec<(&'static str, Value)> {
        vec![
            ("league", json!(self.config.league_id)),
            ("season", json!(season)),
        ]
    }

    /// Fetches `path` through the gate under `endpoint` + `params` and
    /// normalizes the payload with `normalize`.
    async fn cached<T, N>(
        &self,
        endpoint: &str,
        params: Vec<(&'static str, Value)>,
        path: String,
        normalize: N,
    ) -> Result<T, CoreError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        N: FnOnce(&Value) -> T + Send + 'static,
    {
        let key = build_key(endpoint, params);
        let http = Arc::clone(&self.http);
        let url = format!("{}{path}", self.config.api_base);
        let headers = self.config.headers.clone();
        self.gate
            .fetch_or_cached(&key, self.config.ttl, move || async move {
                let raw = http.get_json(&url, &headers).await?;
                Ok(normalize(&raw))
            })
            .await
    }

    // ---- queries ----

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_standings(&self, season_id: Option<i64>) -> Result<Vec<Standing>, CoreError> {
        let season = self.season_or_current(season_id);
        self.cached(
            "standings",
            self.season_params(season),
            self.season_path(season, "standings/total"),
            processing::normalize_standings,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_rounds(&self, season_id: Option<i64>) -> Result<RoundsInfo, CoreError> {
        let season = self.season_or_current(season_id);
        self.cached(
            "rounds",
            self.season_params(season),
            self.season_path(season, "rounds"),
            processing::normalize_rounds,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_matches_by_round(
        &self,
        round: u32,
        season_id: Option<i64>,
    ) -> Result<Vec<Match>, CoreError> {
        let season = self.season_or_current(season_id);
        let mut params = self.season_params(season);
        params.push(("round", json!(round)));
        self.cached(
            "matches-round",
            params,
            self.season_path(season, &format!("events/round/{round}")),
            move |raw| processing::normalize_matches(raw, Some(round)),
        )
        .await
    }

    /// Two rounds either side of the current one, each fetched through the
    /// gate on its own key.
    ///
    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_recent_matches(&self, season_id: Option<i64>) -> Result<Vec<Match>, CoreError> {
        let season = self.season_or_current(season_id);
        let rounds = self.get_rounds(Some(season)).await?;
        let current = rounds.current_round.clamp(1, ROUNDS_PER_SEASON);
        let first = current.saturating_sub(2).max(1);
        let last = current.saturating_add(2).min(ROUNDS_PER_SEASON);
        let mut pending = Vec::new();
        for round in first..=last {
            pending.push(self.get_matches_by_round(round, Some(season)));
        }
        let per_round = try_join_all(pending).await?;
        Ok(per_round.into_iter().flatten().collect())
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_last_fixtures(&self, season_id: Option<i64>) -> Result<Vec<Match>, CoreError> {
        let season = self.season_or_current(season_id);
        self.cached(
            "last-fixtures",
            self.season_params(season),
            self.season_path(season, "events/last/0"),
            processing::normalize_last_fixtures,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_next_fixtures(&self, season_id: Option<i64>) -> Result<Vec<Match>, CoreError> {
        let season = self.season_or_current(season_id);
        self.cached(
            "next-fixtures",
            self.season_params(season),
            self.season_path(season, "events/next/0"),
            |raw| processing::normalize_matches(raw, None),
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_top_players(&self, season_id: Option<i64>) -> Result<TopPlayers, CoreError> {
        let season = self.season_or_current(season_id);
        self.cached(
            "top-players",
            self.season_params(season),
            self.season_path(season, "top-players/overall"),
            processing::normalize_top_players,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_team(&self, team_id: i64) -> Result<Option<Team>, CoreError> {
        self.cached(
            "team",
            vec![("id", json!(team_id))],
            format!("/team/{team_id}"),
            processing::normalize_team,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_team_squad(&self, team_id: i64) -> Result<Vec<Player>, CoreError> {
        self.cached(
            "squad",
            vec![("id", json!(team_id))],
            format!("/team/{team_id}/players"),
            processing::normalize_squad,
        )
        .await
    }

    /// Every match of `team_id` in the season, assembled from all rounds.
    /// A round that fails to load contributes nothing.
    ///
    /// # Errors
    ///
    /// Will return `Err` only if the assembled list cannot be cached
    pub async fn get_team_matches(
        &self,
        team_id: i64,
        season_id: Option<i64>,
    ) -> Result<Vec<Match>, CoreError> {
        let season = self.season_or_current(season_id);
        let mut params = self.season_params(season);
        params.push(("team", json!(team_id)));
        let key = build_key("team-all-matches", params);
        let client = self.clone();
        self.gate
            .fetch_or_cached(&key, self.config.ttl, move || async move {
                let mut pending = Vec::new();
                for round in 1..=ROUNDS_PER_SEASON {
                    pending.push(client.get_matches_by_round(round, Some(season)));
                }
                let per_round = join_all(pending).await;
                let mut matches = Vec::new();
                for (round, result) in (1..=ROUNDS_PER_SEASON).zip(per_round) {
                    match result {
                        Ok(round_matches) => matches
                            .extend(round_matches.into_iter().filter(|m| m.involves(team_id))),
                        Err(e) => warn!(round, error = %e, "round skipped while assembling team matches"),
                    }
                }
                Ok(matches)
            })
            .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_player(&self, player_id: i64) -> Result<Option<Player>, CoreError> {
        self.cached(
            "player",
            vec![("id", json!(player_id))],
            format!("/player/{player_id}"),
            processing::normalize_player,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_player_stats(
        &self,
        player_id: i64,
        season_id: Option<i64>,
    ) -> Result<Option<PlayerSeasonStats>, CoreError> {
        let season = self.season_or_current(season_id);
        let mut params = self.season_params(season);
        params.push(("id", json!(player_id)));
        let path = format!(
            "/player/{player_id}{}",
            self.season_path(season, "statistics/overall")
        );
        self.cached(
            "player-stats",
            params,
            path,
            processing::normalize_player_stats,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_match(&self, match_id: i64) -> Result<Option<Match>, CoreError> {
        self.cached(
            "match",
            vec![("id", json!(match_id))],
            format!("/event/{match_id}"),
            processing::normalize_event,
        )
        .await
    }

    /// Lineups plus both coaches; needs the lineups and the event payload.
    ///
    /// # Errors
    ///
    /// Will return `Err` if either request fails
    pub async fn get_match_lineups(&self, match_id: i64) -> Result<Option<MatchLineup>, CoreError> {
        let key = build_key("match-lineups", [("id", json!(match_id))]);
        let http = Arc::clone(&self.http);
        let lineups_url = format!("{}/event/{match_id}/lineups", self.config.api_base);
        let event_url = format!("{}/event/{match_id}", self.config.api_base);
        let headers = self.config.headers.clone();
        self.gate
            .fetch_or_cached(&key, self.config.ttl, move || async move {
                let (lineups, event) = futures::try_join!(
                    http.get_json(&lineups_url, &headers),
                    http.get_json(&event_url, &headers)
                )?;
                Ok(processing::normalize_lineups(&lineups, &event))
            })
            .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_match_incidents(&self, match_id: i64) -> Result<Vec<MatchEvent>, CoreError> {
        self.cached(
            "match-incidents",
            vec![("id", json!(match_id))],
            format!("/event/{match_id}/incidents"),
            processing::normalize_incidents,
        )
        .await
    }

    /// # Errors
    ///
    /// Will return `Err` on a transport failure
    pub async fn get_match_statistics(&self, match_id: i64) -> Result<MatchStatistics, CoreError> {
        self.cached(
            "match-stats",
            vec![("id", json!(match_id))],
            format!("/event/{match_id}/statistics"),
            processing::normalize_statistics,
        )
        .await
    }

    /// Whether `team_id` appears in the current season's standings.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the standings cannot be fetched
    pub async fn is_league_team(&self, team_id: i64) -> Result<bool, CoreError> {
        let standings = self.get_standings(None).await?;
        Ok(standings.iter().any(|s| s.team.id == team_id))
    }
}
