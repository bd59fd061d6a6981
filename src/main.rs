use anyhow::{Context, Result};
use clap::Parser;
use rusty_liga::args::{self, Cli, Command, Settings};
use rusty_liga::cache::clock::SystemClock;
use rusty_liga::cache::CacheStore;
use rusty_liga::model::known_seasons;
use rusty_liga::storage::{FileStorage, PersistenceShim};
use rusty_liga::{ClientConfig, LigaClient, ReqwestHttp, SeasonSelector};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rusty_liga=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = args::load_settings(&cli)?;
    let client = build_client(&settings)?;
    run(&client, cli.command).await
}

fn build_store(settings: &Settings) -> CacheStore {
    let clock = Arc::new(SystemClock);
    if !settings.persist {
        return CacheStore::new(clock);
    }
    match FileStorage::new(settings.cache_dir.clone()) {
        Ok(storage) => {
            info!(dir = %settings.cache_dir.display(), "persisting cache");
            let shim = PersistenceShim::new(Arc::new(storage), settings.storage_key.clone());
            CacheStore::with_persistence(clock, shim)
        }
        Err(e) => {
            warn!(error = %e, "cache dir unusable, keeping cache in memory");
            CacheStore::new(clock)
        }
    }
}

fn build_client(settings: &Settings) -> Result<LigaClient> {
    let http = ReqwestHttp::new(settings.timeout_secs).context("build http client")?;
    let store = Arc::new(build_store(settings));
    let seasons = SeasonSelector::new(
        known_seasons(),
        settings.season,
        Arc::clone(&store),
        settings.invalidation,
    )?;
    let config = ClientConfig {
        api_base: settings.api_base.clone(),
        img_base: settings.img_base.clone(),
        league_id: settings.league_id,
        ttl: settings.ttl,
        headers: settings.headers.clone(),
    };
    Ok(LigaClient::new(
        Arc::new(http),
        store,
        Arc::new(seasons),
        config,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &LigaClient, command: Command) -> Result<()> {
    match command {
        Command::Seasons => print_json(&client.seasons()),
        Command::Standings => print_json(&client.get_standings(None).await?),
        Command::Rounds => print_json(&client.get_rounds(None).await?),
        Command::Round { round } => print_json(&client.get_matches_by_round(round, None).await?),
        Command::Recent => print_json(&client.get_recent_matches(None).await?),
        Command::Last => print_json(&client.get_last_fixtures(None).await?),
        Command::Next => print_json(&client.get_next_fixtures(None).await?),
        Command::TopPlayers => print_json(&client.get_top_players(None).await?),
        Command::Team { id } => print_json(&client.get_team(id).await?),
        Command::Squad { id } => print_json(&client.get_team_squad(id).await?),
        Command::TeamMatches { id } => print_json(&client.get_team_matches(id, None).await?),
        Command::Player { id } => print_json(&client.get_player(id).await?),
        Command::PlayerStats { id } => print_json(&client.get_player_stats(id, None).await?),
        Command::Match { id } => print_json(&client.get_match(id).await?),
        Command::Lineups { id } => print_json(&client.get_match_lineups(id).await?),
        Command::Incidents { id } => print_json(&client.get_match_incidents(id).await?),
        Command::Stats { id } => print_json(&client.get_match_statistics(id).await?),
        Command::LeagueTeam { id } => print_json(&client.is_league_team(id).await?),
    }
}
