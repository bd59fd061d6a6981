use crate::controller::season::InvalidationPolicy;
use chrono::Duration;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cached, normalized league data", long_about = None)]
pub struct Cli {
    /// Optional TOML file; flags given here win over it.
    #[arg(long, value_name = "CONFIG_TOML")]
    pub config_toml: Option<PathBuf>,
    /// Season to query; defaults to the newest known season.
    #[arg(short = 's', long, value_name = "SEASON_ID")]
    pub season: Option<i64>,
    #[arg(long, value_name = "API_BASE", value_parser = crate::args::validation::check_api_base)]
    pub api_base: Option<String>,
    #[arg(long, value_name = "SECONDS", value_parser = crate::args::validation::check_timeout_secs)]
    pub timeout_secs: Option<u64>,
    /// How long a fetched result stays fresh.
    #[arg(long, value_name = "SECONDS", value_parser = crate::args::validation::check_ttl_secs)]
    pub ttl_secs: Option<i64>,
    /// Where the cache snapshot lives.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
    /// Keep the cache in memory only.
    #[arg(long)]
    pub no_persist: bool,
    #[arg(long, value_enum)]
    pub invalidation: Option<InvalidationPolicy>,
    /// Extra request header as NAME:VALUE. Repeatable.
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = crate::args::validation::parse_header)]
    pub headers: Vec<(String, String)>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the known seasons.
    Seasons,
    Standings,
    Rounds,
    /// Matches of one round.
    Round { round: u32 },
    /// Two rounds either side of the current one.
    Recent,
    /// Finished fixtures, newest first.
    Last,
    Next,
    TopPlayers,
    Team { id: i64 },
    Squad { id: i64 },
    TeamMatches { id: i64 },
    Player { id: i64 },
    PlayerStats { id: i64 },
    Match { id: i64 },
    Lineups { id: i64 },
    Incidents { id: i64 },
    Stats { id: i64 },
    /// Whether the team plays in the league this season.
    LeagueTeam { id: i64 },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub season: Option<i64>,
    pub api_base: Option<String>,
    pub img_base: Option<String>,
    pub league_id: Option<i64>,
    pub timeout_secs: Option<u64>,
    pub ttl_secs: Option<i64>,
    pub cache_dir: Option<PathBuf>,
    pub persist: Option<bool>,
    pub storage_key: Option<String>,
    pub invalidation: Option<InvalidationPolicy>,
    pub headers: Option<BTreeMap<String, String>>,
}

/// Fully resolved settings: CLI, then file, then defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub season: Option<i64>,
    pub api_base: String,
    pub img_base: String,
    pub league_id: i64,
    pub timeout_secs: u64,
    pub ttl: Duration,
    pub cache_dir: PathBuf,
    pub persist: bool,
    pub storage_key: String,
    pub invalidation: InvalidationPolicy,
    pub headers: Vec<(String, String)>,
}
