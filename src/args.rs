pub mod types;
pub mod validation;

pub use types::{Cli, Command, FileConfig, Settings};

use crate::controller::sofascore::{API_BASE, IMG_BASE};
use crate::model::LEAGUE_ID;
use crate::storage::{FileStorage, DEFAULT_STORAGE_KEY};
use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use std::fs;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;
pub const APP_NAME: &str = "rusty-liga";

/// Reads the optional TOML file named by `--config-toml`.
///
/// # Errors
///
/// Will return `Err` if the file is unreadable or not valid config TOML
pub fn read_file_config(cli: &Cli) -> Result<FileConfig> {
    match cli.config_toml.as_ref() {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config toml {}", path.display()))?;
            toml::from_str::<FileConfig>(&contents)
                .with_context(|| format!("parse config toml {}", path.display()))
        }
        None => Ok(FileConfig::default()),
    }
}

/// Merges CLI flags over the file config over the defaults.
///
/// # Errors
///
/// Will return `Err` if a value taken from the file fails validation
pub fn resolve_settings(cli: &Cli, file_config: FileConfig) -> Result<Settings> {
    let api_base = match cli.api_base.clone().or(file_config.api_base) {
        Some(base) => validation::check_api_base(&base).map_err(|e| anyhow!(e))?,
        None => API_BASE.to_string(),
    };
    let img_base = match file_config.img_base {
        Some(base) => validation::check_api_base(&base).map_err(|e| anyhow!(e))?,
        None => IMG_BASE.to_string(),
    };
    let timeout_secs = cli
        .timeout_secs
        .or(file_config.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    validation::check_timeout_secs(&timeout_secs.to_string()).map_err(|e| anyhow!(e))?;
    let ttl_secs = cli.ttl_secs.or(file_config.ttl_secs).unwrap_or(DEFAULT_TTL_SECS);
    validation::check_ttl_secs(&ttl_secs.to_string()).map_err(|e| anyhow!(e))?;

    let mut headers: Vec<(String, String)> = file_config
        .headers
        .unwrap_or_default()
        .into_iter()
        .collect();
    for (name, value) in &cli.headers {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }

    Ok(Settings {
        season: cli.season.or(file_config.season),
        api_base,
        img_base,
        league_id: file_config.league_id.unwrap_or(LEAGUE_ID),
        timeout_secs,
        ttl: Duration::seconds(ttl_secs),
        cache_dir: cli
            .cache_dir
            .clone()
            .or(file_config.cache_dir)
            .unwrap_or_else(|| FileStorage::default_dir(APP_NAME)),
        persist: !cli.no_persist && file_config.persist.unwrap_or(true),
        storage_key: file_config
            .storage_key
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
        invalidation: cli.invalidation.or(file_config.invalidation).unwrap_or_default(),
        headers,
    })
}

/// # Errors
///
/// Will return `Err` if the config file cannot be read or a value is invalid
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let file_config = read_file_config(cli)?;
    resolve_settings(cli, file_config)
}
