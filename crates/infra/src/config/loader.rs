//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SALGSPULS_SHEET_ID`: Spreadsheet document id
//! - `SALGSPULS_SHEET_TOKEN`: Bearer token for the values API
//! - `SALGSPULS_SALES_RANGE`: A1 range of the sales tab (optional)
//! - `SALGSPULS_GOALS_RANGE`: A1 range of the goals tab (optional)
//! - `SALGSPULS_PORTAL_ENDPOINT`: Browser-function service URL (optional)
//! - `SALGSPULS_PORTAL_KEY`: Browser-function service token
//! - `SALGSPULS_PORTAL_SITE`: Portal site name (optional)
//! - `SALGSPULS_PORTAL_USER`: Portal login username
//! - `SALGSPULS_PORTAL_PASSWORD`: Portal login password
//! - `SALGSPULS_SYNC_INTERVAL`: Auto-sync interval in seconds (optional)
//! - `SALGSPULS_SYNC_ENABLED`: Whether auto-sync runs (true/false, optional)
//! - `SALGSPULS_DEFAULT_GOAL`: Fallback monthly goal in kroner (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./salgspuls.json` or `./salgspuls.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use salgspuls_domain::constants::{DEFAULT_MONTHLY_GOAL, DEFAULT_SYNC_INTERVAL_SECS};
use salgspuls_domain::{
    Config, GoalConfig, PortalConfig, Result, SalgspulsError, SheetConfig, SyncConfig,
};

const DEFAULT_PORTAL_ENDPOINT: &str = "https://production-sfo.browserless.io";
const DEFAULT_PORTAL_SITE: &str = "Sprinter";
const DEFAULT_SALES_RANGE: &str = "SALG (INPUT) v2!A2:N1000";
const DEFAULT_GOALS_RANGE: &str = "MAAL!A2:B100";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables (a `.env` file in the
/// working directory is honored). If any required variables are missing,
/// falls back to loading from a config file.
///
/// # Errors
/// Returns `SalgspulsError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `SalgspulsError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let spreadsheet_id = env_var("SALGSPULS_SHEET_ID")?;
    let api_token = env_var("SALGSPULS_SHEET_TOKEN")?;
    let sales_range = env_or("SALGSPULS_SALES_RANGE", DEFAULT_SALES_RANGE);
    let goals_range = env_or("SALGSPULS_GOALS_RANGE", DEFAULT_GOALS_RANGE);

    let portal_endpoint = env_or("SALGSPULS_PORTAL_ENDPOINT", DEFAULT_PORTAL_ENDPOINT);
    let portal_key = env_var("SALGSPULS_PORTAL_KEY")?;
    let portal_site = env_or("SALGSPULS_PORTAL_SITE", DEFAULT_PORTAL_SITE);
    let portal_user = env_var("SALGSPULS_PORTAL_USER")?;
    let portal_password = env_var("SALGSPULS_PORTAL_PASSWORD")?;

    let sync_interval = match std::env::var("SALGSPULS_SYNC_INTERVAL") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| SalgspulsError::Config(format!("Invalid sync interval: {}", e)))?,
        Err(_) => DEFAULT_SYNC_INTERVAL_SECS,
    };
    let sync_enabled = env_bool("SALGSPULS_SYNC_ENABLED", true);

    let default_goal = match std::env::var("SALGSPULS_DEFAULT_GOAL") {
        Ok(raw) => raw
            .parse::<f64>()
            .map_err(|e| SalgspulsError::Config(format!("Invalid default goal: {}", e)))?,
        Err(_) => DEFAULT_MONTHLY_GOAL,
    };

    Ok(Config {
        sheet: SheetConfig { spreadsheet_id, api_token, sales_range, goals_range },
        portal: PortalConfig {
            endpoint: portal_endpoint,
            api_key: portal_key,
            site: portal_site,
            username: portal_user,
            password: portal_password,
        },
        sync: SyncConfig { interval_seconds: sync_interval, enabled: sync_enabled },
        goals: GoalConfig { default_goal },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `SalgspulsError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SalgspulsError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SalgspulsError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SalgspulsError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SalgspulsError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SalgspulsError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SalgspulsError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./salgspuls.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("salgspuls.json"),
            cwd.join("salgspuls.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("salgspuls.json"),
                exe_dir.join("salgspuls.toml"),
                exe_dir.join("../config.json"),
                exe_dir.join("../config.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `SalgspulsError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SalgspulsError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
