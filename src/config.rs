//! Application-level configuration loading: league settings and the informational rulebook.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "LEAGUE_BACK_CONFIG_PATH";

const DEFAULT_SEASON_WEEKS: u32 = 13;
const DEFAULT_ROSTER_SIZE: usize = 9;
const DEFAULT_MAX_WEEKLY_POINTS: i32 = 999;

/// One line of the scoring rulebook. Points are entered by hand, never derived from these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringRule {
    pub title: String,
    pub points: i32,
    pub description: String,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Number of weeks offered by the admin week picker at minimum.
    pub season_weeks: u32,
    /// Picks each member is expected to hold.
    pub roster_size: usize,
    /// Upper bound applied when coercing admin-entered points.
    pub max_weekly_points: i32,
    pub scoring_rules: Vec<ScoringRule>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        season_weeks = app_config.season_weeks,
                        roster_size = app_config.roster_size,
                        "loaded league settings from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            season_weeks: DEFAULT_SEASON_WEEKS,
            roster_size: DEFAULT_ROSTER_SIZE,
            max_weekly_points: DEFAULT_MAX_WEEKLY_POINTS,
            scoring_rules: default_scoring_rules(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
/// Every field is optional.
struct RawConfig {
    season_weeks: Option<u32>,
    roster_size: Option<usize>,
    max_weekly_points: Option<i32>,
    scoring_rules: Option<Vec<ScoringRule>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            season_weeks: value.season_weeks.unwrap_or(defaults.season_weeks),
            roster_size: value.roster_size.unwrap_or(defaults.roster_size),
            max_weekly_points: value
                .max_weekly_points
                .map(|max| max.max(0))
                .unwrap_or(defaults.max_weekly_points),
            scoring_rules: value.scoring_rules.unwrap_or(defaults.scoring_rules),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn rule(title: &str, points: i32, description: &str) -> ScoringRule {
    ScoringRule {
        title: title.into(),
        points,
        description: description.into(),
    }
}

/// Built-in rulebook shipped with the binary.
fn default_scoring_rules() -> Vec<ScoringRule> {
    vec![
        rule("Survival", 5, "Not being eliminated this week"),
        rule("Individual Immunity", 10, "Winning individual immunity"),
        rule("Reward Challenge", 5, "Winning a reward"),
        rule("Finding an Idol", 8, "Finding a hidden immunity idol"),
        rule("Playing an Idol", 5, "Successfully playing an idol"),
        rule("Eliminated", 0, "No future points once voted out"),
        rule("Merge", 15, "Making it to the merge"),
        rule("Final Three", 20, "Making it to the final three"),
        rule("Sole Survivor", 50, "Winning the season"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let raw: RawConfig = serde_json::from_str(r#"{ "roster_size": 4 }"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.roster_size, 4);
        assert_eq!(config.season_weeks, 13);
        assert_eq!(config.max_weekly_points, 999);
        assert_eq!(config.scoring_rules.len(), 9);
    }

    #[test]
    fn negative_points_cap_is_floored_at_zero() {
        let raw: RawConfig = serde_json::from_str(r#"{ "max_weekly_points": -5 }"#).unwrap();
        assert_eq!(AppConfig::from(raw).max_weekly_points, 0);
    }
}
