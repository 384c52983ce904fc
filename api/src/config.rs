use std::{env, time::Duration};

use anyhow::{Context, Result};
use compounding::{CompoundingConfig, DEFAULT_STARTING_CAPITAL_USD, DEFAULT_TARGET_CAPITAL_USD};
use orchestrator::DEFAULT_ORCHESTRATOR_URL;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub orchestrator_url: String,
    pub orchestrator_timeout: Duration,
    pub orchestrator_offline: bool,
    pub history_limit: usize,
    pub compounding: CompoundingConfig,
    pub frontend_origins: Vec<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let start_capital_usd = parse_capital(
            first_var(&["STARTING_CAPITAL_USD", "NEXT_PUBLIC_STARTING_CAPITAL_USD"]),
            "STARTING_CAPITAL_USD",
            DEFAULT_STARTING_CAPITAL_USD,
        )?;
        let target_capital_usd = parse_capital(
            first_var(&["TARGET_CAPITAL_USD", "NEXT_PUBLIC_TARGET_CAPITAL_USD"]),
            "TARGET_CAPITAL_USD",
            DEFAULT_TARGET_CAPITAL_USD,
        )?;

        Ok(Self {
            orchestrator_url: env::var("MEMMCP_ORCHESTRATOR_URL")
                .unwrap_or_else(|_| DEFAULT_ORCHESTRATOR_URL.to_string()),
            orchestrator_timeout: parse_duration_seconds("ORCHESTRATOR_TIMEOUT_SECS", 10),
            orchestrator_offline: parse_bool("ORCHESTRATOR_OFFLINE", false),
            history_limit: parse_usize("TELEMETRY_HISTORY_LIMIT", 50),
            compounding: CompoundingConfig {
                start_capital_usd,
                target_capital_usd,
            },
            frontend_origins: parse_origins(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8081".to_string())
                .parse()
                .context("PORT must be a valid u16")?,
        })
    }
}

fn first_var(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

fn parse_capital(raw: Option<String>, key: &str, default: f64) -> Result<f64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    let value = trimmed
        .parse::<f64>()
        .with_context(|| format!("{key} must be a number, got {trimmed:?}"))?;
    if !value.is_finite() {
        anyhow::bail!("{key} must be finite, got {trimmed:?}");
    }
    Ok(value)
}

fn parse_origins() -> Vec<String> {
    if let Ok(list) = env::var("FRONTEND_ORIGINS") {
        split_origins(&list)
    } else if let Ok(origin) = env::var("FRONTEND_ORIGIN") {
        split_origins(&origin)
    } else {
        vec!["http://localhost:3000".to_string()]
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|item| {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_duration_seconds(key: &str, default: u64) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

fn parse_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn parse_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capital_defaults_when_unset_or_blank() {
        assert_eq!(parse_capital(None, "X", 400.0).unwrap(), 400.0);
        assert_eq!(parse_capital(Some("  ".into()), "X", 400.0).unwrap(), 400.0);
    }

    #[test]
    fn capital_parses_numbers() {
        assert_eq!(
            parse_capital(Some(" 2500.5 ".into()), "X", 400.0).unwrap(),
            2500.5
        );
        assert_eq!(parse_capital(Some("4e6".into()), "X", 0.0).unwrap(), 4_000_000.0);
    }

    #[test]
    fn capital_rejects_garbage_and_non_finite() {
        assert!(parse_capital(Some("lots".into()), "X", 400.0).is_err());
        assert!(parse_capital(Some("inf".into()), "X", 400.0).is_err());
        assert!(parse_capital(Some("NaN".into()), "X", 400.0).is_err());
    }

    #[test]
    fn origins_split_on_commas() {
        assert_eq!(
            split_origins("http://a.test, ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
