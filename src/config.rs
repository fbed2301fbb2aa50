use crate::entitlement::{PlanLimits, Tier};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const ENV_FILE: &str = ".env";
const TIER_ENV_VAR: &str = "PLANWARD_TIER";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_plans")]
    pub plans: BTreeMap<Tier, PlanConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Tier the simulated account service reports at startup; "none" for no
    /// subscription.
    #[serde(default = "default_session_tier")]
    pub tier: String,
    #[serde(default = "default_account_latency")]
    pub account_latency_ms: u64,
    #[serde(default)]
    pub account_jitter_ms: u64,
}

fn default_session_tier() -> String { "none".to_string() }
fn default_account_latency() -> u64 { 600 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tier: default_session_tier(),
            account_latency_ms: default_account_latency(),
            account_jitter_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_filter() -> String { "planward=info".to_string() }
fn default_log_file() -> String { "planward.log".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: default_log_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlanConfig {
    pub display_name: String,
    #[serde(default)]
    pub price: Option<String>,
    pub log_retention_days: u32,
    /// Additional limits forwarded as-is with the subscription.
    #[serde(default)]
    pub limits: BTreeMap<String, serde_json::Value>,
}

impl PlanConfig {
    pub fn plan_limits(&self) -> PlanLimits {
        PlanLimits {
            log_retention_days: self.log_retention_days,
            extra: self.limits.clone(),
        }
    }
}

fn default_plans() -> BTreeMap<Tier, PlanConfig> {
    [
        (Tier::Starter, "Starter", "$19/mo", 7),
        (Tier::Pro, "Pro", "$49/mo", 30),
        (Tier::Agency, "Agency", "$149/mo", 90),
    ]
    .into_iter()
    .map(|(tier, name, price, days)| {
        (
            tier,
            PlanConfig {
                display_name: name.to_string(),
                price: Some(price.to_string()),
                log_retention_days: days,
                limits: BTreeMap::new(),
            },
        )
    })
    .collect()
}

/// Parse a session tier string. "none", "free" and "" mean no subscription.
pub fn parse_session_tier(raw: &str) -> Result<Option<Tier>> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "none" | "free" => Ok(None),
        other => other
            .parse::<Tier>()
            .map(Some)
            .map_err(anyhow::Error::msg),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        // A partial [plans] table still gets the built-in entries it omits.
        for (tier, plan) in default_plans() {
            config.plans.entry(tier).or_insert(plan);
        }
        Ok(config)
    }

    /// Like [`load`](Self::load) but falls back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                plans: default_plans(),
                ..Self::default()
            });
        }
        Self::load(path)
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// Tier the session starts with: `PLANWARD_TIER` if set, else `[session].tier`.
    pub fn initial_tier(&self) -> Result<Option<Tier>> {
        match std::env::var(TIER_ENV_VAR) {
            Ok(raw) if !raw.trim().is_empty() => parse_session_tier(&raw)
                .with_context(|| format!("invalid {}", TIER_ENV_VAR)),
            _ => parse_session_tier(&self.session.tier)
                .with_context(|| "invalid [session].tier"),
        }
    }

    pub fn plan(&self, tier: Tier) -> Option<&PlanConfig> {
        self.plans.get(&tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("planward.toml")).unwrap();
        assert_eq!(config.logging.filter, "planward=info");
        assert_eq!(config.plan(Tier::Pro).unwrap().log_retention_days, 30);
        assert_eq!(config.plan(Tier::Agency).unwrap().display_name, "Agency");
        assert!(parse_session_tier(&config.session.tier).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.session.tier, "none");
        assert_eq!(config.session.account_latency_ms, 600);
        assert_eq!(config.logging.file, "planward.log");
        assert_eq!(config.plans.len(), 3);
        assert_eq!(config.plan(Tier::Starter).unwrap().log_retention_days, 7);
    }

    #[test]
    fn test_partial_plans_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [plans.pro]
            display_name = "Pro Annual"
            log_retention_days = 45
            limits = { max_workflows = 200 }
            "#,
        )
        .unwrap();
        let pro = config.plan(Tier::Pro).unwrap();
        assert_eq!(pro.display_name, "Pro Annual");
        assert_eq!(pro.plan_limits().log_retention_days, 45);
        assert_eq!(pro.plan_limits().extra["max_workflows"], serde_json::json!(200));
        assert_eq!(config.plan(Tier::Agency).unwrap().log_retention_days, 90);
    }

    #[test]
    fn test_parse_session_tier() {
        assert_eq!(parse_session_tier("none").unwrap(), None);
        assert_eq!(parse_session_tier("").unwrap(), None);
        assert_eq!(parse_session_tier("Pro").unwrap(), Some(Tier::Pro));
        assert!(parse_session_tier("platinum").is_err());
    }

    #[test]
    fn test_unknown_plan_key_rejected() {
        let result = Config::parse(
            r#"
            [plans.platinum]
            display_name = "Platinum"
            log_retention_days = 365
            "#,
        );
        assert!(result.is_err());
    }
}
