//! Sources of authoritative subscription data.

use crate::config::Config;
use crate::entitlement::{SubscriptionRecord, Tier};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::mpsc;

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn fetch_subscription(&mut self) -> Result<SubscriptionRecord>;
}

/// Build the record an account service would report for `tier`, with the
/// limits taken from the configured plan catalog.
pub fn record_for(tier: Option<Tier>, config: &Config) -> SubscriptionRecord {
    let Some(tier) = tier else {
        return SubscriptionRecord::default();
    };
    let plan = config.plan(tier);
    SubscriptionRecord {
        subscribed: true,
        tier: Some(tier),
        display_name: plan.map(|p| p.display_name.clone()),
        limits: plan.map(|p| p.plan_limits()),
    }
}

/// Parse a JSON payload from an account API.
pub fn parse_record(body: &str) -> Result<SubscriptionRecord> {
    serde_json::from_str(body).context("failed to parse subscription payload")
}

/// Reports a fixed subscription after a simulated round trip.
pub struct StaticAccountService {
    record: SubscriptionRecord,
    latency: Duration,
    jitter_ms: u64,
    rng: StdRng,
}

impl StaticAccountService {
    pub fn new(record: SubscriptionRecord, latency: Duration, jitter_ms: u64) -> Self {
        Self {
            record,
            latency,
            jitter_ms,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let tier = config.initial_tier()?;
        Ok(Self::new(
            record_for(tier, config),
            Duration::from_millis(config.session.account_latency_ms),
            config.session.account_jitter_ms,
        ))
    }
}

#[async_trait]
impl AccountService for StaticAccountService {
    async fn fetch_subscription(&mut self) -> Result<SubscriptionRecord> {
        let jitter = if self.jitter_ms > 0 {
            self.rng.gen_range(0..=self.jitter_ms)
        } else {
            0
        };
        tokio::time::sleep(self.latency + Duration::from_millis(jitter)).await;
        Ok(self.record.clone())
    }
}

/// Fetch once in the background and forward the result to the session owner.
pub fn spawn_loader<S>(mut service: S, tx: mpsc::Sender<SubscriptionRecord>) -> tokio::task::JoinHandle<()>
where
    S: AccountService + 'static,
{
    tokio::spawn(async move {
        match service.fetch_subscription().await {
            Ok(record) => {
                tracing::info!(subscribed = record.subscribed, tier = ?record.tier, "account data loaded");
                if tx.send(record).await.is_err() {
                    tracing::debug!("session ended before account data arrived");
                }
            }
            Err(e) => tracing::error!("failed to load subscription: {:#}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_for_none_is_unsubscribed() {
        let config = Config::parse("").unwrap();
        assert_eq!(record_for(None, &config), SubscriptionRecord::default());
    }

    #[test]
    fn test_record_for_tier_carries_plan_limits() {
        let config = Config::parse("").unwrap();
        let record = record_for(Some(Tier::Pro), &config);
        assert!(record.subscribed);
        assert_eq!(record.display_name.as_deref(), Some("Pro"));
        assert_eq!(record.limits.unwrap().log_retention_days, 30);
    }

    #[test]
    fn test_parse_record_minimal() {
        let record = parse_record(r#"{"subscribed": false}"#).unwrap();
        assert!(!record.subscribed);
        assert!(parse_record("not json").is_err());
    }

    #[tokio::test]
    async fn test_loader_forwards_record() {
        let config = Config::parse("").unwrap();
        let service = StaticAccountService::new(
            record_for(Some(Tier::Agency), &config),
            Duration::from_millis(20),
            10,
        );
        let (tx, mut rx) = mpsc::channel(1);
        spawn_loader(service, tx);
        let record = rx.recv().await.unwrap();
        assert_eq!(record.tier, Some(Tier::Agency));
    }
}
