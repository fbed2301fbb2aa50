use super::plan::Tier;
use crate::error::GateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::watch;

/// Numeric limits attached to a plan. Only the log retention window is
/// interpreted here; anything else rides along untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanLimits {
    pub log_retention_days: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PlanLimits {
    pub fn with_retention(days: u32) -> Self {
        Self {
            log_retention_days: days,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntitlementState {
    pub is_subscribed: bool,
    pub tier: Option<Tier>,
    pub plan_display_name: Option<String>,
    pub plan_limits: Option<PlanLimits>,
}

impl EntitlementState {
    pub fn unsubscribed() -> Self {
        Self::default()
    }

    pub fn subscribed(
        tier: Option<Tier>,
        plan_display_name: Option<String>,
        plan_limits: Option<PlanLimits>,
    ) -> Self {
        Self {
            is_subscribed: true,
            tier,
            plan_display_name,
            plan_limits,
        }
    }

    /// Tier used for comparisons. A subscription that arrived without a tier
    /// counts as the lowest paid tier.
    pub fn effective_tier(&self) -> Option<Tier> {
        if !self.is_subscribed {
            return None;
        }
        Some(self.tier.unwrap_or(Tier::Starter))
    }

    /// Name shown for the active plan, falling back to the tier's own name.
    pub fn plan_label(&self) -> Option<String> {
        if !self.is_subscribed {
            return None;
        }
        self.plan_display_name
            .clone()
            .or_else(|| self.effective_tier().map(|t| t.display_name().to_string()))
    }
}

/// Subscription payload as delivered by an account service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub subscribed: bool,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub limits: Option<PlanLimits>,
}

/// Session-lived holder of the current entitlement state.
///
/// There is exactly one writer (whoever owns the store, via `&mut self`) and
/// any number of [`EntitlementReader`]s. Every write is pushed to all readers.
pub struct EntitlementStore {
    tx: watch::Sender<EntitlementState>,
}

impl Default for EntitlementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitlementStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(EntitlementState::unsubscribed());
        Self { tx }
    }

    pub fn state(&self) -> EntitlementState {
        self.tx.borrow().clone()
    }

    /// Replace the state in one step. When `subscribed` is false the other
    /// arguments are discarded.
    pub fn set_subscription(
        &mut self,
        subscribed: bool,
        tier: Option<Tier>,
        display_name: Option<String>,
        limits: Option<PlanLimits>,
    ) {
        let next = if subscribed {
            EntitlementState::subscribed(tier, display_name, limits)
        } else {
            EntitlementState::unsubscribed()
        };
        tracing::debug!(
            subscribed = next.is_subscribed,
            tier = ?next.tier,
            readers = self.tx.receiver_count(),
            "subscription updated"
        );
        self.tx.send_replace(next);
    }

    pub fn apply(&mut self, record: SubscriptionRecord) {
        self.set_subscription(record.subscribed, record.tier, record.display_name, record.limits);
    }

    pub fn reader(&self) -> EntitlementReader {
        EntitlementReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of an [`EntitlementStore`].
#[derive(Debug, Clone)]
pub struct EntitlementReader {
    rx: watch::Receiver<EntitlementState>,
}

impl EntitlementReader {
    /// Latest state. Fails once the store has been dropped.
    pub fn state(&self) -> Result<EntitlementState, GateError> {
        self.rx
            .has_changed()
            .map_err(|_| GateError::EntitlementProviderGone)?;
        Ok(self.rx.borrow().clone())
    }

    /// Latest state, marking it as seen so the next [`changed`](Self::changed)
    /// waits for a newer write.
    pub fn observe(&mut self) -> Result<EntitlementState, GateError> {
        self.rx
            .has_changed()
            .map_err(|_| GateError::EntitlementProviderGone)?;
        Ok(self.rx.borrow_and_update().clone())
    }

    pub fn has_changed(&self) -> Result<bool, GateError> {
        self.rx
            .has_changed()
            .map_err(|_| GateError::EntitlementProviderGone)
    }

    /// Resolves on the next write to the store.
    pub async fn changed(&mut self) -> Result<(), GateError> {
        self.rx
            .changed()
            .await
            .map_err(|_| GateError::EntitlementProviderGone)
    }
}
