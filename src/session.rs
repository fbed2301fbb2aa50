//! Owner of the session's entitlement store and upgrade modal.

use crate::account::record_for;
use crate::config::Config;
use crate::entitlement::{EntitlementStore, ModalController, SubscriptionRecord, Tier};
use crate::gate::GateContext;

/// Next tier in the simulated account cycle: none → starter → pro → agency → none.
pub fn next_session_tier(current: Option<Tier>) -> Option<Tier> {
    match current {
        None => Some(Tier::Starter),
        Some(tier) => tier.next(),
    }
}

/// Holds the only writable handles to entitlement and modal state. Gated
/// components get a [`GateContext`] instead.
pub struct Session {
    pub store: EntitlementStore,
    pub modal: ModalController,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let store = EntitlementStore::new();
        let modal = ModalController::new(store.reader());
        Self {
            store,
            modal,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> GateContext {
        GateContext::new(&self.store, &self.modal)
    }

    /// Account data arrived.
    pub fn apply(&mut self, record: SubscriptionRecord) {
        self.store.apply(record);
    }

    /// Step to the next tier, with limits from the plan catalog.
    pub fn cycle_tier(&mut self) -> Option<Tier> {
        let next = next_session_tier(self.store.state().tier);
        let record = record_for(next, &self.config);
        self.store.apply(record);
        next
    }
}
