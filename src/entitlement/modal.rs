//! Upgrade prompt state and the handles gated components use to raise it.

use super::store::EntitlementReader;
use crate::error::GateError;
use std::sync::{Arc, Weak};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalState {
    pub is_open: bool,
    pub context_feature: Option<String>,
}

/// Sole owner of the upgrade modal's state.
pub struct ModalController {
    tx: Arc<watch::Sender<ModalState>>,
    entitlement: EntitlementReader,
}

impl ModalController {
    pub fn new(entitlement: EntitlementReader) -> Self {
        let (tx, _rx) = watch::channel(ModalState::default());
        Self {
            tx: Arc::new(tx),
            entitlement,
        }
    }

    pub fn state(&self) -> ModalState {
        self.tx.borrow().clone()
    }

    /// Receiver for whatever draws the prompt.
    pub fn watch(&self) -> watch::Receiver<ModalState> {
        self.tx.subscribe()
    }

    /// Open (or re-open) with a new context feature. Last call wins.
    pub fn open(&self, feature: Option<&str>) {
        open_on(&self.tx, feature);
    }

    pub fn close(&self) {
        self.tx.send_if_modified(|state| {
            if !state.is_open && state.context_feature.is_none() {
                return false;
            }
            *state = ModalState::default();
            true
        });
        tracing::debug!("upgrade modal closed");
    }

    /// Returns true when the user is subscribed. Otherwise raises the modal
    /// for `feature` and returns false.
    pub fn require_entitlement(&self, feature: Option<&str>) -> Result<bool, GateError> {
        require_on(&self.tx, &self.entitlement, feature)
    }

    /// Open-only handle for gated components.
    pub fn opener(&self) -> ModalOpener {
        ModalOpener {
            tx: Arc::downgrade(&self.tx),
            entitlement: self.entitlement.clone(),
        }
    }
}

/// Lets a component request the upgrade modal without being able to read or
/// close it.
#[derive(Debug, Clone)]
pub struct ModalOpener {
    tx: Weak<watch::Sender<ModalState>>,
    entitlement: EntitlementReader,
}

impl ModalOpener {
    pub fn open(&self, feature: Option<&str>) -> Result<(), GateError> {
        let tx = self.tx.upgrade().ok_or(GateError::ModalProviderGone)?;
        open_on(&tx, feature);
        Ok(())
    }

    pub fn require_entitlement(&self, feature: Option<&str>) -> Result<bool, GateError> {
        let tx = self.tx.upgrade().ok_or(GateError::ModalProviderGone)?;
        require_on(&tx, &self.entitlement, feature)
    }
}

fn open_on(tx: &watch::Sender<ModalState>, feature: Option<&str>) {
    tracing::debug!(feature = feature.unwrap_or("-"), "upgrade modal opened");
    tx.send_replace(ModalState {
        is_open: true,
        context_feature: feature.map(str::to_string),
    });
}

fn require_on(
    tx: &watch::Sender<ModalState>,
    entitlement: &EntitlementReader,
    feature: Option<&str>,
) -> Result<bool, GateError> {
    if entitlement.state()?.is_subscribed {
        return Ok(true);
    }
    open_on(tx, feature);
    Ok(false)
}
