use thiserror::Error;

/// Wiring mistakes in the gating layer. A denied feature is not an error;
/// these only fire when a handle outlives the provider that owns its state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("entitlement state read after its store was dropped")]
    EntitlementProviderGone,
    #[error("upgrade modal requested after its controller was dropped")]
    ModalProviderGone,
}
