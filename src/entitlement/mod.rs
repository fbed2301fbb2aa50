pub mod decision;
pub mod modal;
pub mod plan;
pub mod store;

pub use decision::{decide, lock_message, DenialReason, GateDecision};
pub use modal::{ModalController, ModalOpener, ModalState};
pub use plan::{is_at_least, rank_of, Tier};
pub use store::{EntitlementReader, EntitlementState, EntitlementStore, PlanLimits, SubscriptionRecord};
