use super::plan::{is_at_least, Tier};
use super::store::EntitlementState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotSubscribed,
    TierTooLow { required: Tier },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Granted,
    Denied(DenialReason),
}

impl GateDecision {
    pub fn is_granted(self) -> bool {
        matches!(self, GateDecision::Granted)
    }

    pub fn is_denied(self) -> bool {
        !self.is_granted()
    }

    pub fn reason(self) -> Option<DenialReason> {
        match self {
            GateDecision::Granted => None,
            GateDecision::Denied(reason) => Some(reason),
        }
    }
}

/// Whether `state` may use a feature that needs `required`.
///
/// `required == None` means any active subscription is enough. Recomputed
/// on every call; never cache the result across state changes.
pub fn decide(state: &EntitlementState, required: Option<Tier>) -> GateDecision {
    if !state.is_subscribed {
        return GateDecision::Denied(DenialReason::NotSubscribed);
    }
    match required {
        Some(required) if !is_at_least(state.effective_tier(), required) => {
            GateDecision::Denied(DenialReason::TierTooLow { required })
        }
        _ => GateDecision::Granted,
    }
}

/// Human-readable lock reason. Not being subscribed at all always yields the
/// generic prompt, even when the required tier is the lowest one.
pub fn lock_message(reason: DenialReason) -> String {
    match reason {
        DenialReason::NotSubscribed => "Subscribe to unlock".to_string(),
        DenialReason::TierTooLow { required } => {
            format!("Upgrade to {} to unlock", required.display_name())
        }
    }
}
