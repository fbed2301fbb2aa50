//! UI primitives that render one of two branches depending on the current
//! entitlement decision.
//!
//! Every primitive exposes a pure `view_for(&EntitlementState)` that builds a
//! small view model, a `render` that draws it into a ratatui `Buffer`, and,
//! when interactive, an `activate` that routes denied attempts to the upgrade
//! modal through a [`ModalOpener`].

pub mod banner;
pub mod overlay;
pub mod panel;
pub mod retention;
pub mod trigger;
pub mod upgrade_modal;

pub use banner::{PillView, SubscriptionBanner, SubscriptionPill};
pub use overlay::{LockedOverlay, OverlayView};
pub use panel::LockedActionPanel;
pub use retention::{RetentionView, RetentionWarning};
pub use trigger::{Activation, LockedTrigger, TriggerView};
pub use upgrade_modal::UpgradeModal;

use crate::entitlement::{
    decide, EntitlementReader, EntitlementState, EntitlementStore, GateDecision, ModalController,
    ModalOpener, Tier,
};
use crate::error::GateError;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
};

pub const LOCK: &str = "\u{1F512}";

/// Handles every primitive is built with: read access to entitlements and the
/// ability to raise the upgrade modal.
#[derive(Debug, Clone)]
pub struct GateContext {
    pub entitlement: EntitlementReader,
    pub modal: ModalOpener,
}

impl GateContext {
    pub fn new(store: &EntitlementStore, modal: &ModalController) -> Self {
        Self {
            entitlement: store.reader(),
            modal: modal.opener(),
        }
    }

    pub fn state(&self) -> Result<EntitlementState, GateError> {
        self.entitlement.state()
    }

    pub fn decide(&self, required: Option<Tier>) -> Result<GateDecision, GateError> {
        Ok(decide(&self.entitlement.state()?, required))
    }
}

pub(crate) fn dimmed() -> Style {
    Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
}

pub(crate) fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Starter => Color::Blue,
        Tier::Pro => Color::Magenta,
        Tier::Agency => Color::Yellow,
    }
}

/// A `width` x `height` rect centred in `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn test_centered_fits_inside() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered(area, 80, 20), area);
    }

    #[test]
    fn test_context_decides_from_live_state() {
        let mut store = EntitlementStore::new();
        let modal = ModalController::new(store.reader());
        let ctx = GateContext::new(&store, &modal);
        assert!(ctx.decide(None).unwrap().is_denied());
        store.set_subscription(true, Some(Tier::Pro), None, None);
        assert!(ctx.decide(Some(Tier::Pro)).unwrap().is_granted());
        assert!(ctx.decide(Some(Tier::Agency)).unwrap().is_denied());
    }

    #[test]
    fn test_dimmed_style_has_dim_modifier() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 1));
        buf.set_style(buf.area, dimmed());
        assert!(buf.content()[0].modifier.contains(Modifier::DIM));
    }
}
