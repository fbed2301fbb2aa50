use super::{tier_color, GateContext};
use crate::entitlement::{EntitlementState, Tier};
use crate::error::GateError;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Persistent "subscribe" prompt. Renders nothing once subscribed.
pub struct SubscriptionBanner {
    ctx: GateContext,
    message: String,
}

impl SubscriptionBanner {
    pub fn new(ctx: GateContext) -> Self {
        Self {
            ctx,
            message: "You're on the free preview. Subscribe to run workflows.".to_string(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_visible(state: &EntitlementState) -> bool {
        !state.is_subscribed
    }

    /// Returns true when the banner was showing and raised the modal.
    pub fn activate(&self) -> Result<bool, GateError> {
        if !Self::is_visible(&self.ctx.state()?) {
            return Ok(false);
        }
        self.ctx.modal.open(None)?;
        Ok(true)
    }

    pub fn render(&self, state: &EntitlementState, area: Rect, buf: &mut Buffer) {
        if !Self::is_visible(state) {
            return;
        }
        let line = Line::from(vec![
            Span::styled(
                " \u{2605} ",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            Span::styled(
                format!(" {} ", self.message),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("[b] Subscribe", Style::default().add_modifier(Modifier::BOLD)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PillView {
    /// Not subscribed; clicking opens the upgrade modal.
    Subscribe,
    Active { label: String, tier: Tier },
}

/// Compact plan indicator for headers.
pub struct SubscriptionPill {
    ctx: GateContext,
}

impl SubscriptionPill {
    pub fn new(ctx: GateContext) -> Self {
        Self { ctx }
    }

    pub fn view_for(state: &EntitlementState) -> PillView {
        match (state.effective_tier(), state.plan_label()) {
            (Some(tier), Some(label)) => PillView::Active { label, tier },
            _ => PillView::Subscribe,
        }
    }

    pub fn view(&self) -> Result<PillView, GateError> {
        Ok(Self::view_for(&self.ctx.state()?))
    }

    pub fn is_clickable(&self) -> Result<bool, GateError> {
        Ok(self.view()? == PillView::Subscribe)
    }

    /// Opens the modal with no feature context when not subscribed.
    pub fn activate(&self) -> Result<bool, GateError> {
        if !self.is_clickable()? {
            return Ok(false);
        }
        self.ctx.modal.open(None)?;
        Ok(true)
    }

    pub fn render(&self, state: &EntitlementState, area: Rect, buf: &mut Buffer) {
        let span = match Self::view_for(state) {
            PillView::Subscribe => Span::styled(
                " Subscribe [p] ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            ),
            PillView::Active { label, tier } => Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(Color::Black)
                    .bg(tier_color(tier))
                    .add_modifier(Modifier::BOLD),
            ),
        };
        Paragraph::new(Line::from(span)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::{EntitlementStore, ModalController};
    use crate::gate::testing::{buffer_text, is_blank};

    #[test]
    fn test_banner_hidden_when_subscribed() {
        let mut store = EntitlementStore::new();
        let modal = ModalController::new(store.reader());
        let banner = SubscriptionBanner::new(GateContext::new(&store, &modal));
        store.set_subscription(true, Some(Tier::Starter), None, None);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        banner.render(&store.state(), area, &mut buf);
        assert!(is_blank(&buf));
        assert!(!banner.activate().unwrap());
        assert!(!modal.state().is_open);
    }

    #[test]
    fn test_banner_prompts_when_unsubscribed() {
        let store = EntitlementStore::new();
        let modal = ModalController::new(store.reader());
        let banner = SubscriptionBanner::new(GateContext::new(&store, &modal)).message("Go paid");

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        banner.render(&store.state(), area, &mut buf);
        assert!(buffer_text(&buf).contains("Go paid"));
        assert!(banner.activate().unwrap());
        assert_eq!(modal.state().context_feature, None);
    }

    #[test]
    fn test_pill_shows_plan_once_subscribed() {
        let mut store = EntitlementStore::new();
        let modal = ModalController::new(store.reader());
        let pill = SubscriptionPill::new(GateContext::new(&store, &modal));
        store.set_subscription(true, Some(Tier::Pro), Some("Pro Monthly".into()), None);

        assert_eq!(
            pill.view().unwrap(),
            PillView::Active { label: "Pro Monthly".into(), tier: Tier::Pro }
        );
        assert!(!pill.activate().unwrap());
        assert!(!modal.state().is_open);

        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        pill.render(&store.state(), area, &mut buf);
        assert!(buffer_text(&buf).contains("Pro Monthly"));
        assert_eq!(buf.content()[0].bg, Color::Magenta);
    }

    #[test]
    fn test_pill_without_display_name_uses_tier() {
        let state = EntitlementState::subscribed(Some(Tier::Agency), None, None);
        assert_eq!(
            SubscriptionPill::view_for(&state),
            PillView::Active { label: "Agency".into(), tier: Tier::Agency }
        );
    }
}
