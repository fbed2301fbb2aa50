use super::{tier_color, GateContext};
use crate::entitlement::{EntitlementState, Tier};
use crate::error::GateError;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

pub const RETENTION_FEATURE: &str = "Longer log retention";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionView {
    pub retention_days: u32,
    pub next_tier: Tier,
}

/// Tells subscribed users how long execution logs are kept on their plan and
/// which tier keeps them longer. Hidden on the top tier and whenever the plan
/// limits are unknown.
pub struct RetentionWarning {
    ctx: GateContext,
}

impl RetentionWarning {
    pub fn new(ctx: GateContext) -> Self {
        Self { ctx }
    }

    pub fn view_for(state: &EntitlementState) -> Option<RetentionView> {
        if !state.is_subscribed {
            return None;
        }
        let next_tier = state.effective_tier()?.next()?;
        let limits = state.plan_limits.as_ref()?;
        Some(RetentionView {
            retention_days: limits.log_retention_days,
            next_tier,
        })
    }

    pub fn view(&self) -> Result<Option<RetentionView>, GateError> {
        Ok(Self::view_for(&self.ctx.state()?))
    }

    pub fn activate(&self) -> Result<bool, GateError> {
        if self.view()?.is_none() {
            return Ok(false);
        }
        self.ctx.modal.open(Some(RETENTION_FEATURE))?;
        Ok(true)
    }

    pub fn render(&self, state: &EntitlementState, area: Rect, buf: &mut Buffer) {
        let Some(view) = Self::view_for(state) else {
            return;
        };
        let days = if view.retention_days == 1 { "day" } else { "days" };
        let line = Line::from(vec![
            Span::styled("\u{26a0} ", Style::default().fg(Color::Yellow)),
            Span::raw("Execution logs are kept for "),
            Span::styled(
                format!("{} {}", view.retention_days, days),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(". "),
            Span::styled(
                format!("Upgrade to {} for longer history", view.next_tier),
                Style::default().fg(tier_color(view.next_tier)),
            ),
        ]);
        Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::{EntitlementStore, ModalController, PlanLimits};
    use crate::gate::testing::{buffer_text, is_blank};

    #[test]
    fn test_next_tier_walk() {
        let starter = EntitlementState::subscribed(Some(Tier::Starter), None, Some(PlanLimits::with_retention(7)));
        assert_eq!(
            RetentionWarning::view_for(&starter),
            Some(RetentionView { retention_days: 7, next_tier: Tier::Pro })
        );
        let agency = EntitlementState::subscribed(Some(Tier::Agency), None, Some(PlanLimits::with_retention(90)));
        assert_eq!(RetentionWarning::view_for(&agency), None);
    }

    #[test]
    fn test_hidden_without_limits_or_subscription() {
        let no_limits = EntitlementState::subscribed(Some(Tier::Pro), None, None);
        assert_eq!(RetentionWarning::view_for(&no_limits), None);
        assert_eq!(RetentionWarning::view_for(&EntitlementState::unsubscribed()), None);
    }

    #[test]
    fn test_render_uses_limit_from_state() {
        let mut store = EntitlementStore::new();
        let modal = ModalController::new(store.reader());
        let warning = RetentionWarning::new(GateContext::new(&store, &modal));
        store.set_subscription(true, Some(Tier::Starter), None, Some(PlanLimits::with_retention(14)));

        let area = Rect::new(0, 0, 100, 2);
        let mut buf = Buffer::empty(area);
        warning.render(&store.state(), area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("14 days"));
        assert!(text.contains("Upgrade to Pro"));

        assert!(warning.activate().unwrap());
        assert_eq!(modal.state().context_feature.as_deref(), Some(RETENTION_FEATURE));
    }

    #[test]
    fn test_render_blank_on_top_tier() {
        let mut store = EntitlementStore::new();
        let modal = ModalController::new(store.reader());
        let warning = RetentionWarning::new(GateContext::new(&store, &modal));
        store.set_subscription(true, Some(Tier::Agency), None, Some(PlanLimits::with_retention(90)));

        let area = Rect::new(0, 0, 100, 2);
        let mut buf = Buffer::empty(area);
        warning.render(&store.state(), area, &mut buf);
        assert!(is_blank(&buf));
        assert!(!warning.activate().unwrap());
    }
}
