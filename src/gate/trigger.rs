use super::{dimmed, GateContext, LOCK};
use crate::entitlement::{decide, lock_message, EntitlementState, GateDecision, Tier};
use crate::error::GateError;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerView {
    Enabled { label: String },
    Locked { label: String, reason: String },
}

/// Outcome of activating a gated control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The caller's handler ran.
    Ran,
    /// Access was denied; the upgrade modal was raised instead.
    Gated,
}

/// An action control that only fires its handler when the user is entitled.
pub struct LockedTrigger {
    ctx: GateContext,
    label: String,
    feature: Option<String>,
    required_tier: Option<Tier>,
    handler: Box<dyn FnMut() + Send>,
}

impl LockedTrigger {
    pub fn new(ctx: GateContext, label: impl Into<String>, handler: impl FnMut() + Send + 'static) -> Self {
        Self {
            ctx,
            label: label.into(),
            feature: None,
            required_tier: None,
            handler: Box::new(handler),
        }
    }

    /// Feature label passed to the upgrade modal when the trigger is denied.
    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn requires(mut self, tier: Tier) -> Self {
        self.required_tier = Some(tier);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn view_for(&self, state: &EntitlementState) -> TriggerView {
        match decide(state, self.required_tier) {
            GateDecision::Granted => TriggerView::Enabled {
                label: self.label.clone(),
            },
            GateDecision::Denied(reason) => TriggerView::Locked {
                label: self.label.clone(),
                reason: lock_message(reason),
            },
        }
    }

    pub fn view(&self) -> Result<TriggerView, GateError> {
        Ok(self.view_for(&self.ctx.state()?))
    }

    /// Run the handler if granted, otherwise open the upgrade modal. The
    /// handler never runs while denied.
    pub fn activate(&mut self) -> Result<Activation, GateError> {
        let state = self.ctx.state()?;
        match decide(&state, self.required_tier) {
            GateDecision::Granted => {
                (self.handler)();
                Ok(Activation::Ran)
            }
            GateDecision::Denied(reason) => {
                tracing::info!(
                    label = self.label.as_str(),
                    reason = ?reason,
                    "gated action blocked"
                );
                self.ctx.modal.open(self.feature.as_deref())?;
                Ok(Activation::Gated)
            }
        }
    }

    pub fn render(&self, state: &EntitlementState, area: Rect, buf: &mut Buffer) {
        let line = match self.view_for(state) {
            TriggerView::Enabled { label } => Line::from(Span::styled(
                format!("[ {} ]", label),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            TriggerView::Locked { label, reason } => Line::from(vec![
                Span::styled(format!("[ {} {} ]", LOCK, label), dimmed()),
                Span::styled(
                    format!(" {}", reason),
                    dimmed().add_modifier(Modifier::ITALIC),
                ),
            ]),
        };
        Paragraph::new(line).render(area, buf);
    }
}
