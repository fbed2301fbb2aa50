use super::{centered, dimmed, GateContext, LOCK};
use crate::entitlement::{decide, lock_message, EntitlementState, GateDecision, Tier};
use crate::error::GateError;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

const PANEL_WIDTH: u16 = 44;
const PANEL_HEIGHT: u16 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayView {
    /// Children are drawn untouched.
    Content,
    Locked {
        title: String,
        message: String,
        upgrade_label: Option<String>,
    },
}

/// Wraps arbitrary content; when denied the content is drawn dimmed and
/// inert underneath a call-to-action panel.
pub struct LockedOverlay {
    ctx: GateContext,
    feature: Option<String>,
    required_tier: Option<Tier>,
    title: String,
    message: Option<String>,
    show_upgrade_button: bool,
}

impl LockedOverlay {
    pub fn new(ctx: GateContext) -> Self {
        Self {
            ctx,
            feature: None,
            required_tier: None,
            title: "Premium feature".to_string(),
            message: None,
            show_upgrade_button: true,
        }
    }

    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn requires(mut self, tier: Tier) -> Self {
        self.required_tier = Some(tier);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Fixed message; by default the lock reason is shown.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn upgrade_button(mut self, show: bool) -> Self {
        self.show_upgrade_button = show;
        self
    }

    pub fn view_for(&self, state: &EntitlementState) -> OverlayView {
        match decide(state, self.required_tier) {
            GateDecision::Granted => OverlayView::Content,
            GateDecision::Denied(reason) => OverlayView::Locked {
                title: self.title.clone(),
                message: self
                    .message
                    .clone()
                    .unwrap_or_else(|| lock_message(reason)),
                upgrade_label: self
                    .show_upgrade_button
                    .then(|| "Upgrade [u]".to_string()),
            },
        }
    }

    pub fn view(&self) -> Result<OverlayView, GateError> {
        Ok(self.view_for(&self.ctx.state()?))
    }

    /// Whether the wrapped content should receive input right now.
    pub fn accepts_input(&self) -> Result<bool, GateError> {
        Ok(self.view()? == OverlayView::Content)
    }

    /// Press the overlay's upgrade button. Returns false when there is no
    /// button to press (granted, or the button is hidden).
    pub fn activate_upgrade(&self) -> Result<bool, GateError> {
        match self.view()? {
            OverlayView::Locked {
                upgrade_label: Some(_),
                ..
            } => {
                self.ctx.modal.open(self.feature.as_deref())?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn render<W: Widget>(&self, state: &EntitlementState, child: W, area: Rect, buf: &mut Buffer) {
        child.render(area, buf);

        let OverlayView::Locked {
            title,
            message,
            upgrade_label,
        } = self.view_for(state)
        else {
            return;
        };

        buf.set_style(area, dimmed());

        let panel = centered(area, PANEL_WIDTH, PANEL_HEIGHT);
        Clear.render(panel, buf);

        let mut lines = vec![Line::from(Span::styled(
            message,
            Style::default().fg(Color::White),
        ))];
        if let Some(label) = upgrade_label {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} {} ", LOCK, title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .render(panel, buf);
    }
}
