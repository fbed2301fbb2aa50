use super::{GateContext, LOCK};
use crate::error::GateError;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Standalone "locked" panel. It is only placed where access is already
/// known to be denied, so it never consults the decision itself.
pub struct LockedActionPanel {
    ctx: GateContext,
    feature: Option<String>,
    title: String,
    message: String,
    action_label: String,
}

impl LockedActionPanel {
    pub fn new(ctx: GateContext) -> Self {
        Self {
            ctx,
            feature: None,
            title: "Unlock this feature".to_string(),
            message: "Subscribe to a plan to use this feature.".to_string(),
            action_label: "Upgrade".to_string(),
        }
    }

    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn action_label(mut self, label: impl Into<String>) -> Self {
        self.action_label = label.into();
        self
    }

    pub fn activate(&self) -> Result<(), GateError> {
        self.ctx.modal.open(self.feature.as_deref())
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                self.message.as_str(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.action_label.as_str(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} {} ", LOCK, self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(area, buf);
    }
}
