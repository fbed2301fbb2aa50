use super::{centered, tier_color};
use crate::config::PlanConfig;
use crate::entitlement::{rank_of, EntitlementState, ModalState, Tier};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use std::collections::BTreeMap;

const MODAL_WIDTH: u16 = 56;

/// Draws the upgrade prompt whenever the modal is open.
pub struct UpgradeModal {
    plans: BTreeMap<Tier, PlanConfig>,
}

impl UpgradeModal {
    pub fn new(plans: BTreeMap<Tier, PlanConfig>) -> Self {
        Self { plans }
    }

    pub fn headline(modal: &ModalState) -> String {
        match modal.context_feature.as_deref() {
            Some(feature) => format!("Unlock {} with a paid plan", feature),
            None => "Choose a plan to unlock everything".to_string(),
        }
    }

    pub fn render(&self, modal: &ModalState, state: &EntitlementState, area: Rect, buf: &mut Buffer) {
        if !modal.is_open {
            return;
        }

        let current = state.effective_tier();
        let mut lines = vec![
            Line::from(Span::styled(
                Self::headline(modal),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (tier, plan) in &self.plans {
            let marker = if Some(*tier) == current {
                "current"
            } else if tier.rank() > rank_of(current) {
                "upgrade"
            } else {
                ""
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<10}", plan.display_name),
                    Style::default().fg(tier_color(*tier)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:<10}", plan.price.as_deref().unwrap_or("-"))),
                Span::raw(format!("{:>3}-day logs  ", plan.log_retention_days)),
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Esc] close",
            Style::default().fg(Color::DarkGray),
        )));

        let height = lines.len() as u16 + 2;
        let popup = centered(area, MODAL_WIDTH, height);
        Clear.render(popup, buf);
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .title(" Upgrade your plan ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gate::testing::{buffer_text, is_blank};

    fn modal() -> UpgradeModal {
        UpgradeModal::new(Config::parse("").unwrap().plans)
    }

    #[test]
    fn test_closed_modal_draws_nothing() {
        let area = Rect::new(0, 0, 70, 14);
        let mut buf = Buffer::empty(area);
        modal().render(&ModalState::default(), &EntitlementState::unsubscribed(), area, &mut buf);
        assert!(is_blank(&buf));
    }

    #[test]
    fn test_open_modal_lists_plans_and_feature() {
        let area = Rect::new(0, 0, 70, 14);
        let mut buf = Buffer::empty(area);
        let state = EntitlementState::subscribed(Some(Tier::Starter), None, None);
        let open = ModalState {
            is_open: true,
            context_feature: Some("Replay".into()),
        };
        modal().render(&open, &state, area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Unlock Replay with a paid plan"));
        assert!(text.contains("Agency"));
        assert!(text.contains("30-day logs"));
        assert!(text.contains("current"));
    }

    #[test]
    fn test_headline_without_feature() {
        let open = ModalState { is_open: true, context_feature: None };
        assert_eq!(UpgradeModal::headline(&open), "Choose a plan to unlock everything");
    }
}
