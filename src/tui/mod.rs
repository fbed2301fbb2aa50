pub mod render;
pub mod state;

use crate::entitlement::{SubscriptionRecord, Tier};
use crate::error::GateError;
use crate::gate::{
    Activation, GateContext, LockedActionPanel, LockedOverlay, LockedTrigger, RetentionWarning,
    SubscriptionBanner, SubscriptionPill, UpgradeModal,
};
use crate::session::Session;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;

/// Things gated handlers report back to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    ExportStarted,
    ReplayStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub const WEBHOOKS_TIER: Tier = Tier::Agency;

/// The dashboard screen and the gated components placed on it.
pub struct Dashboard {
    pub state: AppState,
    pub ctx: GateContext,
    pub pill: SubscriptionPill,
    pub banner: SubscriptionBanner,
    pub export: LockedTrigger,
    pub replay: LockedTrigger,
    pub insights: LockedOverlay,
    pub webhooks: LockedActionPanel,
    pub retention: RetentionWarning,
    pub upgrade: UpgradeModal,
    events: mpsc::UnboundedReceiver<DashboardEvent>,
}

impl Dashboard {
    pub fn new(session: &Session) -> Self {
        let ctx = session.context();
        let (events_tx, events) = mpsc::unbounded_channel();

        let export_tx = events_tx.clone();
        let export = LockedTrigger::new(ctx.clone(), "Export runs [e]", move || {
            let _ = export_tx.send(DashboardEvent::ExportStarted);
        })
        .feature("CSV export");

        let replay = LockedTrigger::new(ctx.clone(), "Replay execution [r]", move || {
            let _ = events_tx.send(DashboardEvent::ReplayStarted);
        })
        .feature("Execution replay")
        .requires(Tier::Pro);

        Self {
            state: AppState::with_sample_data(),
            pill: SubscriptionPill::new(ctx.clone()),
            banner: SubscriptionBanner::new(ctx.clone()),
            export,
            replay,
            insights: LockedOverlay::new(ctx.clone())
                .title("Run insights")
                .feature("Run insights")
                .requires(Tier::Pro),
            webhooks: LockedActionPanel::new(ctx.clone())
                .title("Webhooks")
                .message("Trigger workflows from inbound webhooks on the Agency plan.")
                .action_label("Upgrade [a]")
                .feature("Webhooks"),
            retention: RetentionWarning::new(ctx.clone()),
            upgrade: UpgradeModal::new(session.config().plans.clone()),
            ctx,
            events,
        }
    }

    /// Apply everything gated handlers reported since the last frame.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                DashboardEvent::ExportStarted => {
                    self.state.exports_run += 1;
                    self.state.push_log("INFO", "export started".to_string());
                }
                DashboardEvent::ReplayStarted => {
                    self.state.replays_run += 1;
                    self.state.push_log("INFO", "replaying last execution".to_string());
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, session: &mut Session) -> Result<Flow, GateError> {
        match code {
            KeyCode::Char('q') => return Ok(Flow::Quit),
            KeyCode::Esc => session.modal.close(),
            KeyCode::Char('e') => {
                let outcome = self.export.activate()?;
                self.log_activation(self.export.label().to_string(), outcome);
            }
            KeyCode::Char('r') => {
                let outcome = self.replay.activate()?;
                self.log_activation(self.replay.label().to_string(), outcome);
            }
            KeyCode::Char('u') => {
                if self.insights.activate_upgrade()? {
                    self.state.push_log("GATE", "insights upgrade requested".to_string());
                }
            }
            KeyCode::Char('a') => {
                if self.ctx.decide(Some(WEBHOOKS_TIER))?.is_denied() {
                    self.webhooks.activate()?;
                    self.state.push_log("GATE", "webhooks upgrade requested".to_string());
                }
            }
            KeyCode::Char('b') => {
                self.banner.activate()?;
            }
            KeyCode::Char('p') => {
                self.pill.activate()?;
            }
            KeyCode::Char('w') => {
                self.retention.activate()?;
            }
            KeyCode::Char('t') => {
                let tier = session.cycle_tier();
                self.state.push_log(
                    "INFO",
                    format!(
                        "simulated account switch: {}",
                        tier.map_or("no subscription", Tier::display_name)
                    ),
                );
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn log_activation(&mut self, label: String, outcome: Activation) {
        if outcome == Activation::Gated {
            self.state.push_log("GATE", format!("{} is locked on this plan", label));
        }
    }
}

/// Run the TUI until the user quits. Subscription records arriving on
/// `account_rx` are applied to the session as they resolve.
pub async fn run_tui(
    session: Session,
    account_rx: mpsc::Receiver<SubscriptionRecord>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, session, account_rx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut session: Session,
    mut account_rx: mpsc::Receiver<SubscriptionRecord>,
) -> Result<()> {
    let mut dashboard = Dashboard::new(&session);
    let mut entitlement_rx = session.store.reader();
    let mut modal_rx = session.modal.watch();

    loop {
        while let Ok(record) = account_rx.try_recv() {
            session.apply(record);
        }

        if entitlement_rx.has_changed()? {
            let state = entitlement_rx.observe()?;
            let plan = state.plan_label().unwrap_or_else(|| "none".to_string());
            tracing::info!(plan = plan.as_str(), "entitlements changed");
            dashboard.state.push_log("INFO", format!("active plan: {}", plan));
        }

        dashboard.drain_events();

        let entitlement = session.store.state();
        let modal = modal_rx.borrow_and_update().clone();
        terminal.draw(|f| render::draw(f, &dashboard, &entitlement, &modal))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && dashboard.handle_key(key.code, &mut session)? == Flow::Quit
                {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn setup() -> (Session, Dashboard) {
        let session = Session::new(Config::parse("").unwrap());
        let dashboard = Dashboard::new(&session);
        (session, dashboard)
    }

    #[test]
    fn test_export_gated_until_subscribed() {
        let (mut session, mut dash) = setup();

        dash.handle_key(KeyCode::Char('e'), &mut session).unwrap();
        dash.drain_events();
        assert_eq!(dash.state.exports_run, 0);
        assert_eq!(session.modal.state().context_feature.as_deref(), Some("CSV export"));

        dash.handle_key(KeyCode::Esc, &mut session).unwrap();
        assert!(!session.modal.state().is_open);

        dash.handle_key(KeyCode::Char('t'), &mut session).unwrap();
        dash.handle_key(KeyCode::Char('e'), &mut session).unwrap();
        dash.drain_events();
        assert_eq!(dash.state.exports_run, 1);
        assert!(!session.modal.state().is_open);
    }

    #[test]
    fn test_replay_needs_pro() {
        let (mut session, mut dash) = setup();
        dash.handle_key(KeyCode::Char('t'), &mut session).unwrap(); // starter
        dash.handle_key(KeyCode::Char('r'), &mut session).unwrap();
        dash.drain_events();
        assert_eq!(dash.state.replays_run, 0);
        assert_eq!(session.modal.state().context_feature.as_deref(), Some("Execution replay"));

        dash.handle_key(KeyCode::Char('t'), &mut session).unwrap(); // pro
        dash.handle_key(KeyCode::Char('r'), &mut session).unwrap();
        dash.drain_events();
        assert_eq!(dash.state.replays_run, 1);
    }

    #[test]
    fn test_webhooks_panel_only_raises_when_denied() {
        let (mut session, mut dash) = setup();
        for _ in 0..3 {
            dash.handle_key(KeyCode::Char('t'), &mut session).unwrap();
        }
        assert_eq!(session.store.state().tier, Some(Tier::Agency));
        dash.handle_key(KeyCode::Char('a'), &mut session).unwrap();
        assert!(!session.modal.state().is_open);
    }

    #[test]
    fn test_quit() {
        let (mut session, mut dash) = setup();
        assert_eq!(dash.handle_key(KeyCode::Char('q'), &mut session), Ok(Flow::Quit));
        assert_eq!(dash.handle_key(KeyCode::Char('x'), &mut session), Ok(Flow::Continue));
    }
}
