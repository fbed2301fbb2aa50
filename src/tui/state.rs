use std::collections::VecDeque;
use std::time::Instant;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone)]
pub struct AppState {
    pub start_time: Instant,
    pub workflows: Vec<WorkflowRow>,
    pub executions: Vec<ExecutionRow>,
    pub logs: VecDeque<LogEntry>,
    pub exports_run: u32,
    pub replays_run: u32,
}

#[derive(Debug, Clone)]
pub struct WorkflowRow {
    pub name: String,
    pub trigger: String,
    pub active: bool,
    pub runs_today: u32,
}

#[derive(Debug, Clone)]
pub struct ExecutionRow {
    pub workflow: String,
    pub started: String,
    pub duration_ms: u64,
    pub succeeded: bool,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            workflows: Vec::new(),
            executions: Vec::new(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            exports_run: 0,
            replays_run: 0,
        }
    }

    /// Dashboard pre-filled with a few workflows and executions.
    pub fn with_sample_data() -> Self {
        let mut state = Self::new();
        state.workflows = vec![
            WorkflowRow { name: "Lead enrichment".into(), trigger: "webhook".into(), active: true, runs_today: 42 },
            WorkflowRow { name: "Invoice sync".into(), trigger: "cron 0 * * * *".into(), active: true, runs_today: 24 },
            WorkflowRow { name: "Slack digest".into(), trigger: "cron 0 9 * * 1-5".into(), active: false, runs_today: 0 },
        ];
        state.executions = vec![
            ExecutionRow { workflow: "Lead enrichment".into(), started: "09:41:07".into(), duration_ms: 812, succeeded: true },
            ExecutionRow { workflow: "Invoice sync".into(), started: "09:00:02".into(), duration_ms: 3_204, succeeded: false },
            ExecutionRow { workflow: "Lead enrichment".into(), started: "08:57:45".into(), duration_ms: 640, succeeded: true },
        ];
        state
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }

    pub fn success_rate(&self) -> Option<u32> {
        if self.executions.is_empty() {
            return None;
        }
        let ok = self.executions.iter().filter(|e| e.succeeded).count();
        Some((ok * 100 / self.executions.len()) as u32)
    }
}
