//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - Background submissions via the detection worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::http::{HttpDetectionArchive, HttpPredictionClient};
use crate::adapters::sqlite::SqliteLocalStore;
use crate::application::{
    export_to_dir, ActivityService, DetectionFilter, DetectionService, ExportFormat,
    RecordBrowser, RecordStore, StatisticsService, SubmissionStage,
};
use crate::config::AppConfig;
use crate::domain::{DetectionOutcome, LogLevel};
use crate::reference::ReferenceTable;

use super::ui::{
    dashboard::{render_dashboard, DashboardState, FeedbackDraft},
    detection::{render_detection, DetectionState},
    form::{render_detection_form, DetectionFormState, FormField},
    records::{render_records, RecordsState},
    render_disclaimer,
    statistics::{render_statistics, StatisticsState},
};
use super::worker::{DetectionProgress, DetectionWorker, DetectionWorkerHandle};

type Detections = DetectionService<HttpPredictionClient, HttpDetectionArchive, SqliteLocalStore>;
type Statistics = StatisticsService<HttpDetectionArchive, SqliteLocalStore>;

/// Activity log entries shown on the dashboard.
const DASHBOARD_LOG_LINES: usize = 12;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    NewDetection,
    Detection,
    Statistics,
    Records,
}

/// Main application state
pub struct App {
    config: AppConfig,
    table: ReferenceTable,

    screen: Screen,
    should_quit: bool,

    detection_service: Arc<Detections>,
    statistics_service: Statistics,
    activity: ActivityService<SqliteLocalStore>,
    browser: RecordBrowser<SqliteLocalStore>,

    dashboard_state: DashboardState,
    form_state: DetectionFormState,
    detection_state: DetectionState,
    statistics_state: StatisticsState,
    records_state: RecordsState,

    /// Running submission, if any
    pending_worker: Option<DetectionWorkerHandle>,

    /// When the current submission stage started (for the progress animation)
    stage_started_at: Option<Instant>,
}

impl App {
    /// Create the application with adapters built from `config`.
    ///
    /// # Errors
    /// Returns error if the local store cannot be opened or an HTTP client
    /// cannot be built.
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(
            SqliteLocalStore::new(&config.db_path)
                .with_context(|| format!("Failed to open local store at {:?}", config.db_path))?,
        );
        let records = RecordStore::new(store, config.store_limits());

        let predictor = Arc::new(HttpPredictionClient::new(
            &config.prediction_url,
            config.prediction_timeout,
        )?);
        let archive = Arc::new(HttpDetectionArchive::new(
            &config.detections_url,
            config.archive_timeout,
        )?);
        let table = ReferenceTable::rwanda();

        let detection_service = Arc::new(DetectionService::new(
            predictor,
            Arc::clone(&archive),
            records.clone(),
        ));
        let statistics_service = StatisticsService::new(Some(archive), records.clone(), table);
        let activity = ActivityService::new(records.clone());
        let browser = RecordBrowser::new(records);

        Ok(Self::with_dependencies(
            config,
            table,
            detection_service,
            statistics_service,
            activity,
            browser,
        ))
    }

    /// Create the application with injected services.
    pub fn with_dependencies(
        config: AppConfig,
        table: ReferenceTable,
        detection_service: Arc<Detections>,
        statistics_service: Statistics,
        activity: ActivityService<SqliteLocalStore>,
        browser: RecordBrowser<SqliteLocalStore>,
    ) -> Self {
        let dashboard_state = DashboardState {
            prediction_url: config.prediction_url.clone(),
            ..DashboardState::default()
        };

        Self {
            config,
            table,
            screen: Screen::Dashboard,
            should_quit: false,
            detection_service,
            statistics_service,
            activity,
            browser,
            dashboard_state,
            form_state: DetectionFormState::new(table),
            detection_state: DetectionState::default(),
            statistics_state: StatisticsState::default(),
            records_state: RecordsState::default(),
            pending_worker: None,
            stage_started_at: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        if self.activity.current_user().is_none() {
            self.sign_in_default();
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.update_dashboard_state();

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_detection_progress();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                match self.screen {
                    Screen::Dashboard => render_dashboard(f, content_area, &self.dashboard_state),
                    Screen::NewDetection => {
                        render_detection_form(f, content_area, &self.form_state)
                    }
                    Screen::Detection => render_detection(f, content_area, &self.detection_state),
                    Screen::Statistics => {
                        render_statistics(f, content_area, &self.statistics_state)
                    }
                    Screen::Records => {
                        render_records(f, content_area, &self.records_state, &self.table)
                    }
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain progress updates from the running worker.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self
                .pending_worker
                .as_ref()
                .and_then(DetectionWorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                // The record itself follows as `Complete`
                DetectionProgress::Stage(SubmissionStage::Complete) => {}
                DetectionProgress::Stage(stage) => self.set_detection_stage(stage),
                DetectionProgress::Complete(record) => {
                    self.detection_state = DetectionState::Complete {
                        record,
                        archived: None,
                    };
                    self.stage_started_at = None;
                    self.update_dashboard_state();
                }
                DetectionProgress::Archived(ok) => {
                    if let DetectionState::Complete { archived, .. } = &mut self.detection_state {
                        *archived = Some(ok);
                    }
                    self.pending_worker = None;
                    break;
                }
                DetectionProgress::Error(message) => {
                    self.detection_state = DetectionState::Error { message };
                    self.pending_worker = None;
                    self.stage_started_at = None;
                    self.update_dashboard_state();
                    break;
                }
            }
        }
    }

    fn set_detection_stage(&mut self, stage: SubmissionStage) {
        let current = match &self.detection_state {
            DetectionState::Running { progress, .. } => *progress,
            _ => 0.0,
        };

        self.stage_started_at = Some(Instant::now());
        self.detection_state = DetectionState::Running {
            stage,
            progress: current.max(stage.progress()),
        };
    }

    fn tick_detection_progress(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }
        let DetectionState::Running { stage, progress } = &self.detection_state else {
            return;
        };
        let (stage, current) = (*stage, *progress);
        let Some(started_at) = self.stage_started_at else {
            return;
        };

        let elapsed = Instant::now()
            .saturating_duration_since(started_at)
            .as_secs_f64();
        let tau = match stage {
            SubmissionStage::Validating => 0.5,
            SubmissionStage::Analyzing => 6.0,
            SubmissionStage::Saving => 1.5,
            SubmissionStage::Complete => 0.1,
        };

        // Monotonic approach toward the stage ceiling
        let (floor, ceiling) = (stage.progress(), stage.ceiling());
        let k = 1.0 - (-elapsed / tau).exp();
        let desired = floor + (ceiling - floor) * k;

        self.detection_state = DetectionState::Running {
            stage,
            progress: desired.max(current).min(ceiling),
        };
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::NewDetection => self.handle_form_key(key),
            Screen::Detection => self.handle_detection_key(key),
            Screen::Statistics => self.handle_statistics_key(key),
            Screen::Records => self.handle_records_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        if let Some(draft) = self.dashboard_state.feedback.as_mut() {
            match key {
                KeyCode::Esc => self.dashboard_state.feedback = None,
                KeyCode::Enter => self.submit_feedback(),
                KeyCode::Backspace => draft.delete_char(),
                KeyCode::Char(c) => draft.input_char(c),
                _ => {}
            }
            return;
        }

        self.dashboard_state.notice = None;
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.open_statistics(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.open_records(),
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.dashboard_state.feedback = Some(FeedbackDraft::default());
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.toggle_session(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle_option(false),
            KeyCode::Right => self.form_state.cycle_option(true),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_detection_key(&mut self, key: KeyCode) {
        match &self.detection_state {
            DetectionState::Complete { .. } => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.update_dashboard_state();
                    self.screen = Screen::Dashboard;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
                KeyCode::Char('s') | KeyCode::Char('S') => self.open_statistics(),
                _ => {}
            },
            DetectionState::Error { .. } => match key {
                KeyCode::Enter => self.screen = Screen::NewDetection,
                KeyCode::Esc => self.screen = Screen::Dashboard,
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_statistics_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Char('t') | KeyCode::Char('T') => self.statistics_state.next_range(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.load_statistics(),
            _ => {}
        }
    }

    fn handle_records_key(&mut self, key: KeyCode) {
        if self.records_state.editing_query {
            match key {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.records_state.filter.patient_query.push(c);
                }
                KeyCode::Backspace => {
                    self.records_state.filter.patient_query.pop();
                }
                KeyCode::Enter => {
                    self.records_state.editing_query = false;
                    self.reload_records();
                }
                KeyCode::Esc => {
                    self.records_state.editing_query = false;
                    self.records_state.filter.patient_query.clear();
                    self.reload_records();
                }
                _ => {}
            }
            return;
        }

        self.records_state.status = None;
        let admin = self.records_state.admin;
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Up => self.records_state.select_prev(),
            KeyCode::Down => self.records_state.select_next(),
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.records_state.filter.cycle_outcome();
                self.reload_records();
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.records_state.filter.range = self.records_state.filter.range.next();
                self.reload_records();
            }
            KeyCode::Char('/') => self.records_state.editing_query = true,
            KeyCode::Char('p') | KeyCode::Char('P') if admin => {
                self.records_state.cycle_province(&self.table);
                self.reload_records();
            }
            KeyCode::Char('d') | KeyCode::Char('D') if admin => {
                self.records_state.cycle_district(&self.table);
                self.reload_records();
            }
            KeyCode::Delete => {
                self.records_state.clear_filter();
                self.reload_records();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.export_records(ExportFormat::Csv),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_records(ExportFormat::Xls),
            _ => {}
        }
    }

    fn open_form(&mut self) {
        self.form_state.clear_sample();
        if self.form_state.cascade().selection().province.is_none() {
            self.form_state.focus = FormField::Province;
        }
        self.screen = Screen::NewDetection;
    }

    fn submit_form(&mut self) {
        match self.form_state.to_submission() {
            Ok((path, location)) => {
                self.screen = Screen::Detection;
                self.detection_state = DetectionState::Running {
                    stage: SubmissionStage::Validating,
                    progress: 0.0,
                };
                self.stage_started_at = Some(Instant::now());

                let worker =
                    DetectionWorker::spawn(Arc::clone(&self.detection_service), path, location);
                self.pending_worker = Some(worker);

                // The location stays selected for the next sample
                self.form_state.clear_sample();
            }
            Err(message) => self.form_state.error_message = Some(message),
        }
    }

    fn open_statistics(&mut self) {
        self.load_statistics();
        self.screen = Screen::Statistics;
    }

    fn load_statistics(&mut self) {
        self.statistics_state.reports = self.statistics_service.reports();
        self.statistics_state.districts = self.statistics_service.district_stats();
    }

    fn open_records(&mut self) {
        self.records_state.admin = self.activity.is_admin();
        if !self.records_state.admin {
            self.records_state.filter.province = None;
            self.records_state.filter.district = None;
        }
        self.records_state.status = None;
        self.reload_records();
        self.screen = Screen::Records;
    }

    fn reload_records(&mut self) {
        let records = self.browser.list(&self.records_state.filter);
        self.records_state.set_records(records, self.browser.count());
    }

    fn export_records(&mut self, format: ExportFormat) {
        let result = export_to_dir(&self.records_state.records, format, &self.config.export_dir);
        self.records_state.status = Some(match result {
            Ok(path) => {
                self.activity.log(
                    LogLevel::Info,
                    "records_exported",
                    format!(
                        "{} records to {}",
                        self.records_state.records.len(),
                        format.extension()
                    ),
                );
                format!("Exported to {}", path.display())
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.activity
                    .log(LogLevel::Error, "export_failed", e.to_string());
                format!("Export failed: {e}")
            }
        });
    }

    fn submit_feedback(&mut self) {
        let Some(draft) = self.dashboard_state.feedback.take() else {
            return;
        };
        let rating = draft.rating.unwrap_or(0);
        match self.activity.submit_feedback(rating, "general", &draft.message) {
            Ok(_) => {
                self.dashboard_state.notice = Some("Thank you for the feedback".to_string());
                self.update_dashboard_state();
            }
            Err(e) => {
                self.dashboard_state.notice = Some(e.user_message());
                self.dashboard_state.feedback = Some(draft);
            }
        }
    }

    fn sign_in_default(&mut self) {
        let cfg = &self.config;
        if let Err(e) = self
            .activity
            .sign_in(&cfg.user_name, &cfg.user_email, cfg.user_role)
        {
            tracing::error!("Default sign-in failed: {}", e);
            self.dashboard_state.notice = Some(e.user_message());
        }
    }

    fn toggle_session(&mut self) {
        if self.activity.current_user().is_some() {
            if let Err(e) = self.activity.sign_out() {
                tracing::error!("Sign-out failed: {}", e);
                self.dashboard_state.notice = Some(e.user_message());
            }
        } else {
            self.sign_in_default();
        }
        self.update_dashboard_state();
    }

    fn update_dashboard_state(&mut self) {
        let positive = DetectionFilter {
            outcome: Some(DetectionOutcome::Positive),
            ..DetectionFilter::default()
        };

        self.dashboard_state.user = self.activity.current_user();
        self.dashboard_state.stored_detections = self.browser.count();
        self.dashboard_state.positive_detections = self.browser.list(&positive).len();
        self.dashboard_state.recent_logs = self.activity.recent_logs(DASHBOARD_LOG_LINES);
    }
}
