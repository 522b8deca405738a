//! Terminal dashboards for claimers, police and insurers.
//!
//! One role per session: a record list on the left, the selected record's
//! details on the right, a live dispatch timeline under it and the action
//! log at the bottom. Action keys only log the requested status change.
//!
//! Launch with `autoclaim-connector console --role <role>`.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};

use autoclaim_protocol::{
    InsuranceClaim, MediaCapture, PoliceReport, Priority, Role, StepStatus, Submission,
};
use autoclaim_state::{
    format_elapsed, ActionRecord, DashboardRecord, DashboardView, DraftClaim, Fixtures,
    PinDropPicker, StateError, TimelinePreset,
};

use crate::dispatch::{DispatchRegistry, DispatchTicket};

const MAX_CONSOLE_MESSAGES: usize = 500;

/// Extra per-record data the console shows beyond [`DashboardRecord`].
trait ConsoleRecord: DashboardRecord {
    fn token(&self) -> Option<&str>;
    fn priority(&self) -> Option<Priority>;
    fn detail(&self) -> Vec<(&'static str, String)>;
}

impl ConsoleRecord for Submission {
    fn token(&self) -> Option<&str> {
        self.token_id.as_deref()
    }

    fn priority(&self) -> Option<Priority> {
        None
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Submission", format!("#{}", self.submission_no)),
            ("Date", self.date.clone()),
            ("Status", self.status.to_string()),
            ("Location", self.location.address.clone()),
            ("Description", self.description.clone()),
            (
                "Media",
                format!(
                    "{} images, {} videos, {} voice",
                    self.media.images.len(),
                    self.media.videos.len(),
                    self.media.voice.len()
                ),
            ),
        ]
    }
}

impl ConsoleRecord for PoliceReport {
    fn token(&self) -> Option<&str> {
        Some(&self.token_id)
    }

    fn priority(&self) -> Option<Priority> {
        Some(self.priority)
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Token", self.token_id.clone()),
            ("Submitted", self.submission_date.clone()),
            ("Location", self.location.address.clone()),
            ("Reporter", format!("{} ({})", self.claimer.name, self.claimer.contact)),
            ("Incident", format!("{} at {}", self.incident.description, self.incident.time)),
            ("Damage", self.incident.damage.clone()),
            ("Footage", self.incident.webcam_source.clone()),
        ];
        if let Some(suspect) = &self.suspect {
            lines.push(("Suspect", format!("{}, plate {}", suspect.vehicle, suspect.plate)));
        }
        lines.push(("AI summary", self.incident.ai_summary.clone()));
        lines
    }
}

impl ConsoleRecord for InsuranceClaim {
    fn token(&self) -> Option<&str> {
        Some(&self.police_report.token_id)
    }

    fn priority(&self) -> Option<Priority> {
        Some(self.priority)
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        let v = &self.vehicle;
        let mut lines = vec![
            ("Claim", self.claim_number.clone()),
            ("Type", format!("{} / {}", self.claim_type, self.severity)),
            ("Vehicle", format!("{} {} {} ({})", v.color, v.make, v.model, v.registration)),
            ("Claimer", format!("{} ({})", self.claimer.name, self.claimer.contact)),
            ("Location", self.location.address.clone()),
            ("Police report", format!("{} {}", self.police_report.token_id, self.police_report.status)),
        ];
        for c in &self.repair_estimate.components {
            lines.push(("Repair", format!("{}: RM {} ({})", c.component, c.cost, c.description)));
        }
        lines.push((
            "Estimate",
            format!(
                "RM {} | {}",
                self.repair_estimate.total, self.repair_estimate.workshop_quote
            ),
        ));
        lines
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
    StartDispatch(String),
}

enum RoleView {
    Claimer(DashboardView<Submission>),
    Police(DashboardView<PoliceReport>),
    Insurance(DashboardView<InsuranceClaim>),
}

struct RecordRow {
    id: String,
    title: String,
    status: String,
    priority: Option<Priority>,
}

struct ConsoleSnapshot {
    rows: Vec<RecordRow>,
    selected: Option<usize>,
    detail: Vec<(&'static str, String)>,
    dispatch: Option<DispatchTicket>,
}

fn rows_of<R: ConsoleRecord>(view: &DashboardView<R>) -> Vec<RecordRow> {
    view.records()
        .iter()
        .map(|r| RecordRow {
            id: r.id().to_string(),
            title: r.title().to_string(),
            status: r.status().to_string(),
            priority: r.priority(),
        })
        .collect()
}

fn detail_of<R: ConsoleRecord>(view: &DashboardView<R>) -> Vec<(&'static str, String)> {
    view.selected().map(|r| r.detail()).unwrap_or_default()
}

fn selected_token<R: ConsoleRecord>(view: &DashboardView<R>) -> Option<String> {
    view.selected().and_then(|r| r.token()).map(str::to_string)
}

struct RoleConsole {
    view: RoleView,
    dispatch: DispatchRegistry,
    dispatch_token: Option<String>,
    drafts_submitted: u32,
    console_messages: Vec<(chrono::DateTime<chrono::Utc>, String, Color)>,
}

impl RoleConsole {
    fn new(role: Role, fixtures: &Fixtures, dispatch: DispatchRegistry) -> Self {
        let view = match role {
            Role::Claimer => RoleView::Claimer(DashboardView::new(fixtures.submissions.clone())),
            Role::Police => RoleView::Police(DashboardView::new(fixtures.police_reports.clone())),
            Role::Insurance => {
                RoleView::Insurance(DashboardView::new(fixtures.insurance_claims.clone()))
            }
        };
        let mut console = Self {
            view,
            dispatch,
            dispatch_token: None,
            drafts_submitted: 0,
            console_messages: Vec::new(),
        };
        console.add_message(
            &format!("AutoClaim {role} dashboard ready."),
            Color::Cyan,
        );
        console.add_message(console.key_hint(), Color::DarkGray);
        console
    }

    fn role(&self) -> Role {
        match &self.view {
            RoleView::Claimer(_) => Role::Claimer,
            RoleView::Police(_) => Role::Police,
            RoleView::Insurance(_) => Role::Insurance,
        }
    }

    fn key_hint(&self) -> &'static str {
        match &self.view {
            RoleView::Claimer(_) => "Keys: Up/Down select | n submit demo draft | d dispatch | q quit",
            RoleView::Police(_) => {
                "Keys: Up/Down select | v verify | c contact | f flag | d dispatch | q quit"
            }
            RoleView::Insurance(_) => {
                "Keys: Up/Down select | a approve | i request info | r reject | d dispatch | q quit"
            }
        }
    }

    fn action_count(&self) -> usize {
        match &self.view {
            RoleView::Claimer(v) => v.actions().len(),
            RoleView::Police(v) => v.actions().len(),
            RoleView::Insurance(v) => v.actions().len(),
        }
    }

    async fn snapshot(&self) -> ConsoleSnapshot {
        let (rows, selected, detail) = match &self.view {
            RoleView::Claimer(v) => (rows_of(v), v.selected_index(), detail_of(v)),
            RoleView::Police(v) => (rows_of(v), v.selected_index(), detail_of(v)),
            RoleView::Insurance(v) => (rows_of(v), v.selected_index(), detail_of(v)),
        };
        let dispatch = match &self.dispatch_token {
            Some(token) => self.dispatch.ticket(token).await,
            None => None,
        };
        ConsoleSnapshot {
            rows,
            selected,
            detail,
            dispatch,
        }
    }

    fn add_message(&mut self, msg: &str, color: Color) {
        self.console_messages
            .push((chrono::Utc::now(), msg.to_string(), color));
        if self.console_messages.len() > MAX_CONSOLE_MESSAGES {
            self.console_messages.remove(0);
        }
    }

    fn record_action(&mut self, result: Result<ActionRecord, StateError>) {
        match result {
            Ok(action) => self.add_message(
                &format!(
                    "{} -> {} requested (was {})",
                    action.record_id, action.requested_status, action.current_status
                ),
                Color::Green,
            ),
            Err(e) => self.add_message(&e.to_string(), Color::Red),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        match &mut self.view {
            RoleView::Claimer(v) => v.select_offset(delta),
            RoleView::Police(v) => v.select_offset(delta),
            RoleView::Insurance(v) => v.select_offset(delta),
        }
    }

    fn selected_id(&self) -> Option<String> {
        match &self.view {
            RoleView::Claimer(v) => v.selected().map(|r| r.id.clone()),
            RoleView::Police(v) => v.selected().map(|r| r.id.clone()),
            RoleView::Insurance(v) => v.selected().map(|r| r.id.clone()),
        }
    }

    fn dispatch_token_for_selection(&self) -> Option<String> {
        match &self.view {
            RoleView::Claimer(v) => selected_token(v),
            RoleView::Police(v) => selected_token(v),
            RoleView::Insurance(v) => selected_token(v),
        }
    }

    fn submit_demo_draft(&mut self) {
        let mut draft = DraftClaim::new();
        draft.set_title("Console draft");
        let mut picker = PinDropPicker::new();
        let (lat, lng) = picker.center();
        draft.set_location(picker.pick(lat, lng));
        let built = draft
            .set_description("Submitted from the terminal dashboard")
            .and_then(|_| draft.add_image("front", MediaCapture::new("front.jpg", "image/jpeg")));
        match built {
            Ok(()) => {
                self.drafts_submitted += 1;
                let submission = draft.submit(self.drafts_submitted);
                self.add_message(
                    &format!(
                        "Draft {} logged at {} ({} media files)",
                        submission.id,
                        submission.location.address,
                        submission.media.total()
                    ),
                    Color::Green,
                );
            }
            Err(e) => self.add_message(&e.to_string(), Color::Red),
        }
    }

    /// Apply a key press. Dispatch starts are returned to the caller since
    /// they need the async registry.
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return KeyOutcome::Quit,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return KeyOutcome::Quit,
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.move_selection(-1),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.move_selection(1),
            (KeyCode::Char('d'), _) => {
                return match self.dispatch_token_for_selection() {
                    Some(token) => KeyOutcome::StartDispatch(token),
                    None => {
                        self.add_message("Selected record has no claim token yet.", Color::Yellow);
                        KeyOutcome::Continue
                    }
                };
            }
            (KeyCode::Char(key), _) => self.role_action(key),
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn role_action(&mut self, key: char) {
        if key == 'n' && matches!(self.view, RoleView::Claimer(_)) {
            self.submit_demo_draft();
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let result = match (&mut self.view, key) {
            (RoleView::Police(v), 'v') => v.verify(&id),
            (RoleView::Police(v), 'c') => v.contact(&id),
            (RoleView::Police(v), 'f') => v.flag(&id),
            (RoleView::Insurance(v), 'a') => v.approve(&id),
            (RoleView::Insurance(v), 'i') => v.request_info(&id),
            (RoleView::Insurance(v), 'r') => v.reject(&id),
            _ => return,
        };
        self.record_action(result);
    }

    async fn start_dispatch(&mut self, token: String) {
        let ticket = self
            .dispatch
            .start_with_token(token, TimelinePreset::PostSubmission)
            .await;
        self.add_message(
            &format!("Dispatch timeline started for {}", ticket.token),
            Color::Cyan,
        );
        self.dispatch_token = Some(ticket.token);
    }

    // ── Rendering ───────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame, snapshot: &ConsoleSnapshot) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(8),
            ])
            .split(frame.area());

        self.render_status_bar(frame, outer[0], snapshot);
        self.render_main_area(frame, outer[1], snapshot);
        self.render_console_output(frame, outer[2]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let block = Block::default()
            .title(" AutoClaim Console ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let line = Line::from(vec![
            Span::styled("  Role: ", Style::default().fg(Color::Gray)),
            Span::styled(self.role().to_string(), Style::default().fg(Color::White)),
            Span::styled("  |  Records: ", Style::default().fg(Color::Gray)),
            Span::styled(snap.rows.len().to_string(), Style::default().fg(Color::Green)),
            Span::styled("  |  Actions logged: ", Style::default().fg(Color::Gray)),
            Span::styled(self.action_count().to_string(), Style::default().fg(Color::Magenta)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_main_area(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.render_records(frame, columns[0], snap);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(8)])
            .split(columns[1]);

        render_detail(frame, right[0], snap);
        render_dispatch(frame, right[1], snap);
    }

    fn render_records(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let block = Block::default()
            .title(format!(" {} ({}) ", list_title(self.role()), snap.rows.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let rows: Vec<Row> = snap
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let marker = if Some(i) == snap.selected { "> " } else { "  " };
                let style = if Some(i) == snap.selected {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(format!("{marker}{}", row.id)),
                    Cell::from(Span::styled(
                        row.status.clone(),
                        Style::default().fg(status_color(&row.status)),
                    )),
                    Cell::from(Span::styled(
                        row.priority.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                        Style::default().fg(priority_color(row.priority)),
                    )),
                    Cell::from(truncate(&row.title, 40)),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(11),
                Constraint::Length(7),
                Constraint::Min(10),
            ],
        )
        .block(block)
        .header(
            Row::new(vec!["  ID", "Status", "Prio", "Title"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        );
        frame.render_widget(table, area);
    }

    fn render_console_output(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Action Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let inner_height = area.height.saturating_sub(2) as usize;
        let start = self.console_messages.len().saturating_sub(inner_height);
        let lines: Vec<Line> = self.console_messages[start..]
            .iter()
            .map(|(ts, msg, color)| {
                Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", ts.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(msg.as_str(), Style::default().fg(*color)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn render_detail(frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    if snap.detail.is_empty() {
        let text = Paragraph::new(Line::from(Span::styled(
            "  Nothing selected.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(text, area);
        return;
    }

    let lines: Vec<Line> = snap
        .detail
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("  {label}: "), Style::default().fg(Color::Gray)),
                Span::styled(value.as_str(), Style::default().fg(Color::White)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_dispatch(frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
    let Some(ticket) = &snap.dispatch else {
        let block = Block::default()
            .title(" Dispatch ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightBlue));
        let text = Paragraph::new(Line::from(Span::styled(
            "  Press d to start the dispatch timeline for the selected record.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(text, area);
        return;
    };

    let timeline = &ticket.snapshot;
    let block = Block::default()
        .title(format!(
            " Dispatch {} ({})  {}  {}/{} ",
            ticket.token,
            preset_label(ticket.preset),
            format_elapsed(timeline.elapsed_secs),
            timeline.completed,
            timeline.total
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue));

    let lines: Vec<Line> = timeline
        .steps
        .iter()
        .map(|step| {
            let (icon, color) = match step.status {
                StepStatus::Completed => ("[x]", Color::Green),
                StepStatus::Processing => ("[~]", Color::Yellow),
                StepStatus::Pending => ("[ ]", Color::DarkGray),
            };
            let mut spans = vec![
                Span::styled(format!("  {icon} "), Style::default().fg(color)),
                Span::styled(step.title.as_str(), Style::default().fg(Color::White)),
                Span::styled(format!("  {}", step.token), Style::default().fg(Color::DarkGray)),
            ];
            if let Some(eta) = &step.eta {
                spans.push(Span::styled(format!("  ETA {eta}"), Style::default().fg(Color::Cyan)));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn preset_label(preset: TimelinePreset) -> &'static str {
    match preset {
        TimelinePreset::PostSubmission => "claim status",
        TimelinePreset::Dispatch => "emergency dispatch",
    }
}

fn list_title(role: Role) -> &'static str {
    match role {
        Role::Claimer => "My Submissions",
        Role::Police => "Incident Reports",
        Role::Insurance => "Claims",
    }
}

fn status_color(status: &str) -> Color {
    match status {
        "approved" | "verified" | "completed" => Color::Green,
        "pending" | "in-review" | "review" | "submitted" => Color::Yellow,
        "flagged" | "rejected" => Color::Red,
        "contacted" | "processing" => Color::Blue,
        _ => Color::Gray,
    }
}

fn priority_color(priority: Option<Priority>) -> Color {
    match priority {
        Some(Priority::High) => Color::Red,
        Some(Priority::Medium) => Color::Yellow,
        Some(Priority::Low) => Color::Green,
        None => Color::DarkGray,
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard console for `role` until the user quits.
pub async fn run_console(
    role: Role,
    fixtures: &Fixtures,
    dispatch: DispatchRegistry,
) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("Dashboard console requires a terminal (TTY)."));
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut console = RoleConsole::new(role, fixtures, dispatch);
    let tick_rate = Duration::from_millis(100);

    loop {
        let snapshot = console.snapshot().await;
        terminal.draw(|frame| console.render(frame, &snapshot))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    match console.handle_key(key_event.code, key_event.modifiers) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::StartDispatch(token) => console.start_dispatch(token).await,
                        KeyOutcome::Continue => {}
                    }
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclaim_state::ManualClock;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn console(role: Role) -> RoleConsole {
        let clock = ManualClock::new();
        let registry = DispatchRegistry::new(Arc::new(clock), Duration::from_millis(5), 2);
        RoleConsole::new(role, &Fixtures::demo(), registry)
    }

    fn press(console: &mut RoleConsole, c: char) -> KeyOutcome {
        console.handle_key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn police_keys_log_actions() {
        let mut c = console(Role::Police);
        press(&mut c, 'j');
        assert_eq!(c.selected_id().as_deref(), Some("report-002"));
        press(&mut c, 'v');
        press(&mut c, 'f');
        press(&mut c, 'a');
        assert_eq!(c.action_count(), 2);
        let last = &c.console_messages.last().unwrap().1;
        assert!(last.contains("report-002 -> flagged"));
    }

    #[tokio::test]
    async fn insurance_keys_map_to_statuses() {
        let mut c = console(Role::Insurance);
        press(&mut c, 'i');
        let last = &c.console_messages.last().unwrap().1;
        assert!(last.contains("claim-001 -> pending requested (was review)"));
    }

    #[tokio::test]
    async fn claimer_without_token_cannot_dispatch() {
        let mut c = console(Role::Claimer);
        press(&mut c, 'j');
        assert_eq!(press(&mut c, 'd'), KeyOutcome::Continue);
        press(&mut c, 'k');
        assert_eq!(
            press(&mut c, 'd'),
            KeyOutcome::StartDispatch("0x9e8e…5b52".into())
        );
    }

    #[tokio::test]
    async fn claimer_draft_submission_is_logged() {
        let mut c = console(Role::Claimer);
        press(&mut c, 'n');
        let last = &c.console_messages.last().unwrap().1;
        assert!(last.contains("draft-001"));
        assert!(last.contains("2.861422, 101.675189"));
    }

    #[tokio::test]
    async fn renders_with_dispatch_panel() {
        let mut c = console(Role::Police);
        c.start_dispatch("0xabc".into()).await;
        let snapshot = c.snapshot().await;
        assert!(snapshot.dispatch.is_some());

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| c.render(frame, &snapshot)).unwrap();
    }

    #[test]
    fn quit_keys() {
        let mut c = console(Role::Insurance);
        assert_eq!(press(&mut c, 'q'), KeyOutcome::Quit);
        assert_eq!(
            c.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyOutcome::Quit
        );
    }
}
