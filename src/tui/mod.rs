//! Ratatui-based terminal UI.
//!
//! The TUI shows the application form, submits it through the
//! `SubmissionController`, and renders the returned assessment with a
//! semicircular risk gauge. The HTTP request runs on a worker thread; its
//! outcome comes back over a channel and is applied on the UI thread.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::debug;

use crate::config::AppConfig;
use crate::data::{RawResponse, ScoringClient, ScoringTransport, TransportError};
use crate::domain::{FieldKey, InputKind, Section};
use crate::error::AppError;
use crate::report::{CategoryColor, DisplayModel, present};
use crate::workflow::{SubmissionController, SubmissionStatus};

mod gauge_chart;

use gauge_chart::RiskGaugeChart;

type SharedTransport = Arc<dyn ScoringTransport + Send + Sync>;
type Completion = (u64, Result<RawResponse, TransportError>);

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Start the TUI.
pub fn run(config: &AppConfig) -> Result<(), AppError> {
    let client = ScoringClient::new(&config.scoring)?;
    let mut app = App::new(Arc::new(client), config.scoring.docs_url());

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// A row of the form list: section headers are not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormRow {
    Header(Section),
    Field(FieldKey),
}

struct App {
    controller: SubmissionController,
    transport: SharedTransport,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
    selected: usize,
    docs_url: String,
    tick: usize,
}

impl App {
    fn new(transport: SharedTransport, docs_url: String) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            controller: SubmissionController::new(),
            transport,
            completions_tx,
            completions_rx,
            selected: 0,
            docs_url,
            tick: 0,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_completions() {
                needs_redraw = true;
            }
            if self.controller.store().is_pending() {
                self.tick = self.tick.wrapping_add(1);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply finished requests. Returns `true` if the store changed.
    fn drain_completions(&mut self) -> bool {
        let mut changed = false;
        while let Ok((attempt, outcome)) = self.completions_rx.try_recv() {
            changed |= self.controller.complete(attempt, outcome);
        }
        changed
    }

    /// Handle one key press. Returns `true` to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('n') if ctrl => {
                self.reset();
                return false;
            }
            _ => {}
        }

        if self.controller.store().result().is_some() {
            return self.handle_result_key(key.code);
        }
        self.handle_form_key(key.code)
    }

    fn handle_result_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('n') | KeyCode::Enter => self.reset(),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) -> bool {
        let key = FieldKey::ALL[self.selected];
        match code {
            KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::BackTab => {
                self.selected = self.selected.checked_sub(1).unwrap_or(FieldKey::COUNT - 1);
            }
            KeyCode::Down | KeyCode::Tab => {
                self.selected = (self.selected + 1) % FieldKey::COUNT;
            }
            KeyCode::Left => self.cycle_choice(key, -1),
            KeyCode::Right => self.cycle_choice(key, 1),
            KeyCode::Backspace => {
                if key.spec().input == InputKind::Numeric {
                    self.controller.field_mut(key).pop();
                }
            }
            KeyCode::Char(c) => {
                if key.spec().input == InputKind::Numeric && !c.is_control() {
                    self.controller.field_mut(key).push(c);
                }
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
        false
    }

    fn cycle_choice(&mut self, key: FieldKey, delta: i32) {
        let current = self.controller.store().form().get(key);
        let next = if delta >= 0 {
            key.next_choice(current)
        } else {
            key.prev_choice(current)
        };
        if let Some(value) = next {
            self.controller.set_field(key, value);
        }
    }

    fn submit(&mut self) {
        let Some(submission) = self.controller.begin_submit() else {
            return;
        };
        let transport = Arc::clone(&self.transport);
        let tx = self.completions_tx.clone();
        thread::spawn(move || {
            let outcome = transport.post_score(&submission.request);
            if tx.send((submission.attempt, outcome)).is_err() {
                debug!(attempt = submission.attempt, "UI closed before scoring finished");
            }
        });
    }

    fn reset(&mut self) {
        self.controller.reset();
        self.selected = 0;
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.controller.store().result() {
            Some(result) => {
                let model = present(result);
                self.draw_result(frame, chunks[1], &model);
            }
            None => self.draw_form(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("CREDIT", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("RISK", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(
                "AI-Powered Loan Assessment System",
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let store = self.controller.store();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let alert = match store.error() {
            Some(message) => Paragraph::new(Line::from(vec![
                Span::styled("⚠ ", Style::default().fg(Color::Red)),
                Span::styled(message, Style::default().fg(Color::Red)),
            ]))
            .wrap(Wrap { trim: true }),
            None => Paragraph::new("Enter applicant details for instant risk analysis")
                .style(Style::default().fg(Color::Gray)),
        };
        frame.render_widget(
            alert.block(Block::default().title("Loan Application Assessment").borders(Borders::ALL)),
            chunks[0],
        );

        let rows = form_rows();
        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| match row {
                FormRow::Header(section) => ListItem::new(Line::from(Span::styled(
                    section.title(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))),
                FormRow::Field(key) => ListItem::new(field_line(*key, store.form().get(*key))),
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(row_index(&rows, FieldKey::ALL[self.selected]));
        frame.render_stateful_widget(list, chunks[1], &mut state);

        let button = if store.is_pending() {
            Paragraph::new(format!("{} Analyzing...", SPINNER[self.tick % SPINNER.len()]))
                .style(Style::default().fg(Color::Yellow))
        } else {
            Paragraph::new("⚡ Calculate Risk Score  [Enter]")
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        };
        frame.render_widget(
            button.alignment(Alignment::Center).block(Block::default().borders(Borders::ALL)),
            chunks[2],
        );
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.draw_score(frame, columns[0], model);
        self.draw_details(frame, columns[1], model);
    }

    fn draw_score(&self, frame: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel) {
        let color = ui_color(model.color);
        let block = Block::default().title("Risk Assessment Complete").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(
            RiskGaugeChart {
                fraction: model.gauge_fraction,
                color: model.color.rgb(),
            },
            chunks[0],
        );

        let score = Paragraph::new(Line::from(vec![
            Span::styled(&model.score, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("/100", Style::default().fg(Color::Gray)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(score, chunks[1]);

        let badge = Paragraph::new(model.badge.as_str())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(badge, chunks[2]);

        let rec = Paragraph::new(Line::from(vec![
            Span::styled("Recommendation: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(&model.recommendation, recommendation_style(model)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(rec, chunks[3]);

        let confidence = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(model.confidence_fraction)
            .label(format!("Confidence {}", model.confidence_pct));
        frame.render_widget(confidence, chunks[5]);
    }

    fn draw_details(&self, frame: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(factor_rows(model.positive_factors.len())),
                Constraint::Length(factor_rows(model.negative_factors.len())),
                Constraint::Min(4),
            ])
            .split(area);

        let ratios = Paragraph::new(vec![
            Line::from(format!("Debt-to-Income   {}", model.debt_to_income)),
            Line::from(format!("Loan-to-Income   {}", model.loan_to_income)),
        ])
        .block(Block::default().title("Financial Ratios").borders(Borders::ALL));
        frame.render_widget(ratios, chunks[0]);

        frame.render_widget(
            factor_list("✅ Positive Factors", &model.positive_factors, Color::Green),
            chunks[1],
        );
        frame.render_widget(
            factor_list("⚠ Risk Factors", &model.negative_factors, Color::Red),
            chunks[2],
        );

        let meta = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Application ID  ", Style::default().fg(Color::Gray)),
                Span::raw(&model.application_id),
            ]),
            Line::from(vec![
                Span::styled("Processed       ", Style::default().fg(Color::Gray)),
                Span::raw(&model.processed_at),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(meta, chunks[3]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.controller.store().status() {
            SubmissionStatus::Succeeded(_) => "n new assessment  q quit",
            _ => "↑/↓ select  type to edit  ←/→ choose  Enter submit  Ctrl-N reset  Esc quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(format!("API docs: {}", self.docs_url), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn form_rows() -> Vec<FormRow> {
    let mut rows = Vec::with_capacity(FieldKey::COUNT + 2);
    let mut current: Option<Section> = None;
    for key in FieldKey::ALL {
        let section = key.spec().section;
        if current != Some(section) {
            rows.push(FormRow::Header(section));
            current = Some(section);
        }
        rows.push(FormRow::Field(key));
    }
    rows
}

fn row_index(rows: &[FormRow], key: FieldKey) -> Option<usize> {
    rows.iter().position(|r| *r == FormRow::Field(key))
}

fn field_line(key: FieldKey, raw: &str) -> Line<'static> {
    let spec = key.spec();
    let label = Span::raw(format!("  {:<26}", spec.label));
    let value = match spec.input {
        InputKind::Numeric if raw.is_empty() => {
            Span::styled(spec.placeholder.to_string(), Style::default().fg(Color::DarkGray))
        }
        InputKind::Numeric => Span::raw(raw.to_string()),
        InputKind::Enumerated => {
            let shown = key.choice_label(raw).unwrap_or(raw);
            Span::raw(format!("‹ {shown} ›"))
        }
    };
    Line::from(vec![label, value])
}

fn factor_list<'a>(title: &'a str, factors: &'a [String], color: Color) -> List<'a> {
    let items: Vec<ListItem> = if factors.is_empty() {
        vec![ListItem::new(Span::styled("(none)", Style::default().fg(Color::DarkGray)))]
    } else {
        factors
            .iter()
            .map(|f| ListItem::new(Line::from(vec![Span::styled("• ", Style::default().fg(color)), Span::raw(f.as_str())])))
            .collect()
    };
    List::new(items).block(Block::default().title(title).borders(Borders::ALL))
}

/// Height of a bordered factor list; at least one row for the placeholder.
fn factor_rows(n: usize) -> u16 {
    u16::try_from(n.max(1)).unwrap_or(u16::MAX).saturating_add(2)
}

fn recommendation_style(model: &DisplayModel) -> Style {
    match model.recommendation_color {
        Some(color) => Style::default().fg(ui_color(color)).add_modifier(Modifier::BOLD),
        None => Style::default(),
    }
}

fn ui_color(color: CategoryColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}
