//! Ratatui-based terminal UI.
//!
//! The TUI is the borrower form: a list of the 18 input fields on the left,
//! the prediction result on the right, and an optional sensitivity chart for
//! the selected field. Each prediction is one synchronous call against the
//! shared, read-only scoring context.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph},
    Terminal,
};

use crate::app::scoring::{ScoringContext, linspace};
use crate::domain::{
    BorrowerProfile, FORM_FIELDS, FieldKind, FieldValue, RiskLabel, ScoreResult, format_field_value,
};
use crate::error::{AppError, EXIT_RUNTIME};

mod sensitivity_chart;

use sensitivity_chart::SensitivityChart;

/// Points evaluated across a field's range for the sensitivity chart.
const SWEEP_POINTS: usize = 80;

/// Start the TUI.
pub fn run(ctx: &ScoringContext) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(ctx);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
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

/// Sensitivity curve for one field.
struct Sweep {
    field: usize,
    points: Vec<(f64, f64)>,
    current: Option<(f64, f64)>,
}

struct App<'a> {
    ctx: &'a ScoringContext,
    profile: BorrowerProfile,
    selected_field: usize,
    edit_buffer: Option<String>,
    status: String,
    result: Option<ScoreResult>,
    show_chart: bool,
    sweep: Option<Sweep>,
}

impl<'a> App<'a> {
    fn new(ctx: &'a ScoringContext) -> Self {
        Self {
            ctx,
            profile: BorrowerProfile::default(),
            selected_field: 0,
            edit_buffer: None,
            status: "Fill in borrower details, then press p to predict.".to_string(),
            result: None,
            show_chart: false,
            sweep: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.edit_buffer.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FORM_FIELDS.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::PageDown => self.adjust_field(-10),
            KeyCode::PageUp => self.adjust_field(10),
            KeyCode::Enter => match FORM_FIELDS[self.selected_field].kind {
                FieldKind::Numeric(_) => {
                    self.edit_buffer = Some(String::new());
                    self.status = format!(
                        "Editing {}. Enter to apply, Esc to cancel.",
                        FORM_FIELDS[self.selected_field].label
                    );
                }
                FieldKind::Employment => self.adjust_field(1),
            },
            KeyCode::Char('p') | KeyCode::Char(' ') => self.predict(),
            KeyCode::Char('s') => {
                self.show_chart = !self.show_chart;
                if !self.show_chart {
                    self.sweep = None;
                }
            }
            KeyCode::Char('r') => {
                self.profile = BorrowerProfile::default();
                self.inputs_changed("Form reset to defaults.");
            }
            _ => {}
        }

        if self.show_chart {
            self.refresh_sweep();
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.edit_buffer.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.edit_buffer = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let text = buffer.trim().to_string();
                self.edit_buffer = None;
                self.apply_edit(&text);
                if self.show_chart {
                    self.refresh_sweep();
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' || c == '-' {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_edit(&mut self, text: &str) {
        if text.is_empty() {
            self.status = "Edit canceled.".to_string();
            return;
        }
        let value: f64 = match text.parse() {
            Ok(v) => v,
            Err(e) => {
                self.status = format!("Invalid number '{text}': {e}");
                return;
            }
        };
        let field = &FORM_FIELDS[self.selected_field];
        if let Some(stored) = self.profile.set_number(self.selected_field, value) {
            let msg = if stored == value {
                format!("{} = {}", field.label, text)
            } else {
                format!("{} clamped to {}", field.label, stored)
            };
            self.inputs_changed(&msg);
        }
    }

    fn adjust_field(&mut self, steps: i32) {
        let before = self.profile.value(self.selected_field);
        self.profile.step(self.selected_field, steps);
        if self.profile.value(self.selected_field) != before {
            let field = &FORM_FIELDS[self.selected_field];
            let shown = self
                .profile
                .value(self.selected_field)
                .map(|v| format_field_value(field, v))
                .unwrap_or_default();
            self.inputs_changed(&format!("{}: {}", field.label, shown));
        }
    }

    fn inputs_changed(&mut self, msg: &str) {
        self.result = None;
        self.status = format!("{msg} | press p to predict");
    }

    fn predict(&mut self) {
        let request = self.profile.to_request();
        match self.ctx.score(&request) {
            Ok(result) => {
                log::info!(
                    "prediction: p={:.4} threshold={} -> {}",
                    result.probability,
                    self.ctx.threshold().value(),
                    result.label.as_str()
                );
                self.status = format!("Predicted: {}", result.label.category());
                self.result = Some(result);
            }
            Err(err) => {
                // Rejected requests stay inside the UI; the process keeps running.
                log::warn!("request rejected: {err}");
                self.result = None;
                self.status = format!("Request rejected: {err}");
            }
        }
    }

    fn refresh_sweep(&mut self) {
        let idx = self.selected_field;
        let field = &FORM_FIELDS[idx];
        let FieldKind::Numeric(range) = field.kind else {
            self.sweep = None;
            return;
        };

        let request = self.profile.to_request();
        let xs = linspace(range.min, range.max, SWEEP_POINTS);
        match self.ctx.sweep(&request, field.name, &xs) {
            Ok(points) => {
                let current = match (self.profile.value(idx), self.ctx.score(&request)) {
                    (Some(FieldValue::Number(v)), Ok(r)) => Some((v, r.probability)),
                    _ => None,
                };
                self.sweep = Some(Sweep {
                    field: idx,
                    points,
                    current,
                });
            }
            Err(err) => {
                log::warn!("sensitivity sweep failed: {err}");
                self.sweep = None;
                self.status = format!("Sweep failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let clf = self.ctx.classifier();
        let lines = vec![
            Line::from(vec![
                Span::styled("ldr", Style::default().fg(Color::Cyan)),
                Span::raw(" - Loan Default Prediction"),
            ]),
            Line::from(Span::styled(
                format!(
                    "model: {} ({}) | threshold: {}",
                    clf.name(),
                    clf.estimator_kind(),
                    self.ctx.threshold().value()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_form(frame, cols[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(cols[1]);

        self.draw_result(frame, rows[0]);
        self.draw_chart(frame, rows[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = FORM_FIELDS
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let value = match (&self.edit_buffer, idx == self.selected_field) {
                    (Some(buffer), true) => format!("{buffer}_"),
                    _ => self
                        .profile
                        .value(idx)
                        .map(|v| format_field_value(field, v))
                        .unwrap_or_default(),
                };
                ListItem::new(format!("{:<34} {}", field.label, value))
            })
            .collect();

        let highlight = if self.edit_buffer.is_some() {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Black).bg(Color::White)
        };

        let list = List::new(items)
            .block(Block::default().title("Customer Input Details").borders(Borders::ALL))
            .highlight_style(highlight)
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction Result").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(result) = &self.result else {
            let msg = Paragraph::new("No prediction yet. Press p to predict.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let color = risk_color(result.label);
        let lines = vec![
            Line::from(format!("Probability of Default: {:.4}", result.probability)),
            Line::from(format!("Threshold Used: {}", self.ctx.threshold().value())),
            Line::from(Span::styled(
                crate::report::decision_banner(result),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Risk Category: {}", result.label.category())),
        ];

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(Paragraph::new(Text::from(lines)), rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(result.probability.clamp(0.0, 1.0))
            .label(format!("{:.1}%", result.probability * 100.0));
        frame.render_widget(gauge, rows[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match &self.sweep {
            Some(sweep) => format!("Sensitivity: {}", FORM_FIELDS[sweep.field].label),
            None => "Sensitivity".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(sweep) = &self.sweep else {
            let hint = if self.show_chart {
                "Select a numeric field to see its sensitivity curve."
            } else {
                "Press s to show how the selected field moves the score."
            };
            frame.render_widget(Paragraph::new(hint).style(Style::default().fg(Color::Gray)), inner);
            return;
        };

        let FieldKind::Numeric(range) = FORM_FIELDS[sweep.field].kind else {
            return;
        };

        let widget = SensitivityChart {
            curve: &sweep.points,
            current: sweep.current,
            threshold: self.ctx.threshold().value(),
            x_bounds: [range.min, range.max],
            x_label: FORM_FIELDS[sweep.field].name,
            fmt_x: fmt_axis_x,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.edit_buffer.is_some() {
            "type a number  Enter apply  Esc cancel"
        } else {
            "↑/↓ select  ←/→ adjust  PgUp/PgDn ×10  Enter edit  p predict  s chart  r reset  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn risk_color(label: RiskLabel) -> Color {
    match label {
        RiskLabel::High => Color::Red,
        RiskLabel::Low => Color::Green,
    }
}

fn fmt_axis_x(v: f64) -> String {
    if v.abs() >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureSpec, Threshold, application_schema, field_index};
    use crate::models::Classifier;

    /// Probability rises linearly with the credit bureau score column.
    struct ByScore {
        schema: Vec<FeatureSpec>,
    }

    impl Classifier for ByScore {
        fn name(&self) -> &str {
            "by-score"
        }
        fn estimator_kind(&self) -> &'static str {
            "mock"
        }
        fn schema(&self) -> &[FeatureSpec] {
            &self.schema
        }
        fn predict_row(&self, row: &[f64]) -> f64 {
            // CNS score sits after the 5 leading numerics and the 2 one-hot columns.
            row[7] / 900.0
        }
    }

    fn context() -> ScoringContext {
        ScoringContext::new(
            Box::new(ByScore {
                schema: application_schema(),
            }),
            Threshold::new(0.5).unwrap(),
        )
    }

    #[test]
    fn predict_then_edit_clears_result() {
        let ctx = context();
        let mut app = App::new(&ctx);
        app.handle_key(KeyCode::Char('p'));
        let result = app.result.expect("scored");
        assert!((result.probability - 650.0 / 900.0).abs() < 1e-12);
        assert_eq!(result.label, RiskLabel::High);

        app.handle_key(KeyCode::Right);
        assert!(app.result.is_none());
    }

    #[test]
    fn typed_values_are_clamped() {
        let ctx = context();
        let mut app = App::new(&ctx);
        app.selected_field = field_index("PERFORM_CNS.SCORE").unwrap();
        app.handle_key(KeyCode::Enter);
        for c in "1200".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.profile.number("PERFORM_CNS.SCORE"), Some(900.0));
        assert!(app.status.contains("clamped"));
    }

    #[test]
    fn chart_follows_selected_numeric_field() {
        let ctx = context();
        let mut app = App::new(&ctx);
        app.selected_field = field_index("PERFORM_CNS.SCORE").unwrap();
        app.handle_key(KeyCode::Char('s'));
        let sweep = app.sweep.as_ref().expect("sweep");
        assert_eq!(sweep.points.len(), SWEEP_POINTS);
        assert_eq!(sweep.points.first().map(|p| p.1), Some(0.0));

        app.selected_field = field_index("Employment.Type").unwrap();
        app.handle_key(KeyCode::Char('x'));
        assert!(app.sweep.is_none());
    }

    #[test]
    fn quit_keys() {
        let ctx = context();
        let mut app = App::new(&ctx);
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
