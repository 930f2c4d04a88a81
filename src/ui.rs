pub mod charting;

use std::cell::RefCell;
use std::rc::Rc;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::best::BestRecord;
use crate::engine::Engine;
use crate::events::{CharState, FinishPayload, SessionObserver, TickPayload, TokenState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
/// committed tokens kept visible to the left of the cursor
const TRAILING_TOKENS: usize = 3;
const PROMPT_LINES: u16 = 3;

pub const LEGEND: &str = "(tab) new / (f2) mode / (f3) time / (esc) quit";

/// What the screen has heard from the engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub last_tick: Option<TickPayload>,
    pub result: Option<FinishPayload>,
}

/// Observer feeding [`ScreenState`]; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct ScreenSink {
    state: Rc<RefCell<ScreenState>>,
}

impl ScreenSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ScreenState {
        self.state.borrow().clone()
    }
}

impl SessionObserver for ScreenSink {
    fn on_start(&mut self) {
        *self.state.borrow_mut() = ScreenState::default();
    }

    fn on_tick(&mut self, tick: &TickPayload) {
        self.state.borrow_mut().last_tick = Some(*tick);
    }

    fn on_finish(&mut self, result: &FinishPayload) {
        self.state.borrow_mut().result = Some(result.clone());
    }
}

/// Whole-screen widget for one frame
pub struct View<'a> {
    engine: &'a Engine,
    screen: &'a ScreenState,
}

impl<'a> View<'a> {
    pub fn new(engine: &'a Engine, screen: &'a ScreenState) -> Self {
        Self { engine, screen }
    }
}

impl Widget for View<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match (self.engine.session().is_finished(), &self.screen.result) {
            (true, Some(result)) => render_results(result, self.engine.best(), area, buf),
            _ => render_typing(self.engine, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn render_typing(engine: &Engine, area: Rect, buf: &mut Buffer) {
    let width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let padding = area.height.saturating_sub(PROMPT_LINES + 2) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(2),
            Constraint::Length(PROMPT_LINES),
            Constraint::Min(0),
        ])
        .split(area);

    let stats = engine.stats_snapshot();
    let header = if engine.session().is_idle() {
        format!("{}s   {}   start typing", engine.time_limit(), engine.mode())
    } else {
        format!("{}s   {} wpm   {}", stats.time_left, stats.wpm, engine.mode())
    };
    Paragraph::new(Span::styled(header, dim_bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let budget = width as usize * PROMPT_LINES as usize;
    Paragraph::new(Line::from(prompt_spans(engine, budget)))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);
}

/// Recent tokens, the active token and as many upcoming words as fit `budget` columns.
fn prompt_spans(engine: &Engine, budget: usize) -> Vec<Span<'static>> {
    let green = bold().fg(Color::Green);
    let red = bold().fg(Color::Red);

    let history = engine.token_history();
    let mut spans: Vec<Span> = history[history.len().saturating_sub(TRAILING_TOKENS)..]
        .iter()
        .map(|t| {
            let style = if t.is_exact_match { green } else { red };
            Span::styled(format!("{} ", t.typed), style)
        })
        .collect();

    spans.extend(token_spans(&engine.current_token_state()));
    spans.push(Span::raw(" "));

    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let mut remaining = budget.saturating_sub(used);
    let upcoming = engine
        .words()
        .iter()
        .skip(engine.current_index() + 1)
        .take_while(|w| {
            let needed = w.width() + 1;
            let fits = needed <= remaining;
            remaining = remaining.saturating_sub(needed);
            fits
        })
        .join(" ");
    spans.push(Span::styled(upcoming, dim_bold()));

    spans
}

fn token_spans(token: &TokenState) -> Vec<Span<'static>> {
    let target: Vec<char> = token.target.chars().collect();
    let typed: Vec<char> = token.typed.chars().collect();
    let cursor = typed.len();

    token
        .per_char
        .iter()
        .enumerate()
        .map(|(idx, state)| match state {
            CharState::Correct => Span::styled(target[idx].to_string(), bold().fg(Color::Green)),
            CharState::Incorrect => Span::styled(typed[idx].to_string(), bold().fg(Color::Red)),
            CharState::Extra => Span::styled(
                typed[idx].to_string(),
                bold().fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
            ),
            CharState::Pending if idx == cursor => Span::styled(
                target[idx].to_string(),
                dim_bold().add_modifier(Modifier::UNDERLINED),
            ),
            CharState::Pending => Span::styled(target[idx].to_string(), dim_bold()),
        })
        .collect()
}

fn render_results(result: &FinishPayload, best: BestRecord, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let (overall_duration, highest_wpm) = charting::compute_chart_params(&result.history);
    let points = charting::sample_points(&result.history);
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("samples")
                .bounds([0.0, overall_duration])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(overall_duration), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm.max(1.0)])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(highest_wpm), bold()),
                ]),
        )
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {} raw   {}% acc   {} sd   {}s {}",
            result.wpm,
            result.raw_speed,
            result.accuracy,
            result.consistency,
            result.elapsed,
            result.mode
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let best_line = if best.wpm > 0 && best.wpm == result.wpm {
        format!("new best: {} wpm", best.wpm)
    } else {
        format!("best: {} wpm   {}% acc", best.wpm, best.accuracy)
    };
    Paragraph::new(Span::styled(
        best_line,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        LEGEND,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[4], buf);
}
