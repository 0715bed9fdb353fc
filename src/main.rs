//! BerlBus cleaning - interactive terminal front end
//!
//! Pick areas of the bus, choose cleaning methods, confirm, and watch the
//! countdown run. The session itself lives in a `SessionRunner` task; this
//! binary only renders snapshots and forwards key presses as commands.
//!
//! Keyboard shortcuts:
//! - Up/Down: move the area cursor
//! - Enter/Space: focus the area under the cursor (top row = whole bus)
//! - 1-6: toggle a cleaning method for the focused area
//! - x: clear the area under the cursor
//! - X: clear all selections
//! - c: confirm and start cleaning
//! - s: skip the countdown
//! - r: reset (clean another bus)
//! - q: quit
//!
//! Usage:
//!   cargo run --bin berlbus-cleaning -- --config config/dev.toml

use berlbus_cleaning::domain::types::{format_clock, AREA_COUNT, WHOLE_BUS_NAME};
use berlbus_cleaning::domain::{AreaId, CleaningMethod, Command, Focus};
use berlbus_cleaning::infra::{logging, Config};
use berlbus_cleaning::services::{create_session_runner, CleaningSession, Phase, SessionSnapshot};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::info;

/// BerlBus cleaning - bus interior cleaning selector
#[derive(Parser, Debug)]
#[command(name = "berlbus-cleaning", version, about)]
struct Args {
    /// Path to TOML configuration file (default: $CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,
}

/// Rows in the area list: whole bus first, then every concrete area
const AREA_ROWS: usize = AREA_COUNT + 1;

/// What a key press asks for
#[derive(Debug, PartialEq)]
enum UiAction {
    Quit,
    CursorUp,
    CursorDown,
    Send(Command),
}

/// Area list row under the cursor
fn focus_at(cursor: usize) -> Option<Focus> {
    match cursor {
        0 => Some(Focus::WholeBus),
        n => AreaId::from_index(n - 1).map(Focus::Area),
    }
}

fn key_action(code: KeyCode, cursor: usize) -> Option<UiAction> {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => UiAction::Quit,
        KeyCode::Up | KeyCode::Char('k') => UiAction::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => UiAction::CursorDown,
        KeyCode::Enter | KeyCode::Char(' ') => match focus_at(cursor)? {
            Focus::WholeBus => UiAction::Send(Command::SelectWholeBus),
            Focus::Area(area) => UiAction::Send(Command::SelectArea(area)),
        },
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (c as usize) - ('1' as usize);
            UiAction::Send(Command::ToggleMethod(CleaningMethod::ALL[idx]))
        }
        KeyCode::Char('x') => match focus_at(cursor)? {
            Focus::WholeBus => UiAction::Send(Command::ClearAll),
            Focus::Area(area) => UiAction::Send(Command::Clear(area)),
        },
        KeyCode::Char('X') => UiAction::Send(Command::ClearAll),
        KeyCode::Char('c') => UiAction::Send(Command::Confirm),
        KeyCode::Char('s') => UiAction::Send(Command::Skip),
        KeyCode::Char('r') => UiAction::Send(Command::Reset),
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Drawing
// ============================================================================

fn draw_ui(f: &mut Frame, snapshot: &SessionSnapshot, cursor: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    draw_header(f, chunks[0], snapshot);
    match snapshot.phase {
        Phase::Selecting => draw_selecting(f, chunks[1], snapshot, cursor),
        Phase::Cleaning => draw_cleaning(f, chunks[1], snapshot),
        Phase::Complete => draw_complete(f, chunks[1], snapshot),
    }
    draw_help(f, chunks[2], snapshot.phase);
}

fn draw_header(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let phase_color = match snapshot.phase {
        Phase::Selecting => Color::Cyan,
        Phase::Cleaning => Color::Yellow,
        Phase::Complete => Color::Green,
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{:<10}", snapshot.phase.as_str().to_uppercase()),
            Style::default().fg(phase_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  Bus: {}  ", snapshot.bus_id)),
        Span::raw(format!("Areas: {}/{}  ", snapshot.selections.len(), AREA_COUNT)),
        Span::styled(
            format!("Total: {} min", snapshot.total_minutes),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .block(
        Block::default()
            .title(format!(" BerlBus Cleaning ({}) ", env!("GIT_HASH")))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn draw_selecting(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot, cursor: usize) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_areas(f, chunks[0], snapshot, cursor);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(chunks[1]);

    draw_methods(f, right[0], snapshot);
    draw_summary(f, right[1], snapshot);
}

fn draw_areas(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot, cursor: usize) {
    // keep the cursor visible in short terminals
    let visible = area.height.saturating_sub(2) as usize;
    let offset = (cursor + 1).saturating_sub(visible);

    let items: Vec<ListItem> = (0..AREA_ROWS)
        .skip(offset)
        .take(visible.max(1))
        .filter_map(|row| focus_at(row).map(|focus| (row, focus)))
        .map(|(row, focus)| {
            let prefix = if row == cursor { "▸ " } else { "  " };
            let focused = snapshot.focus == Some(focus);
            let (marker, detail) = match focus {
                Focus::WholeBus => {
                    let marker = if snapshot.whole_bus { "◆" } else { "◇" };
                    (marker, String::new())
                }
                Focus::Area(id) => match snapshot.selections.iter().find(|s| s.area == id) {
                    Some(sel) => ("●", format!(" {}m", sel.methods.total_minutes())),
                    None => ("·", String::new()),
                },
            };

            let style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if row == cursor {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };

            ListItem::new(format!("{}{} {}{}", prefix, marker, focus.name(), detail)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Areas (↑↓ move, Enter focus) ")
            .borders(Borders::ALL),
    );

    f.render_widget(list, area);
}

fn draw_methods(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let (title, lines) = match snapshot.focus {
        None => (
            " Cleaning Methods ".to_string(),
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Select an area or the whole bus to choose cleaning methods",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
        Some(focus) => {
            let mut lines: Vec<Line> = CleaningMethod::ALL
                .iter()
                .enumerate()
                .map(|(idx, method)| {
                    let checked = snapshot.focused_methods.contains(*method);
                    let (check, color) =
                        if checked { ("[x]", Color::Green) } else { ("[ ]", Color::DarkGray) };
                    Line::from(vec![
                        Span::raw(format!("{} ", idx + 1)),
                        Span::styled(check, Style::default().fg(color)),
                        Span::raw(format!(" {:<14}", method.name())),
                        Span::styled(
                            format!("{:>2} min  ", method.minutes()),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::styled(method.description(), Style::default().fg(Color::DarkGray)),
                    ])
                })
                .collect();
            if focus == Focus::WholeBus {
                lines.push(Line::from(Span::styled(
                    format!("These methods will be applied to all {} areas", AREA_COUNT),
                    Style::default().fg(Color::Red),
                )));
            }
            (format!(" Cleaning Methods - {} ", focus.name()), lines)
        }
    };

    let para = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    f.render_widget(para, area);
}

fn draw_summary(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let mut items: Vec<ListItem> = Vec::new();
    if snapshot.whole_bus {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{}: {}", WHOLE_BUS_NAME, method_names(snapshot.whole_bus_methods.iter())),
            Style::default().fg(Color::Cyan),
        ))));
    } else {
        for selection in &snapshot.selections {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<26}", selection.area.name()),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    method_names(selection.methods.iter()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));
        }
    }
    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            "No areas selected",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let hint = if snapshot.phase == Phase::Selecting { " (c=start cleaning)" } else { "" };
    let list = List::new(items).block(
        Block::default()
            .title(format!(
                " Summary - {} area(s), {} min{} ",
                snapshot.selections.len(),
                snapshot.total_minutes,
                hint
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(list, area);
}

fn method_names(methods: impl Iterator<Item = CleaningMethod>) -> String {
    methods.map(|m| m.name()).collect::<Vec<_>>().join(", ")
}

fn draw_cleaning(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let total_seconds = snapshot.total_minutes.saturating_mul(60).max(1);
    let done = total_seconds.saturating_sub(snapshot.remaining_seconds);
    let ratio = (done as f64 / total_seconds as f64).clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(Block::default().title(" Cleaning in Progress ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, chunks[0]);

    let clock = Paragraph::new(vec![
        Line::from(Span::styled(
            format_clock(snapshot.remaining_seconds),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
        Line::from("Remaining"),
        Line::from(""),
        Line::from(Span::styled(
            format!("Total time: {}", format_clock(snapshot.total_minutes.saturating_mul(60))),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(clock, chunks[1]);

    draw_summary(f, chunks[2], snapshot);
}

fn draw_complete(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let found = snapshot.found_items.as_deref().unwrap_or_default();

    let mut lines = vec![
        Line::from(Span::styled(
            "The bus is now clean!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "All selected areas have been cleaned successfully. A total of {} items has been found.",
            found.len()
        )),
    ];
    if !found.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from("The items are:"));
        lines.extend(found.iter().map(|item| Line::from(format!("  • {}", item))));
    }
    if let Some(at) = &snapshot.completed_at {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Finished {}", at),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let para = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Complete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(para, area);
}

fn draw_help(f: &mut Frame, area: Rect, phase: Phase) {
    let help_text = match phase {
        Phase::Selecting => {
            "↑↓=move  Enter=focus  1-6=toggle method  x=clear area  X=clear all  c=confirm  q=quit"
        }
        Phase::Cleaning => "s=skip countdown  r=reset  q=quit",
        Phase::Complete => "r=clean another bus  q=quit",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, area);
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref());

    logging::init_file(&config)?;
    info!(
        config_file = %config.config_file(),
        bus_id = %config.bus_id(),
        tick_interval_ms = %config.tick_interval_ms(),
        git_hash = %env!("GIT_HASH"),
        "berlbus_cleaning_starting"
    );

    let session = CleaningSession::new(&config);
    let (cmd_tx, snapshot_rx, runner) = create_session_runner(session, config.tick_interval(), 64);
    let runner_handle = tokio::spawn(runner.run());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let poll_rate = Duration::from_millis(50);
    let mut cursor = 0usize;

    let result = async {
        loop {
            {
                let snapshot = snapshot_rx.borrow().clone();
                terminal.draw(|f| draw_ui(f, &snapshot, cursor))?;
            }

            if !event::poll(poll_rate)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key_action(key.code, cursor) {
                Some(UiAction::Quit) => break,
                Some(UiAction::CursorUp) => cursor = cursor.saturating_sub(1),
                Some(UiAction::CursorDown) => cursor = (cursor + 1).min(AREA_ROWS - 1),
                Some(UiAction::Send(cmd)) => {
                    if matches!(cmd, Command::Reset) {
                        cursor = 0;
                    }
                    cmd_tx.send(cmd).await?;
                }
                None => {}
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(cmd_tx);
    let session = runner_handle.await?;
    info!(session_id = %session.session_id(), phase = %session.phase(), "berlbus_cleaning_stopped");

    result
}
