use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::Duration,
};

use tetris_engine::{
    color_of,
    game::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
    session::{SharedGame, Snapshot},
    Command, Game, GameEvent,
};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const INFO_WIDTH: u16 = 18;
const REDRAW_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Playfield width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
    /// Playfield height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,
    /// Milliseconds between automatic steps
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Parses `#rgb` or `#rrggbb`.
fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut it = digits.chars().map(|c| c.to_digit(16).map(|v| v as u8 * 17));
            Some(Color::Rgb(it.next()??, it.next()??, it.next()??))
        }
        6 => Some(Color::Rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

fn cell_color(cell: u8) -> Option<Color> {
    color_of(cell).and_then(parse_hex_color)
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, snapshot: &Snapshot, status: &str) {
    let area = frame.size();

    let grid_display_width = snapshot.state.width() as u16 * CELL_WIDTH + 2;
    let grid_display_height = snapshot.state.height() as u16 + 2;
    let main_area = centered_rect(grid_display_width + INFO_WIDTH, grid_display_height + 2, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(INFO_WIDTH),
    ])
    .split(vertical[0]);

    render_grid(frame, snapshot, horizontal[0]);
    render_info(frame, snapshot, status, horizontal[1]);

    let controls = Paragraph::new(Line::from(
        "←→: Move | ↑/↓: Rotate | Space: Drop | R: Restart | Q/ESC: Quit",
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(controls, vertical[1]);
}

fn render_grid(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .state
        .rows()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&cell| match cell_color(cell) {
                    Some(color) => Span::styled(BLOCK_CHAR, Style::default().fg(color)),
                    None => Span::raw(EMPTY_CHAR),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, snapshot: &Snapshot, status: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(snapshot.score.to_string()),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(snapshot.lines_cleared.to_string()),
        Line::from(""),
    ];
    if snapshot.over {
        lines.push(Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))));
        lines.push(Line::from(Span::styled(
            "R to restart",
            Style::default().fg(Color::DarkGray),
        )));
    } else if !status.is_empty() {
        lines.push(Line::from(Span::styled(status, Style::default().fg(Color::Green))));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Down => Some(Command::RotateCw),
        KeyCode::Up => Some(Command::RotateCcw),
        KeyCode::Char(' ') => Some(Command::Drop),
        _ => None,
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    game: &SharedGame,
    tick: Duration,
) -> anyhow::Result<()> {
    let mut ticker = game.spawn_ticker(tick);
    let mut status = String::new();

    loop {
        for event in game.take_events() {
            match event {
                GameEvent::LinesCleared(1) => status = "1 line!".to_owned(),
                GameEvent::LinesCleared(n) => status = format!("{n} lines!"),
                GameEvent::GameRestarted => status.clear(),
                _ => {}
            }
        }

        let snapshot = game.snapshot();
        terminal.draw(|frame| render(frame, &snapshot, &status))?;

        if !event::poll(REDRAW_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                ticker.stop();
                game.restart();
                ticker = game.spawn_ticker(tick);
            }
            code => {
                if let Some(command) = command_for(code) {
                    game.apply(command);
                }
            }
        }
    }

    ticker.stop();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let game = SharedGame::new(Game::try_new(args.width, args.height)?);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &game, Duration::from_millis(args.tick_ms));

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
