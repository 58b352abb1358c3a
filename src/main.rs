use std::{
    fs::File,
    io::{self, stdout, Stdout},
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
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

use falling_blocks::{
    audio::{signal_for, AudioSignal, AudioSink, Bell},
    config::Cli,
    input::map_key,
    CellState, Flow, Game, InputEvent, Snapshot,
};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const PREVIEW_COLS: usize = 5;
const PREVIEW_ROWS: usize = 4;
const FRAME_BUDGET: Duration = Duration::from_millis(16);

fn cell_color(color: falling_blocks::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, view: &Snapshot) {
    let area = frame.size();

    render_game(frame, view, area);
    if view.game_over {
        render_game_over(frame, view, area);
    } else if view.paused {
        render_paused(frame, area);
    }
}

fn render_game(frame: &mut Frame, view: &Snapshot, area: Rect) {
    let grid_display_width = (view.board.width() as u16 * CELL_WIDTH) + 2;
    let grid_display_height = view.board.height() as u16 + 2;
    let side_width = (PREVIEW_COLS as u16 * CELL_WIDTH) + 4;
    let total_width = grid_display_width + side_width;
    let total_height = grid_display_height + 2;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);
    let game_row = vertical[0];

    // Layout: [Grid][Next / Info / Controls]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(game_row);

    let side = Layout::vertical([
        Constraint::Length(PREVIEW_ROWS as u16 + 2),
        Constraint::Length(8),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    render_grid(frame, view, horizontal[0]);
    render_preview(frame, view, side[0]);
    render_info(frame, view, side[1]);
    render_controls(frame, view, side[2]);

    let hint_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 1,
    };
    if hint_area.y < area.y + area.height {
        let hint = Paragraph::new(Line::from("←→ Move | ↓ Drop | ↑ Rotate | Q/ESC Quit"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, hint_area);
    }
}

fn render_grid(frame: &mut Frame, view: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = view
        .visual_grid()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    CellState::Empty => Span::raw(EMPTY_CHAR),
                    CellState::Filled(color) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(cell_color(*color)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, view: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Center the piece inside the preview box
    let shape = &view.next.shape;
    let style = Style::default().fg(cell_color(view.next.color));
    let left = PREVIEW_COLS.saturating_sub(shape.cols()) / 2;
    let top = PREVIEW_ROWS.saturating_sub(shape.rows()) / 2;

    let lines: Vec<Line> = (0..PREVIEW_ROWS)
        .map(|y| {
            let spans: Vec<Span> = (0..PREVIEW_COLS)
                .map(|x| {
                    let filled = y >= top && x >= left && shape.is_filled(y - top, x - left);
                    if filled {
                        Span::styled(BLOCK_CHAR, style)
                    } else {
                        Span::raw(EMPTY_CHAR)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, view: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", view.score)),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", view.lines_cleared)),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(format!("{}", view.level)),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_controls(frame: &mut Frame, view: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Game ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(Span::styled(
            format!("P {}", if view.paused { "Resume" } else { "Pause" }),
            dim,
        )),
        Line::from(Span::styled("R Reset", dim)),
        Line::from(Span::styled(
            format!("S Sound {}", if view.sound_on { "ON" } else { "OFF" }),
            dim,
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_game_over(frame: &mut Frame, view: &Snapshot, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", view.score)),
        Line::from(format!("Lines: {}", view.lines_cleared)),
        Line::from(format!("Level: {}", view.level)),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to restart",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press Q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 12, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 10, area);
    frame.render_widget(paragraph, popup_area);
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

/// Waits up to `timeout` for the first key, then takes whatever else is
/// already queued without blocking.
fn drain_inputs(timeout: Duration) -> io::Result<Vec<InputEvent>> {
    let mut inputs = Vec::new();
    let mut wait = timeout;
    while event::poll(wait)? {
        if let Event::Key(key) = event::read()? {
            inputs.extend(map_key(key));
        }
        wait = Duration::ZERO;
    }
    Ok(inputs)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    game: &mut Game,
    audio: &mut dyn AudioSink,
) -> io::Result<()> {
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, &game.snapshot()))?;

        let inputs = drain_inputs(FRAME_BUDGET)?;
        let now = Instant::now();
        let flow = game.tick(now - last_frame, &inputs);
        last_frame = now;

        for event in game.take_events() {
            if let Some(signal) = signal_for(&event, game.sound_on) {
                audio.signal(signal);
            }
        }

        if flow == Flow::Quit {
            audio.signal(AudioSignal::Stop);
            return Ok(());
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    // stderr shares the terminal with the UI, so logs only go to a file
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut game = Game::new(cli.to_config()).context("invalid game configuration")?;
    let mut audio = Bell::new(stdout());

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let result = Terminal::new(backend)
        .and_then(|mut terminal| run(&mut terminal, &mut game, &mut audio));

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result.context("terminal i/o failed")
}
