//! Play a [`Game`] in the terminal.
//!
//! Each tile is drawn as a block filled with its average color and labelled with its origin
//! number. Arrow keys slide the neighbour of the blank, a left click moves the clicked tile.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use log::debug;

use crate::game::Game;
use crate::grid::GridSize;
use crate::puzzle::{MoveOutcome, Slide};
use crate::solver;

pub const CELL_WIDTH: u16 = 7;
pub const CELL_HEIGHT: u16 = 3;
const BOARD_LEFT: u16 = 2;
const BOARD_TOP: u16 = 2;

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Slide(Slide),
    Click(usize),
    Shuffle,
    Reset,
    Hint,
    Quit,
}

/// Translate a terminal event into a command, if it means anything on this board.
pub fn command_for(event: &Event, grid: GridSize) -> Option<Command> {
    match *event {
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => match code {
            KeyCode::Up | KeyCode::Char('w') => Some(Command::Slide(Slide::Up)),
            KeyCode::Down | KeyCode::Char('s') => Some(Command::Slide(Slide::Down)),
            KeyCode::Left | KeyCode::Char('a') => Some(Command::Slide(Slide::Left)),
            KeyCode::Right | KeyCode::Char('d') => Some(Command::Slide(Slide::Right)),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            KeyCode::Char('x') => Some(Command::Shuffle),
            KeyCode::Char('r') => Some(Command::Reset),
            KeyCode::Char('h') => Some(Command::Hint),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => position_at(column, row, grid).map(Command::Click),
        _ => None,
    }
}

/// Board position under the given terminal cell.
pub fn position_at(column: u16, row: u16, grid: GridSize) -> Option<usize> {
    let n = grid.get();
    let col = usize::from(column.checked_sub(BOARD_LEFT)? / CELL_WIDTH);
    let line = usize::from(row.checked_sub(BOARD_TOP)? / CELL_HEIGHT);
    if col < n && line < n {
        Some(grid.position(line, col))
    } else {
        None
    }
}

/// Restores the terminal when play ends, even on error.
struct RawScreen;

impl RawScreen {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for RawScreen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive loop until the player quits.
pub fn run(game: &mut Game) -> io::Result<()> {
    let _screen = RawScreen::enter()?;
    let mut stdout = io::stdout();
    let mut status =
        String::from("Arrows/WASD or click to move, h hint, x shuffle, r reset, q quit");

    loop {
        draw(&mut stdout, game, &status)?;

        let event = event::read()?;
        let Some(command) = command_for(&event, game.grid()) else {
            continue;
        };
        debug!("Command {command:?}");

        status = match command {
            Command::Quit => return Ok(()),
            Command::Slide(slide) => describe(game.slide(slide)),
            Command::Click(position) => describe(game.move_tile(position)),
            Command::Shuffle => {
                game.shuffle();
                String::from("Shuffled.")
            }
            Command::Reset => {
                game.reset();
                String::from("Reset to the solved picture.")
            }
            Command::Hint if !solver::hint_supported(game.grid()) => {
                String::from("Hints are only available up to 4x4.")
            }
            Command::Hint => match game.hint() {
                Ok(Some(slide)) => format!("Hint: slide {slide}."),
                Ok(None) => String::from("Already solved."),
                Err(e) => format!("No hint: {e}."),
            },
        };
    }
}

fn describe(outcome: MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Moved { solved: true } => String::from("Solved!"),
        MoveOutcome::Moved { solved: false } => String::new(),
        MoveOutcome::Illegal => String::from("That tile cannot move."),
    }
}

fn draw(out: &mut impl Write, game: &Game, status: &str) -> io::Result<()> {
    let view = game.view();
    let n = view.grid.get();
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        Print(format!("{} puzzle, {} moves", view.grid, view.moves))
    )?;

    for (position, tile) in view.tiles.iter().enumerate() {
        let rgb = tile.mean_color().0;
        let background = Color::Rgb {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        };
        let luminance =
            (299 * u32::from(rgb[0]) + 587 * u32::from(rgb[1]) + 114 * u32::from(rgb[2])) / 1000;
        let foreground = if luminance > 140 {
            Color::Black
        } else {
            Color::White
        };
        let label = if position == view.blank_position {
            String::new()
        } else {
            (tile.origin() + 1).to_string()
        };

        let left = BOARD_LEFT + (position % n) as u16 * CELL_WIDTH;
        let top = BOARD_TOP + (position / n) as u16 * CELL_HEIGHT;
        queue!(out, SetBackgroundColor(background), SetForegroundColor(foreground))?;
        for line in 0..CELL_HEIGHT {
            let text = if line == CELL_HEIGHT / 2 {
                format!("{:^width$}", label, width = usize::from(CELL_WIDTH - 1))
            } else {
                " ".repeat(usize::from(CELL_WIDTH - 1))
            };
            queue!(out, MoveTo(left, top + line), Print(text))?;
        }
        queue!(out, ResetColor)?;
    }

    let below = BOARD_TOP + n as u16 * CELL_HEIGHT + 1;
    let state = if view.solved { "solved" } else { "unsolved" };
    queue!(out, MoveTo(0, below), Print(format!("[{state}] {status}")))?;
    out.flush()
}
