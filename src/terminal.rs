use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use unicode_width::UnicodeWidthStr;

use crate::collectible::COLLECTIBLE_SYMBOL;
use crate::enemy::ENEMY_SYMBOL;
use crate::maze::Cell;
use crate::player::PLAYER_SYMBOL;
use crate::render::Frame;
use crate::shell::Console;

/// Raw-mode, alternate-screen console on stdout.
pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    pub fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(Hide)?;
        Ok(Self { stdout })
    }

    pub fn restore(mut self) -> io::Result<()> {
        self.stdout.execute(Show)?;
        self.stdout.execute(LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}

fn key_char(event: Event) -> Option<char> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char(ch) => Some(ch),
            KeyCode::Esc => Some('q'),
            _ => None,
        },
        _ => None,
    }
}

fn glyph_color(ch: char) -> Color {
    match ch {
        PLAYER_SYMBOL => Color::Yellow,
        ENEMY_SYMBOL => Color::Red,
        COLLECTIBLE_SYMBOL => Color::Magenta,
        ch if ch == Cell::Wall.symbol() => Color::Blue,
        ch if ch == Cell::Exit.symbol() => Color::Green,
        _ => Color::Reset,
    }
}

impl Console for Terminal {
    fn poll_key(&mut self) -> io::Result<Option<char>> {
        while event::poll(Duration::from_millis(0))? {
            if let Some(ch) = key_char(event::read()?) {
                return Ok(Some(ch));
            }
        }
        Ok(None)
    }

    fn read_key(&mut self) -> io::Result<char> {
        loop {
            if let Some(ch) = key_char(event::read()?) {
                return Ok(ch);
            }
        }
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let needed_h = frame.lines.len() as u16;
        let needed_w = frame
            .lines
            .iter()
            .map(|line| UnicodeWidthStr::width(line.as_str()))
            .max()
            .unwrap_or(0) as u16;

        self.stdout.queue(Clear(ClearType::All))?;
        self.stdout.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            self.stdout.queue(Print(msg))?;
            return self.stdout.flush();
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2;
        for (row, line) in frame.lines.iter().enumerate() {
            self.stdout.queue(MoveTo(origin_x, origin_y + row as u16))?;
            if row < frame.grid_rows {
                for ch in line.chars() {
                    self.stdout.queue(SetForegroundColor(glyph_color(ch)))?;
                    self.stdout.queue(Print(ch))?;
                }
                self.stdout.queue(ResetColor)?;
            } else {
                self.stdout.queue(Print(line))?;
            }
        }
        self.stdout.flush()
    }
}
