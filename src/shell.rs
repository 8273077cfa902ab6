//! Menus, key mapping and the paced run loop, written against the
//! [`Console`] trait so the loop can run without a real terminal.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use log::info;

use crate::entity::Dir;
use crate::game::{Command, Game, GameState};
use crate::render::{compose_frame, Frame};
use crate::save::SLOT_COUNT;

pub trait Console {
    /// Never blocks; `None` when no key is waiting.
    fn poll_key(&mut self) -> io::Result<Option<char>>;

    /// Blocks until a key arrives.
    fn read_key(&mut self) -> io::Result<char>;

    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    SaveMenu,
    LoadMenu,
}

pub fn key_action(key: char) -> Option<KeyAction> {
    let action = match key.to_ascii_lowercase() {
        'w' => KeyAction::Command(Command::Move(Dir::Up)),
        's' => KeyAction::Command(Command::Move(Dir::Down)),
        'a' => KeyAction::Command(Command::Move(Dir::Left)),
        'd' => KeyAction::Command(Command::Move(Dir::Right)),
        'q' => KeyAction::Command(Command::Quit),
        'r' => KeyAction::Command(Command::Restart),
        'n' => KeyAction::Command(Command::NextLevel),
        'p' => KeyAction::SaveMenu,
        'l' => KeyAction::LoadMenu,
        _ => return None,
    };
    Some(action)
}

/// Returns `None` (and leaves a notice on the game) for anything but 1-5.
pub fn pick_slot<C: Console>(
    console: &mut C,
    game: &mut Game,
    title: &str,
) -> io::Result<Option<u8>> {
    let menu = format!(
        "=== {} ===\nChoose save slot (1-{}):",
        title, SLOT_COUNT
    );
    console.present(&Frame::plain(&menu))?;
    let key = console.read_key()?;
    let slot = key.to_digit(10).map(|d| d as u8);
    match slot {
        Some(slot) if (1..=SLOT_COUNT).contains(&slot) => Ok(Some(slot)),
        _ => {
            game.set_message("Invalid slot!");
            Ok(None)
        }
    }
}

const STARTUP_MENU: &str = "=== MAZE GAME ===
Navigate through the maze to reach the exit (E)
Collect items (*) for points
Avoid enemies (X)

Legend:
  # = Wall
  P = Player
  E = Exit
  * = Collectible
  X = Enemy

1. Start New Game
2. Load Saved Game
3. Quit

Choose an option (1-3):";

/// Returns false when the player chose to quit.
pub fn startup_menu<C: Console>(console: &mut C, game: &mut Game) -> io::Result<bool> {
    console.present(&Frame::plain(STARTUP_MENU))?;
    match console.read_key()?.to_ascii_lowercase() {
        '1' => Ok(true),
        '2' => {
            if let Some(slot) = pick_slot(console, game, "LOAD GAME")? {
                match game.load_from_slot(slot) {
                    Ok(()) => game.set_message(format!("Game loaded from slot {}.", slot)),
                    Err(err) => game.set_message(format!("Failed to load slot {}: {}", slot, err)),
                }
            }
            Ok(true)
        }
        '3' | 'q' => Ok(false),
        _ => {
            game.set_message("Invalid choice! Starting new game...");
            Ok(true)
        }
    }
}

/// Polls, ticks and redraws until the game stops running.
pub fn run<C: Console>(game: &mut Game, console: &mut C, tick: Duration) -> io::Result<()> {
    game.request_redraw();
    while game.is_running() {
        let frame_start = Instant::now();

        let command = match console.poll_key()?.and_then(key_action) {
            Some(KeyAction::Command(command)) => Some(command),
            Some(KeyAction::SaveMenu) => {
                game.request_redraw();
                pick_slot(console, game, "SAVE GAME")?.map(Command::Save)
            }
            Some(KeyAction::LoadMenu) => {
                game.request_redraw();
                pick_slot(console, game, "LOAD GAME")?.map(Command::Load)
            }
            None => None,
        };

        game.tick(command);

        if game.take_redraw() {
            console.present(&compose_frame(game))?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < tick {
            thread::sleep(tick - elapsed);
        }
    }
    Ok(())
}

/// Startup menu, the run loop, and a final pause on a finished game.
pub fn play<C: Console>(game: &mut Game, console: &mut C, tick: Duration) -> io::Result<()> {
    if !startup_menu(console, game)? {
        return Ok(());
    }
    run(game, console, tick)?;

    if matches!(game.state(), GameState::GameOver | GameState::GameCompleted) {
        let mut frame = compose_frame(game);
        frame.lines.push("Press any key to exit...".to_string());
        console.present(&frame)?;
        console.read_key()?;
    }
    info!(
        "session over on level {} with score {}",
        game.level(),
        game.player().score()
    );
    Ok(())
}
