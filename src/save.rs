//! Full game-state save slots.
//!
//! A slot file is plain text:
//!
//! ```text
//! MAZEGAME_SAVE_V1
//! <level>
//! <score>
//! <moves>
//! <player x> <player y>
//! <10 maze rows, 10 cells each>
//! <exit x> <exit y>
//! ```
//!
//! Enemy and collectible positions are not stored; they are placed again
//! when the slot is loaded.

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::entity::Pos;
use crate::error::SaveError;
use crate::game::MAX_LEVELS;
use crate::maze::{parse_pair, Maze, MAZE_SIZE};

pub const SAVE_TAG: &str = "MAZEGAME_SAVE_V1";
pub const SLOT_COUNT: u8 = 5;
pub const MAZE_FILE_NAME: &str = "maze_save.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveState {
    pub level: u32,
    pub score: u32,
    pub moves: u32,
    pub player: Pos,
    pub maze: Maze,
}

impl SaveState {
    pub fn encode(&self) -> String {
        let mut lines = vec![
            SAVE_TAG.to_string(),
            self.level.to_string(),
            self.score.to_string(),
            self.moves.to_string(),
            format!("{} {}", self.player.x, self.player.y),
        ];
        lines.extend((0..MAZE_SIZE).map(|y| self.maze.row_string(y)));
        let exit = self.maze.exit_position();
        lines.push(format!("{} {}", exit.x, exit.y));
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn decode(text: &str) -> Result<Self, SaveError> {
        let mut lines = text.lines();
        if lines.next() != Some(SAVE_TAG) {
            return Err(SaveError::format("missing MAZEGAME_SAVE_V1 header"));
        }

        let level = parse_number(lines.next(), "level")?;
        if !(1..=MAX_LEVELS).contains(&level) {
            return Err(SaveError::format(format!("level {} out of range", level)));
        }
        let score = parse_number(lines.next(), "score")?;
        let moves = parse_number(lines.next(), "move count")?;
        let (px, py) = parse_pair(lines.next(), "player position")?;
        let player = Pos::new(px, py);

        let rows: Vec<&str> = lines.by_ref().take(MAZE_SIZE as usize).collect();
        let (ex, ey) = parse_pair(lines.next(), "exit position")?;
        let maze = Maze::from_rows(&rows, Pos::new(ex, ey))?;

        if !maze.is_walkable(player) {
            return Err(SaveError::format(format!(
                "player position ({}, {}) is not walkable",
                player.x, player.y
            )));
        }

        Ok(SaveState {
            level,
            score,
            moves,
            player,
            maze,
        })
    }
}

fn parse_number(line: Option<&str>, what: &str) -> Result<u32, SaveError> {
    let line = line.ok_or_else(|| SaveError::format(format!("missing {}", what)))?;
    line.trim()
        .parse()
        .map_err(|_| SaveError::format(format!("malformed {}: {:?}", what, line)))
}

/// Slot files live side by side in one directory.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, slot: u8) -> Result<PathBuf, SaveError> {
        if !(1..=SLOT_COUNT).contains(&slot) {
            return Err(SaveError::InvalidSlot(slot));
        }
        Ok(self.dir.join(format!("maze_save_{}.txt", slot)))
    }

    pub fn maze_path(&self) -> PathBuf {
        self.dir.join(MAZE_FILE_NAME)
    }

    pub fn write(&self, slot: u8, state: &SaveState) -> Result<PathBuf, SaveError> {
        let path = self.slot_path(slot)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, state.encode())?;
        info!("saved level {} to {}", state.level, path.display());
        Ok(path)
    }

    pub fn read(&self, slot: u8) -> Result<SaveState, SaveError> {
        let path = self.slot_path(slot)?;
        let text = fs::read_to_string(&path)?;
        let state = SaveState::decode(&text)?;
        info!("read level {} from {}", state.level, path.display());
        Ok(state)
    }
}
