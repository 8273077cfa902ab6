use crate::entity::{Entity, Pos};
use crate::game::{Game, GameState, MAX_LEVELS};
use crate::maze::MAZE_SIZE;

pub const CONTROLS_HINT: &str =
    "Controls: WASD to move, Q to quit, R to restart, P to save menu, L to load menu";

/// Text ready for the console. The first `grid_rows` lines are maze rows,
/// everything after is prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
    pub grid_rows: usize,
}

impl Frame {
    pub fn plain(text: &str) -> Self {
        Frame {
            lines: text.lines().map(String::from).collect(),
            grid_rows: 0,
        }
    }

    pub fn text(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Terrain, then collectibles, enemies and finally the player on top.
pub fn compose_frame(game: &Game) -> Frame {
    let size = MAZE_SIZE as usize;
    let mut grid = vec![vec![' '; size]; size];
    for (y, row) in grid.iter_mut().enumerate() {
        for (x, ch) in row.iter_mut().enumerate() {
            *ch = game.maze().cell(Pos::new(x as i32, y as i32)).symbol();
        }
    }

    let overlays = game
        .collectibles()
        .iter()
        .map(|c| (c.position(), c.glyph()))
        .chain(game.enemies().iter().map(|e| (e.position(), e.glyph())))
        .chain(std::iter::once((
            game.player().position(),
            game.player().glyph(),
        )));
    for (pos, glyph) in overlays {
        if let Some(ch) = glyph {
            if game.maze().in_bounds(pos) {
                grid[pos.y as usize][pos.x as usize] = ch;
            }
        }
    }

    let mut lines: Vec<String> = grid
        .iter()
        .map(|row| row.iter().flat_map(|ch| [*ch, ' ']).collect())
        .collect();

    let player = game.player();
    lines.push(String::new());
    lines.push(format!(
        "Level: {} | Score: {} | Moves: {}",
        game.level(),
        player.score(),
        player.move_count()
    ));
    lines.push(CONTROLS_HINT.to_string());

    match game.state() {
        GameState::Playing => {}
        GameState::LevelWon => {
            if game.level() < MAX_LEVELS {
                lines.push("Level Complete! Press N for next level".to_string());
            }
        }
        GameState::GameOver => {
            lines.push(String::new());
            lines.push("GAME OVER! You collided with an enemy!".to_string());
            lines.push(format!("Final Score: {}", player.score()));
        }
        GameState::GameCompleted => {
            lines.push(String::new());
            lines.push("CONGRATULATIONS! You completed all levels!".to_string());
            lines.push(format!("Final Score: {}", player.score()));
            lines.push(format!("Total Moves: {}", player.move_count()));
        }
    }

    if let Some(message) = game.message() {
        lines.push(message.to_string());
    }

    Frame {
        lines,
        grid_rows: size,
    }
}
