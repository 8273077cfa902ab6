use crate::entity::{Entity, Pos};

pub const PLAYER_SYMBOL: char = 'P';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pos: Pos,
    active: bool,
    score: u32,
    move_count: u32,
}

impl Player {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            active: true,
            score: 0,
            move_count: 0,
        }
    }

    /// Applies the delta without any checks. The caller validates the
    /// destination against the maze first.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.pos.x += dx;
        self.pos.y += dy;
        self.move_count += 1;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn set_move_count(&mut self, moves: u32) {
        self.move_count = moves;
    }

    pub fn reset_stats(&mut self) {
        self.score = 0;
        self.move_count = 0;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Entity for Player {
    fn position(&self) -> Pos {
        self.pos
    }

    fn set_position(&mut self, pos: Pos) {
        self.pos = pos;
    }

    fn symbol(&self) -> char {
        PLAYER_SYMBOL
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self) {}
}
