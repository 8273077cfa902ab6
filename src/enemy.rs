use log::debug;
use rand::Rng;

use crate::entity::{Dir, Entity, Pos};
use crate::maze::Maze;

pub const ENEMY_SYMBOL: char = 'X';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pos: Pos,
    active: bool,
    move_timer: u32,
    move_delay: u32,
}

impl Enemy {
    pub fn new(pos: Pos, move_delay: u32) -> Self {
        Self {
            pos,
            active: true,
            move_timer: 0,
            move_delay,
        }
    }

    pub fn move_timer(&self) -> u32 {
        self.move_timer
    }

    pub fn move_delay(&self) -> u32 {
        self.move_delay
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Takes one random cardinal step once the timer has reached the delay.
    /// Returns true if the position changed. A step into a wall or off the
    /// grid is dropped and the enemy stays put.
    pub fn attempt_random_move(&mut self, maze: &Maze, rng: &mut impl Rng) -> bool {
        if self.move_timer < self.move_delay {
            return false;
        }
        self.move_timer = 0;

        let dir = Dir::random(rng);
        let next = self.pos.step(dir);
        if !maze.is_walkable(next) {
            return false;
        }
        debug!("enemy ({}, {}) -> ({}, {})", self.pos.x, self.pos.y, next.x, next.y);
        self.pos = next;
        true
    }
}

impl Entity for Enemy {
    fn position(&self) -> Pos {
        self.pos
    }

    fn set_position(&mut self, pos: Pos) {
        self.pos = pos;
    }

    fn symbol(&self) -> char {
        ENEMY_SYMBOL
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self) {
        if self.active {
            self.move_timer += 1;
        }
    }
}
