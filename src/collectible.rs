use crate::entity::{Entity, Pos};

pub const COLLECTIBLE_SYMBOL: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collectible {
    pos: Pos,
    active: bool,
    point_value: u32,
    collected: bool,
}

impl Collectible {
    pub fn new(pos: Pos, point_value: u32) -> Self {
        Self {
            pos,
            active: true,
            point_value,
            collected: false,
        }
    }

    pub fn point_value(&self) -> u32 {
        self.point_value
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Idempotent.
    pub fn collect(&mut self) {
        self.collected = true;
        self.active = false;
    }

    pub fn reset(&mut self) {
        self.collected = false;
        self.active = true;
    }
}

impl Entity for Collectible {
    fn position(&self) -> Pos {
        self.pos
    }

    fn set_position(&mut self, pos: Pos) {
        self.pos = pos;
    }

    fn symbol(&self) -> char {
        COLLECTIBLE_SYMBOL
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self) {}
}
