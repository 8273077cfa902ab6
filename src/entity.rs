use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Dir) -> Pos {
        let (dx, dy) = dir.delta();
        Pos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    /// Row-major delta; up is decreasing row.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn random(rng: &mut impl Rng) -> Dir {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Capabilities shared by everything placed on the grid.
pub trait Entity {
    fn position(&self) -> Pos;
    fn set_position(&mut self, pos: Pos);
    fn symbol(&self) -> char;
    fn is_active(&self) -> bool;

    /// Advance internal timers by one tick.
    fn update(&mut self);

    /// The symbol to overlay on the frame, if the entity is visible.
    fn glyph(&self) -> Option<char> {
        self.is_active().then(|| self.symbol())
    }
}
