use std::fs;
use std::path::Path;

use log::{info, warn};
use rand::Rng;

use crate::entity::Pos;
use crate::error::SaveError;

pub const MAZE_SIZE: i32 = 10;
const SIZE: usize = MAZE_SIZE as usize;

/// Where the player enters every level.
pub const START: Pos = Pos::new(1, 1);

const BASE_WALL_DENSITY: u32 = 10;
const WALLS_PER_LEVEL: u32 = 5;

const FIXED_LAYOUT: [&str; SIZE] = [
    "##########",
    "#   #    #",
    "# # # ## #",
    "# #    # #",
    "# #### # #",
    "#      # #",
    "### # ## #",
    "#   #    #",
    "# ######E#",
    "##########",
];
const FIXED_EXIT: Pos = Pos::new(8, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Exit,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Exit => 'E',
        }
    }

    pub fn from_symbol(ch: char) -> Option<Cell> {
        match ch {
            ' ' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'E' => Some(Cell::Exit),
            _ => None,
        }
    }
}

/// The 10x10 terrain grid, stored row-major, plus the exit coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: [Cell; SIZE * SIZE],
    exit: Pos,
}

impl Default for Maze {
    fn default() -> Self {
        Self::new()
    }
}

impl Maze {
    /// A maze holding the fixed level-1 layout.
    pub fn new() -> Self {
        let mut maze = Maze {
            cells: [Cell::Wall; SIZE * SIZE],
            exit: FIXED_EXIT,
        };
        maze.initialize_fixed_level();
        maze
    }

    pub fn initialize_fixed_level(&mut self) {
        for (y, row) in FIXED_LAYOUT.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                self.cells[y * SIZE + x] = Cell::from_symbol(ch).unwrap_or(Cell::Wall);
            }
        }
        self.exit = FIXED_EXIT;
    }

    /// Level 1 is hand-authored, later levels are generated.
    pub fn initialize_for_level(&mut self, level: u32, rng: &mut impl Rng) {
        if level <= 1 {
            self.initialize_fixed_level();
        } else {
            self.generate(level, rng);
        }
    }

    pub fn generate(&mut self, level: u32, rng: &mut impl Rng) {
        for y in 0..MAZE_SIZE {
            for x in 0..MAZE_SIZE {
                let border = x == 0 || y == 0 || x == MAZE_SIZE - 1 || y == MAZE_SIZE - 1;
                let cell = if border { Cell::Wall } else { Cell::Empty };
                self.set_cell(Pos::new(x, y), cell);
            }
        }

        self.exit = Pos::new(MAZE_SIZE - 2, MAZE_SIZE - 2);
        self.add_walls(BASE_WALL_DENSITY + WALLS_PER_LEVEL * level, rng);
        self.set_cell(self.exit, Cell::Exit);
        self.ensure_path_exists();
        info!("generated level {} layout", level);
    }

    /// Drops `count` walls on random interior cells, never on the start or
    /// the exit. Repeats on the same cell are harmless.
    pub fn add_walls(&mut self, count: u32, rng: &mut impl Rng) {
        for _ in 0..count {
            let pos = Pos::new(
                rng.gen_range(1..MAZE_SIZE - 1),
                rng.gen_range(1..MAZE_SIZE - 1),
            );
            if pos == START || pos == self.exit {
                continue;
            }
            self.set_cell(pos, Cell::Wall);
        }
    }

    /// Clears the L-shaped route along row 1 to the exit column, then down
    /// that column to the exit.
    pub fn ensure_path_exists(&mut self) {
        for x in START.x..=self.exit.x {
            let pos = Pos::new(x, START.y);
            if self.cell(pos) == Cell::Wall {
                self.set_cell(pos, Cell::Empty);
            }
        }
        for y in START.y..=self.exit.y {
            let pos = Pos::new(self.exit.x, y);
            if self.cell(pos) == Cell::Wall {
                self.set_cell(pos, Cell::Empty);
            }
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < MAZE_SIZE && pos.y >= 0 && pos.y < MAZE_SIZE
    }

    /// Out-of-bounds reads are walls.
    pub fn cell(&self, pos: Pos) -> Cell {
        if self.in_bounds(pos) {
            self.cells[index(pos)]
        } else {
            Cell::Wall
        }
    }

    /// Out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, pos: Pos, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[index(pos)] = cell;
        }
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.cell(pos) == Cell::Wall
    }

    pub fn is_exit(&self, pos: Pos) -> bool {
        pos == self.exit
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_wall(pos)
    }

    pub fn exit_position(&self) -> Pos {
        self.exit
    }

    pub fn row_string(&self, y: i32) -> String {
        (0..MAZE_SIZE).map(|x| self.cell(Pos::new(x, y)).symbol()).collect()
    }

    /// Maze-only file format: dimensions, exit, then one line per row.
    pub fn serialize(&self) -> String {
        let mut out = format!(
            "{} {}\n{} {}\n",
            MAZE_SIZE, MAZE_SIZE, self.exit.x, self.exit.y
        );
        for y in 0..MAZE_SIZE {
            out.push_str(&self.row_string(y));
            out.push('\n');
        }
        out
    }

    /// Parses a maze-only file on top of `self`. Rows shorter than the grid
    /// width (or missing rows) keep the cells `self` already has.
    pub fn deserialize(&self, text: &str) -> Result<Maze, SaveError> {
        let mut lines = text.lines();
        let (width, height) = parse_pair(lines.next(), "dimensions")?;
        if width != MAZE_SIZE || height != MAZE_SIZE {
            return Err(SaveError::format(format!(
                "maze is {}x{}, expected {}x{}",
                width, height, MAZE_SIZE, MAZE_SIZE
            )));
        }
        let (exit_x, exit_y) = parse_pair(lines.next(), "exit position")?;

        let mut next = self.clone();
        next.exit = Pos::new(exit_x, exit_y);
        for (y, line) in lines.take(SIZE).enumerate() {
            match parse_row(line, y)? {
                Some(row) => next.cells[y * SIZE..(y + 1) * SIZE].copy_from_slice(&row),
                None => warn!("maze row {} is short, keeping previous contents", y),
            }
        }
        next.validate_exit()?;
        Ok(next)
    }

    /// Builds a maze from exactly `MAZE_SIZE` complete rows.
    pub fn from_rows(rows: &[&str], exit: Pos) -> Result<Maze, SaveError> {
        if rows.len() != SIZE {
            return Err(SaveError::format(format!(
                "expected {} maze rows, found {}",
                SIZE,
                rows.len()
            )));
        }
        let mut maze = Maze {
            cells: [Cell::Wall; SIZE * SIZE],
            exit,
        };
        for (y, line) in rows.iter().enumerate() {
            let row = parse_row(line, y)?
                .ok_or_else(|| SaveError::format(format!("maze row {} is too short", y)))?;
            maze.cells[y * SIZE..(y + 1) * SIZE].copy_from_slice(&row);
        }
        maze.validate_exit()?;
        Ok(maze)
    }

    /// The stored exit must be the one and only `Exit` cell.
    fn validate_exit(&self) -> Result<(), SaveError> {
        let exits = self.cells.iter().filter(|c| **c == Cell::Exit).count();
        if !self.in_bounds(self.exit) || self.cell(self.exit) != Cell::Exit || exits != 1 {
            return Err(SaveError::format(format!(
                "exit ({}, {}) does not match the maze layout",
                self.exit.x, self.exit.y
            )));
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), SaveError> {
        fs::write(path, self.serialize())?;
        info!("maze layout saved to {}", path.display());
        Ok(())
    }

    /// Leaves `self` untouched on any error.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), SaveError> {
        let text = fs::read_to_string(path)?;
        *self = self.deserialize(&text)?;
        info!("maze layout loaded from {}", path.display());
        Ok(())
    }
}

fn index(pos: Pos) -> usize {
    pos.y as usize * SIZE + pos.x as usize
}

pub(crate) fn parse_pair(line: Option<&str>, what: &str) -> Result<(i32, i32), SaveError> {
    let line = line.ok_or_else(|| SaveError::format(format!("missing {}", what)))?;
    let mut parts = line.split_whitespace().map(str::parse::<i32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(a)), Some(Ok(b)), None) => Ok((a, b)),
        _ => Err(SaveError::format(format!("malformed {}: {:?}", what, line))),
    }
}

/// `None` when the line is shorter than a row; characters past the row
/// width are ignored.
fn parse_row(line: &str, y: usize) -> Result<Option<[Cell; SIZE]>, SaveError> {
    if line.chars().count() < SIZE {
        return Ok(None);
    }
    let mut row = [Cell::Wall; SIZE];
    for (x, ch) in line.chars().take(SIZE).enumerate() {
        row[x] = Cell::from_symbol(ch).ok_or_else(|| {
            SaveError::format(format!("unknown cell {:?} at ({}, {})", ch, x, y))
        })?;
    }
    Ok(Some(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fixed_level_matches_layout() {
        let maze = Maze::new();
        assert_eq!(maze.exit_position(), Pos::new(8, 8));
        assert_eq!(maze.cell(Pos::new(8, 8)), Cell::Exit);
        assert_eq!(maze.cell(START), Cell::Empty);
        assert!(maze.is_wall(Pos::new(4, 1)));
        for (y, row) in FIXED_LAYOUT.iter().enumerate() {
            assert_eq!(maze.row_string(y as i32), *row);
        }
    }

    #[test]
    fn out_of_bounds_reads_wall_and_ignores_writes() {
        let mut maze = Maze::new();
        let before = maze.clone();
        for pos in [
            Pos::new(-1, 0),
            Pos::new(0, -1),
            Pos::new(10, 3),
            Pos::new(3, 10),
            Pos::new(i32::MAX, i32::MIN),
        ] {
            assert_eq!(maze.cell(pos), Cell::Wall);
            maze.set_cell(pos, Cell::Empty);
        }
        assert_eq!(maze, before);
    }

    #[test]
    fn generated_levels_keep_the_l_route_open() {
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for level in 2..=5 {
                let mut maze = Maze::new();
                maze.generate(level, &mut rng);
                let exit = maze.exit_position();
                assert_eq!(exit, Pos::new(8, 8));
                for x in 1..=exit.x {
                    assert!(!maze.is_wall(Pos::new(x, 1)), "seed {seed} level {level}");
                }
                for y in 1..=exit.y {
                    assert!(!maze.is_wall(Pos::new(exit.x, y)), "seed {seed} level {level}");
                }
                assert_eq!(maze.cell(exit), Cell::Exit);
                assert!(maze.validate_exit().is_ok());
            }
        }
    }

    #[test]
    fn generated_levels_have_wall_border() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut maze = Maze::new();
        maze.generate(4, &mut rng);
        for i in 0..MAZE_SIZE {
            assert!(maze.is_wall(Pos::new(i, 0)));
            assert!(maze.is_wall(Pos::new(i, MAZE_SIZE - 1)));
            assert!(maze.is_wall(Pos::new(0, i)));
            assert!(maze.is_wall(Pos::new(MAZE_SIZE - 1, i)));
        }
    }

    #[test]
    fn serialize_then_deserialize_is_identical() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut maze = Maze::new();
        maze.generate(3, &mut rng);
        let text = maze.serialize();
        assert!(text.starts_with("10 10\n8 8\n"));
        let loaded = Maze::new().deserialize(&text).unwrap();
        assert_eq!(loaded, maze);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut text = Maze::new().serialize();
        text.replace_range(0..5, "12 10");
        let err = Maze::new().deserialize(&text).unwrap_err();
        assert!(matches!(err, SaveError::Format(_)));
    }

    #[test]
    fn short_row_keeps_previous_contents() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut generated = Maze::new();
        generated.generate(2, &mut rng);
        let mut lines: Vec<String> = generated.serialize().lines().map(String::from).collect();
        lines[2 + 3] = "#  #".to_string();
        let text = lines.join("\n");

        let base = Maze::new();
        let loaded = base.deserialize(&text).unwrap();
        assert_eq!(loaded.row_string(3), base.row_string(3));
        assert_eq!(loaded.row_string(4), generated.row_string(4));
    }

    #[test]
    fn unknown_cell_is_rejected() {
        let mut lines: Vec<String> = Maze::new().serialize().lines().map(String::from).collect();
        lines[4] = "#P  #    #".to_string();
        let err = Maze::new().deserialize(&lines.join("\n")).unwrap_err();
        assert!(matches!(err, SaveError::Format(_)));
    }

    #[test]
    fn exit_must_agree_with_layout() {
        let mut lines: Vec<String> = Maze::new().serialize().lines().map(String::from).collect();
        lines[1] = "7 8".to_string();
        assert!(Maze::new().deserialize(&lines.join("\n")).is_err());
    }

    #[test]
    fn file_round_trip_and_failed_load_leaves_maze() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze_save.txt");
        let mut rng = StdRng::seed_from_u64(21);
        let mut generated = Maze::new();
        generated.generate(5, &mut rng);
        generated.save_to_file(&path).unwrap();

        let mut maze = Maze::new();
        maze.load_from_file(&path).unwrap();
        assert_eq!(maze, generated);

        fs::write(&path, "9 9\n8 8\n").unwrap();
        assert!(maze.load_from_file(&path).is_err());
        assert_eq!(maze, generated);

        let missing = dir.path().join("nope.txt");
        assert!(matches!(maze.load_from_file(&missing), Err(SaveError::Io(_))));
    }
}
