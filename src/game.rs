use std::path::PathBuf;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::collectible::Collectible;
use crate::enemy::Enemy;
use crate::entity::{Dir, Entity, Pos};
use crate::error::SaveError;
use crate::maze::{Maze, MAZE_SIZE, START};
use crate::player::Player;
use crate::save::{SaveState, SaveStore};

pub const MAX_LEVELS: u32 = 5;
const MAX_ENEMIES: u32 = 3;
const BASE_ENEMY_DELAY: u32 = 3;
const BASE_COLLECTIBLES: u32 = 3;
const POINTS_PER_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// Exit reached on a level below the last; waiting for the advance command.
    LevelWon,
    GameOver,
    GameCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Quit,
    Restart,
    NextLevel,
    Save(u8),
    Load(u8),
}

pub struct Game {
    maze: Maze,
    player: Player,
    enemies: Vec<Enemy>,
    collectibles: Vec<Collectible>,
    level: u32,
    state: GameState,
    running: bool,
    needs_redraw: bool,
    message: Option<String>,
    rng: StdRng,
    store: SaveStore,
}

impl Game {
    pub fn new(rng: StdRng, store: SaveStore) -> Self {
        let mut game = Game {
            maze: Maze::new(),
            player: Player::new(START),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            level: 1,
            state: GameState::Playing,
            running: true,
            needs_redraw: true,
            message: None,
            rng,
            store,
        };
        game.initialize_level(1);
        game
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.needs_redraw = true;
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Returns the redraw hint and clears it.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn initialize_level(&mut self, level: u32) {
        self.level = level;
        self.state = GameState::Playing;
        self.needs_redraw = true;

        self.maze.initialize_for_level(level, &mut self.rng);
        self.player.set_position(START);
        self.player.set_active(true);
        self.spawn_entities(START);
        info!(
            "level {} ready: {} enemies, {} collectibles",
            level,
            self.enemies.len(),
            self.collectibles.len()
        );
    }

    /// Repopulates enemies and collectibles for the current level.
    fn spawn_entities(&mut self, avoid: Pos) {
        self.enemies.clear();
        self.collectibles.clear();

        let level = self.level;
        for _ in 0..level.min(MAX_ENEMIES) {
            if let Some(pos) = random_open_cell(&self.maze, &mut self.rng, avoid) {
                self.enemies.push(Enemy::new(pos, BASE_ENEMY_DELAY + level));
            }
        }
        for _ in 0..BASE_COLLECTIBLES + level {
            if let Some(pos) = random_open_cell(&self.maze, &mut self.rng, avoid) {
                self.collectibles
                    .push(Collectible::new(pos, POINTS_PER_LEVEL * level));
            }
        }
    }

    /// One simulation step. The order of the phases is observable and must
    /// not change.
    pub fn tick(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.apply_command(command);
        }

        self.update_entities();

        if self.state == GameState::Playing {
            self.check_enemy_collisions();
            self.check_collectible_collisions();
            self.check_win_condition();
        }
    }

    /// Status messages stay up until the board changes or a new one replaces them.
    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Move(dir) => {
                if self.state == GameState::Playing {
                    self.message = None;
                    self.move_player(dir);
                }
            }
            Command::Quit => self.running = false,
            Command::Restart => {
                self.message = None;
                self.reset_game();
            }
            Command::NextLevel => {
                if self.state == GameState::LevelWon && self.level < MAX_LEVELS {
                    self.message = None;
                    self.next_level();
                }
            }
            Command::Save(slot) => match self.save_to_slot(slot) {
                Ok(_) => self.set_message(format!("Game saved to slot {}.", slot)),
                Err(err) => {
                    warn!("save to slot {} failed: {}", slot, err);
                    self.set_message(format!("Failed to save to slot {}: {}", slot, err));
                }
            },
            Command::Load(slot) => match self.load_from_slot(slot) {
                Ok(()) => self.set_message(format!("Game loaded from slot {}.", slot)),
                Err(err) => {
                    warn!("load from slot {} failed: {}", slot, err);
                    self.set_message(format!("Failed to load slot {}: {}", slot, err));
                }
            },
        }
        self.needs_redraw = true;
    }

    pub fn move_player(&mut self, dir: Dir) {
        let (dx, dy) = dir.delta();
        let next = self.player.position().step(dir);
        if self.is_valid_player_move(next) {
            self.player.move_by(dx, dy);
            self.needs_redraw = true;
        }
    }

    pub fn is_valid_player_move(&self, pos: Pos) -> bool {
        self.maze.is_walkable(pos)
    }

    fn update_entities(&mut self) {
        self.player.update();

        for enemy in &mut self.enemies {
            enemy.update();
            if enemy.is_active() && enemy.attempt_random_move(&self.maze, &mut self.rng) {
                self.needs_redraw = true;
            }
        }

        for collectible in &mut self.collectibles {
            collectible.update();
        }
    }

    fn check_enemy_collisions(&mut self) {
        let here = self.player.position();
        if self
            .enemies
            .iter()
            .any(|e| e.is_active() && e.position() == here)
        {
            info!("player caught at ({}, {}) on level {}", here.x, here.y, self.level);
            self.state = GameState::GameOver;
            self.running = false;
            self.needs_redraw = true;
        }
    }

    fn check_collectible_collisions(&mut self) {
        let here = self.player.position();
        for collectible in &mut self.collectibles {
            if collectible.is_active() && !collectible.is_collected() && collectible.position() == here
            {
                collectible.collect();
                self.player.add_score(collectible.point_value());
                self.needs_redraw = true;
                debug!("collected {} points at ({}, {})", collectible.point_value(), here.x, here.y);
            }
        }
    }

    /// A capture earlier in the same tick takes precedence over the exit.
    fn check_win_condition(&mut self) {
        if self.state != GameState::Playing || !self.maze.is_exit(self.player.position()) {
            return;
        }
        if self.level >= MAX_LEVELS {
            info!("all levels completed, score {}", self.player.score());
            self.state = GameState::GameCompleted;
            self.running = false;
        } else {
            info!("level {} complete", self.level);
            self.state = GameState::LevelWon;
        }
        self.needs_redraw = true;
    }

    pub fn next_level(&mut self) {
        if self.level < MAX_LEVELS {
            self.initialize_level(self.level + 1);
        }
    }

    pub fn reset_game(&mut self) {
        self.player.reset_stats();
        self.running = true;
        self.initialize_level(1);
    }

    pub fn snapshot(&self) -> SaveState {
        SaveState {
            level: self.level,
            score: self.player.score(),
            moves: self.player.move_count(),
            player: self.player.position(),
            maze: self.maze.clone(),
        }
    }

    pub fn save_to_slot(&self, slot: u8) -> Result<PathBuf, SaveError> {
        self.store.write(slot, &self.snapshot())
    }

    /// Nothing changes unless the slot file reads and parses cleanly.
    pub fn load_from_slot(&mut self, slot: u8) -> Result<(), SaveError> {
        let saved = self.store.read(slot)?;
        self.restore(saved);
        Ok(())
    }

    fn restore(&mut self, saved: SaveState) {
        self.level = saved.level;
        self.maze = saved.maze;
        self.player.set_position(saved.player);
        self.player.set_active(true);
        self.player.reset_stats();
        self.player.set_score(saved.score);
        self.player.set_move_count(saved.moves);
        self.state = GameState::Playing;
        self.running = true;
        self.needs_redraw = true;
        self.spawn_entities(saved.player);
    }

    pub fn save_layout(&self) -> Result<(), SaveError> {
        self.maze.save_to_file(&self.store.maze_path())
    }

    pub fn load_layout(&mut self) -> Result<(), SaveError> {
        let path = self.store.maze_path();
        self.maze.load_from_file(&path)?;
        self.needs_redraw = true;
        Ok(())
    }
}

/// Rejection sampling over interior cells. `None` only when no interior cell
/// is eligible at all.
fn random_open_cell(maze: &Maze, rng: &mut impl Rng, avoid: Pos) -> Option<Pos> {
    let eligible = |pos: Pos| {
        !maze.is_wall(pos) && pos != START && pos != avoid && !maze.is_exit(pos)
    };
    let any = (1..MAZE_SIZE - 1)
        .flat_map(|y| (1..MAZE_SIZE - 1).map(move |x| Pos::new(x, y)))
        .any(eligible);
    if !any {
        return None;
    }
    loop {
        let pos = Pos::new(
            rng.gen_range(1..MAZE_SIZE - 1),
            rng.gen_range(1..MAZE_SIZE - 1),
        );
        if eligible(pos) {
            return Some(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;
    use rand::SeedableRng;

    fn new_game(seed: u64) -> Game {
        Game::new(StdRng::seed_from_u64(seed), SaveStore::new("unused"))
    }

    /// Removes all enemies and collectibles so scenarios control the board.
    fn quiet_game(seed: u64) -> Game {
        let mut game = new_game(seed);
        game.enemies.clear();
        game.collectibles.clear();
        game
    }

    #[test]
    fn fresh_game_population() {
        let game = new_game(1);
        assert_eq!(game.level(), 1);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.player().position(), START);
        assert_eq!(game.enemies().len(), 1);
        assert_eq!(game.collectibles().len(), 4);
        for pos in game
            .enemies()
            .iter()
            .map(|e| e.position())
            .chain(game.collectibles().iter().map(|c| c.position()))
        {
            assert!(!game.maze().is_wall(pos));
            assert_ne!(pos, START);
            assert!(!game.maze().is_exit(pos));
        }
    }

    #[test]
    fn population_scales_with_level() {
        let mut game = new_game(2);
        for level in 1..=MAX_LEVELS {
            game.initialize_level(level);
            assert_eq!(game.enemies().len() as u32, level.min(3));
            assert_eq!(game.collectibles().len() as u32, 3 + level);
            assert!(game.enemies().iter().all(|e| e.move_delay() == 3 + level));
            assert!(game
                .collectibles()
                .iter()
                .all(|c| c.point_value() == 10 * level));
        }
    }

    #[test]
    fn two_steps_right_on_first_level() {
        let mut game = quiet_game(3);
        game.tick(Some(Command::Move(Dir::Right)));
        game.tick(Some(Command::Move(Dir::Right)));
        assert_eq!(game.player().position(), Pos::new(3, 1));
        assert_eq!(game.player().move_count(), 2);
    }

    #[test]
    fn blocked_move_is_ignored() {
        let mut game = quiet_game(4);
        game.tick(Some(Command::Move(Dir::Up)));
        assert_eq!(game.player().position(), START);
        assert_eq!(game.player().move_count(), 0);
    }

    #[test]
    fn collecting_adds_points_once() {
        let mut game = quiet_game(5);
        game.initialize_level(3);
        game.enemies.clear();
        game.collectibles.clear();
        game.collectibles.push(Collectible::new(Pos::new(2, 1), 30));
        game.tick(Some(Command::Move(Dir::Right)));
        assert_eq!(game.player().score(), 30);
        assert!(!game.collectibles()[0].is_active());

        game.tick(None);
        assert_eq!(game.player().score(), 30);
    }

    #[test]
    fn stacked_collectibles_all_collected() {
        let mut game = quiet_game(6);
        game.collectibles.push(Collectible::new(Pos::new(2, 1), 10));
        game.collectibles.push(Collectible::new(Pos::new(2, 1), 10));
        game.tick(Some(Command::Move(Dir::Right)));
        assert_eq!(game.player().score(), 20);
        assert!(game.collectibles().iter().all(|c| c.is_collected()));
    }

    #[test]
    fn enemy_contact_ends_game() {
        let mut game = quiet_game(7);
        game.enemies.push(Enemy::new(Pos::new(2, 1), 1000));
        game.tick(Some(Command::Move(Dir::Right)));
        assert_eq!(game.state(), GameState::GameOver);
        assert!(!game.is_running());
    }

    #[test]
    fn collision_checked_after_enemy_moves() {
        let mut game = quiet_game(8);
        // Enemy boxed into a corridor whose only exit is the player's cell.
        game.maze.set_cell(Pos::new(2, 1), Cell::Empty);
        game.maze.set_cell(Pos::new(2, 2), Cell::Wall);
        game.maze.set_cell(Pos::new(3, 1), Cell::Wall);
        game.enemies.push(Enemy::new(Pos::new(2, 1), 0));
        for _ in 0..100 {
            game.tick(None);
            if game.state() == GameState::GameOver {
                break;
            }
        }
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.enemies()[0].position(), START);
    }

    #[test]
    fn reaching_exit_before_last_level_waits_for_advance() {
        let mut game = quiet_game(9);
        game.player.set_position(Pos::new(8, 7));
        game.tick(Some(Command::Move(Dir::Down)));
        assert_eq!(game.state(), GameState::LevelWon);
        assert!(game.is_running());

        game.tick(Some(Command::Move(Dir::Up)));
        assert_eq!(game.player().position(), Pos::new(8, 8));

        game.tick(Some(Command::NextLevel));
        assert_eq!(game.level(), 2);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.player().position(), START);
    }

    #[test]
    fn advance_ignored_while_playing() {
        let mut game = quiet_game(10);
        game.tick(Some(Command::NextLevel));
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn exit_on_last_level_completes_game() {
        let mut game = new_game(11);
        game.initialize_level(MAX_LEVELS);
        game.enemies.clear();
        game.collectibles.clear();
        let exit = game.maze().exit_position();
        game.player.set_position(Pos::new(exit.x, exit.y - 1));
        game.tick(Some(Command::Move(Dir::Down)));
        assert_eq!(game.state(), GameState::GameCompleted);
        assert!(!game.is_running());
    }

    #[test]
    fn caught_on_exit_stays_game_over() {
        for level in [1, MAX_LEVELS] {
            let mut game = new_game(15);
            game.initialize_level(level);
            game.enemies.clear();
            game.collectibles.clear();
            let exit = game.maze().exit_position();
            game.enemies.push(Enemy::new(exit, 1000));
            game.player.set_position(Pos::new(exit.x, exit.y - 1));
            game.tick(Some(Command::Move(Dir::Down)));
            assert_eq!(game.player().position(), exit);
            assert_eq!(game.state(), GameState::GameOver, "level {level}");
            assert!(!game.is_running());
        }
    }

    #[test]
    fn restart_resets_stats_and_level() {
        let mut game = new_game(12);
        game.initialize_level(4);
        game.player.add_score(120);
        game.player.move_by(0, 0);
        game.tick(Some(Command::Restart));
        assert_eq!(game.level(), 1);
        assert_eq!(game.player().score(), 0);
        assert_eq!(game.player().move_count(), 0);
        assert_eq!(game.state(), GameState::Playing);
        assert!(game.is_running());
    }

    #[test]
    fn quit_stops_loop() {
        let mut game = quiet_game(13);
        game.tick(Some(Command::Quit));
        assert!(!game.is_running());
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn redraw_hint_clears_after_take() {
        let mut game = quiet_game(14);
        assert!(game.take_redraw());
        game.tick(None);
        assert!(!game.take_redraw());
        game.tick(Some(Command::Move(Dir::Right)));
        assert!(game.take_redraw());
    }

    #[test]
    fn random_open_cell_gives_up_on_solid_maze() {
        let mut maze = Maze::new();
        for y in 1..9 {
            for x in 1..9 {
                maze.set_cell(Pos::new(x, y), Cell::Wall);
            }
        }
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(random_open_cell(&maze, &mut rng, START), None);
    }
}
