use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use maze_game::config::Settings;
use maze_game::save::SaveStore;
use maze_game::shell;
use maze_game::terminal::Terminal;
use maze_game::Game;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings)?;
    info!("starting maze v{}", env!("CARGO_PKG_VERSION"));

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(rng, SaveStore::new(settings.save_dir.clone()));

    let mut terminal = Terminal::enter().context("failed to set up the terminal")?;
    let result = shell::play(&mut game, &mut terminal, settings.tick);
    terminal.restore().context("failed to restore the terminal")?;
    result.context("game loop failed")?;

    println!("Thanks for playing!");
    Ok(())
}

/// The screen is in raw mode while playing, so logs only ever go to the
/// file named by `MAZE_LOG`.
fn init_logging(settings: &Settings) -> Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .init();
    Ok(())
}
