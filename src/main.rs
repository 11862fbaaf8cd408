#![warn(clippy::all, clippy::pedantic, clippy::cargo, clippy::nursery)]
use std::io;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use racetrack::config::{self, Args};
use racetrack::runtime::LineInput;
use racetrack::{loader, Game};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut track = loader::load_track(&args.track)
        .wrap_err_with(|| format!("Failed to load track {}", args.track.display()))?;
    config::assign_drivers(&mut track, &args.drivers).wrap_err("Failed to set up drivers")?;

    let mut game = Game::new(track);
    if !args.quiet {
        print!("{}", game.track());
    }

    let mut input = LineInput::new(io::stdin().lock(), io::stdout());
    let winner = game.race(&mut input, args.max_turns, |game| {
        if !args.quiet {
            println!("{}", game.track());
        }
    })?;

    match winner {
        Some(id) => println!("Car {id} wins after {} turns", game.turns()),
        None => println!("No winner after {} turns", game.turns()),
    }

    if let Some(dir) = &args.log_dir {
        let path = game.export_log(dir)?;
        info!(path = %path.display(), "race log exported");
    }

    Ok(())
}
