use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::error::{RaceError, Result};
use crate::loader;
use crate::pathfinder::Steering;
use crate::strategy::MoveStrategy;
use crate::track::Track;

#[derive(Parser, Debug)]
#[command(name = "racetrack", version)]
#[command(about = "Turn-based racetrack on a character grid")]
pub struct Args {
    /// Track file to race on
    pub track: PathBuf,

    /// Driver for one car as ID=KIND[:FILE]. Kinds: still, user, moves:FILE, follow:FILE,
    /// finder, script:FILE. Cars without a driver are asked on stdin.
    #[arg(long = "driver", value_name = "ID=KIND[:FILE]")]
    pub drivers: Vec<DriverSpec>,

    /// Stop the race after this many turns
    #[arg(long, default_value_t = 10_000)]
    pub max_turns: usize,

    /// Write the race log as JSON into this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Do not print the board after every turn
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverSpecError {
    #[error("expected ID=KIND[:FILE], got {0:?}")]
    Malformed(String),

    #[error("unknown driver kind {0:?}")]
    UnknownKind(String),

    #[error("driver kind {0} needs a file, as in {0}:FILE")]
    MissingFile(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverKind {
    Still,
    User,
    Moves(PathBuf),
    Follow(PathBuf),
    Finder,
    Script(PathBuf),
}

impl DriverKind {
    /// Builds the strategy, reading any file the driver needs.
    pub fn load(&self) -> Result<MoveStrategy> {
        Ok(match self {
            Self::Still => MoveStrategy::DoNotMove,
            Self::User => MoveStrategy::User,
            Self::Moves(path) => MoveStrategy::move_list(loader::load_move_list(path)?),
            Self::Follow(path) => {
                MoveStrategy::PathFollower(Steering::new(loader::load_waypoints(path)?))
            }
            Self::Finder => MoveStrategy::PathFinder(None),
            Self::Script(path) => MoveStrategy::Script(loader::load_script(path)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSpec {
    pub car: char,
    pub kind: DriverKind,
}

impl FromStr for DriverSpec {
    type Err = DriverSpecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let malformed = || DriverSpecError::Malformed(s.to_owned());
        let (id, kind) = s.split_once('=').ok_or_else(malformed)?;

        let mut chars = id.chars();
        let car = chars.next().ok_or_else(malformed)?;
        if chars.next().is_some() {
            return Err(malformed());
        }

        let (name, file) = match kind.split_once(':') {
            Some((name, file)) => (name, Some(PathBuf::from(file))),
            None => (kind, None),
        };
        let needs_file =
            |kind: &'static str| file.clone().ok_or(DriverSpecError::MissingFile(kind));

        let kind = match name {
            "still" => DriverKind::Still,
            "user" => DriverKind::User,
            "finder" => DriverKind::Finder,
            "moves" => DriverKind::Moves(needs_file("moves")?),
            "follow" => DriverKind::Follow(needs_file("follow")?),
            "script" => DriverKind::Script(needs_file("script")?),
            other => return Err(DriverSpecError::UnknownKind(other.to_owned())),
        };
        Ok(Self { car, kind })
    }
}

/// Gives every car a strategy: the one named for it in `drivers`, or `User`.
pub fn assign_drivers(track: &mut Track, drivers: &[DriverSpec]) -> Result<()> {
    for index in 0..track.car_count() {
        track.car_mut(index).set_strategy(MoveStrategy::User);
    }

    for driver in drivers {
        let index = track
            .cars()
            .iter()
            .position(|car| car.id() == driver.car)
            .ok_or_else(|| {
                RaceError::InvalidDriver(format!("no car '{}' on this track", driver.car))
            })?;
        let strategy = driver.kind.load()?;
        info!(car = %driver.car, driver = strategy.name(), "driver assigned");
        track.car_mut(index).set_strategy(strategy);
    }
    Ok(())
}
