#![warn(clippy::all, clippy::pedantic, clippy::cargo, clippy::nursery)]

pub mod car;
pub mod config;
pub mod direction;
pub mod error;
pub mod finish_line;
pub mod game;
pub mod line;
pub mod loader;
pub mod log;
pub mod pathfinder;
pub mod runtime;
pub mod strategy;
pub mod track;
pub mod vector;

pub use car::Car;
pub use direction::Direction;
pub use error::{RaceError, Result, TrackError};
pub use game::{Game, State};
pub use pathfinder::{Route, RoutePlanner, Steering};
pub use strategy::MoveStrategy;
pub use track::{CellType, Track};
pub use vector::Vector;
