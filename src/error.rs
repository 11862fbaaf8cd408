use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("Track contains no rows")]
    Empty,

    #[error("Row {row} has length {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Track needs at least 2 cars, found {0}")]
    TooFewCars(usize),

    #[error("Track allows at most {max} cars, found {found}")]
    TooManyCars { found: usize, max: usize },

    #[error("Car id '{0}' is used more than once")]
    DuplicateCar(char),

    #[error("Track has no finish line")]
    NoFinishLine,

    #[error("Finish line mixes orientations '{0}' and '{1}'")]
    MixedFinishLine(char, char),
}

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid track: {0}")]
    Track(#[from] TrackError),

    #[error("Invalid waypoint on line {line}: {text:?}")]
    InvalidWaypoint { line: usize, text: String },

    #[error("Acceleration index out of range: {0}")]
    InvalidDirection(i64),

    #[error("Input ended before the race finished")]
    InputExhausted,

    #[error("Race already has a winner")]
    RaceFinished,

    #[error("Invalid driver assignment: {0}")]
    InvalidDriver(String),

    #[error("Lua driver failed: {0}")]
    Lua(#[from] mlua::Error),

    #[error("Failed to write race log: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RaceError>;
