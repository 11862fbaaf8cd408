use std::fs;
use std::path::Path;

use tracing::debug;

use crate::direction::Direction;
use crate::error::{RaceError, Result};
use crate::pathfinder::Route;
use crate::runtime::ScriptDriver;
use crate::track::Track;
use crate::vector::Vector;

pub fn load_track(path: &Path) -> Result<Track> {
    let track = Track::parse(&fs::read_to_string(path)?)?;
    debug!(
        path = %path.display(),
        width = track.width(),
        height = track.height(),
        cars = track.car_count(),
        "track loaded"
    );
    Ok(track)
}

/// One direction name per line, such as `UP_RIGHT`. Lines that are not a direction are skipped.
pub fn parse_move_list(text: &str) -> Vec<Direction> {
    text.lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect()
}

pub fn load_move_list(path: &Path) -> Result<Vec<Direction>> {
    Ok(parse_move_list(&fs::read_to_string(path)?))
}

/// One waypoint per line as `x,y`. Decorations around the numbers are ignored, so
/// `(X:10, Y:1)` reads as `10,1`. Blank lines are skipped.
pub fn parse_waypoints(text: &str) -> Result<Route> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_waypoint(line).ok_or_else(|| RaceError::InvalidWaypoint {
                line: index + 1,
                text: line.to_owned(),
            })
        })
        .collect()
}

fn parse_waypoint(line: &str) -> Option<Vector> {
    let digits: String = line
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    let mut coordinates = digits.split(',');
    let x = coordinates.next()?.parse().ok()?;
    let y = coordinates.next()?.parse().ok()?;
    Some(Vector::new(x, y))
}

pub fn load_waypoints(path: &Path) -> Result<Route> {
    parse_waypoints(&fs::read_to_string(path)?)
}

pub fn load_script(path: &Path) -> Result<ScriptDriver> {
    Ok(ScriptDriver::new(fs::read_to_string(path)?))
}
