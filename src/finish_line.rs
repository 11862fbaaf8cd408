use serde::{Deserialize, Serialize};

use crate::track::Track;
use crate::vector::Vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossing {
    Forward,
    Backward,
}

impl Crossing {
    pub const fn delta(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Direction in which `path` crosses the finish line, if it touches it at all.
///
/// The first finish cell along the path is compared with the cell right before it on the
/// axis the line is crossed on. When the path starts on the line there is no earlier cell, so the
/// finish cell is compared with itself and the crossing counts as backward.
pub fn crossing(track: &Track, path: &[Vector]) -> Option<Crossing> {
    let (axis, forward_sign) = track.finish_orientation().finish_direction()?;
    let hit = path.iter().position(|&point| track.is_finish_cell(point))?;
    let before = path[hit.saturating_sub(1)];

    let travel = path[hit].component(axis) - before.component(axis);
    if travel.signum() == forward_sign {
        Some(Crossing::Forward)
    } else {
        Some(Crossing::Backward)
    }
}
