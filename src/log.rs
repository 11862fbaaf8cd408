use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::finish_line::Crossing;
use crate::vector::Vector;

/// One resolved turn, as written to the race log.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub turn: usize,
    pub current_car: char,
    pub acceleration: Direction,
    pub from: Vector,
    pub to: Vector,
    pub velocity: Vector,
    pub crashed: bool,
    pub crossing: Option<Crossing>,
    pub finish_line_crossings: i32,
    pub positions: Vec<Vector>,
}

impl Log {
    pub fn add_info(&mut self, positions: Vec<Vector>, crashed: bool, finish_line_crossings: i32) {
        self.positions = positions;
        self.crashed = crashed;
        self.finish_line_crossings = finish_line_crossings;
    }
}
