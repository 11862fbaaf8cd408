use std::io::{BufRead, Write};

use tracing::warn;

use crate::car::Car;
use crate::direction::Direction;
use crate::error::{RaceError, Result};

pub mod lua;

pub use lua::ScriptDriver;

/// Source of accelerations for human-driven cars.
pub trait DirectionInput {
    fn next_direction(&mut self, car: &Car) -> Result<Direction>;
}

/// Prompts on `output` and reads one selection code (0 to 8) per line from `input`.
///
/// Lines that are not a valid code are reported and asked again.
pub struct LineInput<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, car: &Car) -> Result<()> {
        writeln!(
            self.output,
            "Car {} at {} with velocity {}",
            car.id(),
            car.position(),
            car.velocity()
        )?;
        for direction in Direction::ALL {
            write!(self.output, "{}={} ", direction.index(), direction)?;
        }
        write!(self.output, "\nAcceleration: ")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> DirectionInput for LineInput<R, W> {
    fn next_direction(&mut self, car: &Car) -> Result<Direction> {
        loop {
            self.prompt(car)?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(RaceError::InputExhausted);
            }

            let selection = line.trim();
            let choice = selection.parse().ok().and_then(Direction::from_index);
            match choice {
                Some(direction) => return Ok(direction),
                None => {
                    warn!(car = %car.id(), input = selection, "invalid acceleration selection");
                    writeln!(self.output, "Please enter a number between 0 and 8.")?;
                }
            }
        }
    }
}
