use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::car::Car;
use crate::error::TrackError;
use crate::vector::{Axis, Vector};

pub const MIN_CARS: usize = 2;
pub const MAX_CARS: usize = 9;
const CRASH_INDICATOR: char = 'X';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellType {
    Wall,
    Track,
    FinishUp,
    FinishDown,
    FinishLeft,
    FinishRight,
}

impl CellType {
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Track => ' ',
            Self::FinishUp => '^',
            Self::FinishDown => 'v',
            Self::FinishLeft => '<',
            Self::FinishRight => '>',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Track),
            '^' => Some(Self::FinishUp),
            'v' => Some(Self::FinishDown),
            '<' => Some(Self::FinishLeft),
            '>' => Some(Self::FinishRight),
            _ => None,
        }
    }

    pub const fn is_finish(self) -> bool {
        self.finish_direction().is_some()
    }

    /// Axis a finish line is crossed on, and the sign of travel along it that counts as forward.
    ///
    /// `FINISH_RIGHT` is crossed left to right (+x), `FINISH_UP` bottom to top (-y).
    pub const fn finish_direction(self) -> Option<(Axis, i32)> {
        match self {
            Self::FinishUp => Some((Axis::Y, -1)),
            Self::FinishDown => Some((Axis::Y, 1)),
            Self::FinishLeft => Some((Axis::X, -1)),
            Self::FinishRight => Some((Axis::X, 1)),
            Self::Wall | Self::Track => None,
        }
    }
}

/// The race board: an immutable grid of cells plus the cars driving on it.
///
/// Cars are kept in turn order. Finish cells are kept in the order they were read, row by row.
#[derive(Debug, Clone)]
pub struct Track {
    grid: Vec<Vec<CellType>>,
    cars: Vec<Car>,
    finish_line: Vec<Vector>,
}

impl Track {
    /// Reads a track from its text form.
    ///
    /// Leading empty lines are skipped and the grid ends at the first empty line after it started.
    /// `#` is wall, space is track, `^ v < >` are finish cells, every other character places a car
    /// with that id on a track cell.
    pub fn parse(text: &str) -> Result<Self, TrackError> {
        let rows: Vec<&str> = text
            .lines()
            .skip_while(|line| line.is_empty())
            .take_while(|line| !line.is_empty())
            .collect();

        let width = rows.first().ok_or(TrackError::Empty)?.chars().count();
        let mut grid = Vec::with_capacity(rows.len());
        let mut cars: Vec<Car> = Vec::new();
        let mut finish_line = Vec::new();
        let mut orientation: Option<CellType> = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(TrackError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            let mut cells = Vec::with_capacity(width);
            for (x, symbol) in row.chars().enumerate() {
                let position = Vector::new(to_coordinate(x), to_coordinate(y));
                let cell = match CellType::from_symbol(symbol) {
                    Some(cell) => cell,
                    None => {
                        if cars.iter().any(|car| car.id() == symbol) {
                            return Err(TrackError::DuplicateCar(symbol));
                        }
                        cars.push(Car::new(symbol, position));
                        CellType::Track
                    }
                };

                if cell.is_finish() {
                    match orientation {
                        Some(existing) if existing != cell => {
                            return Err(TrackError::MixedFinishLine(
                                existing.symbol(),
                                cell.symbol(),
                            ));
                        }
                        _ => orientation = Some(cell),
                    }
                    finish_line.push(position);
                }
                cells.push(cell);
            }
            grid.push(cells);
        }

        if cars.len() < MIN_CARS {
            return Err(TrackError::TooFewCars(cars.len()));
        }
        if cars.len() > MAX_CARS {
            return Err(TrackError::TooManyCars {
                found: cars.len(),
                max: MAX_CARS,
            });
        }
        if finish_line.is_empty() {
            return Err(TrackError::NoFinishLine);
        }

        Ok(Self {
            grid,
            cars,
            finish_line,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    /// Cell type at `position`; anything outside the grid is a wall.
    pub fn cell_type(&self, position: Vector) -> CellType {
        let (Ok(x), Ok(y)) = (usize::try_from(position.x), usize::try_from(position.y)) else {
            return CellType::Wall;
        };
        self.grid
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(CellType::Wall)
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn car(&self, index: usize) -> &Car {
        &self.cars[index]
    }

    pub fn car_mut(&mut self, index: usize) -> &mut Car {
        &mut self.cars[index]
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    pub fn car_at(&self, position: Vector) -> Option<&Car> {
        self.cars.iter().find(|car| car.position() == position)
    }

    pub fn finish_line_cells(&self) -> &[Vector] {
        &self.finish_line
    }

    pub fn is_finish_cell(&self, position: Vector) -> bool {
        self.finish_line.contains(&position)
    }

    pub fn finish_orientation(&self) -> CellType {
        self.cell_type(self.finish_line[0])
    }

    /// Would the car at `car_index` crash when it reaches `position`?
    ///
    /// True for walls and for cells held by any other car, crashed or not.
    pub fn is_crash(&self, car_index: usize, position: Vector) -> bool {
        if self.cell_type(position) == CellType::Wall {
            return true;
        }
        let id = self.cars[car_index].id();
        self.cars
            .iter()
            .any(|car| car.id() != id && car.position() == position)
    }

    fn symbol_at(&self, position: Vector) -> char {
        match self.car_at(position) {
            Some(car) if car.is_crashed() => CRASH_INDICATOR,
            Some(car) => car.id(),
            None => self.cell_type(position).symbol(),
        }
    }
}

fn to_coordinate(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

impl FromStr for Track {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            let row: String = (0..self.width())
                .map(|x| self.symbol_at(Vector::new(to_coordinate(x), to_coordinate(y))))
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORIZONTAL: &str = "\
##############################
#a                         > #
#b                         > #
##############################
";

    #[test]
    fn parses_cells_cars_and_finish_line() {
        let track = Track::parse(HORIZONTAL).unwrap();
        assert_eq!(track.width(), 30);
        assert_eq!(track.height(), 4);
        assert_eq!(track.car_count(), 2);
        assert_eq!(track.car(0).id(), 'a');
        assert_eq!(track.car(0).position(), Vector::new(1, 1));
        assert_eq!(track.car(1).position(), Vector::new(1, 2));
        assert_eq!(
            track.finish_line_cells(),
            &[Vector::new(27, 1), Vector::new(27, 2)]
        );
        assert_eq!(track.finish_orientation(), CellType::FinishRight);
        assert_eq!(track.cell_type(Vector::new(1, 1)), CellType::Track);
        assert_eq!(track.cell_type(Vector::new(0, 1)), CellType::Wall);
    }

    #[test]
    fn outside_the_grid_is_wall() {
        let track = Track::parse(HORIZONTAL).unwrap();
        assert_eq!(track.cell_type(Vector::new(-1, 1)), CellType::Wall);
        assert_eq!(track.cell_type(Vector::new(5, 40)), CellType::Wall);
        assert_eq!(track.cell_type(Vector::new(30, 1)), CellType::Wall);
    }

    #[test]
    fn skips_leading_blank_lines_and_stops_at_gap() {
        let text = format!("\n\n{HORIZONTAL}\nthis is not part of the track\n");
        let track = Track::parse(&text).unwrap();
        assert_eq!(track.height(), 4);
        assert_eq!(track.car_count(), 2);
    }

    #[test]
    fn rejects_invalid_tracks() {
        assert!(matches!(Track::parse(""), Err(TrackError::Empty)));
        assert!(matches!(Track::parse("\n\n"), Err(TrackError::Empty)));
        assert!(matches!(
            Track::parse("####\n#a>\n"),
            Err(TrackError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3,
            })
        ));
        assert!(matches!(
            Track::parse("####\n#a>#\n####\n"),
            Err(TrackError::TooFewCars(1))
        ));
        assert!(matches!(
            Track::parse("#####\n#aa>#\n#####\n"),
            Err(TrackError::DuplicateCar('a'))
        ));
        assert!(matches!(
            Track::parse("#####\n#ab #\n#####\n"),
            Err(TrackError::NoFinishLine)
        ));
        assert!(matches!(
            Track::parse("#####\n#ab>#\n#  <#\n#####\n"),
            Err(TrackError::MixedFinishLine('>', '<'))
        ));
        assert!(matches!(
            Track::parse("############\n#abcdefghij>\n############\n"),
            Err(TrackError::TooManyCars { found: 10, max: 9 })
        ));
    }

    #[test]
    fn collision_predicate_ignores_own_position() {
        let track = Track::parse(HORIZONTAL).unwrap();
        assert!(!track.is_crash(0, Vector::new(1, 1)));
        assert!(track.is_crash(0, Vector::new(1, 2)));
        assert!(track.is_crash(1, Vector::new(1, 1)));
        assert!(track.is_crash(0, Vector::new(1, 0)));
        assert!(!track.is_crash(0, Vector::new(27, 1)));
    }

    #[test]
    fn renders_cars_and_crashes() {
        let mut track = Track::parse(HORIZONTAL).unwrap();
        track.car_mut(1).crash();
        let rendered = track.to_string();
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows[1], "#a                         > #");
        assert_eq!(rows[2], "#X                         > #");
    }
}
