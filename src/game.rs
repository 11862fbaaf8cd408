use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::car::Car;
use crate::direction::Direction;
use crate::error::{RaceError, Result};
use crate::finish_line;
use crate::line::trace;
use crate::log::Log;
use crate::runtime::DirectionInput;
use crate::track::Track;
use crate::vector::Vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Active,
    Done,
}

/// Game controller: moves the active car, detects crashes and decides the winner.
#[derive(Debug, Clone)]
pub struct Game {
    state: State,
    turns: usize,
    track: Track,
    current_car: usize,
    winner: Option<usize>,
    logs: Vec<Log>,
}

impl Game {
    pub const fn new(track: Track) -> Self {
        Self {
            state: State::Active,
            turns: 0,
            track,
            current_car: 0,
            winner: None,
            logs: Vec::new(),
        }
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn turns(&self) -> usize {
        self.turns
    }

    pub const fn track(&self) -> &Track {
        &self.track
    }

    /// Direct access to the board, for setting up positions and strategies before the race.
    pub fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    pub const fn current_car_index(&self) -> usize {
        self.current_car
    }

    pub fn current_car(&self) -> &Car {
        self.track.car(self.current_car)
    }

    pub const fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn winner_id(&self) -> Option<char> {
        self.winner.map(|index| self.track.car(index).id())
    }

    pub const fn has_winner(&self) -> bool {
        self.winner.is_some()
    }

    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Would the car at `car_index` crash into a wall or another car at `position`?
    pub fn will_car_crash(&self, car_index: usize, position: Vector) -> bool {
        self.track.is_crash(car_index, position)
    }

    /// Plays one turn for the active car.
    ///
    /// The car accelerates, then the cells between its position and its new end point are walked in
    /// order. The first wall or car on the way crashes it in place; finish line crossings along the
    /// driven part still count. Otherwise the car completes the move. The caller checks the winner
    /// and switches cars afterwards.
    pub fn do_car_turn(&mut self, acceleration: Direction) -> Result<()> {
        if self.state == State::Done {
            return Err(RaceError::RaceFinished);
        }

        let index = self.current_car;
        let start = self.track.car(index).position();
        let mut log = Log {
            turn: self.turns,
            current_car: self.track.car(index).id(),
            acceleration,
            from: start,
            ..Log::default()
        };

        if self.track.car(index).is_crashed() {
            self.win_by_last_alive();
        } else {
            self.track.car_mut(index).accelerate(acceleration);
            let path = trace(start, self.track.car(index).next_position());

            if let Some(crash_at) = path
                .iter()
                .position(|&point| self.track.is_crash(index, point))
            {
                let crash_position = path[crash_at];
                log.crossing = finish_line::crossing(&self.track, &path[..=crash_at]);

                let car = self.track.car_mut(index);
                car.crash();
                car.set_position(crash_position);
                if let Some(crossing) = log.crossing {
                    car.record_crossing(crossing);
                }
                info!(car = %car.id(), position = %crash_position, "car crashed");

                self.win_by_last_alive();
            }

            if !self.has_winner() && !self.track.car(index).is_crashed() {
                log.crossing = finish_line::crossing(&self.track, &path);

                let car = self.track.car_mut(index);
                if let Some(crossing) = log.crossing {
                    car.record_crossing(crossing);
                }
                car.move_to_next();
            }
        }

        self.win_by_crossing_finish_line();

        let car = self.track.car(index);
        log.to = car.position();
        log.velocity = car.velocity();
        log.add_info(
            self.track.cars().iter().map(Car::position).collect(),
            car.is_crashed(),
            car.finish_line_crossings(),
        );
        debug!(
            turn = log.turn,
            car = %log.current_car,
            acceleration = %acceleration,
            from = %log.from,
            to = %log.to,
            "turn played"
        );
        self.logs.push(log);
        self.turns += 1;

        Ok(())
    }

    /// Moves the turn on to the next car that has not crashed.
    ///
    /// Stops early once a winner exists, so a board of crashed cars cannot loop forever.
    /// A decided race keeps its current car and winner.
    pub fn switch_to_next_active_car(&mut self) {
        if self.has_winner() {
            return;
        }
        let count = self.track.car_count();
        for _ in 0..count {
            self.current_car = (self.current_car + 1) % count;
            self.win_by_last_alive();
            if self.has_winner() || !self.current_car().is_crashed() {
                break;
            }
        }
    }

    /// Asks the active car's driver for this turn's acceleration.
    pub fn next_move(&mut self, input: &mut dyn DirectionInput) -> Result<Direction> {
        let index = self.current_car;
        let mut strategy = self.track.car_mut(index).take_strategy();
        let direction = strategy.next_move(self, index, input);
        self.track.car_mut(index).set_strategy(strategy);
        direction
    }

    /// Runs turns until a car wins or `max_turns` turns have been played.
    ///
    /// `on_turn` sees the game after every turn. Returns the id of the winning car.
    pub fn race(
        &mut self,
        input: &mut dyn DirectionInput,
        max_turns: usize,
        mut on_turn: impl FnMut(&Self),
    ) -> Result<Option<char>> {
        while self.state == State::Active && self.turns < max_turns {
            let direction = self.next_move(input)?;
            self.do_car_turn(direction)?;
            on_turn(self);
            self.switch_to_next_active_car();
        }

        if self.state == State::Active {
            info!(turns = self.turns, "turn limit reached without a winner");
        }
        Ok(self.winner_id())
    }

    pub fn log_json(&self) -> serde_json::Value {
        serde_json::json!({"logs": self.logs, "winner": self.winner_id()})
    }

    /// Writes the race log to `logs_<unix seconds>.json` inside `dir`.
    pub fn export_log(&self, dir: &Path) -> Result<PathBuf> {
        let time_now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        std::fs::create_dir_all(dir)?;
        let filename = dir.join(format!("logs_{time_now}.json"));
        let json = serde_json::to_string_pretty(&self.log_json())?;
        File::create(&filename)?.write_all(json.as_bytes())?;

        info!(path = %filename.display(), "race log written");
        Ok(filename)
    }

    fn win_by_last_alive(&mut self) {
        let mut alive = self
            .track
            .cars()
            .iter()
            .enumerate()
            .filter(|(_, car)| !car.is_crashed())
            .map(|(index, _)| index);
        let first = alive.next();
        if alive.next().is_none() {
            self.declare_winner(first.unwrap_or(0));
        }
    }

    fn win_by_crossing_finish_line(&mut self) {
        if self.current_car().finish_line_crossings() >= 1 {
            self.declare_winner(self.current_car);
        }
    }

    fn declare_winner(&mut self, index: usize) {
        if self.winner != Some(index) {
            info!(car = %self.track.car(index).id(), turn = self.turns, "winner decided");
        }
        self.winner = Some(index);
        self.state = State::Done;
    }
}
