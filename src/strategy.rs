use std::collections::VecDeque;

use crate::direction::Direction;
use crate::error::Result;
use crate::game::Game;
use crate::pathfinder::{RoutePlanner, Steering};
use crate::runtime::{DirectionInput, ScriptDriver};

/// Who decides a car's acceleration each turn.
#[derive(Debug, Clone, Default)]
pub enum MoveStrategy {
    /// Never accelerates. Crashed cars end up here.
    #[default]
    DoNotMove,
    /// Asks the player through the race's [`DirectionInput`].
    User,
    /// Replays recorded accelerations, then coasts.
    MoveList(VecDeque<Direction>),
    /// Steers along a route of waypoints loaded from a file.
    PathFollower(Steering),
    /// Plans its own route on the first move it is asked for.
    PathFinder(Option<Steering>),
    Script(ScriptDriver),
}

impl MoveStrategy {
    pub fn move_list(moves: impl IntoIterator<Item = Direction>) -> Self {
        Self::MoveList(moves.into_iter().collect())
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::DoNotMove => "do not move",
            Self::User => "user",
            Self::MoveList(_) => "move list",
            Self::PathFollower(_) => "path follower",
            Self::PathFinder(_) => "path finder",
            Self::Script(_) => "script",
        }
    }

    pub fn next_move(
        &mut self,
        game: &Game,
        car_index: usize,
        input: &mut dyn DirectionInput,
    ) -> Result<Direction> {
        let direction = match self {
            Self::DoNotMove => Direction::None,
            Self::User => input.next_direction(game.track().car(car_index))?,
            Self::MoveList(moves) => moves.pop_front().unwrap_or_default(),
            Self::PathFollower(steering) => steering.next_move(game, car_index),
            Self::PathFinder(planned) => planned
                .get_or_insert_with(|| {
                    let start = game.track().car(car_index).position();
                    Steering::new(RoutePlanner::new(game.track()).plan(start))
                })
                .next_move(game, car_index),
            Self::Script(driver) => driver.next_direction(game, car_index)?,
        };
        Ok(direction)
    }
}
