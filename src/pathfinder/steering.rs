use std::cmp::Ordering;

use tracing::trace;

use crate::direction::Direction;
use crate::game::Game;
use crate::vector::{Axis, Vector};

use super::Route;

/// Outcome of one acceleration choice for the coming move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    direction: Direction,
    velocity: Vector,
    position: Vector,
}

impl Candidate {
    fn new(position: Vector, velocity: Vector, direction: Direction) -> Self {
        let velocity = velocity + direction.vector();
        Self {
            direction,
            velocity,
            position: position + velocity,
        }
    }

    const fn is_slow(&self) -> bool {
        self.velocity.x.abs() <= 1 && self.velocity.y.abs() <= 1
    }
}

/// How candidates are ordered for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ranking {
    /// Close the distance as fast as possible. Standing still ranks last.
    Pursue,
    /// Shed speed first, progress second.
    Decelerate,
    /// Stay within one cell per turn on each axis, then make progress.
    LowVelocity,
}

impl Ranking {
    fn select(position: Vector, velocity: Vector, goal: Vector) -> Self {
        if is_heading_away(position, velocity, goal)
            || is_beyond_braking_distance(position + velocity, velocity, goal)
        {
            Self::Pursue
        } else if velocity.x.abs() > 1 || velocity.y.abs() > 1 {
            Self::Decelerate
        } else {
            Self::LowVelocity
        }
    }

    /// Best first. `distance` points from the car to its waypoint.
    fn compare(self, distance: Vector, a: &Candidate, b: &Candidate) -> Ordering {
        let progress = || distance.dot(b.velocity).cmp(&distance.dot(a.velocity));
        match self {
            Self::Pursue => match (a.velocity.is_zero(), b.velocity.is_zero()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => progress().then_with(|| {
                    a.velocity
                        .length_squared()
                        .cmp(&b.velocity.length_squared())
                }),
            },
            Self::Decelerate => a
                .velocity
                .manhattan_length()
                .cmp(&b.velocity.manhattan_length())
                .then_with(progress),
            Self::LowVelocity => b.is_slow().cmp(&a.is_slow()).then_with(progress),
        }
    }
}

/// Velocity on some axis points away from the goal.
fn is_heading_away(position: Vector, velocity: Vector, goal: Vector) -> bool {
    Axis::ALL.into_iter().any(|axis| {
        let distance = goal.component(axis) - position.component(axis);
        let speed = velocity.component(axis);
        distance != 0 && speed != 0 && distance.signum() != speed.signum()
    })
}

/// On some axis the goal is further from `next` than the car needs to come to a stop.
fn is_beyond_braking_distance(next: Vector, velocity: Vector, goal: Vector) -> bool {
    Axis::ALL.into_iter().any(|axis| {
        let speed = velocity.component(axis).abs();
        let braking_distance = speed * (speed + 1) / 2;
        (goal.component(axis) - next.component(axis)).abs() > braking_distance
    })
}

/// Picks accelerations that drive a car along a route, one waypoint at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Steering {
    route: Route,
    target: Option<Vector>,
}

impl Steering {
    pub fn new(mut route: Route) -> Self {
        let target = route.next_waypoint();
        Self { route, target }
    }

    /// Waypoint the car is currently heading for.
    pub const fn target(&self) -> Option<Vector> {
        self.target
    }

    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Best acceleration for the car at `car_index` that does not end its move in a crash.
    ///
    /// Returns `Direction::None` when the route is used up or every candidate would crash.
    pub fn next_move(&mut self, game: &Game, car_index: usize) -> Direction {
        let car = game.track().car(car_index);
        let (position, velocity) = (car.position(), car.velocity());

        if self.target == Some(position) {
            self.target = self.route.next_waypoint();
        }
        let Some(goal) = self.target else {
            return Direction::None;
        };

        let ranking = Ranking::select(position, velocity, goal);
        let distance = goal - position;
        let mut candidates =
            Direction::ALL.map(|direction| Candidate::new(position, velocity, direction));
        candidates.sort_by(|a, b| ranking.compare(distance, a, b));

        let choice = candidates
            .iter()
            .find(|candidate| !game.will_car_crash(car_index, candidate.position))
            .map_or(Direction::None, |candidate| candidate.direction);
        trace!(car = %car.id(), goal = %goal, ?ranking, %choice, "steering");
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    const HORIZONTAL: &str = include_str!("../../tracks/horizontal.txt");

    fn ranked(position: Vector, velocity: Vector, goal: Vector) -> Vec<Direction> {
        let ranking = Ranking::select(position, velocity, goal);
        let mut candidates =
            Direction::ALL.map(|direction| Candidate::new(position, velocity, direction));
        candidates.sort_by(|a, b| ranking.compare(goal - position, a, b));
        candidates.iter().map(|candidate| candidate.direction).collect()
    }

    fn game_with(position: Vector, accelerations: &[Direction]) -> Game {
        let mut game = Game::new(Track::parse(HORIZONTAL).unwrap());
        let car = game.track_mut().car_mut(0);
        car.set_position(position);
        for &acceleration in accelerations {
            car.accelerate(acceleration);
        }
        game
    }

    #[test]
    fn selects_ranking_from_kinematics() {
        let goal = Vector::new(20, 1);
        assert_eq!(
            Ranking::select(Vector::new(5, 1), Vector::ZERO, goal),
            Ranking::Pursue
        );
        assert_eq!(
            Ranking::select(Vector::new(5, 1), Vector::new(-1, 0), goal),
            Ranking::Pursue
        );
        assert_eq!(
            Ranking::select(Vector::new(12, 1), Vector::new(3, 0), goal),
            Ranking::Decelerate
        );
        assert_eq!(
            Ranking::select(Vector::new(19, 1), Vector::new(1, 0), goal),
            Ranking::LowVelocity
        );
        assert_eq!(
            Ranking::select(Vector::new(20, 1), Vector::ZERO, goal),
            Ranking::LowVelocity
        );
    }

    #[test]
    fn pursue_prefers_progress_then_lower_speed() {
        let order = ranked(Vector::new(1, 1), Vector::ZERO, Vector::new(20, 1));
        assert_eq!(order[0], Direction::Right);
        assert_eq!(&order[1..3], &[Direction::UpRight, Direction::DownRight]);
        assert_eq!(order.last(), Some(&Direction::None));
    }

    #[test]
    fn decelerate_prefers_braking() {
        let order = ranked(Vector::new(12, 1), Vector::new(3, 0), Vector::new(20, 1));
        assert_eq!(order[0], Direction::Left);
        assert_eq!(order[1], Direction::None);
        assert_eq!(&order[2..4], &[Direction::UpLeft, Direction::DownLeft]);
    }

    #[test]
    fn low_velocity_keeps_speed_within_one() {
        let order = ranked(Vector::new(19, 1), Vector::new(1, 0), Vector::new(20, 1));
        assert_eq!(
            &order[..3],
            &[Direction::None, Direction::Up, Direction::Down]
        );
        assert!(!order[..6].contains(&Direction::Right));
    }

    #[test]
    fn advances_waypoint_when_reached() {
        let game = game_with(Vector::new(1, 1), &[]);
        let route: Route = [Vector::new(1, 1), Vector::new(27, 1)]
            .into_iter()
            .collect();
        let mut steering = Steering::new(route);
        assert_eq!(steering.target(), Some(Vector::new(1, 1)));

        assert_eq!(steering.next_move(&game, 0), Direction::Right);
        assert_eq!(steering.target(), Some(Vector::new(27, 1)));
        assert!(steering.route().is_empty());
    }

    #[test]
    fn skips_candidates_that_crash() {
        let game = game_with(Vector::new(5, 1), &[Direction::Up]);
        let route: Route = [Vector::new(5, 0)].into_iter().collect();
        let mut steering = Steering::new(route);

        let choice = steering.next_move(&game, 0);
        let car = game.track().car(0);
        let landing = car.position() + car.velocity() + choice.vector();
        assert!(!game.will_car_crash(0, landing));
        assert_ne!(choice, Direction::None);
    }

    #[test]
    fn exhausted_route_stays_put() {
        let game = game_with(Vector::new(1, 1), &[]);
        let mut steering = Steering::new(Route::default());
        assert_eq!(steering.next_move(&game, 0), Direction::None);
    }

    #[test]
    fn falls_back_to_none_when_every_candidate_crashes() {
        let game = game_with(Vector::new(1, 1), &[Direction::Up, Direction::Up]);
        let route: Route = [Vector::new(27, 1)].into_iter().collect();
        let mut steering = Steering::new(route);
        assert_eq!(steering.next_move(&game, 0), Direction::None);
    }
}
