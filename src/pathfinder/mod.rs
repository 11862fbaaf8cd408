use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::line;
use crate::track::{CellType, Track};
use crate::vector::Vector;

pub mod steering;

pub use steering::Steering;

/// Cost of entering a wall, or a finish cell from the wrong side. Finite so sums stay finite.
pub const COST_IMPASSABLE: f64 = f64::MAX / 1_000_000.0;
pub const COST_OPEN: f64 = 1.0;
pub const COST_NEAR_WALL: f64 = 2.0;
pub const COST_DIRECTION_CONSTANT: f64 = 0.001;

/// Waypoints from the car's position to the finish line, consumed front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    waypoints: VecDeque<Vector>,
}

impl Route {
    pub fn next_waypoint(&mut self) -> Option<Vector> {
        self.waypoints.pop_front()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector> {
        self.waypoints.iter()
    }

    pub fn last(&self) -> Option<Vector> {
        self.waypoints.back().copied()
    }
}

impl FromIterator<Vector> for Route {
    fn from_iter<I: IntoIterator<Item = Vector>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    position: Vector,
    predecessor: Option<usize>,
    total_cost: f64,
}

/// Heap entry pointing into the node arena. Cheapest first, then first pushed.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: f64,
    sequence: u64,
    node: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Cost-weighted search from a position to the finish line of a track.
///
/// Cars are ignored, only the cell grid matters.
pub struct RoutePlanner<'a> {
    track: &'a Track,
}

impl<'a> RoutePlanner<'a> {
    pub const fn new(track: &'a Track) -> Self {
        Self { track }
    }

    /// Plans and straightens a route from `start` to the finish line.
    ///
    /// The route starts with `start` itself. It is empty when no finish cell can be reached.
    pub fn plan(&self, start: Vector) -> Route {
        let path = self.find_path(start);
        if path.is_empty() {
            warn!(start = %start, "finish line unreachable");
            return Route::default();
        }

        let searched = path.len();
        let route: Route = self.optimize(path).into_iter().collect();
        debug!(start = %start, searched, waypoints = route.len(), "route planned");
        route
    }

    /// Cheapest 8-connected cell path from `start` to the first finish cell reached.
    pub fn find_path(&self, start: Vector) -> Vec<Vector> {
        let mut nodes = vec![SearchNode {
            position: start,
            predecessor: None,
            total_cost: 0.0,
        }];
        let mut best: HashMap<Vector, usize> = HashMap::from([(start, 0)]);
        let mut visited: HashSet<Vector> = HashSet::new();
        let mut frontier = BinaryHeap::from([FrontierEntry {
            cost: 0.0,
            sequence: 0,
            node: 0,
        }]);
        let mut sequence = 1;

        while let Some(entry) = frontier.pop() {
            let current = nodes[entry.node];
            if best.get(&current.position) != Some(&entry.node)
                || visited.contains(&current.position)
                || current.total_cost >= COST_IMPASSABLE
            {
                continue;
            }

            if self.track.cell_type(current.position).is_finish() {
                trace!(goal = %current.position, cost = current.total_cost, "finish reached");
                return reconstruct(&nodes, entry.node);
            }

            for neighbour in current.position.neighbours() {
                if visited.contains(&neighbour) {
                    continue;
                }

                let cost = current.total_cost + self.move_cost(&nodes, &current, neighbour);
                let known = best
                    .get(&neighbour)
                    .map_or(f64::MAX, |&index| nodes[index].total_cost);
                if cost < known {
                    nodes.push(SearchNode {
                        position: neighbour,
                        predecessor: Some(entry.node),
                        total_cost: cost,
                    });
                    best.insert(neighbour, nodes.len() - 1);
                    frontier.push(FrontierEntry {
                        cost,
                        sequence,
                        node: nodes.len() - 1,
                    });
                    sequence += 1;
                }
            }
            visited.insert(current.position);
        }

        Vec::new()
    }

    /// Removes waypoints whose neighbours can see each other, walking back from the goal.
    pub fn optimize(&self, mut path: Vec<Vector>) -> Vec<Vector> {
        let mut current = path.len().saturating_sub(1);
        while current >= 2 {
            if self.has_line_of_sight(path[current], path[current - 2]) {
                path.remove(current - 1);
            }
            current -= 1;
        }
        path
    }

    /// True when the raster line from `from` to `to` crosses no wall.
    pub fn has_line_of_sight(&self, from: Vector, to: Vector) -> bool {
        line::trace(from, to)
            .into_iter()
            .all(|point| self.track.cell_type(point) != CellType::Wall)
    }

    fn move_cost(&self, nodes: &[SearchNode], from: &SearchNode, to: Vector) -> f64 {
        let cell = self.track.cell_type(to);
        let step = to - from.position;
        if cell == CellType::Wall {
            return COST_IMPASSABLE;
        }
        if let Some((axis, forward)) = cell.finish_direction() {
            if step.component(axis) != forward {
                return COST_IMPASSABLE;
            }
        }

        let base = if self.is_near_wall(to) {
            COST_NEAR_WALL
        } else {
            COST_OPEN
        };
        let turn = from.predecessor.map_or(0.0, |index| {
            let previous = from.position - nodes[index].position;
            COST_DIRECTION_CONSTANT * f64::from(1 - previous.dot(step))
        });
        base + turn
    }

    fn is_near_wall(&self, position: Vector) -> bool {
        position
            .neighbours()
            .any(|neighbour| self.track.cell_type(neighbour) == CellType::Wall)
    }
}

fn reconstruct(nodes: &[SearchNode], goal: usize) -> Vec<Vector> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        path.push(nodes[index].position);
        cursor = nodes[index].predecessor;
    }
    path.reverse();
    path
}
