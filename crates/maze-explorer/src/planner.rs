//! Greedy exploration planner.
//!
//! Given every shortest route in the maze, the planner repeatedly picks the
//! next route to walk from its current room until every room has been
//! entered, then turns the room sequence into compass moves. The default
//! strategy scores routes by how much unvisited territory lies around the
//! rooms they pass through. This is a heuristic: the result covers every
//! room but is not guaranteed to be the shortest such walk.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::discovery::discover;
use crate::error::{ExploreError, GraphError, Result};
use crate::graph::Vertex;
use crate::room::{Direction, RoomMap};
use crate::routes::{Route, RouteTable};

/// How the next target room is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Follow the route whose rooms have the highest average weighted value
    #[default]
    WeightedGreedy,
    /// Head for the nearest unvisited dead end, else the nearest unvisited room
    DeadEndFirst,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weighted" | "weighted-greedy" => Ok(Strategy::WeightedGreedy),
            "dead-end" | "dead-end-first" => Ok(Strategy::DeadEndFirst),
            other => Err(format!(
                "unknown strategy '{}' (expected: weighted or dead-end)",
                other
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::WeightedGreedy => write!(f, "weighted"),
            Strategy::DeadEndFirst => write!(f, "dead-end"),
        }
    }
}

/// Configuration for the planner
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub strategy: Strategy,
}

/// Planner progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    /// Rooms remain unvisited
    Planning,
    /// Every room has been visited
    Done,
}

/// Result of a full exploration
#[derive(Debug, Clone)]
pub struct Exploration<R> {
    /// Moves to replay from the start room
    pub directions: Vec<Direction>,
    /// Rooms in walking order, starting with the start room
    pub rooms: Vec<R>,
    /// Rooms discovered from the start
    pub total_rooms: usize,
    /// Moves that entered a room already entered before
    pub revisits: usize,
    /// Routes the planner stitched together
    pub segments: usize,
    pub time_elapsed_ms: u64,
}

impl<R> Exploration<R> {
    pub fn moves(&self) -> usize {
        self.directions.len()
    }
}

/// Pass-through counts: for each source room, how many of its shortest
/// routes include each room (sparse rows)
struct Scorer {
    through: Vec<Vec<(usize, u64)>>,
}

impl Scorer {
    fn new<V: Vertex + Ord>(table: &RouteTable<V>) -> Self {
        let n = table.len();
        let mut through = Vec::with_capacity(n);
        let mut counts = vec![0u64; n];
        for source in 0..n {
            for route in table.dense_routes(source) {
                for &room in route {
                    counts[room] += 1;
                }
            }
            let row: Vec<(usize, u64)> = counts
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(|(room, &count)| (room, count))
                .collect();
            counts.iter_mut().for_each(|count| *count = 0);
            through.push(row);
        }
        Self { through }
    }

    /// Per room: the number of unvisited rooms along its shortest routes,
    /// summed over every route
    fn unweighted(&self, visited: &[bool]) -> Vec<u64> {
        self.through
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(room, _)| !visited[*room])
                    .map(|(_, count)| count)
                    .sum()
            })
            .collect()
    }

    /// Per room: the unweighted value of every room along its shortest
    /// routes, summed over every route
    fn weighted(&self, unweighted: &[u64]) -> Vec<u64> {
        self.through
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(room, count)| count * unweighted[*room])
                    .sum()
            })
            .collect()
    }
}

/// Incremental planner over a prebuilt route table
pub struct RoutePlanner<'t, V: Vertex + Ord> {
    table: &'t RouteTable<V>,
    strategy: Strategy,
    scorer: Option<Scorer>,
    visited: Vec<bool>,
    unvisited: usize,
    position: usize,
    path: Vec<usize>,
    segments: usize,
}

impl<'t, V: Vertex + Ord> RoutePlanner<'t, V> {
    pub fn new(table: &'t RouteTable<V>, start: &V, config: &PlannerConfig) -> Result<Self> {
        let position = table
            .index_of(start)
            .ok_or_else(|| GraphError::unknown(start))?;
        let mut visited = vec![false; table.len()];
        visited[position] = true;
        let scorer = match config.strategy {
            Strategy::WeightedGreedy => Some(Scorer::new(table)),
            Strategy::DeadEndFirst => None,
        };

        Ok(Self {
            table,
            strategy: config.strategy,
            scorer,
            visited,
            unvisited: table.len() - 1,
            position,
            path: vec![position],
            segments: 0,
        })
    }

    pub fn state(&self) -> PlanState {
        if self.unvisited == 0 {
            PlanState::Done
        } else {
            PlanState::Planning
        }
    }

    /// Room the walk currently ends in
    pub fn position(&self) -> &V {
        self.table.room(self.position)
    }

    pub fn unvisited(&self) -> usize {
        self.unvisited
    }

    /// Rooms walked so far, starting with the start room
    pub fn path(&self) -> Vec<V> {
        self.table.resolve(&self.path)
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Choose and walk the next route. Fails with `PlanningStalled` when
    /// unvisited rooms remain but none can be reached from here.
    pub fn step(&mut self) -> Result<PlanState> {
        if self.state() == PlanState::Done {
            return Ok(PlanState::Done);
        }

        let chosen = match self.strategy {
            Strategy::WeightedGreedy => self.best_scored_route(),
            Strategy::DeadEndFirst => self.nearest_dead_end_route(),
        };
        let Some(route) = chosen else {
            return Err(ExploreError::PlanningStalled {
                position: format!("{:?}", self.position()),
                unvisited: self.unvisited,
            });
        };

        for &room in &route[1..] {
            if !self.visited[room] {
                self.visited[room] = true;
                self.unvisited -= 1;
            }
            self.path.push(room);
        }
        self.position = route[route.len() - 1];
        self.segments += 1;

        tracing::debug!(
            target_room = ?self.position(),
            length = route.len() - 1,
            remaining = self.unvisited,
            "walked segment"
        );
        Ok(self.state())
    }

    /// Step until every room is visited
    pub fn run(&mut self) -> Result<()> {
        while self.step()? == PlanState::Planning {}
        Ok(())
    }

    fn has_unvisited(&self, route: &[usize]) -> bool {
        route.iter().any(|&room| !self.visited[room])
    }

    /// Highest average weighted value among routes from the current room
    /// that still enter an unvisited room. The first best route wins ties.
    fn best_scored_route(&self) -> Option<Route> {
        let scorer = self.scorer.as_ref()?;
        let unweighted = scorer.unweighted(&self.visited);
        let weighted = scorer.weighted(&unweighted);

        let mut best: Option<(&Route, f64)> = None;
        for route in self.table.dense_routes(self.position) {
            if !self.has_unvisited(route) {
                continue;
            }
            let total: u64 = route.iter().map(|&room| weighted[room]).sum();
            let score = total as f64 / route.len() as f64;
            if score <= 0.0 {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((route, score));
            }
        }
        best.map(|(route, _)| route.clone())
    }

    /// Nearest unvisited room that has no unvisited neighbour left once the
    /// route to it is walked; falls back to the nearest unvisited room
    fn nearest_dead_end_route(&self) -> Option<Route> {
        let routes = self.table.dense_routes(self.position);
        let mut nearest: Option<&Route> = None;

        for route in routes {
            let target = route[route.len() - 1];
            if self.visited[target] {
                continue;
            }
            if nearest.is_none() {
                nearest = Some(route);
            }
            if self.is_dead_end(target, route) {
                return Some(route.clone());
            }
        }
        nearest.cloned()
    }

    fn is_dead_end(&self, room: usize, route: &[usize]) -> bool {
        self.table
            .dense_routes(room)
            .iter()
            .filter(|neighbor| neighbor.len() == 2)
            .all(|neighbor| self.visited[neighbor[1]] || route.contains(&neighbor[1]))
    }
}

/// Turn a walk into compass moves. Each move uses the first direction, in
/// north, south, east, west order, whose exit leads to the next room.
pub fn to_directions<M: RoomMap>(map: &M, rooms: &[M::Room]) -> Result<Vec<Direction>> {
    rooms
        .windows(2)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            Direction::ALL
                .into_iter()
                .find(|&direction| map.neighbor(from, direction) == Some(to))
                .ok_or_else(|| ExploreError::AmbiguousOrUnknownDirection {
                    from: from.to_string(),
                    to: to.to_string(),
                })
        })
        .collect()
}

/// Discover the maze from `start` and plan a walk that enters every room
#[tracing::instrument(skip(map, config), fields(start = %start, strategy = %config.strategy))]
pub fn explore<M: RoomMap>(
    map: &M,
    start: M::Room,
    config: &PlannerConfig,
) -> Result<Exploration<M::Room>> {
    let start_time = Instant::now();

    let graph = discover(map, start)?;
    let table = RouteTable::build(&graph)?;

    let mut planner = RoutePlanner::new(&table, &start, config)?;
    planner.run()?;

    let rooms = planner.path();
    let directions = to_directions(map, &rooms)?;
    let revisits = count_revisits(&rooms);

    tracing::info!(
        rooms = table.len(),
        moves = directions.len(),
        revisits,
        "exploration planned"
    );

    Ok(Exploration {
        directions,
        rooms,
        total_rooms: table.len(),
        revisits,
        segments: planner.segments(),
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    })
}

/// Moves that visit every room reachable from `start`, using the
/// default weighted strategy
pub fn find_path<M: RoomMap>(map: &M, start: M::Room) -> Result<Vec<Direction>> {
    Ok(explore(map, start, &PlannerConfig::default())?.directions)
}

fn count_revisits<R: Copy + Eq + std::hash::Hash>(rooms: &[R]) -> usize {
    let mut seen = std::collections::HashSet::new();
    rooms.iter().filter(|room| !seen.insert(**room)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::replay;
    use crate::room::fixtures;
    use crate::room::{MazeConfig, World};
    use std::collections::BTreeMap;

    fn config(strategy: Strategy) -> PlannerConfig {
        PlannerConfig { strategy }
    }

    #[test]
    fn test_linear_maze() {
        let world = fixtures::linear();
        let directions = find_path(&world, 0).unwrap();
        assert_eq!(
            directions,
            vec![Direction::East, Direction::East, Direction::East]
        );

        let exploration = explore(&world, 0, &config(Strategy::DeadEndFirst)).unwrap();
        assert_eq!(exploration.moves(), 3);
        assert_eq!(exploration.revisits, 0);
    }

    #[test]
    fn test_linear_maze_from_middle() {
        let world = fixtures::linear();
        let exploration = explore(&world, 1, &PlannerConfig::default()).unwrap();
        let walked = replay(&world, 1, &exploration.directions).unwrap();
        assert_eq!(walked.visited.len(), 4);
        assert_eq!(exploration.rooms.first(), Some(&1));
    }

    #[test]
    fn test_star_maze_round_trips() {
        let world = fixtures::star();
        for strategy in [Strategy::WeightedGreedy, Strategy::DeadEndFirst] {
            let exploration = explore(&world, 0, &config(strategy)).unwrap();

            // Out and back for two leaves, out only for the last
            assert_eq!(exploration.moves(), 5);
            assert_eq!(exploration.segments, 3);
            assert_eq!(exploration.rooms[0], 0);
            assert_eq!(exploration.rooms[2], 0);
            assert_eq!(exploration.rooms[4], 0);
            let leaves: std::collections::HashSet<u32> = [
                exploration.rooms[1],
                exploration.rooms[3],
                exploration.rooms[5],
            ]
            .into_iter()
            .collect();
            assert_eq!(leaves, std::collections::HashSet::from([1, 2, 3]));
        }
    }

    #[test]
    fn test_grid_coverage() {
        for size in [2, 3, 5] {
            let world = fixtures::grid(size);
            for strategy in [Strategy::WeightedGreedy, Strategy::DeadEndFirst] {
                let exploration = explore(&world, 0, &config(strategy)).unwrap();
                let walked = replay(&world, 0, &exploration.directions).unwrap();

                assert_eq!(exploration.total_rooms, (size * size) as usize);
                assert_eq!(walked.visited.len(), (size * size) as usize);
                assert_eq!(walked.rooms, exploration.rooms);
                assert_eq!(
                    exploration.revisits,
                    exploration.moves() + 1 - exploration.total_rooms
                );
            }
        }
    }

    #[test]
    fn test_single_room() {
        let world = fixtures::two_way(7, &[]);
        let exploration = explore(&world, 7, &PlannerConfig::default()).unwrap();
        assert!(exploration.directions.is_empty());
        assert_eq!(exploration.rooms, vec![7]);
        assert_eq!(exploration.segments, 0);
    }

    #[test]
    fn test_one_way_fork_stalls() {
        // 0 -> 1 east and 0 -> 2 west, with no way back
        let mut rooms = BTreeMap::new();
        rooms.insert(
            0,
            BTreeMap::from([(Direction::East, Some(1)), (Direction::West, Some(2))]),
        );
        rooms.insert(1, BTreeMap::new());
        rooms.insert(2, BTreeMap::new());
        let world = World::from_config(MazeConfig { start: 0, rooms }).unwrap();

        for strategy in [Strategy::WeightedGreedy, Strategy::DeadEndFirst] {
            let err = explore(&world, 0, &config(strategy)).unwrap_err();
            assert!(matches!(
                err,
                ExploreError::PlanningStalled { unvisited: 1, .. }
            ));
        }
    }

    #[test]
    fn test_planner_state_machine() {
        let world = fixtures::star();
        let graph = discover(&world, 0).unwrap();
        let table = RouteTable::build(&graph).unwrap();
        let mut planner = RoutePlanner::new(&table, &0, &PlannerConfig::default()).unwrap();

        assert_eq!(planner.state(), PlanState::Planning);
        assert_eq!(planner.unvisited(), 3);
        assert_eq!(planner.step().unwrap(), PlanState::Planning);
        assert_eq!(planner.unvisited(), 2);
        assert_eq!(planner.step().unwrap(), PlanState::Planning);
        assert_eq!(planner.step().unwrap(), PlanState::Done);
        // Further steps are no-ops
        assert_eq!(planner.step().unwrap(), PlanState::Done);
        assert_eq!(planner.path().len(), 6);
    }

    #[test]
    fn test_planner_unknown_start() {
        let world = fixtures::star();
        let graph = discover(&world, 0).unwrap();
        let table = RouteTable::build(&graph).unwrap();
        assert!(RoutePlanner::new(&table, &9, &PlannerConfig::default()).is_err());
    }

    #[test]
    fn test_weighted_prefers_long_unvisited_route() {
        // From the start, walking the whole corridor scores higher than
        // stopping part way
        let world = fixtures::linear();
        let graph = discover(&world, 0).unwrap();
        let table = RouteTable::build(&graph).unwrap();
        let mut planner = RoutePlanner::new(&table, &0, &PlannerConfig::default()).unwrap();

        assert_eq!(planner.step().unwrap(), PlanState::Done);
        assert_eq!(planner.path(), vec![0, 1, 2, 3]);
        assert_eq!(planner.position(), &3);
    }

    #[test]
    fn test_to_directions_rejects_non_adjacent() {
        let world = fixtures::linear();
        assert_eq!(
            to_directions(&world, &[0, 1, 0]).unwrap(),
            vec![Direction::East, Direction::West]
        );
        assert!(to_directions(&world, &[3]).unwrap().is_empty());

        let err = to_directions(&world, &[0, 2]).unwrap_err();
        assert!(matches!(
            err,
            ExploreError::AmbiguousOrUnknownDirection { .. }
        ));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("weighted".parse::<Strategy>(), Ok(Strategy::WeightedGreedy));
        assert_eq!("dead-end".parse::<Strategy>(), Ok(Strategy::DeadEndFirst));
        assert!("random".parse::<Strategy>().is_err());
        assert_eq!(Strategy::DeadEndFirst.to_string(), "dead-end");
    }
}
