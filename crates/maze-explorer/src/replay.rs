//! Replay a sequence of moves through a room map.
//!
//! Used to check a planned walk: every move must go through a mapped exit,
//! and the rooms entered should cover the whole discovered maze.

use std::collections::BTreeSet;

use crate::discovery::discover;
use crate::error::{ExploreError, Result};
use crate::graph::Graph;
use crate::room::{Direction, RoomMap};

/// Rooms entered while replaying a walk
#[derive(Debug, Clone)]
pub struct Replay<R: Ord> {
    /// Rooms in walking order, starting with the start room
    pub rooms: Vec<R>,
    pub visited: BTreeSet<R>,
}

impl<R: Copy + Ord + std::hash::Hash + std::fmt::Debug> Replay<R> {
    /// Rooms of `graph` the walk never entered, ascending
    pub fn missed(&self, graph: &Graph<R>) -> Vec<R> {
        let mut missed: Vec<R> = graph
            .vertices()
            .filter(|room| !self.visited.contains(*room))
            .copied()
            .collect();
        missed.sort();
        missed
    }

    /// Whether every room of `graph` was entered at least once
    pub fn covers(&self, graph: &Graph<R>) -> bool {
        graph.vertices().all(|room| self.visited.contains(room))
    }
}

/// Walk `directions` from `start`. A move through an exit that leads
/// nowhere fails with `BlockedMove`.
pub fn replay<M: RoomMap>(
    map: &M,
    start: M::Room,
    directions: &[Direction],
) -> Result<Replay<M::Room>> {
    let mut rooms = Vec::with_capacity(directions.len() + 1);
    let mut visited = BTreeSet::new();
    rooms.push(start);
    visited.insert(start);

    let mut current = start;
    for &direction in directions {
        current = map
            .room_in_direction(current, direction)
            .ok_or_else(|| ExploreError::BlockedMove {
                room: current.to_string(),
                direction,
            })?;
        rooms.push(current);
        visited.insert(current);
    }

    Ok(Replay { rooms, visited })
}

/// Coverage report for a walk
#[derive(Debug, Clone)]
pub struct Coverage<R> {
    pub total_rooms: usize,
    pub visited_rooms: usize,
    pub moves: usize,
    pub missed: Vec<R>,
}

impl<R> Coverage<R> {
    pub fn complete(&self) -> bool {
        self.missed.is_empty()
    }
}

/// Discover the maze from `start`, replay `directions` and report which
/// discovered rooms the walk missed
pub fn verify_traversal<M: RoomMap>(
    map: &M,
    start: M::Room,
    directions: &[Direction],
) -> Result<Coverage<M::Room>> {
    let graph = discover(map, start)?;
    let walked = replay(map, start, directions)?;
    let missed = walked.missed(&graph);

    Ok(Coverage {
        total_rooms: graph.len(),
        visited_rooms: graph.len() - missed.len(),
        moves: directions.len(),
        missed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::find_path;
    use crate::room::fixtures;

    #[test]
    fn test_replay_linear() {
        let world = fixtures::linear();
        let walked = replay(
            &world,
            0,
            &[Direction::East, Direction::East, Direction::West],
        )
        .unwrap();

        assert_eq!(walked.rooms, vec![0, 1, 2, 1]);
        assert_eq!(walked.visited.len(), 3);

        let graph = discover(&world, 0).unwrap();
        assert!(!walked.covers(&graph));
        assert_eq!(walked.missed(&graph), vec![3]);
    }

    #[test]
    fn test_replay_blocked_move() {
        let world = fixtures::linear();
        let err = replay(&world, 0, &[Direction::North]).unwrap_err();
        assert!(matches!(
            err,
            ExploreError::BlockedMove {
                direction: Direction::North,
                ..
            }
        ));
    }

    #[test]
    fn test_verify_planned_walk() {
        let world = fixtures::grid(4);
        let directions = find_path(&world, 0).unwrap();
        let coverage = verify_traversal(&world, 0, &directions).unwrap();

        assert!(coverage.complete());
        assert_eq!(coverage.total_rooms, 16);
        assert_eq!(coverage.visited_rooms, 16);
        assert_eq!(coverage.moves, directions.len());
    }

    #[test]
    fn test_verify_incomplete_walk() {
        let world = fixtures::star();
        let coverage = verify_traversal(&world, 0, &[Direction::North, Direction::South]).unwrap();

        assert!(!coverage.complete());
        assert_eq!(coverage.visited_rooms, 2);
        assert_eq!(coverage.missed, vec![2, 3]);
    }
}
