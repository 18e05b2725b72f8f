//! Discover the room graph reachable from a starting room.

use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::graph::Graph;
use crate::room::RoomMap;

/// Walk the map breadth-first from `start`, registering every reachable
/// room and one directed edge per mapped exit. Exits whose far side is
/// unmapped are skipped.
#[tracing::instrument(skip(map), fields(start = %start))]
pub fn discover<M: RoomMap>(map: &M, start: M::Room) -> Result<Graph<M::Room>> {
    let mut graph = Graph::new();
    let mut queue: VecDeque<M::Room> = VecDeque::from([start]);
    let mut seen: HashSet<M::Room> = HashSet::from([start]);
    let mut links: Vec<(M::Room, M::Room)> = Vec::new();

    while let Some(room) = queue.pop_front() {
        graph.add_vertex(room)?;
        for direction in map.exits(room) {
            let Some(neighbor) = map.room_in_direction(room, direction) else {
                tracing::trace!(room = %room, %direction, "unmapped exit");
                continue;
            };
            links.push((room, neighbor));
            if seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    // Every linked room has been registered once the queue drains
    for (from, to) in &links {
        graph.add_edge(from, to)?;
    }

    tracing::debug!(
        rooms = graph.len(),
        edges = graph.edge_count(),
        "discovered maze"
    );
    Ok(graph)
}
