//! All-pairs shortest routes over a discovered graph.
//!
//! Routes are computed breadth-first, independently for every source, and
//! kept in discovery order so that nearer targets come first.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::error::GraphError;
use crate::graph::{Graph, Vertex};

/// Route between two rooms as dense room indices, both endpoints included
pub(crate) type Route = SmallVec<[usize; 8]>;

/// Shortest route from `source` to every room reachable from it,
/// both endpoints included
pub fn shortest_routes<V: Vertex>(
    graph: &Graph<V>,
    source: &V,
) -> Result<HashMap<V, Vec<V>>, GraphError> {
    Ok(graph
        .bfs_tree(source)?
        .into_iter()
        .filter_map(|route| route.last().cloned().map(|target| (target, route)))
        .collect())
}

/// Precomputed shortest routes between every pair of connected rooms.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable<V: Vertex + Ord> {
    /// Rooms in ascending order; a room's position is its dense index
    rooms: Vec<V>,
    index: HashMap<V, usize>,
    /// Per source, routes in breadth-first discovery order
    routes: Vec<Vec<Route>>,
}

impl<V: Vertex + Ord> RouteTable<V> {
    #[tracing::instrument(skip(graph), fields(rooms = graph.len()))]
    pub fn build(graph: &Graph<V>) -> Result<Self, GraphError> {
        let mut rooms: Vec<V> = graph.vertices().cloned().collect();
        rooms.sort();
        let index: HashMap<V, usize> = rooms
            .iter()
            .enumerate()
            .map(|(i, room)| (room.clone(), i))
            .collect();

        let mut routes = Vec::with_capacity(rooms.len());
        for room in &rooms {
            let from_room = graph
                .bfs_tree(room)?
                .iter()
                .map(|route| route.iter().map(|r| index[r]).collect::<Route>())
                .collect::<Vec<_>>();
            routes.push(from_room);
        }

        let total: usize = routes.iter().map(Vec::len).sum();
        tracing::debug!(routes = total, "built route table");

        Ok(Self {
            rooms,
            index,
            routes,
        })
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms covered by the table, ascending
    pub fn rooms(&self) -> &[V] {
        &self.rooms
    }

    /// Shortest route between two rooms, or `None` if `to` is unreachable
    pub fn route(&self, from: &V, to: &V) -> Option<Vec<V>> {
        let from = *self.index.get(from)?;
        let to = *self.index.get(to)?;
        self.routes[from]
            .iter()
            .find(|route| route.last() == Some(&to))
            .map(|route| self.resolve(route))
    }

    /// Every shortest route leaving `source`, nearest targets first
    pub fn routes_from(&self, source: &V) -> Option<Vec<Vec<V>>> {
        let source = *self.index.get(source)?;
        Some(
            self.routes[source]
                .iter()
                .map(|route| self.resolve(route))
                .collect(),
        )
    }

    pub(crate) fn index_of(&self, room: &V) -> Option<usize> {
        self.index.get(room).copied()
    }

    pub(crate) fn room(&self, index: usize) -> &V {
        &self.rooms[index]
    }

    pub(crate) fn dense_routes(&self, source: usize) -> &[Route] {
        &self.routes[source]
    }

    pub(crate) fn resolve(&self, route: &[usize]) -> Vec<V> {
        route.iter().map(|&i| self.rooms[i].clone()).collect()
    }
}
