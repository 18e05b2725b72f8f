//! Directed graph represented as a map from vertex to its outbound neighbours.
//!
//! Vertices must be registered before edges can reference them. Neighbour
//! sets have no defined iteration order.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::GraphError;

/// Bounds every vertex identifier has to satisfy
pub trait Vertex: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Vertex for T {}

/// A directed graph without parallel edges
#[derive(Debug, Clone)]
pub struct Graph<V: Vertex> {
    vertices: HashMap<V, HashSet<V>>,
}

impl<V: Vertex> Default for Graph<V> {
    fn default() -> Self {
        Self {
            vertices: HashMap::new(),
        }
    }
}

impl<V: Vertex> Graph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vertex with no outbound edges
    pub fn add_vertex(&mut self, id: V) -> Result<(), GraphError> {
        if self.vertices.contains_key(&id) {
            return Err(GraphError::duplicate(&id));
        }
        self.vertices.insert(id, HashSet::new());
        Ok(())
    }

    /// Add a directed edge. Both endpoints must already be registered;
    /// the error names every missing endpoint.
    pub fn add_edge(&mut self, from: &V, to: &V) -> Result<(), GraphError> {
        self.require(&[from, to])?;
        if let Some(edges) = self.vertices.get_mut(from) {
            edges.insert(to.clone());
        }
        Ok(())
    }

    /// Outbound neighbours of a vertex, in no particular order
    pub fn neighbors(&self, id: &V) -> Result<Vec<V>, GraphError> {
        self.edges(id).map(|edges| edges.iter().cloned().collect())
    }

    /// Borrow the neighbour set of a vertex
    pub(crate) fn edges(&self, id: &V) -> Result<&HashSet<V>, GraphError> {
        self.vertices.get(id).ok_or_else(|| GraphError::unknown(id))
    }

    /// Borrow the stored key for a vertex along with its neighbour set
    pub(crate) fn entry(&self, id: &V) -> Result<(&V, &HashSet<V>), GraphError> {
        self.vertices
            .get_key_value(id)
            .ok_or_else(|| GraphError::unknown(id))
    }

    /// Fail with every id that is not registered
    pub(crate) fn require(&self, ids: &[&V]) -> Result<(), GraphError> {
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !self.vertices.contains_key(**id))
            .map(|id| format!("{:?}", id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GraphError::UnknownVertex { ids: missing })
        }
    }

    pub fn contains(&self, id: &V) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn has_edge(&self, from: &V, to: &V) -> bool {
        self.vertices
            .get(from)
            .is_some_and(|edges| edges.contains(to))
    }

    /// All registered vertices, in no particular order
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.keys()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.values().map(HashSet::len).sum()
    }
}
