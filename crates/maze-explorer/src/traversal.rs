//! Breadth-first and depth-first traversal and path search over a [`Graph`].
//!
//! Both traversals are lazy iterators that borrow the graph and yield each
//! reachable vertex exactly once. The depth-first walk keeps an explicit
//! stack of frames rather than recursing, so deep graphs cannot exhaust the
//! call stack. Recursive formulations are available behind the `recursive`
//! feature for cross-checking.

use std::collections::hash_set;
use std::collections::{HashMap, HashSet, VecDeque};

use smallvec::SmallVec;

use crate::error::GraphError;
use crate::graph::{Graph, Vertex};

/// Breadth-first iterator. Vertices come out in non-decreasing distance
/// from the start; siblings follow neighbour-set order.
pub struct Bft<'g, V: Vertex> {
    graph: &'g Graph<V>,
    queue: VecDeque<&'g V>,
    /// Discovered vertices mapped to the vertex they were discovered from
    parents: HashMap<&'g V, Option<&'g V>>,
}

impl<'g, V: Vertex> Bft<'g, V> {
    fn new(graph: &'g Graph<V>, start: &V) -> Result<Self, GraphError> {
        let (start, _) = graph.entry(start)?;
        let mut parents = HashMap::new();
        parents.insert(start, None);
        Ok(Self {
            graph,
            queue: VecDeque::from([start]),
            parents,
        })
    }

    /// Rebuild the first-discovered route from the start to `vertex`.
    /// Returns `None` for vertices not discovered yet.
    pub fn path_to(&self, vertex: &V) -> Option<Vec<V>> {
        let (mut current, _) = self.parents.get_key_value(vertex)?;
        let mut path = vec![(*current).clone()];
        while let Some(Some(parent)) = self.parents.get(current) {
            path.push((*parent).clone());
            current = parent;
        }
        path.reverse();
        Some(path)
    }
}

impl<'g, V: Vertex> Iterator for Bft<'g, V> {
    type Item = &'g V;

    fn next(&mut self) -> Option<Self::Item> {
        let vertex = self.queue.pop_front()?;
        if let Ok(edges) = self.graph.edges(vertex) {
            for neighbor in edges {
                if !self.parents.contains_key(neighbor) {
                    self.parents.insert(neighbor, Some(vertex));
                    self.queue.push_back(neighbor);
                }
            }
        }
        Some(vertex)
    }
}

/// One level of the depth-first walk: a vertex and the neighbours not yet tried
struct Frame<'g, V> {
    vertex: &'g V,
    remaining: hash_set::Iter<'g, V>,
}

/// Depth-first iterator driven by an explicit frame stack
pub struct Dft<'g, V: Vertex> {
    graph: &'g Graph<V>,
    stack: SmallVec<[Frame<'g, V>; 32]>,
    visited: HashSet<&'g V>,
    start: Option<&'g V>,
}

impl<'g, V: Vertex> Dft<'g, V> {
    fn new(graph: &'g Graph<V>, start: &V) -> Result<Self, GraphError> {
        let (start, _) = graph.entry(start)?;
        Ok(Self {
            graph,
            stack: SmallVec::new(),
            visited: HashSet::new(),
            start: Some(start),
        })
    }

    fn descend(&mut self, vertex: &'g V) {
        self.visited.insert(vertex);
        if let Ok(edges) = self.graph.edges(vertex) {
            self.stack.push(Frame {
                vertex,
                remaining: edges.iter(),
            });
        }
    }

    /// Route from the start to the most recently yielded vertex
    pub fn current_path(&self) -> Vec<V> {
        self.stack.iter().map(|frame| frame.vertex.clone()).collect()
    }
}

impl<'g, V: Vertex> Iterator for Dft<'g, V> {
    type Item = &'g V;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.start.take() {
            self.descend(start);
            return Some(start);
        }

        loop {
            let next = {
                let frame = self.stack.last_mut()?;
                let visited = &self.visited;
                frame.remaining.find(|neighbor| !visited.contains(*neighbor))
            };
            match next {
                Some(vertex) => {
                    self.descend(vertex);
                    return Some(vertex);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<V: Vertex> Graph<V> {
    /// Breadth-first traversal from `start`
    pub fn bft(&self, start: &V) -> Result<Bft<'_, V>, GraphError> {
        Bft::new(self, start)
    }

    /// Depth-first traversal from `start`
    pub fn dft(&self, start: &V) -> Result<Dft<'_, V>, GraphError> {
        Dft::new(self, start)
    }

    /// Shortest path by edge count, or `None` when `destination` is unreachable.
    /// Among equally short paths the first one discovered wins.
    pub fn bfs(&self, start: &V, destination: &V) -> Result<Option<Vec<V>>, GraphError> {
        self.require(&[start, destination])?;
        let mut bft = self.bft(start)?;
        while let Some(vertex) = bft.next() {
            if vertex == destination {
                return Ok(bft.path_to(vertex));
            }
        }
        Ok(None)
    }

    /// Shortest route to every vertex reachable from `start`, in discovery
    /// order. The first route is the singleton `[start]`.
    pub fn bfs_tree(&self, start: &V) -> Result<Vec<Vec<V>>, GraphError> {
        let mut bft = self.bft(start)?;
        let mut routes: Vec<Vec<V>> = Vec::new();
        let mut index: HashMap<&V, usize> = HashMap::new();

        while let Some(vertex) = bft.next() {
            let route = match bft.parents.get(vertex).copied().flatten() {
                Some(parent) => {
                    // Parents are always yielded before their children
                    let mut route = routes[index[parent]].clone();
                    route.push(vertex.clone());
                    route
                }
                None => vec![vertex.clone()],
            };
            index.insert(vertex, routes.len());
            routes.push(route);
        }

        Ok(routes)
    }

    /// Some path found by depth-first exploration, or `None` when
    /// `destination` is unreachable. Not necessarily the shortest.
    pub fn dfs(&self, start: &V, destination: &V) -> Result<Option<Vec<V>>, GraphError> {
        self.require(&[start, destination])?;
        let mut dft = self.dft(start)?;
        while let Some(vertex) = dft.next() {
            if vertex == destination {
                return Ok(Some(dft.current_path()));
            }
        }
        Ok(None)
    }

    /// Recursive depth-first traversal, returning the visit order
    #[cfg(feature = "recursive")]
    pub fn dft_recursive(&self, start: &V) -> Result<Vec<V>, GraphError> {
        fn visit<'g, V: Vertex>(
            graph: &'g Graph<V>,
            vertex: &'g V,
            visited: &mut HashSet<&'g V>,
            order: &mut Vec<V>,
        ) {
            visited.insert(vertex);
            order.push(vertex.clone());
            if let Ok(edges) = graph.edges(vertex) {
                for neighbor in edges {
                    if !visited.contains(neighbor) {
                        visit(graph, neighbor, visited, order);
                    }
                }
            }
        }

        let (start, _) = self.entry(start)?;
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        visit(self, start, &mut visited, &mut order);
        Ok(order)
    }

    /// Recursive depth-first path search
    #[cfg(feature = "recursive")]
    pub fn dfs_recursive(&self, start: &V, destination: &V) -> Result<Option<Vec<V>>, GraphError> {
        fn search<'g, V: Vertex>(
            graph: &'g Graph<V>,
            vertex: &'g V,
            destination: &V,
            visited: &mut HashSet<&'g V>,
            path: &mut Vec<V>,
        ) -> bool {
            visited.insert(vertex);
            path.push(vertex.clone());
            if vertex == destination {
                return true;
            }
            if let Ok(edges) = graph.edges(vertex) {
                for neighbor in edges {
                    if !visited.contains(neighbor)
                        && search(graph, neighbor, destination, visited, path)
                    {
                        return true;
                    }
                }
            }
            path.pop();
            false
        }

        self.require(&[start, destination])?;
        let (start, _) = self.entry(start)?;
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        if search(self, start, destination, &mut visited, &mut path) {
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}
