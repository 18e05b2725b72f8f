//! Graph traversal primitives and a maze exploration planner.
//!
//! The crate provides a small directed-graph type with breadth-first and
//! depth-first traversal and path search, and builds on it to explore a
//! room maze: discover every reachable room, precompute shortest routes
//! between them, and greedily plan a walk that enters every room.

pub mod discovery;
pub mod error;
pub mod graph;
pub mod logging;
pub mod planner;
pub mod replay;
pub mod room;
pub mod routes;
pub mod traversal;

// Re-export main types
pub use discovery::discover;
pub use error::{ExitCode, ExploreError, GraphError, Result};
pub use graph::{Graph, Vertex};
pub use planner::{
    explore, find_path, to_directions, Exploration, PlanState, PlannerConfig, RoutePlanner,
    Strategy,
};
pub use replay::{replay, verify_traversal, Coverage, Replay};
pub use room::{Direction, MazeConfig, RoomId, RoomMap, World};
pub use routes::{shortest_routes, RouteTable};
pub use traversal::{Bft, Dft};
