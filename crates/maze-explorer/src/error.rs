//! Error types and exit codes for maze exploration.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (planning stalled, unmappable move, IO)
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (invalid maze file, unknown room)

use thiserror::Error;

use crate::room::Direction;

/// Process exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - malformed maze, unknown room (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors raised by the graph ADT and traversal engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{}", describe_missing(.ids))]
    UnknownVertex { ids: Vec<String> },

    #[error("vertex \"{id}\" already exists in graph")]
    DuplicateVertex { id: String },
}

fn describe_missing(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("vertex \"{}\" is not in graph", id))
        .collect::<Vec<_>>()
        .join(" and ")
}

impl GraphError {
    pub fn unknown<V: std::fmt::Debug>(id: &V) -> Self {
        GraphError::UnknownVertex {
            ids: vec![format!("{:?}", id)],
        }
    }

    pub fn duplicate<V: std::fmt::Debug>(id: &V) -> Self {
        GraphError::DuplicateVertex {
            id: format!("{:?}", id),
        }
    }
}

/// Errors that can occur while discovering, planning or replaying a maze
#[derive(Error, Debug)]
pub enum ExploreError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("planning stalled at room {position}: {unvisited} room(s) unreachable")]
    PlanningStalled { position: String, unvisited: usize },

    #[error("no exit of room {from} leads to room {to}")]
    AmbiguousOrUnknownDirection { from: String, to: String },

    #[error("room {id} is not defined in the maze")]
    UnknownRoom { id: String },

    #[error("room {room} has no passage {direction}")]
    BlockedMove { room: String, direction: Direction },

    #[error("{0}")]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExploreError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ExploreError::Usage(_) => ExitCode::Usage,

            ExploreError::UnknownRoom { .. } | ExploreError::Json(_) => ExitCode::Data,

            ExploreError::Graph(_)
            | ExploreError::PlanningStalled { .. }
            | ExploreError::AmbiguousOrUnknownDirection { .. }
            | ExploreError::BlockedMove { .. }
            | ExploreError::Io(_) => ExitCode::Failure,
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }

    fn error_type(&self) -> &'static str {
        match self {
            ExploreError::Graph(GraphError::UnknownVertex { .. }) => "unknown_vertex",
            ExploreError::Graph(GraphError::DuplicateVertex { .. }) => "duplicate_vertex",
            ExploreError::PlanningStalled { .. } => "planning_stalled",
            ExploreError::AmbiguousOrUnknownDirection { .. } => "unknown_direction",
            ExploreError::UnknownRoom { .. } => "unknown_room",
            ExploreError::BlockedMove { .. } => "blocked_move",
            ExploreError::Usage(_) => "usage_error",
            ExploreError::Io(_) => "io_error",
            ExploreError::Json(_) => "json_error",
        }
    }
}

/// Result type alias for exploration operations
pub type Result<T> = std::result::Result<T, ExploreError>;
