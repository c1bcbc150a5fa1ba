//! Error types for the block graph crate.

use tessera_ir::{Direction3D, Position3D};
use thiserror::Error;

/// Errors raised while building, validating or loading a block graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// String does not name a cube kind.
    #[error("Invalid cube kind '{0}'")]
    InvalidCubeKind(String),

    /// String does not name a pipe kind.
    #[error("Invalid pipe kind '{0}'")]
    InvalidPipeKind(String),

    /// A cube already occupies the position.
    #[error("A cube already exists at {0}")]
    OccupiedPosition(Position3D),

    /// No cube at the position.
    #[error("No cube at {0}")]
    MissingCube(Position3D),

    /// Pipe endpoints are not at Manhattan distance one.
    #[error("Positions {a} and {b} are not neighbours")]
    NotNeighbours {
        /// First endpoint.
        a: Position3D,
        /// Second endpoint.
        b: Position3D,
    },

    /// The pipe kind's open axis does not join the endpoints.
    #[error("Pipe kind {kind} cannot join {a} and {b}")]
    DirectionMismatch {
        /// First endpoint.
        a: Position3D,
        /// Second endpoint.
        b: Position3D,
        /// The offending kind.
        kind: String,
    },

    /// A pipe already joins the two positions.
    #[error("A pipe already exists between {a} and {b}")]
    DuplicatePipe {
        /// First endpoint.
        a: Position3D,
        /// Second endpoint.
        b: Position3D,
    },

    /// No pipe joins the two positions.
    #[error("No pipe between {a} and {b}")]
    MissingPipe {
        /// First endpoint.
        a: Position3D,
        /// Second endpoint.
        b: Position3D,
    },

    /// Pipe walls do not match the cube at one of its ends.
    #[error("Pipe {pipe} does not match cube {cube} at {position} along {direction}")]
    IncompatiblePipe {
        /// Position of the mismatching cube.
        position: Position3D,
        /// Pipe kind.
        pipe: String,
        /// Cube kind.
        cube: String,
        /// Axis of the mismatching wall.
        direction: Direction3D,
    },

    /// No pipe kind can join two cubes.
    #[error("Cannot infer a pipe kind between {a} and {b}")]
    PipeInference {
        /// First endpoint.
        a: Position3D,
        /// Second endpoint.
        b: Position3D,
    },

    /// Port cubes need a non-empty label.
    #[error("Port at {0} has an empty label")]
    EmptyPortLabel(Position3D),

    /// Port labels are unique within a graph.
    #[error("Port label '{0}' is already used")]
    DuplicatePortLabel(String),

    /// No port with the label.
    #[error("There is no port with label '{0}'")]
    UnknownPort(String),

    /// A port must have exactly one pipe.
    #[error("Port '{label}' at {position} has {degree} pipes, expected exactly one")]
    DanglingPort {
        /// Port label.
        label: String,
        /// Port position.
        position: Position3D,
        /// Number of pipes at the port.
        degree: usize,
    },

    /// A Y half cube must have exactly one temporal pipe.
    #[error("Y half cube at {position}: {reason}")]
    InvalidYHalfCube {
        /// Position of the half cube.
        position: Position3D,
        /// What is wrong.
        reason: String,
    },

    /// The ZX graph has a node the correlation search cannot handle.
    #[error("Unsupported ZX graph: {0}")]
    UnsupportedZXGraph(String),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for block graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
