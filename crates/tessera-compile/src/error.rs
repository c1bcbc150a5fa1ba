//! Error types for block graph compilation.

use thiserror::Error;

use tessera_graph::GraphError;
use tessera_ir::{IrError, LinearFunction, Position3D};
use tessera_plaquette::PlaquetteError;
use tessera_templates::TemplateError;

use crate::block::BlockCategory;
use crate::config::ConfigError;

/// Errors raised while compiling a block graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The graph has no cube.
    #[error("Cannot compile an empty block graph")]
    EmptyGraph,

    /// Ports must be filled before compilation.
    #[error("Block graph has open ports: {}", ports.join(", "))]
    OpenPorts {
        /// Labels of the open ports.
        ports: Vec<String>,
    },

    /// No builder is registered for the block's category.
    #[error("No builder for {category} at {position}")]
    UnsupportedKind {
        /// Category of the block.
        category: BlockCategory,
        /// Position of the cube, or of the pipe's head.
        position: Position3D,
    },

    /// Hadamard pipes around a cycle of the graph disagree on the
    /// stabilizer checkerboard.
    #[error("Inconsistent stabilizer checkerboard at {position}")]
    InconsistentCheckerboard {
        /// Cube where the two assignments meet.
        position: Position3D,
    },

    /// The scale parameter must be at least 1.
    #[error("Scale parameter k = {k} must be at least 1")]
    InvalidScale {
        /// Requested scale.
        k: u32,
    },

    /// The number of rounds per block is not positive.
    #[error("Rounds {rounds} evaluate to {value} at k = {k}, expected at least 1")]
    InvalidRounds {
        /// Configured rounds.
        rounds: LinearFunction,
        /// Scale parameter.
        k: u32,
        /// Evaluated value.
        value: i64,
    },

    /// A builder returned a block or substitution with the wrong number
    /// of rounds.
    #[error("Builder '{builder}' produced {found} rounds at {position}, expected {expected}")]
    RoundMismatch {
        /// Name of the builder.
        builder: String,
        /// Position of the block.
        position: Position3D,
        /// Rounds every block runs.
        expected: usize,
        /// Rounds produced.
        found: usize,
    },

    /// Graph error.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Template error.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Plaquette error.
    #[error("Plaquette error: {0}")]
    Plaquette(#[from] PlaquetteError),

    /// Scheduling error.
    #[error("Scheduling error: {0}")]
    Ir(#[from] IrError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
