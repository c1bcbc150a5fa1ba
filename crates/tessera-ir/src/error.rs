//! Error types for the IR crate.

use crate::assembler::AssemblerState;
use crate::geometry::Position2D;
use crate::operation::Operation;
use crate::qubit::QubitIndex;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A character or string does not name a basis.
    #[error("Invalid basis '{0}': expected X or Z")]
    InvalidBasis(String),

    /// Two operations claim the same qubit in the same moment.
    #[error(
        "Schedule conflict at moment {moment} on qubit {qubit}: '{existing}' from {existing_origin} \
         clashes with '{incoming}' from {origin}"
    )]
    ScheduleConflict {
        /// Absolute moment index.
        moment: usize,
        /// Coordinate of the contested qubit.
        qubit: Position2D,
        /// Operation already scheduled.
        existing: Operation<Position2D>,
        /// Operation that was rejected.
        incoming: Operation<Position2D>,
        /// Fragment that scheduled the existing operation.
        existing_origin: String,
        /// Fragment of the rejected operation.
        origin: String,
    },

    /// Assembler method called in the wrong lifecycle state.
    #[error("Cannot {action} while the assembler is {state}")]
    InvalidState {
        /// Attempted action.
        action: &'static str,
        /// State the assembler was in.
        state: AssemblerState,
    },

    /// A coordinate has no qubit index.
    #[error("Coordinate {0} is not mapped to any qubit")]
    UnmappedCoordinate(Position2D),

    /// A qubit index is outside the qubit map.
    #[error("Qubit {qubit} is not in the qubit map")]
    UnknownQubit {
        /// The unknown index.
        qubit: QubitIndex,
    },

    /// A moment references the same qubit twice.
    #[error("Qubit {qubit} is used twice in moment {moment}")]
    DuplicateQubit {
        /// Moment index.
        moment: usize,
        /// The duplicated qubit.
        qubit: QubitIndex,
    },

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
