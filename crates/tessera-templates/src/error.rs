//! Error types for template construction and instantiation.

use tessera_ir::{BlockPosition2D, Scalable2D};
use thiserror::Error;

use crate::border::TemplateBorder;

/// Errors raised by templates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// The edges shared by two composed templates differ.
    #[error("Cannot compose {operation}: {first} and {second} do not share an edge")]
    DimensionMismatch {
        /// `"horizontally"` or `"vertically"`.
        operation: &'static str,
        /// Shape of the first operand.
        first: Scalable2D,
        /// Shape of the second operand.
        second: Scalable2D,
    },

    /// Instantiation received the wrong number of plaquette indices.
    #[error("Expected {expected} plaquette indices, got {got}")]
    WrongIndexCount {
        /// Number the template needs.
        expected: usize,
        /// Number received.
        got: usize,
    },

    /// A layout needs at least one element.
    #[error("Cannot create a layout without templates")]
    EmptyLayout,

    /// Layout elements must all have the same scalable shape.
    #[error("Template at {position} has shape {found}, expected {expected}")]
    ShapeMismatch {
        /// Offending element position.
        position: BlockPosition2D,
        /// Shape of the first element.
        expected: Scalable2D,
        /// Shape found.
        found: Scalable2D,
    },

    /// Trimming would leave no row or column for some `k`.
    #[error("Cannot trim the {border} border of a template with shape {shape}")]
    InvalidTrim {
        /// Border to remove.
        border: TemplateBorder,
        /// Shape before trimming.
        shape: Scalable2D,
    },
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
