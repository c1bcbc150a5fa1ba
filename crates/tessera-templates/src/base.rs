//! The template traits.

use ndarray::Array2;
use std::fmt;

use tessera_ir::Scalable2D;

use crate::border::{BorderIndices, TemplateBorder};
use crate::error::{TemplateError, TemplateResult};

/// A scalable 2D arrangement of plaquette classes.
///
/// Instantiating a template at scale `k` yields an array of plaquette
/// indices with shape `(height, width)`; `0` marks an empty cell. Class
/// `i` (counted from `1`) is replaced by `indices[i - 1]`.
pub trait Template: Send + Sync + fmt::Debug {
    /// Width and height as functions of `k`.
    fn scalable_shape(&self) -> Scalable2D;

    /// Number of distinct plaquette classes.
    fn expected_plaquettes_number(&self) -> usize;

    /// Instantiate at scale `k` with caller-chosen class indices.
    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>>;

    /// Instantiate with the default indices `1..=n`.
    fn instantiate(&self, k: u32) -> TemplateResult<Array2<usize>> {
        let indices: Vec<usize> = (1..=self.expected_plaquettes_number()).collect();
        self.instantiate_with_indices(k, &indices)
    }

    /// `(width, height)` at scale `k`.
    fn shape(&self, k: u32) -> (usize, usize) {
        self.scalable_shape().to_shape(k)
    }
}

/// A template with well-defined borders.
pub trait RectangularTemplate: Template {
    fn border_indices(&self, border: TemplateBorder) -> BorderIndices;
}

/// Check that exactly `expected` indices were supplied.
pub(crate) fn check_indices(expected: usize, indices: &[usize]) -> TemplateResult<()> {
    if indices.len() != expected {
        return Err(TemplateError::WrongIndexCount {
            expected,
            got: indices.len(),
        });
    }
    Ok(())
}

/// Build a `(height, width)` array from a per-cell class function.
///
/// `class(row, column)` returns a class in `1..=indices.len()` or `0`.
pub(crate) fn fill_classes(
    height: usize,
    width: usize,
    indices: &[usize],
    class: impl Fn(usize, usize) -> usize,
) -> Array2<usize> {
    Array2::from_shape_fn((height, width), |(row, column)| {
        match class(row, column) {
            0 => 0,
            c => indices[c - 1],
        }
    })
}
