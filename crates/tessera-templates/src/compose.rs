//! Pure composition of templates.
//!
//! Composed templates number their classes left operand first: the
//! classes of the right (or bottom) operand are offset by the left (or
//! top) operand's class count. Composition is associative, shape and
//! index layout alike.

use std::sync::Arc;

use ndarray::{Array2, Axis, concatenate, s};

use tessera_ir::{LinearFunction, Scalable2D};

use crate::base::{Template, check_indices};
use crate::border::TemplateBorder;
use crate::error::{TemplateError, TemplateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    SideBySide,
    Stacked,
}

/// Two templates placed side by side or on top of each other.
#[derive(Debug, Clone)]
pub struct ComposedTemplate {
    first: Arc<dyn Template>,
    second: Arc<dyn Template>,
    placement: Placement,
}

impl Template for ComposedTemplate {
    fn scalable_shape(&self) -> Scalable2D {
        let a = self.first.scalable_shape();
        let b = self.second.scalable_shape();
        match self.placement {
            Placement::SideBySide => Scalable2D::new(a.x + b.x, a.y),
            Placement::Stacked => Scalable2D::new(a.x, a.y + b.y),
        }
    }

    fn expected_plaquettes_number(&self) -> usize {
        self.first.expected_plaquettes_number() + self.second.expected_plaquettes_number()
    }

    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>> {
        check_indices(self.expected_plaquettes_number(), indices)?;
        let (head, tail) = indices.split_at(self.first.expected_plaquettes_number());
        let a = self.first.instantiate_with_indices(k, head)?;
        let b = self.second.instantiate_with_indices(k, tail)?;
        let axis = match self.placement {
            Placement::SideBySide => Axis(1),
            Placement::Stacked => Axis(0),
        };
        // Shared edges have equal linear functions, so the views line up.
        concatenate(axis, &[a.view(), b.view()]).map_err(|_| TemplateError::DimensionMismatch {
            operation: match self.placement {
                Placement::SideBySide => "horizontally",
                Placement::Stacked => "vertically",
            },
            first: self.first.scalable_shape(),
            second: self.second.scalable_shape(),
        })
    }
}

/// Place `right` to the right of `left`. Heights must be equal for every
/// `k`.
pub fn horizontal(left: Arc<dyn Template>, right: Arc<dyn Template>) -> TemplateResult<Arc<dyn Template>> {
    let (a, b) = (left.scalable_shape(), right.scalable_shape());
    if a.y != b.y {
        return Err(TemplateError::DimensionMismatch {
            operation: "horizontally",
            first: a,
            second: b,
        });
    }
    Ok(Arc::new(ComposedTemplate {
        first: left,
        second: right,
        placement: Placement::SideBySide,
    }))
}

/// Place `bottom` below `top`. Widths must be equal for every `k`.
pub fn vertical(top: Arc<dyn Template>, bottom: Arc<dyn Template>) -> TemplateResult<Arc<dyn Template>> {
    let (a, b) = (top.scalable_shape(), bottom.scalable_shape());
    if a.x != b.x {
        return Err(TemplateError::DimensionMismatch {
            operation: "vertically",
            first: a,
            second: b,
        });
    }
    Ok(Arc::new(ComposedTemplate {
        first: top,
        second: bottom,
        placement: Placement::Stacked,
    }))
}

/// A template with one outer row or column removed.
#[derive(Debug, Clone)]
pub struct TrimmedTemplate {
    inner: Arc<dyn Template>,
    border: TemplateBorder,
}

impl Template for TrimmedTemplate {
    fn scalable_shape(&self) -> Scalable2D {
        let shape = self.inner.scalable_shape();
        match self.border {
            TemplateBorder::Top | TemplateBorder::Bottom => Scalable2D::new(shape.x, shape.y + -1),
            TemplateBorder::Left | TemplateBorder::Right => Scalable2D::new(shape.x + -1, shape.y),
        }
    }

    fn expected_plaquettes_number(&self) -> usize {
        self.inner.expected_plaquettes_number()
    }

    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>> {
        let full = self.inner.instantiate_with_indices(k, indices)?;
        let trimmed = match self.border {
            TemplateBorder::Top => full.slice(s![1.., ..]),
            TemplateBorder::Bottom => full.slice(s![..-1, ..]),
            TemplateBorder::Left => full.slice(s![.., 1..]),
            TemplateBorder::Right => full.slice(s![.., ..-1]),
        };
        Ok(trimmed.to_owned())
    }
}

/// Remove the outermost row or column on `border`.
///
/// Fails when the trimmed dimension would be empty for some `k >= 1`.
pub fn trim(template: Arc<dyn Template>, border: TemplateBorder) -> TemplateResult<Arc<dyn Template>> {
    let shape = template.scalable_shape();
    let dimension: LinearFunction = match border {
        TemplateBorder::Top | TemplateBorder::Bottom => shape.y,
        TemplateBorder::Left | TemplateBorder::Right => shape.x,
    };
    let remaining = dimension + -1;
    if remaining.slope < 0 || remaining.eval(1) <= 0 {
        return Err(TemplateError::InvalidTrim { border, shape });
    }
    Ok(Arc::new(TrimmedTemplate {
        inner: template,
        border,
    }))
}
