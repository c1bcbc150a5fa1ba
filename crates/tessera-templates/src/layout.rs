//! A layout of equally shaped templates on the block grid.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::{Array2, s};
use tracing::debug;

use tessera_ir::{BlockPosition2D, Scalable2D};

use crate::base::{RectangularTemplate, Template, check_indices};
use crate::error::{TemplateError, TemplateResult};

/// Element templates placed at block positions.
///
/// Positions need not be contiguous; cells of the bounding box not
/// covered by an element stay empty. Element classes are renumbered with
/// cumulative offsets in position order.
#[derive(Debug, Clone)]
pub struct LayoutTemplate {
    layout: BTreeMap<BlockPosition2D, Arc<dyn RectangularTemplate>>,
    element_shape: Scalable2D,
    origin: BlockPosition2D,
    nx: i64,
    ny: i64,
}

impl LayoutTemplate {
    pub fn new(layout: BTreeMap<BlockPosition2D, Arc<dyn RectangularTemplate>>) -> TemplateResult<Self> {
        let mut elements = layout.iter();
        let Some((_, first)) = elements.next() else {
            return Err(TemplateError::EmptyLayout);
        };
        let element_shape = first.scalable_shape();
        for (position, template) in elements {
            let found = template.scalable_shape();
            if found != element_shape {
                return Err(TemplateError::ShapeMismatch {
                    position: *position,
                    expected: element_shape,
                    found,
                });
            }
        }

        let min_x = layout.keys().map(|p| p.x).min().unwrap_or(0);
        let max_x = layout.keys().map(|p| p.x).max().unwrap_or(0);
        let min_y = layout.keys().map(|p| p.y).min().unwrap_or(0);
        let max_y = layout.keys().map(|p| p.y).max().unwrap_or(0);
        debug!(
            elements = layout.len(),
            width = max_x - min_x + 1,
            height = max_y - min_y + 1,
            "created layout"
        );
        Ok(Self {
            layout,
            element_shape,
            origin: BlockPosition2D::new(min_x, min_y),
            nx: max_x - min_x + 1,
            ny: max_y - min_y + 1,
        })
    }

    /// Top-left block of the bounding box.
    pub fn origin(&self) -> BlockPosition2D {
        self.origin
    }

    pub fn element_shape(&self, k: u32) -> (usize, usize) {
        self.element_shape.to_shape(k)
    }

    /// `(width, height)` of the whole layout in plaquettes.
    pub fn global_shape(&self, k: u32) -> (usize, usize) {
        self.shape(k)
    }

    pub fn elements(&self) -> impl Iterator<Item = (&BlockPosition2D, &Arc<dyn RectangularTemplate>)> {
        self.layout.iter()
    }

    /// Per element, the map from its local classes `1..=n` to the layout's
    /// global classes.
    pub fn indices_map(&self) -> BTreeMap<BlockPosition2D, BTreeMap<usize, usize>> {
        let mut offset = 0;
        let mut maps = BTreeMap::new();
        for (position, template) in &self.layout {
            let count = template.expected_plaquettes_number();
            maps.insert(*position, (1..=count).map(|i| (i, i + offset)).collect());
            offset += count;
        }
        maps
    }

    /// Top-left plaquette cell of the block at `position`, relative to the
    /// layout origin.
    pub fn block_offset(&self, position: BlockPosition2D, k: u32) -> (usize, usize) {
        let (width, height) = self.element_shape(k);
        let dx = usize::try_from(position.x - self.origin.x).unwrap_or(0);
        let dy = usize::try_from(position.y - self.origin.y).unwrap_or(0);
        (dx * width, dy * height)
    }
}

impl Template for LayoutTemplate {
    fn scalable_shape(&self) -> Scalable2D {
        Scalable2D::new(self.element_shape.x * self.nx, self.element_shape.y * self.ny)
    }

    fn expected_plaquettes_number(&self) -> usize {
        self.layout
            .values()
            .map(|t| t.expected_plaquettes_number())
            .sum()
    }

    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>> {
        check_indices(self.expected_plaquettes_number(), indices)?;
        let (width, height) = self.shape(k);
        let (element_width, element_height) = self.element_shape(k);
        let mut result = Array2::zeros((height, width));
        let mut offset = 0;
        for (position, template) in &self.layout {
            let count = template.expected_plaquettes_number();
            let element = template.instantiate_with_indices(k, &indices[offset..offset + count])?;
            offset += count;
            let (x0, y0) = self.block_offset(*position, k);
            result
                .slice_mut(s![y0..y0 + element_height, x0..x0 + element_width])
                .assign(&element);
        }
        Ok(result)
    }
}
