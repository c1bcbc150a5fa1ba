//! Template borders and the plaquette indices found on them.

use std::collections::BTreeMap;
use std::fmt;

/// Side of a rectangular template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateBorder {
    Top,
    Bottom,
    Left,
    Right,
}

impl TemplateBorder {
    pub fn opposite(&self) -> Self {
        match self {
            TemplateBorder::Top => TemplateBorder::Bottom,
            TemplateBorder::Bottom => TemplateBorder::Top,
            TemplateBorder::Left => TemplateBorder::Right,
            TemplateBorder::Right => TemplateBorder::Left,
        }
    }
}

impl fmt::Display for TemplateBorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateBorder::Top => "top",
            TemplateBorder::Bottom => "bottom",
            TemplateBorder::Left => "left",
            TemplateBorder::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// The four plaquette classes along one border: a corner, two indices
/// alternating along the bulk, and the opposite corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderIndices {
    pub top_left_corner: usize,
    pub first_repeating: usize,
    pub second_repeating: usize,
    pub bottom_right_corner: usize,
}

impl BorderIndices {
    pub const fn new(
        top_left_corner: usize,
        first_repeating: usize,
        second_repeating: usize,
        bottom_right_corner: usize,
    ) -> Self {
        Self {
            top_left_corner,
            first_repeating,
            second_repeating,
            bottom_right_corner,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        [
            self.top_left_corner,
            self.first_repeating,
            self.second_repeating,
            self.bottom_right_corner,
        ]
        .into_iter()
    }

    /// Map each index of `self` to the index at the same place in `other`.
    pub fn to(&self, other: &BorderIndices) -> BTreeMap<usize, usize> {
        self.iter().zip(other.iter()).collect()
    }
}
