//! Templates for logical qubits and the pipes between them.
//!
//! All four templates share the same scalable side `2k + 2`, so that
//! pipe borders line up with cube borders cell by cell.

use ndarray::Array2;

use tessera_ir::{LinearFunction, Scalable2D};

use crate::base::{RectangularTemplate, Template, check_indices, fill_classes};
use crate::border::{BorderIndices, TemplateBorder};
use crate::error::TemplateResult;

/// Side length of a logical qubit, `2k + 2`.
pub const QUBIT_SIDE: LinearFunction = LinearFunction::new(2, 2);

fn side(k: u32) -> usize {
    QUBIT_SIDE.eval_size(k)
}

/// Two classes alternating along a border, starting with `odd` at
/// position `1`.
fn alternate(position: usize, odd: usize, even: usize) -> usize {
    if position % 2 == 1 { odd } else { even }
}

/// A logical qubit patch.
///
/// ```text
/// 1  5  6  5  6  2
/// 7  9 10  9 10 11
/// 8 10  9 10  9 12
/// 7  9 10  9 10 11
/// 8 10  9 10  9 12
/// 3 13 14 13 14  4
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QubitTemplate;

impl Template for QubitTemplate {
    fn scalable_shape(&self) -> Scalable2D {
        Scalable2D::new(QUBIT_SIDE, QUBIT_SIDE)
    }

    fn expected_plaquettes_number(&self) -> usize {
        14
    }

    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>> {
        check_indices(self.expected_plaquettes_number(), indices)?;
        let n = side(k);
        let last = n - 1;
        Ok(fill_classes(n, n, indices, |i, j| match (i, j) {
            (0, 0) => 1,
            (0, j) if j == last => 2,
            (i, 0) if i == last => 3,
            (i, j) if i == last && j == last => 4,
            (0, j) => alternate(j, 5, 6),
            (i, j) if i == last => alternate(j, 13, 14),
            (i, 0) => alternate(i, 7, 8),
            (i, j) if j == last => alternate(i, 11, 12),
            (i, j) => {
                if (i + j) % 2 == 0 {
                    9
                } else {
                    10
                }
            }
        }))
    }
}

impl RectangularTemplate for QubitTemplate {
    fn border_indices(&self, border: TemplateBorder) -> BorderIndices {
        match border {
            TemplateBorder::Top => BorderIndices::new(1, 5, 6, 2),
            TemplateBorder::Bottom => BorderIndices::new(3, 13, 14, 4),
            TemplateBorder::Left => BorderIndices::new(1, 7, 8, 3),
            TemplateBorder::Right => BorderIndices::new(2, 11, 12, 4),
        }
    }
}

/// A logical qubit patch hosting a spatial junction.
///
/// The bulk is split into four triangular quadrants along the diagonals
/// (`13..=16`, or `17..=20` on the other checkerboard parity), with the
/// four cells next to the corners getting their own classes `5..=8`.
///
/// ```text
///  1  9 10  9 10  2
/// 11  5 17 13  6 21
/// 12 20 13 17 14 22
/// 11 16 19 15 18 21
/// 12  7 15 19  8 22
///  3 23 24 23 24  4
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QubitSpatialCubeTemplate;

impl QubitSpatialCubeTemplate {
    fn bulk_class(i: usize, j: usize, n: usize) -> usize {
        let last = n - 2;
        match (i, j) {
            (1, 1) => return 5,
            (1, j) if j == last => return 6,
            (i, 1) if i == last => return 7,
            (i, j) if i == last && j == last => return 8,
            _ => {}
        }
        let parity_offset = if (i + j) % 2 == 1 { 4 } else { 0 };
        let mirrored = n - 1 - j;
        let quadrant = if i <= j && i <= mirrored {
            13
        } else if i < j && i > mirrored {
            14
        } else if i >= j && i >= mirrored {
            15
        } else {
            16
        };
        quadrant + parity_offset
    }
}

impl Template for QubitSpatialCubeTemplate {
    fn scalable_shape(&self) -> Scalable2D {
        Scalable2D::new(QUBIT_SIDE, QUBIT_SIDE)
    }

    fn expected_plaquettes_number(&self) -> usize {
        24
    }

    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>> {
        check_indices(self.expected_plaquettes_number(), indices)?;
        let n = side(k);
        let last = n - 1;
        Ok(fill_classes(n, n, indices, |i, j| match (i, j) {
            (0, 0) => 1,
            (0, j) if j == last => 2,
            (i, 0) if i == last => 3,
            (i, j) if i == last && j == last => 4,
            (0, j) => alternate(j, 9, 10),
            (i, j) if i == last => alternate(j, 23, 24),
            (i, 0) => alternate(i, 11, 12),
            (i, j) if j == last => alternate(i, 21, 22),
            (i, j) => Self::bulk_class(i, j, n),
        }))
    }
}

impl RectangularTemplate for QubitSpatialCubeTemplate {
    fn border_indices(&self, border: TemplateBorder) -> BorderIndices {
        match border {
            TemplateBorder::Top => BorderIndices::new(1, 9, 10, 2),
            TemplateBorder::Bottom => BorderIndices::new(3, 23, 24, 4),
            TemplateBorder::Left => BorderIndices::new(1, 11, 12, 3),
            TemplateBorder::Right => BorderIndices::new(2, 21, 22, 4),
        }
    }
}

/// Two columns holding the plaquettes of a pipe along `x`.
///
/// ```text
/// 1 2
/// 5 7
/// 6 8
/// 5 7
/// 6 8
/// 3 4
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QubitVerticalBorders;

impl Template for QubitVerticalBorders {
    fn scalable_shape(&self) -> Scalable2D {
        Scalable2D::new(LinearFunction::constant(2), QUBIT_SIDE)
    }

    fn expected_plaquettes_number(&self) -> usize {
        8
    }

    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>> {
        check_indices(self.expected_plaquettes_number(), indices)?;
        let n = side(k);
        Ok(fill_classes(n, 2, indices, |i, j| match (i, j) {
            (0, 0) => 1,
            (0, _) => 2,
            (i, 0) if i == n - 1 => 3,
            (i, _) if i == n - 1 => 4,
            (i, 0) => alternate(i, 5, 6),
            (i, _) => alternate(i, 7, 8),
        }))
    }
}

impl RectangularTemplate for QubitVerticalBorders {
    fn border_indices(&self, border: TemplateBorder) -> BorderIndices {
        match border {
            TemplateBorder::Top => BorderIndices::new(1, 1, 2, 2),
            TemplateBorder::Bottom => BorderIndices::new(3, 3, 4, 4),
            TemplateBorder::Left => BorderIndices::new(1, 5, 6, 3),
            TemplateBorder::Right => BorderIndices::new(2, 7, 8, 4),
        }
    }
}

/// Two rows holding the plaquettes of a pipe along `y`.
///
/// ```text
/// 1 5 6 5 6 2
/// 3 7 8 7 8 4
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QubitHorizontalBorders;

impl Template for QubitHorizontalBorders {
    fn scalable_shape(&self) -> Scalable2D {
        Scalable2D::new(QUBIT_SIDE, LinearFunction::constant(2))
    }

    fn expected_plaquettes_number(&self) -> usize {
        8
    }

    fn instantiate_with_indices(&self, k: u32, indices: &[usize]) -> TemplateResult<Array2<usize>> {
        check_indices(self.expected_plaquettes_number(), indices)?;
        let n = side(k);
        Ok(fill_classes(2, n, indices, |i, j| match (i, j) {
            (0, 0) => 1,
            (0, j) if j == n - 1 => 2,
            (_, 0) => 3,
            (_, j) if j == n - 1 => 4,
            (0, j) => alternate(j, 5, 6),
            (_, j) => alternate(j, 7, 8),
        }))
    }
}

impl RectangularTemplate for QubitHorizontalBorders {
    fn border_indices(&self, border: TemplateBorder) -> BorderIndices {
        match border {
            TemplateBorder::Top => BorderIndices::new(1, 5, 6, 2),
            TemplateBorder::Bottom => BorderIndices::new(3, 7, 8, 4),
            TemplateBorder::Left => BorderIndices::new(1, 1, 3, 3),
            TemplateBorder::Right => BorderIndices::new(2, 2, 4, 4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_qubit_template_k1() {
        let arr = QubitTemplate.instantiate(1).unwrap();
        assert_eq!(
            arr,
            array![
                [1, 5, 6, 2],
                [7, 9, 10, 11],
                [8, 10, 9, 12],
                [3, 13, 14, 4],
            ]
        );
    }

    #[test]
    fn test_spatial_cube_template_k2() {
        let arr = QubitSpatialCubeTemplate.instantiate(2).unwrap();
        assert_eq!(
            arr,
            array![
                [1, 9, 10, 9, 10, 2],
                [11, 5, 17, 13, 6, 21],
                [12, 20, 13, 17, 14, 22],
                [11, 16, 19, 15, 18, 21],
                [12, 7, 15, 19, 8, 22],
                [3, 23, 24, 23, 24, 4],
            ]
        );
    }

    #[test]
    fn test_spatial_cube_template_k1_only_corner_cells() {
        let arr = QubitSpatialCubeTemplate.instantiate(1).unwrap();
        assert_eq!(arr[[1, 1]], 5);
        assert_eq!(arr[[1, 2]], 6);
        assert_eq!(arr[[2, 1]], 7);
        assert_eq!(arr[[2, 2]], 8);
    }

    #[test]
    fn test_borders_templates() {
        let vertical = QubitVerticalBorders.instantiate(1).unwrap();
        assert_eq!(vertical, array![[1, 2], [5, 7], [6, 8], [3, 4]]);
        let horizontal = QubitHorizontalBorders.instantiate(1).unwrap();
        assert_eq!(horizontal, array![[1, 5, 6, 2], [3, 7, 8, 4]]);
    }

    #[test]
    fn test_custom_indices() {
        let indices: Vec<usize> = (1..=14).map(|i| i * 10).collect();
        let arr = QubitTemplate.instantiate_with_indices(1, &indices).unwrap();
        assert_eq!(arr[[0, 0]], 10);
        assert_eq!(arr[[3, 3]], 40);
        assert!(QubitTemplate.instantiate_with_indices(1, &[1, 2]).is_err());
    }

    #[test]
    fn test_border_indices_match_instantiation() {
        let arr = QubitTemplate.instantiate(3).unwrap();
        let n = arr.nrows();
        let right = QubitTemplate.border_indices(TemplateBorder::Right);
        assert_eq!(arr[[0, n - 1]], right.top_left_corner);
        assert_eq!(arr[[1, n - 1]], right.first_repeating);
        assert_eq!(arr[[2, n - 1]], right.second_repeating);
        assert_eq!(arr[[n - 1, n - 1]], right.bottom_right_corner);
    }
}
