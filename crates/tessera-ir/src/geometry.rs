//! Integer positions, directions and boundary bases.
//!
//! Block positions live on a 3D integer lattice whose `z` axis is time.
//! Every 2D frame used by the compiler (templates, physical qubits) has
//! its `y` axis pointing down, so a template row index is a `y`
//! coordinate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};

/// Pauli basis of a boundary, a reset or a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// The X basis.
    X,
    /// The Z basis.
    Z,
}

impl Basis {
    /// Both bases, `X` first.
    pub const ALL: [Basis; 2] = [Basis::X, Basis::Z];

    /// The other basis.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Basis::X => Basis::Z,
            Basis::Z => Basis::X,
        }
    }

    /// Returns `self` flipped if `flip` is set.
    #[must_use]
    pub fn flipped_if(self, flip: bool) -> Self {
        if flip { self.flipped() } else { self }
    }

    /// Upper-case character for this basis.
    pub fn as_char(self) -> char {
        match self {
            Basis::X => 'X',
            Basis::Z => 'Z',
        }
    }

    /// Parse a basis from a character, case-insensitively.
    pub fn from_char(c: char) -> IrResult<Self> {
        match c.to_ascii_uppercase() {
            'X' => Ok(Basis::X),
            'Z' => Ok(Basis::Z),
            _ => Err(IrError::InvalidBasis(c.to_string())),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Basis {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Basis::from_char(c),
            _ => Err(IrError::InvalidBasis(s.to_string())),
        }
    }
}

/// Basis of a data qubit reset or measurement.
///
/// Boundaries only ever carry `X` or `Z`; `Y` is used to prepare and
/// measure data qubits of a Y half cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataBasis {
    X,
    Y,
    Z,
}

impl DataBasis {
    pub fn as_char(self) -> char {
        match self {
            DataBasis::X => 'X',
            DataBasis::Y => 'Y',
            DataBasis::Z => 'Z',
        }
    }

    /// Parse from a character, case-insensitively.
    pub fn from_char(c: char) -> IrResult<Self> {
        match c.to_ascii_uppercase() {
            'Y' => Ok(DataBasis::Y),
            _ => Basis::from_char(c).map(DataBasis::from),
        }
    }

    /// The boundary basis, `None` for `Y`.
    pub fn as_basis(self) -> Option<Basis> {
        match self {
            DataBasis::X => Some(Basis::X),
            DataBasis::Y => None,
            DataBasis::Z => Some(Basis::Z),
        }
    }
}

impl From<Basis> for DataBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::X => DataBasis::X,
            Basis::Z => DataBasis::Z,
        }
    }
}

impl fmt::Display for DataBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One of the three lattice axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction3D {
    /// Spatial, left to right.
    X,
    /// Spatial, top to bottom.
    Y,
    /// Temporal.
    Z,
}

impl Direction3D {
    /// All directions in axis order.
    pub const fn all() -> [Direction3D; 3] {
        [Direction3D::X, Direction3D::Y, Direction3D::Z]
    }

    /// Axis index, `0` for `X` up to `2` for `Z`.
    pub fn index(self) -> usize {
        match self {
            Direction3D::X => 0,
            Direction3D::Y => 1,
            Direction3D::Z => 2,
        }
    }

    /// Direction for an axis index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction3D::X),
            1 => Some(Direction3D::Y),
            2 => Some(Direction3D::Z),
            _ => None,
        }
    }

    /// Whether this is one of the two spatial axes.
    pub fn is_spatial(self) -> bool {
        self != Direction3D::Z
    }

    /// Direction joining two neighbouring positions, `None` if they are
    /// not neighbours.
    pub fn between(a: Position3D, b: Position3D) -> Option<Self> {
        if !a.is_neighbour(&b) {
            return None;
        }
        if a.x != b.x {
            Some(Direction3D::X)
        } else if a.y != b.y {
            Some(Direction3D::Y)
        } else {
            Some(Direction3D::Z)
        }
    }
}

impl fmt::Display for Direction3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction3D::X => "X",
            Direction3D::Y => "Y",
            Direction3D::Z => "Z",
        };
        write!(f, "{name}")
    }
}

/// Position of a block on the 3D lattice.
///
/// Ordering is lexicographic over `(x, y, z)`; it is the canonical
/// iteration and tie-break order everywhere in the compiler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position3D {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position3D {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Translate by the given offsets.
    #[must_use]
    pub fn shift_by(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Translate along one axis.
    #[must_use]
    pub fn shift_in_direction(self, direction: Direction3D, amount: i32) -> Self {
        match direction {
            Direction3D::X => self.shift_by(amount, 0, 0),
            Direction3D::Y => self.shift_by(0, amount, 0),
            Direction3D::Z => self.shift_by(0, 0, amount),
        }
    }

    /// Coordinate along one axis.
    pub fn coordinate(self, direction: Direction3D) -> i32 {
        match direction {
            Direction3D::X => self.x,
            Direction3D::Y => self.y,
            Direction3D::Z => self.z,
        }
    }

    pub fn manhattan_distance(&self, other: &Position3D) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    /// Whether the two positions are at Manhattan distance exactly one.
    pub fn is_neighbour(&self, other: &Position3D) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Projection onto the spatial plane.
    pub fn as_2d(self) -> BlockPosition2D {
        BlockPosition2D::new(i64::from(self.x), i64::from(self.y))
    }
}

impl fmt::Display for Position3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Position3D {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Position3D::new(x, y, z)
    }
}

/// Physical qubit coordinate.
///
/// Syndrome qubits sit on even coordinates, data qubits on odd ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position2D {
    pub x: i64,
    pub y: i64,
}

impl Position2D {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Translate by another position used as an offset.
    #[must_use]
    pub fn offset_by(self, offset: Position2D) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }
}

impl fmt::Display for Position2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position of a template on the 2D block grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct BlockPosition2D {
    pub x: i64,
    pub y: i64,
}

impl BlockPosition2D {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for BlockPosition2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_flip_and_parse() {
        assert_eq!(Basis::X.flipped(), Basis::Z);
        assert_eq!(Basis::Z.flipped_if(false), Basis::Z);
        assert_eq!("x".parse::<Basis>().unwrap(), Basis::X);
        assert_eq!(Basis::from_char('Z').unwrap(), Basis::Z);
        assert!("Y".parse::<Basis>().is_err());
        assert!("XZ".parse::<Basis>().is_err());
    }

    #[test]
    fn test_data_basis() {
        assert_eq!(DataBasis::from(Basis::X), DataBasis::X);
        assert_eq!(DataBasis::from_char('y').unwrap(), DataBasis::Y);
        assert_eq!(DataBasis::from_char('z').unwrap(), DataBasis::Z);
        assert!(DataBasis::from_char('w').is_err());
        assert_eq!(DataBasis::Y.as_basis(), None);
        assert_eq!(DataBasis::Z.as_basis(), Some(Basis::Z));
    }

    #[test]
    fn test_position_shift_and_distance() {
        let p = Position3D::new(1, -2, 3);
        assert_eq!(p.shift_by(1, 1, 1), Position3D::new(2, -1, 4));
        assert_eq!(
            p.shift_in_direction(Direction3D::Z, -3),
            Position3D::new(1, -2, 0)
        );
        assert_eq!(p.manhattan_distance(&Position3D::new(0, 0, 0)), 6);
        assert!(p.is_neighbour(&p.shift_by(0, 1, 0)));
        assert!(!p.is_neighbour(&p.shift_by(1, 1, 0)));
    }

    #[test]
    fn test_direction_between() {
        let a = Position3D::new(0, 0, 0);
        assert_eq!(
            Direction3D::between(a, Position3D::new(0, 1, 0)),
            Some(Direction3D::Y)
        );
        assert_eq!(
            Direction3D::between(Position3D::new(0, 0, 1), a),
            Some(Direction3D::Z)
        );
        assert_eq!(Direction3D::between(a, Position3D::new(2, 0, 0)), None);
        assert_eq!(Direction3D::from_index(1), Some(Direction3D::Y));
        assert!(!Direction3D::Z.is_spatial());
    }

    #[test]
    fn test_position_ordering_is_lexicographic() {
        let mut positions = vec![
            Position3D::new(1, 0, 0),
            Position3D::new(0, 1, 0),
            Position3D::new(0, 0, 1),
        ];
        positions.sort();
        assert_eq!(positions[0], Position3D::new(0, 0, 1));
        assert_eq!(positions[2], Position3D::new(1, 0, 0));
    }
}
