//! Cubes: the unit spacetime blocks of a computation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tessera_ir::{Basis, Direction3D, Position3D};

use crate::error::{GraphError, GraphResult};

/// A cube whose walls normal to each axis carry a boundary basis.
///
/// The three bases are never all equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZXCube {
    x: Basis,
    y: Basis,
    z: Basis,
}

impl ZXCube {
    pub fn new(x: Basis, y: Basis, z: Basis) -> GraphResult<Self> {
        if x == y && y == z {
            return Err(GraphError::InvalidCubeKind(format!("{x}{y}{z}")));
        }
        Ok(Self { x, y, z })
    }

    /// Every valid kind, in string order.
    pub fn all_kinds() -> Vec<ZXCube> {
        let mut kinds = Vec::with_capacity(6);
        for x in Basis::ALL {
            for y in Basis::ALL {
                for z in Basis::ALL {
                    if let Ok(kind) = ZXCube::new(x, y, z) {
                        kinds.push(kind);
                    }
                }
            }
        }
        kinds
    }

    pub fn x(&self) -> Basis {
        self.x
    }

    pub fn y(&self) -> Basis {
        self.y
    }

    pub fn z(&self) -> Basis {
        self.z
    }

    pub fn as_tuple(&self) -> (Basis, Basis, Basis) {
        (self.x, self.y, self.z)
    }

    /// The basis that appears exactly once among the three walls.
    pub fn normal_basis(&self) -> Basis {
        let z_count = [self.x, self.y, self.z]
            .iter()
            .filter(|b| **b == Basis::Z)
            .count();
        if z_count == 1 { Basis::Z } else { Basis::X }
    }

    /// Axis carrying the normal basis.
    pub fn normal_direction(&self) -> Direction3D {
        let normal = self.normal_basis();
        Direction3D::all()
            .into_iter()
            .find(|d| self.basis_along(*d) == normal)
            .unwrap_or(Direction3D::Z)
    }

    /// All four spatial walls share one basis: `ZZX` or `XXZ`.
    pub fn is_spatial(&self) -> bool {
        self.x == self.y
    }

    pub fn basis_along(&self, direction: Direction3D) -> Basis {
        match direction {
            Direction3D::X => self.x,
            Direction3D::Y => self.y,
            Direction3D::Z => self.z,
        }
    }

    /// Copy with one wall basis replaced.
    pub fn with_basis_along(&self, direction: Direction3D, basis: Basis) -> GraphResult<Self> {
        let (mut x, mut y, mut z) = self.as_tuple();
        match direction {
            Direction3D::X => x = basis,
            Direction3D::Y => y = basis,
            Direction3D::Z => z = basis,
        }
        ZXCube::new(x, y, z)
    }
}

impl fmt::Display for ZXCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.x, self.y, self.z)
    }
}

impl FromStr for ZXCube {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(GraphError::InvalidCubeKind(s.to_string()));
        }
        let basis =
            |c: char| Basis::from_char(c).map_err(|_| GraphError::InvalidCubeKind(s.to_string()));
        ZXCube::new(basis(chars[0])?, basis(chars[1])?, basis(chars[2])?)
    }
}

impl TryFrom<String> for ZXCube {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ZXCube> for String {
    fn from(kind: ZXCube) -> Self {
        kind.to_string()
    }
}

/// Closed set of cube kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CubeKind {
    /// A cube with fixed boundary bases.
    ZX(ZXCube),
    /// Open boundary, resolved later to a concrete cube.
    Port,
    /// Half cube marking a Y-basis initialization or measurement.
    YHalfCube,
}

impl CubeKind {
    pub fn as_zx(&self) -> Option<&ZXCube> {
        match self {
            CubeKind::ZX(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_port(&self) -> bool {
        matches!(self, CubeKind::Port)
    }

    pub fn is_y_half_cube(&self) -> bool {
        matches!(self, CubeKind::YHalfCube)
    }

    pub fn is_spatial(&self) -> bool {
        self.as_zx().is_some_and(ZXCube::is_spatial)
    }
}

impl From<ZXCube> for CubeKind {
    fn from(kind: ZXCube) -> Self {
        CubeKind::ZX(kind)
    }
}

impl fmt::Display for CubeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CubeKind::ZX(kind) => write!(f, "{kind}"),
            CubeKind::Port => write!(f, "PORT"),
            CubeKind::YHalfCube => write!(f, "Y"),
        }
    }
}

impl FromStr for CubeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PORT" | "P" => Ok(CubeKind::Port),
            "Y" => Ok(CubeKind::YHalfCube),
            _ => s.parse::<ZXCube>().map(CubeKind::ZX),
        }
    }
}

impl TryFrom<String> for CubeKind {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CubeKind> for String {
    fn from(kind: CubeKind) -> Self {
        kind.to_string()
    }
}

/// A cube placed in the block graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cube {
    pub position: Position3D,
    pub kind: CubeKind,
    /// Port label; empty for ordinary cubes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

impl Cube {
    pub fn new(position: Position3D, kind: CubeKind, label: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            label: label.into(),
        }
    }

    pub fn is_port(&self) -> bool {
        self.kind.is_port()
    }

    pub fn is_spatial(&self) -> bool {
        self.kind.is_spatial()
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.position)
    }
}
