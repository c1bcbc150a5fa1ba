//! Pipes: zero-volume merges between neighbouring cubes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tessera_ir::{Basis, Direction3D, Position3D};

use crate::cube::{CubeKind, ZXCube};
use crate::error::{GraphError, GraphResult};

/// Wall bases of a pipe, seen from its head (the smaller endpoint).
///
/// Exactly one axis is open (`None`): the pipe direction. The two other
/// walls carry different bases. A Hadamard pipe swaps both bases
/// between head and tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PipeKind {
    x: Option<Basis>,
    y: Option<Basis>,
    z: Option<Basis>,
    has_hadamard: bool,
}

impl PipeKind {
    pub fn new(
        x: Option<Basis>,
        y: Option<Basis>,
        z: Option<Basis>,
        has_hadamard: bool,
    ) -> GraphResult<Self> {
        let kind = Self {
            x,
            y,
            z,
            has_hadamard,
        };
        let walls: Vec<Basis> = [x, y, z].into_iter().flatten().collect();
        if walls.len() != 2 || walls[0] == walls[1] {
            return Err(GraphError::InvalidPipeKind(kind.to_string()));
        }
        Ok(kind)
    }

    /// Kind of a pipe leaving (`cube_at_head`) or entering a cube of the
    /// given kind along `direction`.
    pub fn from_cube_kind(
        cube: &ZXCube,
        direction: Direction3D,
        cube_at_head: bool,
        has_hadamard: bool,
    ) -> GraphResult<Self> {
        let flip = !cube_at_head && has_hadamard;
        let wall = |d: Direction3D| (d != direction).then(|| cube.basis_along(d).flipped_if(flip));
        PipeKind::new(
            wall(Direction3D::X),
            wall(Direction3D::Y),
            wall(Direction3D::Z),
            has_hadamard,
        )
    }

    /// Infer the kind joining two ZX cubes at `head < tail`.
    pub fn infer(head: &ZXCube, tail: &ZXCube, direction: Direction3D) -> Option<Self> {
        let mut differs = Direction3D::all()
            .into_iter()
            .filter(|d| *d != direction)
            .map(|d| head.basis_along(d) != tail.basis_along(d));
        let first = differs.next()?;
        let second = differs.next()?;
        if first != second {
            return None;
        }
        PipeKind::from_cube_kind(head, direction, true, first).ok()
    }

    pub fn has_hadamard(&self) -> bool {
        self.has_hadamard
    }

    /// The open axis.
    pub fn direction(&self) -> Direction3D {
        if self.x.is_none() {
            Direction3D::X
        } else if self.y.is_none() {
            Direction3D::Y
        } else {
            Direction3D::Z
        }
    }

    pub fn is_temporal(&self) -> bool {
        self.direction() == Direction3D::Z
    }

    pub fn is_spatial(&self) -> bool {
        !self.is_temporal()
    }

    /// Wall basis normal to `direction`, at the head or the tail.
    ///
    /// `None` along the pipe direction.
    pub fn basis_along(&self, direction: Direction3D, at_head: bool) -> Option<Basis> {
        let head = match direction {
            Direction3D::X => self.x,
            Direction3D::Y => self.y,
            Direction3D::Z => self.z,
        }?;
        Some(head.flipped_if(!at_head && self.has_hadamard))
    }

    /// Check the pipe walls against the cube at one of its ends.
    ///
    /// Ports and Y half cubes accept any pipe.
    pub fn check_compatible_with(
        &self,
        cube: &CubeKind,
        position: Position3D,
        at_head: bool,
    ) -> GraphResult<()> {
        let Some(zx) = cube.as_zx() else {
            return Ok(());
        };
        for direction in Direction3D::all() {
            if let Some(basis) = self.basis_along(direction, at_head) {
                if basis != zx.basis_along(direction) {
                    return Err(GraphError::IncompatiblePipe {
                        position,
                        pipe: self.to_string(),
                        cube: zx.to_string(),
                        direction,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for wall in [self.x, self.y, self.z] {
            match wall {
                Some(basis) => write!(f, "{basis}")?,
                None => write!(f, "O")?,
            }
        }
        if self.has_hadamard {
            write!(f, "H")?;
        }
        Ok(())
    }
}

impl FromStr for PipeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let chars: Vec<char> = upper.chars().collect();
        let has_hadamard = match chars.len() {
            3 => false,
            4 if chars[3] == 'H' => true,
            _ => return Err(GraphError::InvalidPipeKind(s.to_string())),
        };
        let wall = |c: char| -> GraphResult<Option<Basis>> {
            if c == 'O' {
                Ok(None)
            } else {
                Basis::from_char(c)
                    .map(Some)
                    .map_err(|_| GraphError::InvalidPipeKind(s.to_string()))
            }
        };
        PipeKind::new(wall(chars[0])?, wall(chars[1])?, wall(chars[2])?, has_hadamard)
            .map_err(|_| GraphError::InvalidPipeKind(s.to_string()))
    }
}

impl TryFrom<String> for PipeKind {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PipeKind> for String {
    fn from(kind: PipeKind) -> Self {
        kind.to_string()
    }
}

/// A pipe between `u < v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pipe {
    u: Position3D,
    v: Position3D,
    kind: PipeKind,
}

impl Pipe {
    /// Create a pipe; endpoints are reordered so that `u < v`.
    pub fn new(a: Position3D, b: Position3D, kind: PipeKind) -> GraphResult<Self> {
        let (u, v) = if a < b { (a, b) } else { (b, a) };
        match Direction3D::between(u, v) {
            None => Err(GraphError::NotNeighbours { a: u, b: v }),
            Some(direction) if direction != kind.direction() => {
                Err(GraphError::DirectionMismatch {
                    a: u,
                    b: v,
                    kind: kind.to_string(),
                })
            }
            Some(_) => Ok(Self { u, v, kind }),
        }
    }

    pub fn u(&self) -> Position3D {
        self.u
    }

    pub fn v(&self) -> Position3D {
        self.v
    }

    pub fn kind(&self) -> PipeKind {
        self.kind
    }

    pub fn direction(&self) -> Direction3D {
        self.kind.direction()
    }

    pub fn key(&self) -> (Position3D, Position3D) {
        (self.u, self.v)
    }

    /// Whether `position` is the head endpoint.
    pub fn at_head(&self, position: Position3D) -> bool {
        position == self.u
    }

    /// The endpoint opposite to `position`.
    pub fn other(&self, position: Position3D) -> Position3D {
        if position == self.u { self.v } else { self.u }
    }

    #[must_use]
    pub fn shift_by(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            u: self.u.shift_by(dx, dy, dz),
            v: self.v.shift_by(dx, dy, dz),
            kind: self.kind,
        }
    }
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--({})--{}", self.u, self.kind, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zx(s: &str) -> ZXCube {
        s.parse().unwrap()
    }

    #[test]
    fn test_pipe_kind_parse() {
        let kind: PipeKind = "ozxh".parse().unwrap();
        assert_eq!(kind.to_string(), "OZXH");
        assert_eq!(kind.direction(), Direction3D::X);
        assert!(kind.has_hadamard());
        assert!("ZZO".parse::<PipeKind>().is_err());
        assert!("ZXZ".parse::<PipeKind>().is_err());
        assert!("OOX".parse::<PipeKind>().is_err());
        assert!("ZXOX".parse::<PipeKind>().is_err());
    }

    #[test]
    fn test_basis_along_with_hadamard() {
        let kind: PipeKind = "ZXOH".parse().unwrap();
        assert_eq!(kind.basis_along(Direction3D::X, true), Some(Basis::Z));
        assert_eq!(kind.basis_along(Direction3D::X, false), Some(Basis::X));
        assert_eq!(kind.basis_along(Direction3D::Z, true), None);
    }

    #[test]
    fn test_infer() {
        let kind = PipeKind::infer(&zx("ZXZ"), &zx("ZXX"), Direction3D::Z).unwrap();
        assert_eq!(kind.to_string(), "ZXO");
        let kind = PipeKind::infer(&zx("ZXZ"), &zx("XZX"), Direction3D::X).unwrap();
        assert_eq!(kind.to_string(), "OXZH");
        let kind = PipeKind::infer(&zx("ZXZ"), &zx("ZZX"), Direction3D::X).unwrap();
        assert_eq!(kind.to_string(), "OXZH");
        assert!(PipeKind::infer(&zx("ZXZ"), &zx("ZXX"), Direction3D::X).is_none());
    }

    #[test]
    fn test_pipe_orders_endpoints() {
        let a = Position3D::new(0, 0, 1);
        let b = Position3D::new(0, 0, 0);
        let pipe = Pipe::new(a, b, "ZXO".parse().unwrap()).unwrap();
        assert_eq!(pipe.u(), b);
        assert_eq!(pipe.other(b), a);
        assert!(pipe.at_head(b));
        assert!(Pipe::new(a, b, "OXZ".parse().unwrap()).is_err());
        assert!(Pipe::new(a, Position3D::new(0, 0, 3), "ZXO".parse().unwrap()).is_err());
    }

    #[test]
    fn test_compatibility() {
        let kind: PipeKind = "OXZ".parse().unwrap();
        let p = Position3D::new(0, 0, 0);
        assert!(kind.check_compatible_with(&zx("ZXZ").into(), p, true).is_ok());
        assert!(kind.check_compatible_with(&zx("XZZ").into(), p, true).is_err());
        assert!(kind.check_compatible_with(&CubeKind::Port, p, true).is_ok());
        let hadamard: PipeKind = "OXZH".parse().unwrap();
        assert!(hadamard.check_compatible_with(&zx("XZX").into(), p, false).is_ok());
    }
}
