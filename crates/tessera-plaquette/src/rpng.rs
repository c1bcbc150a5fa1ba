//! The RPNG plaquette description language.
//!
//! A plaquette is described by its four data corners, listed top-left,
//! top-right, bottom-left, bottom-right. Each corner is four characters:
//!
//! | Field | Values | Meaning |
//! |-------|--------|---------|
//! | `r` | `x`, `y`, `z`, `-` | data reset basis |
//! | `p` | `x`, `z`, `-` | Pauli of the controlled gate from the syndrome qubit |
//! | `n` | `1`..`9`, `-` | interaction step |
//! | `g` | `x`, `y`, `z`, `h`, `-` | data measurement basis, or a Hadamard |
//!
//! For example `-z1- -z2- -z3- -z4-` is a bulk `Z` stabilizer without
//! data resets or measurements, interacting in Z order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use tessera_ir::{Basis, DataBasis, Position2D};

use crate::error::{PlaquetteError, PlaquetteResult, RpngField};

/// A corner of a plaquette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All corners in description order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }

    /// Offset of the corner's data qubit from the syndrome qubit.
    pub fn offset(self) -> Position2D {
        match self {
            Corner::TopLeft => Position2D::new(-1, -1),
            Corner::TopRight => Position2D::new(1, -1),
            Corner::BottomLeft => Position2D::new(-1, 1),
            Corner::BottomRight => Position2D::new(1, 1),
        }
    }
}

/// What happens to a data qubit at the end of a plaquette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataEnd {
    Measure(DataBasis),
    Hadamard,
}

/// One corner of an RPNG description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RpngCorner {
    pub reset: Option<DataBasis>,
    pub pauli: Option<Basis>,
    pub step: Option<u8>,
    pub end: Option<DataEnd>,
}

impl RpngCorner {
    /// The `----` corner.
    pub const EMPTY: RpngCorner = RpngCorner {
        reset: None,
        pauli: None,
        step: None,
        end: None,
    };

    /// Whether the syndrome qubit interacts with this corner.
    pub fn interacts(&self) -> bool {
        self.pauli.is_some() && self.step.is_some()
    }

    fn parse(text: &str) -> PlaquetteResult<Self> {
        let chars: Vec<char> = text.chars().collect();
        let &[r, p, n, g] = chars.as_slice() else {
            return Err(PlaquetteError::WrongCornerLength {
                corner: text.to_string(),
            });
        };
        let invalid = |field: RpngField, found: char| PlaquetteError::InvalidField {
            corner: text.to_string(),
            field,
            found,
        };
        let basis = |c: char, field: RpngField| match c {
            '-' => Ok(None),
            'x' => Ok(Some(Basis::X)),
            'z' => Ok(Some(Basis::Z)),
            other => Err(invalid(field, other)),
        };
        let data_basis = |c: char, field: RpngField| match c {
            'y' => Ok(Some(DataBasis::Y)),
            other => basis(other, field).map(|b| b.map(DataBasis::from)),
        };

        let step = match n {
            '-' => None,
            '1'..='9' => Some(n as u8 - b'0'),
            other => return Err(invalid(RpngField::Schedule, other)),
        };
        let end = match g {
            'h' => Some(DataEnd::Hadamard),
            other => data_basis(other, RpngField::End)?.map(DataEnd::Measure),
        };
        Ok(Self {
            reset: data_basis(r, RpngField::Reset)?,
            pauli: basis(p, RpngField::Pauli)?,
            step,
            end,
        })
    }
}

fn basis_char(basis: Option<DataBasis>) -> char {
    basis.map_or('-', |b| b.as_char().to_ascii_lowercase())
}

impl fmt::Display for RpngCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = self.step.map_or('-', |s| char::from(b'0' + s));
        let end = match self.end {
            None => '-',
            Some(DataEnd::Hadamard) => 'h',
            Some(DataEnd::Measure(b)) => basis_char(Some(b)),
        };
        write!(
            f,
            "{}{}{}{}",
            basis_char(self.reset),
            basis_char(self.pauli.map(DataBasis::from)),
            step,
            end
        )
    }
}

/// A full plaquette description: four corners, syndrome qubit reset and
/// measured in `X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rpng {
    corners: [RpngCorner; 4],
}

impl Rpng {
    /// Build a description, rejecting steps shared by two corners.
    pub fn new(corners: [RpngCorner; 4]) -> PlaquetteResult<Self> {
        let mut seen = BTreeSet::new();
        let steps = corners.iter().filter(|c| c.interacts()).filter_map(|c| c.step);
        for step in steps {
            if !seen.insert(step) {
                return Err(PlaquetteError::DuplicateSchedule { step });
            }
        }
        Ok(Self { corners })
    }

    /// The description of a plaquette doing nothing.
    pub fn empty() -> Self {
        Self {
            corners: [RpngCorner::EMPTY; 4],
        }
    }

    pub fn corners(&self) -> &[RpngCorner; 4] {
        &self.corners
    }

    pub fn corner(&self, corner: Corner) -> &RpngCorner {
        &self.corners[corner.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.corners.iter().all(|c| *c == RpngCorner::EMPTY)
    }

    /// Whether the syndrome qubit interacts with any corner.
    pub fn interacts(&self) -> bool {
        self.corners.iter().any(RpngCorner::interacts)
    }

    pub fn has_reset(&self) -> bool {
        self.corners.iter().any(|c| c.reset.is_some())
    }

    /// Whether some data qubit is measured (Hadamards do not count).
    pub fn has_measurement(&self) -> bool {
        self.corners
            .iter()
            .any(|c| matches!(c.end, Some(DataEnd::Measure(_))))
    }

    /// Largest interaction step, if any corner interacts.
    pub fn max_step(&self) -> Option<u8> {
        self.corners
            .iter()
            .filter(|c| c.interacts())
            .filter_map(|c| c.step)
            .max()
    }
}

impl FromStr for Rpng {
    type Err = PlaquetteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let &[tl, tr, bl, br] = parts.as_slice() else {
            return Err(PlaquetteError::WrongCornerCount {
                text: s.to_string(),
                found: parts.len(),
            });
        };
        Self::new([
            RpngCorner::parse(tl)?,
            RpngCorner::parse(tr)?,
            RpngCorner::parse(bl)?,
            RpngCorner::parse(br)?,
        ])
    }
}

impl fmt::Display for Rpng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [tl, tr, bl, br] = &self.corners;
        write!(f, "{tl} {tr} {bl} {br}")
    }
}

impl TryFrom<String> for Rpng {
    type Error = PlaquetteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rpng> for String {
    fn from(value: Rpng) -> Self {
        value.to_string()
    }
}
