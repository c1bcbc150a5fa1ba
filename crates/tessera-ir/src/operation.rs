//! Physical operations emitted by the compiler.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{Basis, DataBasis, Position2D};
use crate::qubit::QubitIndex;

/// Kind of a physical operation, without operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Reset(Basis),
    Measure(Basis),
    ResetY,
    MeasureY,
    Hadamard,
    /// Controlled Pauli, `CX` or `CZ`.
    ControlledPauli(Basis),
}

impl OperationKind {
    /// Short gate name: `RX`, `MZ`, `RY`, `H`, `CX`, ...
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Reset(Basis::X) => "RX",
            OperationKind::Reset(Basis::Z) => "RZ",
            OperationKind::Measure(Basis::X) => "MX",
            OperationKind::Measure(Basis::Z) => "MZ",
            OperationKind::ResetY => "RY",
            OperationKind::MeasureY => "MY",
            OperationKind::Hadamard => "H",
            OperationKind::ControlledPauli(Basis::X) => "CX",
            OperationKind::ControlledPauli(Basis::Z) => "CZ",
        }
    }

    /// Identical copies of a mergeable operation on the same qubit and
    /// moment collapse into one when fragments are spliced together.
    pub fn is_mergeable(self) -> bool {
        !matches!(self, OperationKind::ControlledPauli(_))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A physical operation on one or two qubits of type `Q`.
///
/// Plaquettes use relative [`Position2D`] offsets, the assembler uses
/// absolute coordinates and sealed circuits use [`QubitIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operation<Q> {
    Reset { basis: Basis, qubit: Q },
    Measure { basis: Basis, qubit: Q },
    ResetY { qubit: Q },
    MeasureY { qubit: Q },
    Hadamard { qubit: Q },
    ControlledPauli { pauli: Basis, control: Q, target: Q },
}

impl<Q: Copy> Operation<Q> {
    pub fn reset(basis: Basis, qubit: Q) -> Self {
        Operation::Reset { basis, qubit }
    }

    pub fn measure(basis: Basis, qubit: Q) -> Self {
        Operation::Measure { basis, qubit }
    }

    /// Reset in any data basis, `Y` included.
    pub fn reset_in(basis: DataBasis, qubit: Q) -> Self {
        match basis.as_basis() {
            Some(basis) => Operation::Reset { basis, qubit },
            None => Operation::ResetY { qubit },
        }
    }

    /// Measurement in any data basis, `Y` included.
    pub fn measure_in(basis: DataBasis, qubit: Q) -> Self {
        match basis.as_basis() {
            Some(basis) => Operation::Measure { basis, qubit },
            None => Operation::MeasureY { qubit },
        }
    }

    pub fn hadamard(qubit: Q) -> Self {
        Operation::Hadamard { qubit }
    }

    pub fn controlled_pauli(pauli: Basis, control: Q, target: Q) -> Self {
        Operation::ControlledPauli {
            pauli,
            control,
            target,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Reset { basis, .. } => OperationKind::Reset(*basis),
            Operation::Measure { basis, .. } => OperationKind::Measure(*basis),
            Operation::ResetY { .. } => OperationKind::ResetY,
            Operation::MeasureY { .. } => OperationKind::MeasureY,
            Operation::Hadamard { .. } => OperationKind::Hadamard,
            Operation::ControlledPauli { pauli, .. } => OperationKind::ControlledPauli(*pauli),
        }
    }

    /// Qubits touched by the operation, control first.
    pub fn qubits(&self) -> impl Iterator<Item = Q> {
        let (first, second) = match *self {
            Operation::Reset { qubit, .. }
            | Operation::Measure { qubit, .. }
            | Operation::ResetY { qubit }
            | Operation::MeasureY { qubit }
            | Operation::Hadamard { qubit } => (qubit, None),
            Operation::ControlledPauli {
                control, target, ..
            } => (control, Some(target)),
        };
        std::iter::once(first).chain(second)
    }

    /// First operand; used as the canonical sort key inside a moment.
    pub fn first_qubit(&self) -> Q {
        match *self {
            Operation::Reset { qubit, .. }
            | Operation::Measure { qubit, .. }
            | Operation::ResetY { qubit }
            | Operation::MeasureY { qubit }
            | Operation::Hadamard { qubit } => qubit,
            Operation::ControlledPauli { control, .. } => control,
        }
    }

    /// Apply `f` to every operand.
    pub fn map_qubits<R: Copy>(self, mut f: impl FnMut(Q) -> R) -> Operation<R> {
        match self {
            Operation::Reset { basis, qubit } => Operation::Reset {
                basis,
                qubit: f(qubit),
            },
            Operation::Measure { basis, qubit } => Operation::Measure {
                basis,
                qubit: f(qubit),
            },
            Operation::ResetY { qubit } => Operation::ResetY { qubit: f(qubit) },
            Operation::MeasureY { qubit } => Operation::MeasureY { qubit: f(qubit) },
            Operation::Hadamard { qubit } => Operation::Hadamard { qubit: f(qubit) },
            Operation::ControlledPauli {
                pauli,
                control,
                target,
            } => Operation::ControlledPauli {
                pauli,
                control: f(control),
                target: f(target),
            },
        }
    }

    /// Fallible variant of [`Operation::map_qubits`].
    pub fn try_map_qubits<R: Copy, E>(
        self,
        mut f: impl FnMut(Q) -> Result<R, E>,
    ) -> Result<Operation<R>, E> {
        Ok(match self {
            Operation::Reset { basis, qubit } => Operation::Reset {
                basis,
                qubit: f(qubit)?,
            },
            Operation::Measure { basis, qubit } => Operation::Measure {
                basis,
                qubit: f(qubit)?,
            },
            Operation::ResetY { qubit } => Operation::ResetY { qubit: f(qubit)? },
            Operation::MeasureY { qubit } => Operation::MeasureY { qubit: f(qubit)? },
            Operation::Hadamard { qubit } => Operation::Hadamard { qubit: f(qubit)? },
            Operation::ControlledPauli {
                pauli,
                control,
                target,
            } => Operation::ControlledPauli {
                pauli,
                control: f(control)?,
                target: f(target)?,
            },
        })
    }
}

impl Operation<Position2D> {
    /// Translate every operand by `origin`.
    #[must_use]
    pub fn translated(self, origin: Position2D) -> Self {
        self.map_qubits(|q| q.offset_by(origin))
    }
}

/// Operation on sealed qubit indices.
pub type IndexedOperation = Operation<QubitIndex>;

impl<Q: Copy + fmt::Display> fmt::Display for Operation<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ControlledPauli {
                control, target, ..
            } => write!(f, "{} {control} {target}", self.kind()),
            _ => write!(f, "{} {}", self.kind(), self.first_qubit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_qubits() {
        let cx = Operation::controlled_pauli(Basis::X, QubitIndex(0), QubitIndex(4));
        assert_eq!(cx.qubits().collect::<Vec<_>>(), vec![QubitIndex(0), QubitIndex(4)]);
        let m = Operation::measure(Basis::Z, QubitIndex(2));
        assert_eq!(m.qubits().count(), 1);
        assert_eq!(m.first_qubit(), QubitIndex(2));
    }

    #[test]
    fn test_operation_display() {
        let cz = Operation::controlled_pauli(Basis::Z, QubitIndex(1), QubitIndex(2));
        assert_eq!(cz.to_string(), "CZ q1 q2");
        assert_eq!(Operation::reset(Basis::X, QubitIndex(0)).to_string(), "RX q0");
        assert_eq!(Operation::hadamard(QubitIndex(5)).to_string(), "H q5");
    }

    #[test]
    fn test_mergeable_kinds() {
        assert!(OperationKind::Reset(Basis::Z).is_mergeable());
        assert!(OperationKind::Hadamard.is_mergeable());
        assert!(OperationKind::MeasureY.is_mergeable());
        assert!(!OperationKind::ControlledPauli(Basis::X).is_mergeable());
    }

    #[test]
    fn test_data_basis_dispatch() {
        let q = QubitIndex(3);
        assert_eq!(Operation::reset_in(DataBasis::Z, q), Operation::reset(Basis::Z, q));
        assert_eq!(Operation::measure_in(DataBasis::X, q), Operation::measure(Basis::X, q));
        assert_eq!(Operation::reset_in(DataBasis::Y, q).kind(), OperationKind::ResetY);
        assert_eq!(Operation::measure_in(DataBasis::Y, q).to_string(), "MY q3");
    }

    #[test]
    fn test_translate() {
        let op = Operation::controlled_pauli(Basis::X, Position2D::new(0, 0), Position2D::new(-1, 1));
        let moved = op.translated(Position2D::new(4, 2));
        assert_eq!(
            moved,
            Operation::controlled_pauli(Basis::X, Position2D::new(4, 2), Position2D::new(3, 3))
        );
    }
}
