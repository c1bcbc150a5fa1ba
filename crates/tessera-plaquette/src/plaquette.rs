//! Plaquettes: local circuit fragments around one syndrome qubit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use tessera_ir::{Basis, Operation, OperationKind, Position2D};

use crate::error::{PlaquetteError, PlaquetteResult};
use crate::rpng::{Corner, DataEnd, Rpng};

/// The syndrome qubit of every plaquette sits at the origin.
pub const SYNDROME_QUBIT: Position2D = Position2D::new(0, 0);

/// Schedule length of a plaquette.
///
/// Regular plaquettes interact at steps `1..=4` and measure at moment 5;
/// extended plaquettes interact at steps `1..=6` and measure at moment 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timing {
    Regular,
    Extended,
}

impl Timing {
    /// Largest valid interaction step.
    pub fn max_step(self) -> u8 {
        match self {
            Timing::Regular => 4,
            Timing::Extended => 6,
        }
    }

    pub fn measurement_moment(self) -> usize {
        usize::from(self.max_step()) + 1
    }

    pub fn num_moments(self) -> usize {
        self.measurement_moment() + 1
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::Regular => write!(f, "regular"),
            Timing::Extended => write!(f, "extended"),
        }
    }
}

/// A scheduled local circuit on relative coordinates.
///
/// Qubits are offsets from the syndrome qubit at `(0, 0)`; the data
/// qubits are the corners at `(±1, ±1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plaquette {
    name: String,
    timing: Timing,
    moments: Vec<Vec<Operation<Position2D>>>,
}

impl Plaquette {
    /// Translate an RPNG description into moments.
    ///
    /// The syndrome qubit is reset in `X` at moment 0, applies one
    /// controlled Pauli per interacting corner at that corner's step and
    /// is measured in `X` at the measurement moment. It is left alone when
    /// no corner interacts. Data resets go in moment 0, data measurements
    /// and Hadamards in the measurement moment.
    pub fn from_rpng(description: &Rpng, timing: Timing) -> PlaquetteResult<Self> {
        let last = timing.measurement_moment();
        let mut moments = vec![Vec::new(); timing.num_moments()];

        if description.interacts() {
            moments[0].push(Operation::reset(Basis::X, SYNDROME_QUBIT));
        }
        for corner in Corner::ALL {
            let rpng = description.corner(corner);
            let data = corner.offset();
            if let Some(basis) = rpng.reset {
                moments[0].push(Operation::reset_in(basis, data));
            }
            if let (Some(pauli), Some(step)) = (rpng.pauli, rpng.step) {
                if step == 0 || step > timing.max_step() {
                    return Err(PlaquetteError::ScheduleOutOfRange {
                        step,
                        max: timing.max_step(),
                        timing,
                    });
                }
                moments[usize::from(step)].push(Operation::controlled_pauli(
                    pauli,
                    SYNDROME_QUBIT,
                    data,
                ));
            }
            match rpng.end {
                Some(DataEnd::Measure(basis)) => {
                    moments[last].push(Operation::measure_in(basis, data));
                }
                Some(DataEnd::Hadamard) => moments[last].push(Operation::hadamard(data)),
                None => {}
            }
        }
        if description.interacts() {
            moments[last].push(Operation::measure(Basis::X, SYNDROME_QUBIT));
        }

        Ok(Self {
            name: description.to_string(),
            timing,
            moments,
        })
    }

    /// A plaquette without any operation.
    pub fn empty(timing: Timing) -> Self {
        Self {
            name: Rpng::empty().to_string(),
            timing,
            moments: vec![Vec::new(); timing.num_moments()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn is_extended(&self) -> bool {
        self.timing == Timing::Extended
    }

    pub fn num_moments(&self) -> usize {
        self.moments.len()
    }

    pub fn moments(&self) -> &[Vec<Operation<Position2D>>] {
        &self.moments
    }

    pub fn is_empty(&self) -> bool {
        self.moments.iter().all(Vec::is_empty)
    }

    /// Every operation with its moment.
    pub fn operations(&self) -> impl Iterator<Item = (usize, &Operation<Position2D>)> {
        self.moments
            .iter()
            .enumerate()
            .flat_map(|(t, ops)| ops.iter().map(move |op| (t, op)))
    }

    /// Moment of the syndrome measurement, if the syndrome qubit is used.
    pub fn syndrome_measurement(&self) -> Option<usize> {
        self.operations()
            .find(|(_, op)| matches!(op, Operation::Measure { qubit, .. } if *qubit == SYNDROME_QUBIT))
            .map(|(t, _)| t)
    }

    /// Data corners touched by a controlled Pauli, with the Pauli and the
    /// moment.
    pub fn interactions(&self) -> impl Iterator<Item = (usize, Basis, Position2D)> + '_ {
        self.operations().filter_map(|(t, op)| match *op {
            Operation::ControlledPauli { pauli, target, .. } => Some((t, pauli, target)),
            _ => None,
        })
    }

    /// Operation kinds of this plaquette that merge with identical copies
    /// from neighbouring plaquettes.
    pub fn mergeable_kinds(&self) -> BTreeSet<OperationKind> {
        self.operations()
            .map(|(_, op)| op.kind())
            .filter(|kind| kind.is_mergeable())
            .collect()
    }

    /// Stretch to `length` moments.
    ///
    /// The last moment moves to the new end and the inserted moments stay
    /// idle; every other operation keeps its moment.
    pub fn padded(&self, length: usize) -> PlaquetteResult<Self> {
        let current = self.moments.len();
        if length < current {
            return Err(PlaquetteError::InvalidPadding {
                length: current,
                requested: length,
            });
        }
        let mut moments = self.moments.clone();
        if let Some(last) = moments.pop() {
            moments.resize_with(length - 1, Vec::new);
            moments.push(last);
        }
        Ok(Self {
            name: self.name.clone(),
            timing: self.timing,
            moments,
        })
    }
}

impl fmt::Display for Plaquette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "plaquette {} ({} moments)", self.name, self.moments.len())?;
        for (t, ops) in self.moments.iter().enumerate() {
            let names: Vec<String> = ops.iter().map(ToString::to_string).collect();
            writeln!(f, "  {t}: {}", names.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plaquette(text: &str, timing: Timing) -> Plaquette {
        Plaquette::from_rpng(&text.parse().unwrap(), timing).unwrap()
    }

    #[test]
    fn test_timing() {
        assert_eq!(Timing::Regular.num_moments(), 6);
        assert_eq!(Timing::Regular.measurement_moment(), 5);
        assert_eq!(Timing::Extended.num_moments(), 8);
        assert_eq!(Timing::Extended.measurement_moment(), 7);
    }

    #[test]
    fn test_memory_plaquette_with_reset_and_measurement() {
        let p = plaquette("zz1z zz2z zz3z zz4z", Timing::Regular);
        assert_eq!(p.num_moments(), 6);
        assert_eq!(p.moments()[0].len(), 5);
        assert!(p.moments()[0].contains(&Operation::reset(Basis::X, SYNDROME_QUBIT)));
        assert!(p.moments()[0].contains(&Operation::reset(Basis::Z, Position2D::new(1, 1))));
        assert_eq!(
            p.moments()[2],
            vec![Operation::controlled_pauli(
                Basis::Z,
                SYNDROME_QUBIT,
                Position2D::new(1, -1)
            )]
        );
        assert_eq!(p.moments()[5].len(), 5);
        assert_eq!(p.syndrome_measurement(), Some(5));
    }

    #[test]
    fn test_interaction_order() {
        let p = plaquette("-x1- -x3- -x2- -x4-", Timing::Regular);
        let order: Vec<Position2D> = p.interactions().map(|(_, _, q)| q).collect();
        assert_eq!(
            order,
            vec![
                Corner::TopLeft.offset(),
                Corner::BottomLeft.offset(),
                Corner::TopRight.offset(),
                Corner::BottomRight.offset(),
            ]
        );
        assert!(p.interactions().all(|(_, pauli, _)| pauli == Basis::X));
    }

    #[test]
    fn test_syndrome_unused_without_interaction() {
        let p = plaquette("z--z ---- ---- ----", Timing::Regular);
        assert_eq!(p.syndrome_measurement(), None);
        assert_eq!(p.operations().count(), 2);

        let empty = plaquette("---- ---- ---- ----", Timing::Extended);
        assert!(empty.is_empty());
        assert_eq!(empty.num_moments(), 8);
        assert_eq!(empty, Plaquette::empty(Timing::Extended));
    }

    #[test]
    fn test_hadamard_end() {
        let p = plaquette("-z1h -z2h ---- ----", Timing::Regular);
        assert_eq!(p.moments()[5].len(), 3);
        assert!(p.moments()[5].contains(&Operation::hadamard(Position2D::new(-1, -1))));
        assert_eq!(
            p.mergeable_kinds(),
            BTreeSet::from([
                OperationKind::Reset(Basis::X),
                OperationKind::Measure(Basis::X),
                OperationKind::Hadamard,
            ])
        );
    }

    #[test]
    fn test_y_data_operations() {
        let p = plaquette("yx1- -x2- -x3- -x4y", Timing::Regular);
        assert_eq!(p.moments()[0].len(), 2);
        assert!(p.moments()[0].contains(&Operation::ResetY {
            qubit: Position2D::new(-1, -1)
        }));
        assert!(p.moments()[5].contains(&Operation::MeasureY {
            qubit: Position2D::new(1, 1)
        }));
        assert_eq!(p.syndrome_measurement(), Some(5));
        assert!(p.mergeable_kinds().contains(&OperationKind::MeasureY));
    }

    #[test]
    fn test_schedule_out_of_range() {
        let rpng: Rpng = "-z1- -z2- -z3- -z5-".parse().unwrap();
        assert!(matches!(
            Plaquette::from_rpng(&rpng, Timing::Regular),
            Err(PlaquetteError::ScheduleOutOfRange { step: 5, max: 4, .. })
        ));
        assert!(Plaquette::from_rpng(&rpng, Timing::Extended).is_ok());
    }

    #[test]
    fn test_padding_moves_last_moment_only() {
        let p = plaquette("zz1z zz2z zz3z zz4z", Timing::Regular);
        let padded = p.padded(8).unwrap();
        assert_eq!(padded.num_moments(), 8);
        assert_eq!(padded.timing(), Timing::Regular);
        for t in 0..5 {
            assert_eq!(padded.moments()[t], p.moments()[t]);
        }
        assert!(padded.moments()[5].is_empty());
        assert!(padded.moments()[6].is_empty());
        assert_eq!(padded.moments()[7], p.moments()[5]);
        assert_eq!(padded.syndrome_measurement(), Some(7));

        assert_eq!(p.padded(6).unwrap(), p);
        assert!(matches!(
            padded.padded(6),
            Err(PlaquetteError::InvalidPadding { length: 8, requested: 6 })
        ));
    }
}
