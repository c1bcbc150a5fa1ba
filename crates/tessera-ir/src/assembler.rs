//! Splicing local circuit fragments into one global circuit.
//!
//! The assembler is a small state machine:
//!
//! ```text
//! Empty --begin--> Assembling --seal--> Sealed
//! ```
//!
//! Operations arrive with absolute coordinates and an absolute moment.
//! Identical copies of a mergeable operation (reset, measurement,
//! Hadamard) on the same qubit and moment are merged; any other clash is
//! a [`IrError::ScheduleConflict`]. Sealing assigns qubit indices in
//! coordinate order and sorts every moment canonically.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::circuit::{Moment, ScheduledCircuit, StabilizerRecord, StabilizerTag};
use crate::error::{IrError, IrResult};
use crate::geometry::Position2D;
use crate::operation::Operation;
use crate::qubit::QubitMap;

/// Lifecycle of a [`CircuitAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssemblerState {
    Empty,
    Assembling,
    Sealed,
}

impl fmt::Display for AssemblerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblerState::Empty => "empty",
            AssemblerState::Assembling => "assembling",
            AssemblerState::Sealed => "sealed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
struct PendingStabilizer {
    moment: usize,
    qubit: Position2D,
    tag: StabilizerTag,
}

/// Accumulates operations into moments, then seals into a
/// [`ScheduledCircuit`].
#[derive(Debug)]
pub struct CircuitAssembler {
    state: AssemblerState,
    moments: Vec<Vec<Operation<Position2D>>>,
    /// `(moment, qubit)` to the index of the occupying operation.
    occupancy: FxHashMap<(usize, Position2D), usize>,
    origins: Vec<Vec<String>>,
    stabilizers: Vec<PendingStabilizer>,
    merged: usize,
}

impl Default for CircuitAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitAssembler {
    pub fn new() -> Self {
        Self {
            state: AssemblerState::Empty,
            moments: Vec::new(),
            occupancy: FxHashMap::default(),
            origins: Vec::new(),
            stabilizers: Vec::new(),
            merged: 0,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Current number of moments.
    pub fn num_moments(&self) -> usize {
        self.moments.len()
    }

    /// Number of duplicate mergeable operations absorbed so far.
    pub fn merged_duplicates(&self) -> usize {
        self.merged
    }

    fn expect_state(&self, expected: AssemblerState, action: &'static str) -> IrResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(IrError::InvalidState {
                action,
                state: self.state,
            })
        }
    }

    /// Start accepting operations.
    pub fn begin(&mut self) -> IrResult<()> {
        self.expect_state(AssemblerState::Empty, "begin")?;
        self.state = AssemblerState::Assembling;
        Ok(())
    }

    /// Make sure the circuit has at least `len` moments; trailing moments
    /// may stay empty.
    pub fn extend_to(&mut self, len: usize) -> IrResult<()> {
        self.expect_state(AssemblerState::Assembling, "extend")?;
        if self.moments.len() < len {
            self.moments.resize_with(len, Vec::new);
            self.origins.resize_with(len, Vec::new);
        }
        Ok(())
    }

    /// Place `operation` at `moment`.
    ///
    /// `origin` names the fragment the operation comes from and is only
    /// used for error reporting.
    pub fn add_operation(
        &mut self,
        moment: usize,
        operation: Operation<Position2D>,
        origin: &str,
    ) -> IrResult<()> {
        self.expect_state(AssemblerState::Assembling, "add_operation")?;
        self.extend_to(moment + 1)?;

        for qubit in operation.qubits() {
            if let Some(&slot) = self.occupancy.get(&(moment, qubit)) {
                let existing = self.moments[moment][slot];
                if existing == operation && operation.kind().is_mergeable() {
                    self.merged += 1;
                    return Ok(());
                }
                return Err(IrError::ScheduleConflict {
                    moment,
                    qubit,
                    existing,
                    incoming: operation,
                    existing_origin: self.origins[moment][slot].clone(),
                    origin: origin.to_string(),
                });
            }
        }

        let slot = self.moments[moment].len();
        for qubit in operation.qubits() {
            self.occupancy.insert((moment, qubit), slot);
        }
        self.moments[moment].push(operation);
        self.origins[moment].push(origin.to_string());
        Ok(())
    }

    /// Record that the measurement of `qubit` at `moment` reads out the
    /// stabilizer identified by `tag`.
    pub fn record_stabilizer(
        &mut self,
        moment: usize,
        qubit: Position2D,
        tag: StabilizerTag,
    ) -> IrResult<()> {
        self.expect_state(AssemblerState::Assembling, "record_stabilizer")?;
        self.stabilizers.push(PendingStabilizer { moment, qubit, tag });
        Ok(())
    }

    /// Freeze the circuit.
    pub fn seal(&mut self) -> IrResult<ScheduledCircuit> {
        self.expect_state(AssemblerState::Assembling, "seal")?;
        self.state = AssemblerState::Sealed;

        let qubits = QubitMap::from_coordinates(self.occupancy.keys().map(|(_, q)| *q));
        let index = |q: Position2D| qubits.index_of(q).ok_or(IrError::UnmappedCoordinate(q));

        let mut moments = Vec::with_capacity(self.moments.len());
        for ops in std::mem::take(&mut self.moments) {
            let mut indexed = ops
                .into_iter()
                .map(|op| op.try_map_qubits(index))
                .collect::<IrResult<Vec<_>>>()?;
            indexed.sort_unstable_by_key(|op| (op.first_qubit(), *op));
            moments.push(Moment::new(indexed));
        }

        let mut stabilizers = std::mem::take(&mut self.stabilizers)
            .into_iter()
            .map(|s| {
                Ok(StabilizerRecord {
                    moment: s.moment,
                    qubit: index(s.qubit)?,
                    tag: s.tag,
                })
            })
            .collect::<IrResult<Vec<_>>>()?;
        stabilizers.sort_unstable_by_key(|s| (s.moment, s.qubit));

        self.occupancy.clear();
        self.origins.clear();
        debug!(
            moments = moments.len(),
            qubits = qubits.len(),
            merged = self.merged,
            "sealed circuit"
        );
        Ok(ScheduledCircuit::from_parts(moments, qubits, stabilizers))
    }
}
