//! The sealed, moment-indexed circuit.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::geometry::Position3D;
use crate::operation::{IndexedOperation, OperationKind};
use crate::qubit::{QubitIndex, QubitMap};

/// Operations that run in the same time step, on pairwise distinct qubits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Moment {
    operations: Vec<IndexedOperation>,
}

impl Moment {
    pub(crate) fn new(operations: Vec<IndexedOperation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[IndexedOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Whether any operation in this moment touches `qubit`.
    pub fn touches(&self, qubit: QubitIndex) -> bool {
        self.operations
            .iter()
            .any(|op| op.qubits().any(|q| q == qubit))
    }
}

/// Identifies which stabilizer a syndrome measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StabilizerTag {
    /// Block whose template produced the plaquette.
    pub block: Position3D,
    /// Row and column of the plaquette inside the block template.
    pub cell: (usize, usize),
    /// Plaquette class index in the block template.
    pub class_index: usize,
    /// Round index within the block.
    pub round: usize,
}

impl fmt::Display for StabilizerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {} cell ({}, {}) class {} round {}",
            self.block, self.cell.0, self.cell.1, self.class_index, self.round
        )
    }
}

/// A syndrome measurement and the stabilizer it reads out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizerRecord {
    pub moment: usize,
    pub qubit: QubitIndex,
    pub tag: StabilizerTag,
}

/// Final output of the compiler.
///
/// Built only by [`crate::CircuitAssembler::seal`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduledCircuit {
    moments: Vec<Moment>,
    qubits: QubitMap,
    stabilizers: Vec<StabilizerRecord>,
}

impl ScheduledCircuit {
    pub(crate) fn from_parts(
        moments: Vec<Moment>,
        qubits: QubitMap,
        stabilizers: Vec<StabilizerRecord>,
    ) -> Self {
        Self {
            moments,
            qubits,
            stabilizers,
        }
    }

    pub fn num_moments(&self) -> usize {
        self.moments.len()
    }

    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    pub fn moment(&self, index: usize) -> Option<&Moment> {
        self.moments.get(index)
    }

    pub fn qubit_map(&self) -> &QubitMap {
        &self.qubits
    }

    pub fn stabilizer_records(&self) -> &[StabilizerRecord] {
        &self.stabilizers
    }

    /// Total number of operations.
    pub fn num_operations(&self) -> usize {
        self.moments.iter().map(Moment::len).sum()
    }

    /// Operation count per gate name.
    pub fn operation_counts(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for op in self.moments.iter().flat_map(|m| m.operations()) {
            *counts.entry(op.kind().name()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of operations of one kind.
    pub fn count_kind(&self, kind: OperationKind) -> usize {
        self.moments
            .iter()
            .flat_map(|m| m.operations())
            .filter(|op| op.kind() == kind)
            .count()
    }

    /// Check that no moment references a qubit twice.
    pub fn check_conflict_free(&self) -> IrResult<()> {
        for (index, moment) in self.moments.iter().enumerate() {
            let mut seen = vec![false; self.qubits.len()];
            for qubit in moment.operations().iter().flat_map(|op| op.qubits()) {
                let slot = seen
                    .get_mut(qubit.as_usize())
                    .ok_or(IrError::UnknownQubit { qubit })?;
                if *slot {
                    return Err(IrError::DuplicateQubit {
                        moment: index,
                        qubit,
                    });
                }
                *slot = true;
            }
        }
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> IrResult<Self> {
        let circuit: ScheduledCircuit = serde_json::from_str(json)?;
        circuit.check_conflict_free()?;
        Ok(circuit)
    }
}

impl fmt::Display for ScheduledCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, coordinate) in self.qubits.iter() {
            writeln!(f, "QUBIT_COORDS{coordinate} {}", index.0)?;
        }
        for (i, moment) in self.moments.iter().enumerate() {
            if i > 0 {
                writeln!(f, "TICK")?;
            }
            for op in moment.operations() {
                writeln!(f, "{op}")?;
            }
        }
        Ok(())
    }
}
