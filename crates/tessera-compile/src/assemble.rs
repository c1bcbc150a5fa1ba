//! Splice compiled blocks into one scheduled circuit.
//!
//! Blocks are grouped by `z`. Each non-empty slice is laid out on a
//! [`LayoutTemplate`] and runs its rounds back to back; slices follow
//! each other in ascending `z`. The plaquette at global cell `(px, py)`
//! has its syndrome qubit at `(2 px, 2 py)`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ndarray::Array2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tessera_ir::{
    BlockPosition2D, CircuitAssembler, Position2D, Position3D, ScheduledCircuit, StabilizerTag,
};
use tessera_plaquette::Timing;
use tessera_templates::{LayoutTemplate, RectangularTemplate, Template};

use crate::builder::{CompiledBlock, RoundPlaquettes};
use crate::error::CompileResult;

/// Schedule of one z-slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceSummary {
    pub z: i32,
    pub num_cubes: usize,
    pub rounds: usize,
    /// Moments per round: 8 when the slice holds an extended plaquette,
    /// else 6.
    pub round_length: usize,
    pub first_moment: usize,
}

impl SliceSummary {
    pub fn num_moments(&self) -> usize {
        self.rounds * self.round_length
    }

    pub fn is_extended(&self) -> bool {
        self.round_length == Timing::Extended.num_moments()
    }

    /// First moment of `round`.
    pub fn round_start(&self, round: usize) -> usize {
        self.first_moment + round * self.round_length
    }
}

/// Lay out every slice and seal the circuit.
pub(crate) fn assemble(
    blocks: &BTreeMap<Position3D, CompiledBlock>,
    k: u32,
    rounds: usize,
) -> CompileResult<(ScheduledCircuit, Vec<SliceSummary>)> {
    let mut assembler = CircuitAssembler::new();
    assembler.begin()?;

    let levels: BTreeSet<i32> = blocks.keys().map(|p| p.z).collect();
    let mut slices = Vec::with_capacity(levels.len());
    let mut first_moment = 0;
    for z in levels {
        let slice: BTreeMap<Position3D, &CompiledBlock> = blocks
            .iter()
            .filter(|(p, _)| p.z == z)
            .map(|(p, b)| (*p, b))
            .collect();
        let summary = assemble_slice(&mut assembler, z, &slice, k, rounds, first_moment)?;
        debug!(
            z,
            cubes = summary.num_cubes,
            round_length = summary.round_length,
            first_moment,
            "assembled slice"
        );
        first_moment += summary.num_moments();
        slices.push(summary);
    }

    assembler.extend_to(first_moment)?;
    let merged = assembler.merged_duplicates();
    let circuit = assembler.seal()?;
    info!(
        slices = slices.len(),
        moments = circuit.num_moments(),
        qubits = circuit.num_qubits(),
        merged,
        "sealed circuit"
    );
    Ok((circuit, slices))
}

#[allow(clippy::cast_possible_wrap)]
fn assemble_slice(
    assembler: &mut CircuitAssembler,
    z: i32,
    slice: &BTreeMap<Position3D, &CompiledBlock>,
    k: u32,
    rounds: usize,
    first_moment: usize,
) -> CompileResult<SliceSummary> {
    let layout = LayoutTemplate::new(
        slice
            .iter()
            .map(|(p, b)| (p.as_2d(), Arc::clone(&b.template)))
            .collect::<BTreeMap<BlockPosition2D, Arc<dyn RectangularTemplate>>>(),
    )?;
    let extended = slice.values().any(|b| b.has_extended());
    let timing = if extended {
        Timing::Extended
    } else {
        Timing::Regular
    };
    let summary = SliceSummary {
        z,
        num_cubes: slice.len(),
        rounds,
        round_length: timing.num_moments(),
        first_moment,
    };

    let classes: Array2<usize> = layout.instantiate(k)?;
    let (width, height) = layout.element_shape(k);
    let origin = layout.origin();

    // Layout class -> (cube, class in the cube's own template).
    let cubes: FxHashMap<BlockPosition2D, Position3D> =
        slice.keys().map(|p| (p.as_2d(), *p)).collect();
    let mut owners: FxHashMap<usize, (Position3D, usize)> = FxHashMap::default();
    for (position, mapping) in layout.indices_map() {
        if let Some(&cube) = cubes.get(&position) {
            for (local, global) in mapping {
                owners.insert(global, (cube, local));
            }
        }
    }

    for round in 0..rounds {
        let padded = slice
            .iter()
            .filter_map(|(p, b)| b.rounds.get(round).map(|r| (p, r)))
            .map(|(p, r)| Ok((*p, r.padded(summary.round_length)?)))
            .collect::<CompileResult<BTreeMap<Position3D, RoundPlaquettes>>>()?;
        let start = summary.round_start(round);

        for ((row, col), &class) in classes.indexed_iter() {
            let Some(&(cube, local)) = owners.get(&class) else {
                continue;
            };
            let Some(plaquette) = padded.get(&cube).and_then(|r| r.get(local)) else {
                continue;
            };
            if plaquette.is_empty() {
                continue;
            }

            let px = origin.x * width as i64 + col as i64;
            let py = origin.y * height as i64 + row as i64;
            let syndrome = Position2D::new(2 * px, 2 * py);
            let (x0, y0) = layout.block_offset(cube.as_2d(), k);
            let cell = (row - y0, col - x0);
            let name = format!(
                "{} (block {cube}, cell ({}, {}), round {round})",
                plaquette.name(),
                cell.0,
                cell.1
            );

            for (t, op) in plaquette.operations() {
                assembler.add_operation(start + t, op.translated(syndrome), &name)?;
            }
            if let Some(t) = plaquette.syndrome_measurement() {
                assembler.record_stabilizer(
                    start + t,
                    syndrome,
                    StabilizerTag {
                        block: cube,
                        cell,
                        class_index: local,
                        round,
                    },
                )?;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CubeBuilder;
    use crate::builders::MemoryCubeBuilder;
    use crate::block::CubeSpec;
    use tessera_graph::gallery;
    use tessera_ir::Basis;

    fn memory_blocks(rounds: usize) -> BTreeMap<Position3D, CompiledBlock> {
        let graph = gallery::memory(Basis::Z).unwrap();
        let position = Position3D::new(0, 0, 0);
        let spec = CubeSpec::from_graph(&graph, position).unwrap();
        BTreeMap::from([(position, MemoryCubeBuilder.build(&spec, rounds).unwrap())])
    }

    #[test]
    fn test_slice_summary() {
        let summary = SliceSummary {
            z: 0,
            num_cubes: 1,
            rounds: 3,
            round_length: 8,
            first_moment: 12,
        };
        assert_eq!(summary.num_moments(), 24);
        assert!(summary.is_extended());
        assert_eq!(summary.round_start(2), 28);
    }

    #[test]
    fn test_single_memory_round() {
        let (circuit, slices) = assemble(&memory_blocks(1), 1, 1).unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].round_length, 6);
        assert_eq!(circuit.num_moments(), 6);
        // 4x4 plaquettes on a 9x9 grid of data and syndrome qubits.
        assert!(circuit.num_qubits() > 16);
        assert!(circuit.check_conflict_free().is_ok());
    }

    #[test]
    fn test_stabilizer_records_per_round() {
        let (circuit, _) = assemble(&memory_blocks(3), 2, 3).unwrap();
        assert_eq!(circuit.num_moments(), 18);
        let records = circuit.stabilizer_records();
        assert!(!records.is_empty());
        for record in records {
            assert_eq!(record.moment % 6, 5);
            assert_eq!(record.moment / 6, record.tag.round);
        }
        let per_round = records.iter().filter(|r| r.tag.round == 0).count();
        assert_eq!(records.len(), 3 * per_round);
    }
}
