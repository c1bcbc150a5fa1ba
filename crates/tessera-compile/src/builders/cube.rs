//! Cube builders.

use std::sync::Arc;

use tracing::debug;

use tessera_plaquette::{PlaquetteContext, PlaquetteFamily};
use tessera_templates::{QubitSpatialCubeTemplate, QubitTemplate, RectangularTemplate};

use crate::block::CubeSpec;
use crate::builder::{CompiledBlock, CubeBuilder, RoundPlaquettes};
use crate::error::{CompileError, CompileResult};

fn unsupported(spec: &CubeSpec) -> CompileError {
    CompileError::UnsupportedKind {
        category: spec.category(),
        position: spec.position,
    }
}

/// Plaquette family of a cube: junction plaquettes for spatial
/// junctions, memory plaquettes of its walls otherwise.
pub(crate) fn cube_family(spec: &CubeSpec) -> CompileResult<PlaquetteFamily> {
    let (x, y) = spec.walls().ok_or_else(|| unsupported(spec))?;
    Ok(if spec.is_spatial_junction() {
        PlaquetteFamily::SpatialJunction {
            walls: x,
            even: spec.even,
            arms: spec.arms,
            hadamard_arms: spec.hadamard_arms,
        }
    } else {
        PlaquetteFamily::Memory {
            x,
            y,
            even: spec.even,
        }
    })
}

/// Build `num_rounds` rounds of `family` on `template`, resetting and
/// measuring data in the cube's temporal basis at its open time ends.
fn build_rounds(
    spec: &CubeSpec,
    template: Arc<dyn RectangularTemplate>,
    family: PlaquetteFamily,
    num_rounds: usize,
) -> CompileResult<CompiledBlock> {
    let classes = template.expected_plaquettes_number();
    let rounds = (0..num_rounds)
        .map(|round| {
            let context = PlaquetteContext::new(family)
                .with_reset(spec.reset_at(round))
                .with_measurement(spec.measurement_at(round, num_rounds));
            Ok(RoundPlaquettes::for_classes(classes, &context)?)
        })
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(CompiledBlock::new(template, rounds))
}

/// Memory cube builder.
///
/// Uses the qubit template and the memory plaquettes of the cube's
/// spatial boundary bases.
pub struct MemoryCubeBuilder;

impl CubeBuilder for MemoryCubeBuilder {
    fn name(&self) -> &'static str {
        "MemoryCube"
    }

    fn build(&self, spec: &CubeSpec, rounds: usize) -> CompileResult<CompiledBlock> {
        if spec.is_spatial_junction() {
            return Err(unsupported(spec));
        }
        let family = cube_family(spec)?;
        debug!(position = %spec.position, %family, rounds, "building memory cube");
        build_rounds(spec, Arc::new(QubitTemplate), family, rounds)
    }
}

/// Spatial junction builder.
///
/// Uses the spatial cube template with extended plaquettes. The
/// junction's walls all carry its `x` basis; its arms may run along both
/// spatial axes.
pub struct SpatialJunctionBuilder;

impl CubeBuilder for SpatialJunctionBuilder {
    fn name(&self) -> &'static str {
        "SpatialJunction"
    }

    fn build(&self, spec: &CubeSpec, rounds: usize) -> CompileResult<CompiledBlock> {
        if !spec.is_spatial_junction() {
            return Err(unsupported(spec));
        }
        let family = cube_family(spec)?;
        debug!(position = %spec.position, %family, rounds, "building spatial junction");
        build_rounds(spec, Arc::new(QubitSpatialCubeTemplate), family, rounds)
    }
}

/// Y half cube builder.
///
/// A memory patch with the walls of its temporal pipe whose data qubits
/// are prepared in `Y` when the pipe leaves upwards, or measured in `Y`
/// when it arrives from below.
pub struct HalfCubeBuilder;

impl CubeBuilder for HalfCubeBuilder {
    fn name(&self) -> &'static str {
        "HalfCube"
    }

    fn build(&self, spec: &CubeSpec, rounds: usize) -> CompileResult<CompiledBlock> {
        if !spec.kind.is_y_half_cube() {
            return Err(unsupported(spec));
        }
        let family = cube_family(spec)?;
        debug!(position = %spec.position, %family, rounds, "building Y half cube");
        build_rounds(spec, Arc::new(QubitTemplate), family, rounds)
    }
}
