//! Pipe builders.
//!
//! A spatial pipe is compiled on a two-plaquette-wide border template
//! whose two columns (or rows) straddle the shared boundary of its
//! endpoint cubes. Its plaquettes are then mapped onto the border
//! classes of each cube: the pipe's left (top) border onto the head's
//! right (bottom) border, and its right (bottom) border onto the tail's
//! left (top) border.

use std::collections::BTreeMap;

use tracing::debug;

use tessera_ir::{DataBasis, Direction3D};
use tessera_plaquette::{PlaquetteContext, PlaquetteFamily, SpatialAxis};
use tessera_templates::{
    QubitHorizontalBorders, QubitVerticalBorders, RectangularTemplate, TemplateBorder,
};

use crate::block::PipeSpec;
use crate::builder::{CompiledBlock, PipeBuilder, RoundPlaquettes, Substitution};
use crate::builders::cube::cube_family;
use crate::error::{CompileError, CompileResult};

fn unsupported(spec: &PipeSpec) -> CompileError {
    CompileError::UnsupportedKind {
        category: spec.category(),
        position: spec.position(),
    }
}

/// Head and tail class maps from the pipe template's classes.
fn border_maps(
    axis: SpatialAxis,
    head: &dyn RectangularTemplate,
    tail: &dyn RectangularTemplate,
) -> (BTreeMap<usize, usize>, BTreeMap<usize, usize>) {
    match axis {
        SpatialAxis::X => (
            QubitVerticalBorders
                .border_indices(TemplateBorder::Left)
                .to(&head.border_indices(TemplateBorder::Right)),
            QubitVerticalBorders
                .border_indices(TemplateBorder::Right)
                .to(&tail.border_indices(TemplateBorder::Left)),
        ),
        SpatialAxis::Y => (
            QubitHorizontalBorders
                .border_indices(TemplateBorder::Top)
                .to(&head.border_indices(TemplateBorder::Bottom)),
            QubitHorizontalBorders
                .border_indices(TemplateBorder::Bottom)
                .to(&tail.border_indices(TemplateBorder::Top)),
        ),
    }
}

/// Pipe plaquettes between the two endpoint cubes.
fn spatial_family(spec: &PipeSpec) -> CompileResult<PlaquetteFamily> {
    let axis = spec.axis().ok_or_else(|| unsupported(spec))?;
    let head = spec.head.pipe_end().ok_or_else(|| unsupported(spec))?;
    let tail = spec.tail.pipe_end().ok_or_else(|| unsupported(spec))?;
    Ok(PlaquetteFamily::SpatialPipe {
        axis,
        hadamard: spec.kind().has_hadamard(),
        even: spec.head.even,
        head,
        tail,
    })
}

/// Compile the pipe round by round and split it between both ends.
///
/// Data qubits of the seam are reset in the first round and measured in
/// the last one, in the pipe's temporal basis.
fn spatial_substitution(
    spec: &PipeSpec,
    head: &CompiledBlock,
    tail: &CompiledBlock,
) -> CompileResult<Substitution> {
    let family = spatial_family(spec)?;
    let axis = spec.axis().ok_or_else(|| unsupported(spec))?;
    let basis = spec
        .kind()
        .basis_along(Direction3D::Z, false)
        .map(DataBasis::from);
    let rounds = head.num_rounds();
    let (head_map, tail_map) = border_maps(axis, head.template.as_ref(), tail.template.as_ref());
    debug!(pipe = %spec.pipe, %family, rounds, "spatial pipe");

    let mut substitution = Substitution::empty();
    for round in 0..rounds {
        let context = PlaquetteContext::new(family)
            .with_reset(basis.filter(|_| round == 0))
            .with_measurement(basis.filter(|_| round + 1 == rounds));
        let plaquettes = RoundPlaquettes::described(&context)?;
        substitution.head.insert(round, plaquettes.remapped(&head_map));
        substitution.tail.insert(round, plaquettes.remapped(&tail_map));
    }
    Ok(substitution)
}

/// Plain temporal pipe: the cubes it joins already skip the data
/// measurement and reset at the shared time boundary.
pub struct TemporalPipeBuilder;

impl PipeBuilder for TemporalPipeBuilder {
    fn name(&self) -> &'static str {
        "TemporalPipe"
    }

    fn build(
        &self,
        _spec: &PipeSpec,
        _head: &CompiledBlock,
        _tail: &CompiledBlock,
    ) -> CompileResult<Substitution> {
        Ok(Substitution::empty())
    }
}

/// Temporal Hadamard pipe.
///
/// Replaces the last round of the lower cube by its own plaquettes
/// ending in a transversal Hadamard on every data qubit.
pub struct TemporalHadamardPipeBuilder;

impl PipeBuilder for TemporalHadamardPipeBuilder {
    fn name(&self) -> &'static str {
        "TemporalHadamardPipe"
    }

    fn build(
        &self,
        spec: &PipeSpec,
        head: &CompiledBlock,
        _tail: &CompiledBlock,
    ) -> CompileResult<Substitution> {
        let family = cube_family(&spec.head)?;
        let Some(last) = head.num_rounds().checked_sub(1) else {
            return Ok(Substitution::empty());
        };
        let context = PlaquetteContext::new(family)
            .with_reset(spec.head.reset_at(last))
            .with_hadamard(true);
        let plaquettes =
            RoundPlaquettes::for_classes(head.template.expected_plaquettes_number(), &context)?;
        debug!(pipe = %spec.pipe, round = last, "temporal Hadamard");

        let mut substitution = Substitution::empty();
        substitution.head.insert(last, plaquettes);
        Ok(substitution)
    }
}

/// Spatial pipe without a Hadamard.
///
/// Next to a spatial junction the pipe takes the junction's arm
/// plaquettes on that side, which are extended.
pub struct SpatialPipeBuilder;

impl PipeBuilder for SpatialPipeBuilder {
    fn name(&self) -> &'static str {
        "SpatialPipe"
    }

    fn build(
        &self,
        spec: &PipeSpec,
        head: &CompiledBlock,
        tail: &CompiledBlock,
    ) -> CompileResult<Substitution> {
        spatial_substitution(spec, head, tail)
    }
}

/// Spatial Hadamard pipe.
///
/// The checkerboard flips across the pipe and the seam data qubits take
/// the tail's bases on the head cells, so that the half patches on both
/// sides match their cubes. A junction at either end keeps its own
/// walls.
pub struct SpatialHadamardPipeBuilder;

impl PipeBuilder for SpatialHadamardPipeBuilder {
    fn name(&self) -> &'static str {
        "SpatialHadamardPipe"
    }

    fn build(
        &self,
        spec: &PipeSpec,
        head: &CompiledBlock,
        tail: &CompiledBlock,
    ) -> CompileResult<Substitution> {
        if !spec.kind().has_hadamard() {
            return Err(unsupported(spec));
        }
        spatial_substitution(spec, head, tail)
    }
}
