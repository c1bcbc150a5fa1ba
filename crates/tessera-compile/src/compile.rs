//! The block graph compiler.

use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use tessera_graph::{BlockGraph, CorrelationSurface};
use tessera_ir::{Position3D, ScheduledCircuit};

use crate::assemble::{SliceSummary, assemble};
use crate::block::{BlockPlan, CubeSpec, PipeSpec};
use crate::builder::{CompiledBlock, CubeBuilder, PipeBuilder, RoundPlaquettes};
use crate::config::CompileOptions;
use crate::error::{CompileError, CompileResult};
use crate::registry::BuilderRegistry;

/// Output of a compilation.
#[derive(Debug, Clone)]
pub struct CompiledGraph {
    pub circuit: ScheduledCircuit,
    /// Correlation surfaces the circuit's observables are read from.
    pub observables: Vec<CorrelationSurface>,
    /// Schedule of each z-slice, in time order.
    pub slices: Vec<SliceSummary>,
}

impl CompiledGraph {
    pub fn num_moments(&self) -> usize {
        self.circuit.num_moments()
    }

    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Whether some slice runs extended rounds.
    pub fn has_extended_rounds(&self) -> bool {
        self.slices.iter().any(SliceSummary::is_extended)
    }
}

/// Compiles block graphs with a builder registry and fixed options.
#[derive(Debug, Default)]
pub struct BlockGraphCompiler {
    registry: BuilderRegistry,
    options: CompileOptions,
}

impl BlockGraphCompiler {
    /// A compiler using the standard builders.
    pub fn new(options: CompileOptions) -> Self {
        Self {
            registry: BuilderRegistry::standard(),
            options,
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: BuilderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    /// Rounds every block runs at scale `k`.
    pub fn rounds(&self, k: u32) -> CompileResult<usize> {
        let value = self.options.rounds.eval(k);
        usize::try_from(value)
            .ok()
            .filter(|rounds| *rounds >= 1)
            .ok_or(CompileError::InvalidRounds {
                rounds: self.options.rounds,
                k,
                value,
            })
    }

    /// Compile `graph` at scale `k`.
    ///
    /// `observables`, when given, replaces the correlation surface search.
    /// Compilation either returns a sealed circuit or fails without any
    /// partial result.
    #[instrument(skip(self, graph, observables), fields(graph = graph.name()))]
    pub fn compile(
        &self,
        graph: &BlockGraph,
        k: u32,
        observables: Option<Vec<CorrelationSurface>>,
    ) -> CompileResult<CompiledGraph> {
        if graph.is_empty() {
            return Err(CompileError::EmptyGraph);
        }
        if graph.is_open() {
            return Err(CompileError::OpenPorts {
                ports: graph.ordered_ports().into_iter().map(String::from).collect(),
            });
        }
        graph.validate()?;
        if k < 1 {
            return Err(CompileError::InvalidScale { k });
        }
        let rounds = self.rounds(k)?;

        let plan = BlockPlan::new(graph)?;
        let cube_jobs = plan
            .cubes()
            .map(|spec| Ok((spec, self.registry.cube_builder(spec.category(), spec.position)?)))
            .collect::<CompileResult<Vec<(&CubeSpec, &dyn CubeBuilder)>>>()?;
        let pipe_jobs = plan
            .pipes()
            .iter()
            .map(|spec| Ok((spec, self.registry.pipe_builder(spec.category(), spec.position())?)))
            .collect::<CompileResult<Vec<(&PipeSpec, &dyn PipeBuilder)>>>()?;
        info!(
            cubes = plan.num_cubes(),
            pipes = plan.pipes().len(),
            rounds,
            parallel = self.options.parallel,
            "compiling block graph"
        );

        let built = map_jobs(&cube_jobs, self.options.parallel, |(spec, builder)| {
            let block = builder.build(spec, rounds)?;
            check_rounds(builder.name(), spec.position, rounds, block.num_rounds())?;
            Ok((spec.position, block))
        })?;
        let mut blocks: BTreeMap<Position3D, CompiledBlock> = built.into_iter().collect();

        let substitutions = {
            let blocks = &blocks;
            map_jobs(&pipe_jobs, self.options.parallel, |(spec, builder)| {
                let (head, tail) = endpoints(blocks, spec)?;
                let substitution = builder.build(spec, head, tail)?;
                if substitution.num_rounds() > rounds {
                    return Err(CompileError::RoundMismatch {
                        builder: builder.name().to_string(),
                        position: spec.position(),
                        expected: rounds,
                        found: substitution.num_rounds(),
                    });
                }
                Ok(substitution)
            })?
        };

        // Replay in canonical order: later pipes win on shared classes.
        for ((spec, builder), substitution) in pipe_jobs.iter().zip(substitutions) {
            if substitution.is_empty() {
                continue;
            }
            debug!(pipe = %spec.pipe, builder = builder.name(), "substituting");
            apply(&mut blocks, spec.pipe.u(), &substitution.head);
            apply(&mut blocks, spec.pipe.v(), &substitution.tail);
        }

        let (circuit, slices) = assemble(&blocks, k, rounds)?;

        let observables = match observables {
            Some(observables) => observables,
            None if self.options.find_observables => {
                let found = graph.find_correlation_surfaces()?;
                if found.is_empty() {
                    warn!("no correlation surface found");
                }
                found
            }
            None => Vec::new(),
        };

        info!(
            moments = circuit.num_moments(),
            qubits = circuit.num_qubits(),
            observables = observables.len(),
            "compilation completed"
        );
        Ok(CompiledGraph {
            circuit,
            observables,
            slices,
        })
    }
}

/// Compile `graph` at scale `k` with the standard builders.
pub fn compile_block_graph(
    graph: &BlockGraph,
    k: u32,
    options: &CompileOptions,
    observables: Option<Vec<CorrelationSurface>>,
) -> CompileResult<CompiledGraph> {
    BlockGraphCompiler::new(*options).compile(graph, k, observables)
}

/// Run `f` on every job, on the rayon pool when `parallel` is set.
///
/// Results keep the job order either way.
fn map_jobs<T, R, F>(jobs: &[T], parallel: bool, f: F) -> CompileResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> CompileResult<R> + Sync + Send,
{
    if parallel {
        jobs.par_iter().map(&f).collect()
    } else {
        jobs.iter().map(&f).collect()
    }
}

fn check_rounds(builder: &str, position: Position3D, expected: usize, found: usize) -> CompileResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(CompileError::RoundMismatch {
            builder: builder.to_string(),
            position,
            expected,
            found,
        })
    }
}

fn endpoints<'a>(
    blocks: &'a BTreeMap<Position3D, CompiledBlock>,
    spec: &PipeSpec,
) -> CompileResult<(&'a CompiledBlock, &'a CompiledBlock)> {
    let block = |position: Position3D| {
        blocks.get(&position).ok_or(CompileError::UnsupportedKind {
            category: spec.category(),
            position,
        })
    };
    Ok((block(spec.pipe.u())?, block(spec.pipe.v())?))
}

fn apply(
    blocks: &mut BTreeMap<Position3D, CompiledBlock>,
    position: Position3D,
    overrides: &BTreeMap<usize, RoundPlaquettes>,
) {
    if let Some(block) = blocks.get_mut(&position) {
        block.substitute(overrides);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_graph::gallery;
    use tessera_ir::{Basis, LinearFunction, OperationKind};

    fn options() -> CompileOptions {
        CompileOptions::default().with_observables(false)
    }

    #[test]
    fn test_rounds() {
        let compiler = BlockGraphCompiler::new(CompileOptions::default());
        assert_eq!(compiler.rounds(1).unwrap(), 1);
        assert_eq!(compiler.rounds(3).unwrap(), 5);
        assert!(matches!(
            compiler.rounds(0),
            Err(CompileError::InvalidRounds { value: -1, k: 0, .. })
        ));
    }

    #[test]
    fn test_empty_graph() {
        let graph = BlockGraph::new("empty");
        assert!(matches!(
            compile_block_graph(&graph, 1, &options(), None),
            Err(CompileError::EmptyGraph)
        ));
    }

    #[test]
    fn test_open_ports() {
        let graph = gallery::cnot(None).unwrap();
        match compile_block_graph(&graph, 1, &options(), None) {
            Err(CompileError::OpenPorts { ports }) => assert_eq!(ports.len(), 4),
            other => panic!("expected open ports, got {other:?}"),
        }
    }

    #[test]
    fn test_memory_k1() {
        let graph = gallery::memory(Basis::Z).unwrap();
        let compiled = compile_block_graph(&graph, 1, &options(), None).unwrap();
        assert_eq!(compiled.num_moments(), 6);
        assert_eq!(compiled.slices.len(), 1);
        assert!(!compiled.has_extended_rounds());
        assert!(compiled.observables.is_empty());

        let circuit = &compiled.circuit;
        let first = circuit.moment(0).unwrap();
        assert!(first
            .operations()
            .iter()
            .any(|op| op.kind() == OperationKind::Reset(Basis::Z)));
        let last = circuit.moment(5).unwrap();
        assert!(last
            .operations()
            .iter()
            .any(|op| op.kind() == OperationKind::Measure(Basis::Z)));
        assert!(last
            .operations()
            .iter()
            .all(|op| matches!(op.kind(), OperationKind::Measure(_))));
    }

    #[test]
    fn test_memory_finds_observable() {
        let graph = gallery::memory(Basis::Z).unwrap();
        let compiled =
            compile_block_graph(&graph, 1, &CompileOptions::default(), None).unwrap();
        assert_eq!(compiled.observables.len(), 1);
    }

    #[test]
    fn test_explicit_observables() {
        let graph = gallery::memory(Basis::Z).unwrap();
        let compiled =
            compile_block_graph(&graph, 1, &CompileOptions::default(), Some(Vec::new())).unwrap();
        assert!(compiled.observables.is_empty());
    }

    #[test]
    fn test_constant_rounds() {
        let graph = gallery::memory(Basis::X).unwrap();
        let options = options().with_rounds(LinearFunction::constant(4));
        let compiled = compile_block_graph(&graph, 2, &options, None).unwrap();
        assert_eq!(compiled.num_moments(), 24);
        assert_eq!(compiled.slices[0].rounds, 4);
    }

    #[test]
    fn test_scale_must_be_positive() {
        let graph = gallery::memory(Basis::Z).unwrap();
        let constant = options().with_rounds(LinearFunction::constant(3));
        assert!(matches!(
            compile_block_graph(&graph, 0, &constant, None),
            Err(CompileError::InvalidScale { k: 0 })
        ));
        assert!(compile_block_graph(&graph, 1, &constant, None).is_ok());
    }

    #[test]
    fn test_half_cube_compiles() {
        let graph = gallery::s_gate_teleportation(Some(Basis::Z)).unwrap();
        let compiled = compile_block_graph(&graph, 1, &options(), None).unwrap();
        assert!(compiled.circuit.count_kind(OperationKind::MeasureY) > 0);
        assert_eq!(compiled.circuit.count_kind(OperationKind::ResetY), 0);
    }

    #[test]
    fn test_unregistered_half_cube() {
        let graph = gallery::s_gate_teleportation(Some(Basis::Z)).unwrap();
        let mut registry = BuilderRegistry::standard();
        registry.unregister(crate::block::BlockCategory::HalfCube);
        let compiler = BlockGraphCompiler::new(options()).with_registry(registry);
        assert!(matches!(
            compiler.compile(&graph, 1, None),
            Err(CompileError::UnsupportedKind {
                category: crate::block::BlockCategory::HalfCube,
                position,
            }) if position == Position3D::new(1, 0, 2)
        ));
    }

    #[test]
    fn test_unregistered_pipe() {
        let graph = gallery::straight_junction(Basis::Z).unwrap();
        let mut registry = BuilderRegistry::standard();
        registry.unregister(crate::block::BlockCategory::SpatialPipe);
        let compiler = BlockGraphCompiler::new(options()).with_registry(registry);
        assert!(matches!(
            compiler.compile(&graph, 1, None),
            Err(CompileError::UnsupportedKind { position, .. }) if position == Position3D::new(0, 0, 0)
        ));
    }
}
