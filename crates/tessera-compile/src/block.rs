//! Block specifications.
//!
//! A [`CubeSpec`] or [`PipeSpec`] holds everything a builder needs to
//! know about one block of the graph: its kind and the way it connects to
//! its neighbours. A [`BlockPlan`] collects them for a whole graph in the
//! order blocks are replayed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use tessera_graph::{BlockGraph, CubeKind, GraphError, Pipe, PipeKind, ZXCube};
use tessera_ir::{Basis, DataBasis, Direction3D, Position3D};
use tessera_plaquette::{ArmSet, JunctionArm, PipeEnd, SpatialAxis};

use crate::error::{CompileError, CompileResult};

/// Closed set of block categories a builder can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    /// A cube with one boundary basis per spatial axis.
    MemoryCube,
    /// A `ZZX` or `XXZ` cube.
    SpatialJunction,
    /// A Y half cube.
    HalfCube,
    /// An open boundary.
    Port,
    TemporalPipe,
    SpatialPipe,
    TemporalHadamardPipe,
    SpatialHadamardPipe,
}

impl BlockCategory {
    pub const ALL: [BlockCategory; 8] = [
        BlockCategory::MemoryCube,
        BlockCategory::SpatialJunction,
        BlockCategory::HalfCube,
        BlockCategory::Port,
        BlockCategory::TemporalPipe,
        BlockCategory::SpatialPipe,
        BlockCategory::TemporalHadamardPipe,
        BlockCategory::SpatialHadamardPipe,
    ];

    pub fn of_cube(kind: &CubeKind) -> Self {
        match kind {
            CubeKind::ZX(cube) if cube.is_spatial() => BlockCategory::SpatialJunction,
            CubeKind::ZX(_) => BlockCategory::MemoryCube,
            CubeKind::Port => BlockCategory::Port,
            CubeKind::YHalfCube => BlockCategory::HalfCube,
        }
    }

    pub fn of_pipe(kind: PipeKind) -> Self {
        match (kind.is_temporal(), kind.has_hadamard()) {
            (true, false) => BlockCategory::TemporalPipe,
            (true, true) => BlockCategory::TemporalHadamardPipe,
            (false, false) => BlockCategory::SpatialPipe,
            (false, true) => BlockCategory::SpatialHadamardPipe,
        }
    }

    pub fn is_pipe(self) -> bool {
        matches!(
            self,
            BlockCategory::TemporalPipe
                | BlockCategory::SpatialPipe
                | BlockCategory::TemporalHadamardPipe
                | BlockCategory::SpatialHadamardPipe
        )
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockCategory::MemoryCube => "memory cube",
            BlockCategory::SpatialJunction => "spatial junction",
            BlockCategory::HalfCube => "half cube",
            BlockCategory::Port => "port",
            BlockCategory::TemporalPipe => "temporal pipe",
            BlockCategory::SpatialPipe => "spatial pipe",
            BlockCategory::TemporalHadamardPipe => "temporal Hadamard pipe",
            BlockCategory::SpatialHadamardPipe => "spatial Hadamard pipe",
        };
        write!(f, "{name}")
    }
}

/// A cube and its connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeSpec {
    pub position: Position3D,
    pub kind: CubeKind,
    /// Sides with a spatial pipe, in template orientation.
    pub arms: ArmSet,
    /// Sides with a Hadamard pipe leaving towards larger coordinates.
    pub hadamard_arms: ArmSet,
    /// Temporal pipe arriving from below.
    pub below: Option<PipeKind>,
    /// Temporal pipe leaving upwards.
    pub above: Option<PipeKind>,
    /// Basis of the stabilizers on the even cells of the checkerboard.
    pub even: Basis,
}

impl CubeSpec {
    /// Spec of the cube at `position`, with the checkerboard of a lone
    /// cube. [`BlockPlan`] aligns the checkerboards across pipes.
    pub fn from_graph(graph: &BlockGraph, position: Position3D) -> CompileResult<Self> {
        let cube = graph
            .cube(position)
            .ok_or(GraphError::MissingCube(position))?;
        let mut spec = CubeSpec {
            position,
            kind: cube.kind,
            arms: ArmSet::EMPTY,
            hadamard_arms: ArmSet::EMPTY,
            below: None,
            above: None,
            even: cube.kind.as_zx().map_or(Basis::Z, ZXCube::y),
        };
        for pipe in graph.pipes_at(position) {
            let kind = pipe.kind();
            // The head is the endpoint with the smaller coordinate.
            let other_first = !pipe.at_head(position);
            let arm = match (pipe.direction(), other_first) {
                (Direction3D::X, true) => JunctionArm::Left,
                (Direction3D::X, false) => JunctionArm::Right,
                (Direction3D::Y, true) => JunctionArm::Up,
                (Direction3D::Y, false) => JunctionArm::Down,
                (Direction3D::Z, true) => {
                    spec.below = Some(kind);
                    continue;
                }
                (Direction3D::Z, false) => {
                    spec.above = Some(kind);
                    continue;
                }
            };
            spec.arms.insert(arm);
            if kind.has_hadamard() && !other_first {
                spec.hadamard_arms.insert(arm);
            }
        }
        Ok(spec)
    }

    pub fn category(&self) -> BlockCategory {
        BlockCategory::of_cube(&self.kind)
    }

    pub fn zx(&self) -> Option<&ZXCube> {
        self.kind.as_zx()
    }

    pub fn is_spatial_junction(&self) -> bool {
        self.kind.is_spatial()
    }

    /// Spatial wall bases `(x, y)`.
    ///
    /// A Y half cube has none of its own and takes those of its temporal
    /// pipe on its side.
    pub fn walls(&self) -> Option<(Basis, Basis)> {
        match &self.kind {
            CubeKind::ZX(cube) => Some((cube.x(), cube.y())),
            CubeKind::YHalfCube => {
                let (pipe, at_head) = match (self.above, self.below) {
                    (Some(pipe), _) => (pipe, true),
                    (None, Some(pipe)) => (pipe, false),
                    (None, None) => return None,
                };
                Some((
                    pipe.basis_along(Direction3D::X, at_head)?,
                    pipe.basis_along(Direction3D::Y, at_head)?,
                ))
            }
            CubeKind::Port => None,
        }
    }

    /// How a spatial pipe sees this cube.
    pub fn pipe_end(&self) -> Option<PipeEnd> {
        let (x, y) = self.walls()?;
        Some(if self.is_spatial_junction() {
            PipeEnd::Junction { walls: x }
        } else {
            PipeEnd::Cube { x, y }
        })
    }

    /// Basis data qubits are prepared and measured in.
    fn data_basis(&self) -> Option<DataBasis> {
        match &self.kind {
            CubeKind::ZX(cube) => Some(cube.z().into()),
            CubeKind::YHalfCube => Some(DataBasis::Y),
            CubeKind::Port => None,
        }
    }

    /// Data reset basis of `round`: the temporal basis in
    /// the first round unless a pipe arrives from below.
    pub fn reset_at(&self, round: usize) -> Option<DataBasis> {
        let basis = self.data_basis()?;
        (round == 0 && self.below.is_none()).then_some(basis)
    }

    /// Data measurement basis of `round` out of `rounds`: the temporal
    /// basis in the last round unless a pipe leaves upwards.
    pub fn measurement_at(&self, round: usize, rounds: usize) -> Option<DataBasis> {
        let basis = self.data_basis()?;
        (round + 1 == rounds && self.above.is_none()).then_some(basis)
    }
}

/// A pipe with the specs of both endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeSpec {
    pub pipe: Pipe,
    /// Spec of `pipe.u()`.
    pub head: CubeSpec,
    /// Spec of `pipe.v()`.
    pub tail: CubeSpec,
}

impl PipeSpec {
    pub fn category(&self) -> BlockCategory {
        BlockCategory::of_pipe(self.pipe.kind())
    }

    pub fn kind(&self) -> PipeKind {
        self.pipe.kind()
    }

    pub fn position(&self) -> Position3D {
        self.pipe.u()
    }

    /// Axis of a spatial pipe.
    pub fn axis(&self) -> Option<SpatialAxis> {
        match self.pipe.direction() {
            Direction3D::X => Some(SpatialAxis::X),
            Direction3D::Y => Some(SpatialAxis::Y),
            Direction3D::Z => None,
        }
    }
}

/// Basis of the even cells of every cube.
///
/// `links` joins two cubes, flipping the checkerboard across Hadamard
/// pipes. Each connected component starts from its first cube in
/// position order with a seed, keeping that seed; unseeded components
/// start in `Z`.
fn checkerboard(
    seeds: &BTreeMap<Position3D, Option<Basis>>,
    links: &[(Position3D, Position3D, bool)],
) -> CompileResult<BTreeMap<Position3D, Basis>> {
    let mut neighbours: BTreeMap<Position3D, Vec<(Position3D, bool)>> = BTreeMap::new();
    for &(a, b, flip) in links {
        neighbours.entry(a).or_default().push((b, flip));
        neighbours.entry(b).or_default().push((a, flip));
    }

    let roots = seeds
        .iter()
        .filter_map(|(position, seed)| seed.map(|basis| (*position, basis)))
        .chain(seeds.keys().map(|position| (*position, Basis::Z)));

    let mut even = BTreeMap::new();
    for (root, basis) in roots {
        if even.contains_key(&root) {
            continue;
        }
        even.insert(root, basis);
        let mut queue = VecDeque::from([root]);
        while let Some(position) = queue.pop_front() {
            let Some(&here) = even.get(&position) else {
                continue;
            };
            let next = neighbours.get(&position).map(Vec::as_slice).unwrap_or_default();
            for &(other, flip) in next {
                let expected = here.flipped_if(flip);
                match even.get(&other) {
                    Some(found) if *found != expected => {
                        return Err(CompileError::InconsistentCheckerboard { position: other });
                    }
                    Some(_) => {}
                    None => {
                        even.insert(other, expected);
                        queue.push_back(other);
                    }
                }
            }
        }
    }
    Ok(even)
}

/// Specs of every cube and pipe of a graph.
#[derive(Debug, Clone)]
pub struct BlockPlan {
    cubes: BTreeMap<Position3D, CubeSpec>,
    pipes: Vec<PipeSpec>,
}

impl BlockPlan {
    /// Collect the specs of `graph`.
    ///
    /// Checkerboards are aligned across every pipe. Pipes are ordered
    /// temporal first, then spatial, each by position.
    pub fn new(graph: &BlockGraph) -> CompileResult<Self> {
        let mut cubes = graph
            .cubes()
            .map(|cube| Ok((cube.position, CubeSpec::from_graph(graph, cube.position)?)))
            .collect::<CompileResult<BTreeMap<_, _>>>()?;

        let seeds: BTreeMap<Position3D, Option<Basis>> = cubes
            .values()
            .map(|spec| (spec.position, spec.zx().map(|_| spec.even)))
            .collect();
        let links: Vec<_> = graph
            .pipes()
            .map(|pipe| (pipe.u(), pipe.v(), pipe.kind().has_hadamard()))
            .collect();
        for (position, even) in checkerboard(&seeds, &links)? {
            if let Some(spec) = cubes.get_mut(&position) {
                spec.even = even;
            }
        }

        let mut pipes: Vec<&Pipe> = graph.pipes().collect();
        pipes.sort_by_key(|pipe| (pipe.kind().is_spatial(), pipe.key()));
        let pipes = pipes
            .into_iter()
            .map(|pipe| {
                let spec = |p: Position3D| {
                    cubes
                        .get(&p)
                        .cloned()
                        .ok_or(CompileError::Graph(GraphError::MissingCube(p)))
                };
                Ok(PipeSpec {
                    pipe: *pipe,
                    head: spec(pipe.u())?,
                    tail: spec(pipe.v())?,
                })
            })
            .collect::<CompileResult<Vec<_>>>()?;

        Ok(Self { cubes, pipes })
    }

    pub fn cubes(&self) -> impl Iterator<Item = &CubeSpec> {
        self.cubes.values()
    }

    pub fn cube(&self, position: Position3D) -> Option<&CubeSpec> {
        self.cubes.get(&position)
    }

    pub fn num_cubes(&self) -> usize {
        self.cubes.len()
    }

    /// Pipes in replay order.
    pub fn pipes(&self) -> &[PipeSpec] {
        &self.pipes
    }
}
