//! ZX-calculus view of a block graph.

use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use tessera_ir::{Basis, Position3D};

use crate::cube::CubeKind;
use crate::graph::BlockGraph;

/// Node flavours of the ZX graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZXKind {
    /// Phase-free Z spider.
    Z,
    /// Phase-free X spider.
    X,
    /// Z spider with phase 1/2.
    Y,
    /// Open boundary.
    Boundary,
}

impl ZXKind {
    /// The spider basis, for plain Z and X spiders.
    pub fn spider_basis(&self) -> Option<Basis> {
        match self {
            ZXKind::Z => Some(Basis::Z),
            ZXKind::X => Some(Basis::X),
            ZXKind::Y | ZXKind::Boundary => None,
        }
    }

    /// Whether an observable of `basis` entering the node spreads along
    /// every incident edge.
    pub fn broadcasts(&self, basis: Basis) -> bool {
        match self.spider_basis() {
            Some(spider) => spider != basis,
            None => true,
        }
    }
}

impl From<&CubeKind> for ZXKind {
    fn from(kind: &CubeKind) -> Self {
        match kind {
            CubeKind::ZX(cube) => match cube.normal_basis() {
                Basis::Z => ZXKind::Z,
                Basis::X => ZXKind::X,
            },
            CubeKind::Port => ZXKind::Boundary,
            CubeKind::YHalfCube => ZXKind::Y,
        }
    }
}

impl fmt::Display for ZXKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZXKind::Z => "Z",
            ZXKind::X => "X",
            ZXKind::Y => "Y",
            ZXKind::Boundary => "B",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZXEdgeKind {
    Simple,
    Hadamard,
}

impl ZXEdgeKind {
    pub fn is_hadamard(&self) -> bool {
        matches!(self, ZXEdgeKind::Hadamard)
    }
}

/// An undirected ZX graph whose nodes are block positions.
#[derive(Debug, Clone, Default)]
pub struct ZXGraph {
    kinds: BTreeMap<Position3D, ZXKind>,
    edges: UnGraphMap<Position3D, ZXEdgeKind>,
}

impl ZXGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a node.
    pub fn add_node(&mut self, position: Position3D, kind: ZXKind) {
        self.kinds.insert(position, kind);
        self.edges.add_node(position);
    }

    /// Add an edge between two existing nodes. Returns `false` when a
    /// node is missing.
    pub fn add_edge(&mut self, a: Position3D, b: Position3D, kind: ZXEdgeKind) -> bool {
        if !self.kinds.contains_key(&a) || !self.kinds.contains_key(&b) {
            return false;
        }
        self.edges.add_edge(a, b, kind);
        true
    }

    pub fn kind(&self, position: Position3D) -> Option<ZXKind> {
        self.kinds.get(&position).copied()
    }

    /// Nodes in position order.
    pub fn nodes(&self) -> impl Iterator<Item = (Position3D, ZXKind)> + '_ {
        self.kinds.iter().map(|(p, k)| (*p, *k))
    }

    pub fn num_nodes(&self) -> usize {
        self.kinds.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.edge_count()
    }

    pub fn edge_kind(&self, a: Position3D, b: Position3D) -> Option<ZXEdgeKind> {
        self.edges.edge_weight(a, b).copied()
    }

    /// Neighbours with the joining edge kind, in position order.
    pub fn neighbours(&self, position: Position3D) -> Vec<(Position3D, ZXEdgeKind)> {
        if !self.edges.contains_node(position) {
            return Vec::new();
        }
        let mut neighbours: Vec<(Position3D, ZXEdgeKind)> = self
            .edges
            .edges(position)
            .map(|(a, b, kind)| (if a == position { b } else { a }, *kind))
            .collect();
        neighbours.sort_by_key(|(p, _)| *p);
        neighbours
    }

    pub fn degree(&self, position: Position3D) -> usize {
        if self.edges.contains_node(position) {
            self.edges.neighbors(position).count()
        } else {
            0
        }
    }

    /// Degree-one nodes in position order.
    pub fn leaves(&self) -> Vec<Position3D> {
        self.kinds
            .keys()
            .copied()
            .filter(|p| self.degree(*p) == 1)
            .collect()
    }
}

impl BlockGraph {
    /// Convert to a ZX graph: one node per cube, one edge per pipe.
    pub fn to_zx_graph(&self) -> ZXGraph {
        let mut zx = ZXGraph::new();
        for cube in self.cubes() {
            zx.add_node(cube.position, ZXKind::from(&cube.kind));
        }
        for pipe in self.pipes() {
            let kind = if pipe.kind().has_hadamard() {
                ZXEdgeKind::Hadamard
            } else {
                ZXEdgeKind::Simple
            };
            zx.add_edge(pipe.u(), pipe.v(), kind);
        }
        zx
    }
}
