//! Correlation surfaces: stabilizer flows through a ZX graph.
//!
//! A surface is a set of ZX edges labelled with a basis at both ends.
//! Surfaces are found by seeding every leaf of the graph and flooding
//! the seed through the graph: a node whose type differs from the
//! incoming basis broadcasts it along every edge, a node of the same type
//! lets it through an even number of edges. Surfaces that survive are
//! reduced to a minimal generating set of their external stabilizers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use tessera_ir::{Basis, Position3D};

use crate::error::{GraphError, GraphResult};
use crate::graph::BlockGraph;
use crate::zx::{ZXGraph, ZXKind};

/// A position carrying an observable basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZXNode {
    pub position: Position3D,
    pub basis: Basis,
}

impl ZXNode {
    pub fn new(position: Position3D, basis: Basis) -> Self {
        Self { position, basis }
    }
}

impl fmt::Display for ZXNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.basis, self.position)
    }
}

/// An undirected edge between two labelled nodes, stored with `u <= v`.
///
/// Differing bases at the two ends mark a Hadamard edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZXEdge {
    u: ZXNode,
    v: ZXNode,
}

impl ZXEdge {
    pub fn new(a: ZXNode, b: ZXNode) -> Self {
        if a <= b { Self { u: a, v: b } } else { Self { u: b, v: a } }
    }

    pub fn u(&self) -> ZXNode {
        self.u
    }

    pub fn v(&self) -> ZXNode {
        self.v
    }

    pub fn has_hadamard(&self) -> bool {
        self.u.basis != self.v.basis
    }

    pub fn is_self_loop(&self) -> bool {
        self.u == self.v
    }

    /// The endpoint at `position`, if any.
    pub fn node_at(&self, position: Position3D) -> Option<ZXNode> {
        if self.u.position == position {
            Some(self.u)
        } else if self.v.position == position {
            Some(self.v)
        } else {
            None
        }
    }
}

/// One stabilizer flow through the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CorrelationSurface {
    span: BTreeSet<ZXEdge>,
}

impl CorrelationSurface {
    pub fn new(span: impl IntoIterator<Item = ZXEdge>) -> Self {
        Self {
            span: span.into_iter().collect(),
        }
    }

    pub fn span(&self) -> &BTreeSet<ZXEdge> {
        &self.span
    }

    /// Number of distinct labelled nodes touched.
    pub fn area(&self) -> usize {
        self.nodes().len()
    }

    pub fn nodes(&self) -> BTreeSet<ZXNode> {
        self.span.iter().flat_map(|e| [e.u, e.v]).collect()
    }

    pub fn positions(&self) -> BTreeSet<Position3D> {
        self.span
            .iter()
            .flat_map(|e| [e.u.position, e.v.position])
            .collect()
    }

    /// Bases carried at `position`.
    pub fn bases_at(&self, position: Position3D) -> BTreeSet<Basis> {
        self.span
            .iter()
            .flat_map(|e| [e.u, e.v])
            .filter(|n| n.position == position)
            .map(|n| n.basis)
            .collect()
    }

    /// Edges of the span touching `position`.
    pub fn edges_at(&self, position: Position3D) -> impl Iterator<Item = &ZXEdge> {
        self.span
            .iter()
            .filter(move |e| e.node_at(position).is_some())
    }

    pub fn is_single_node(&self) -> bool {
        self.span.len() == 1 && self.span.iter().all(ZXEdge::is_self_loop)
    }

    /// Pauli string over `ports`: `I`, `X`, `Z`, or `Y` when both bases
    /// are present.
    pub fn external_stabilizer(&self, ports: &[Position3D]) -> String {
        ports
            .iter()
            .map(|p| {
                let bases = self.bases_at(*p);
                match (bases.contains(&Basis::X), bases.contains(&Basis::Z)) {
                    (true, true) => 'Y',
                    (true, false) => 'X',
                    (false, true) => 'Z',
                    (false, false) => 'I',
                }
            })
            .collect()
    }

    /// Symmetric difference of the two spans.
    #[must_use]
    pub fn xor(&self, other: &CorrelationSurface) -> CorrelationSurface {
        CorrelationSurface {
            span: self
                .span
                .symmetric_difference(&other.span)
                .copied()
                .collect(),
        }
    }
}

impl fmt::Display for CorrelationSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<String> = self
            .span
            .iter()
            .map(|e| format!("{}-{}", e.u, e.v))
            .collect();
        write!(f, "{{{}}}", edges.join(", "))
    }
}

type Span = BTreeSet<ZXEdge>;

impl ZXGraph {
    /// Find the correlation surfaces of the graph, reduced to a minimal
    /// set of generators.
    #[instrument(skip(self), fields(nodes = self.num_nodes()))]
    pub fn find_correlation_surfaces(&self) -> GraphResult<Vec<CorrelationSurface>> {
        self.check_supported()?;

        if self.num_nodes() == 1 {
            if let Some((position, kind)) = self.nodes().next() {
                let basis = if kind == ZXKind::Z { Basis::X } else { Basis::Z };
                let node = ZXNode::new(position, basis);
                return Ok(vec![CorrelationSurface::new([ZXEdge::new(node, node)])]);
            }
        }

        let leaves = self.leaves();
        if leaves.is_empty() {
            warn!("graph has no leaves, no correlation surface to find");
            return Ok(Vec::new());
        }

        let mut surfaces = BTreeSet::new();
        for leaf in &leaves {
            surfaces.extend(self.surfaces_from_leaf(*leaf));
        }
        debug!(found = surfaces.len(), "correlation surfaces before reduction");

        let generators = minimal_generators(surfaces, &leaves);
        if generators.is_empty() {
            warn!("no correlation surface found");
        }
        Ok(generators)
    }

    /// Every surface seeded from every leaf, without reduction.
    pub fn find_all_correlation_surfaces(&self) -> GraphResult<Vec<CorrelationSurface>> {
        self.check_supported()?;
        let mut surfaces = BTreeSet::new();
        for leaf in self.leaves() {
            surfaces.extend(self.surfaces_from_leaf(leaf));
        }
        Ok(surfaces.into_iter().collect())
    }

    /// Boundaries and Y nodes must be dangling.
    fn check_supported(&self) -> GraphResult<()> {
        for (position, kind) in self.nodes() {
            let degree = self.degree(position);
            if matches!(kind, ZXKind::Boundary | ZXKind::Y) && degree != 1 {
                return Err(GraphError::UnsupportedZXGraph(format!(
                    "{kind} node at {position} must have exactly one edge, found {degree}"
                )));
            }
        }
        Ok(())
    }

    fn surfaces_from_leaf(&self, leaf: Position3D) -> Vec<CorrelationSurface> {
        let Some(kind) = self.kind(leaf) else {
            return Vec::new();
        };
        let flood = |basis: Basis| {
            let mut frontier = BTreeSet::new();
            frontier.insert(ZXNode::new(leaf, basis));
            self.flood_fill(frontier, Span::new()).unwrap_or_default()
        };
        let spans: Vec<Span> = match kind {
            ZXKind::Z => flood(Basis::X),
            ZXKind::X => flood(Basis::Z),
            ZXKind::Boundary => {
                let mut spans = flood(Basis::X);
                spans.extend(flood(Basis::Z));
                spans
            }
            ZXKind::Y => {
                let x_spans = flood(Basis::X);
                let z_spans = flood(Basis::Z);
                x_spans
                    .iter()
                    .flat_map(|sx| z_spans.iter().map(move |sz| sx | sz))
                    .collect()
            }
        };
        spans
            .into_iter()
            .filter(|span| !span.is_empty() && self.leaves_support(span))
            .map(|span| CorrelationSurface { span })
            .collect()
    }

    /// Every non-boundary leaf touched by the span carries a basis set its
    /// type can terminate.
    fn leaves_support(&self, span: &Span) -> bool {
        let mut bases: BTreeMap<Position3D, BTreeSet<Basis>> = BTreeMap::new();
        for node in span.iter().flat_map(|e| [e.u, e.v]) {
            if self.degree(node.position) == 1 {
                bases.entry(node.position).or_default().insert(node.basis);
            }
        }
        bases.iter().all(|(position, found)| {
            let required: &[Basis] = match self.kind(*position) {
                Some(ZXKind::Y) => &[Basis::X, Basis::Z],
                Some(ZXKind::Z) => &[Basis::X],
                Some(ZXKind::X) => &[Basis::Z],
                _ => return true,
            };
            found.iter().copied().eq(required.iter().copied())
        })
    }

    fn neighbour_nodes(&self, node: ZXNode) -> Vec<ZXNode> {
        self.neighbours(node.position)
            .into_iter()
            .map(|(position, kind)| ZXNode::new(position, node.basis.flipped_if(kind.is_hadamard())))
            .collect()
    }

    fn broadcasts(&self, node: ZXNode) -> bool {
        self.kind(node.position)
            .is_none_or(|kind| kind.broadcasts(node.basis))
    }

    /// Grow `span` from `frontier`. `None` when no branch satisfies the
    /// parity constraints.
    fn flood_fill(&self, mut frontier: BTreeSet<ZXNode>, mut span: Span) -> Option<Vec<Span>> {
        let mut broadcast: Vec<ZXNode> = frontier
            .iter()
            .copied()
            .filter(|n| self.broadcasts(*n))
            .collect();
        while let Some(current) = broadcast.pop() {
            frontier.remove(&current);
            for neighbour in self.neighbour_nodes(current) {
                if !span.insert(ZXEdge::new(current, neighbour)) {
                    continue;
                }
                frontier.insert(neighbour);
                if self.broadcasts(neighbour) {
                    broadcast.push(neighbour);
                }
            }
        }

        if frontier.is_empty() {
            return Some(vec![span]);
        }

        // Passthrough nodes: pick edges so that each sees an even count.
        let mut branches_per_node: Vec<Vec<(Vec<ZXNode>, Vec<ZXEdge>)>> = Vec::new();
        for current in std::mem::take(&mut frontier) {
            let edges: Vec<(ZXNode, ZXEdge)> = self
                .neighbour_nodes(current)
                .into_iter()
                .map(|n| (n, ZXEdge::new(current, n)))
                .collect();
            let in_span = edges.iter().filter(|(_, e)| span.contains(e)).count();
            let left: Vec<(ZXNode, ZXEdge)> = edges
                .into_iter()
                .filter(|(_, e)| !span.contains(e))
                .collect();
            let parity = in_span % 2;
            if parity == 1 && left.is_empty() {
                return None;
            }
            if parity == 0 && in_span == 0 && left.len() <= 1 {
                return None;
            }
            let mut branches = Vec::new();
            for size in (parity..=left.len()).step_by(2) {
                for chosen in combinations(&left, size) {
                    let (nodes, edges): (Vec<ZXNode>, Vec<ZXEdge>) = chosen.into_iter().unzip();
                    branches.push((nodes, edges));
                }
            }
            branches_per_node.push(branches);
        }

        let mut results = Vec::new();
        for product in cartesian_product(&branches_per_node) {
            let mut next_frontier = frontier.clone();
            let mut next_span = span.clone();
            for (nodes, edges) in product {
                next_frontier.extend(nodes.iter().copied());
                next_span.extend(edges.iter().copied());
            }
            if let Some(spans) = self.flood_fill(next_frontier, next_span) {
                results.extend(spans);
            }
        }
        if results.is_empty() { None } else { Some(results) }
    }
}

impl BlockGraph {
    /// Correlation surfaces of the graph's ZX view.
    pub fn find_correlation_surfaces(&self) -> GraphResult<Vec<CorrelationSurface>> {
        self.to_zx_graph().find_correlation_surfaces()
    }
}

/// All `size`-element subsets of `items`, in lexicographic index order.
fn combinations<T: Copy>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return vec![Vec::new()];
    }
    if items.len() < size {
        return Vec::new();
    }
    let mut result = Vec::new();
    for (i, first) in items.iter().enumerate() {
        for mut rest in combinations(&items[i + 1..], size - 1) {
            rest.insert(0, *first);
            result.push(rest);
        }
    }
    result
}

fn cartesian_product<T>(choices: &[Vec<T>]) -> Vec<Vec<&T>> {
    let mut product: Vec<Vec<&T>> = vec![Vec::new()];
    for options in choices {
        product = product
            .into_iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| {
                    let mut next = prefix.clone();
                    next.push(option);
                    next
                })
            })
            .collect();
    }
    product
}

/// Pauli string as `(x, z)` bit pairs.
fn symplectic(stabilizer: &str) -> Vec<bool> {
    let mut bits = vec![false; 2 * stabilizer.len()];
    let n = stabilizer.len();
    for (i, c) in stabilizer.chars().enumerate() {
        let (x, z) = match c {
            'X' => (true, false),
            'Z' => (false, true),
            'Y' => (true, true),
            _ => (false, false),
        };
        bits[i] = x;
        bits[n + i] = z;
    }
    bits
}

/// Row-echelon basis over GF(2).
#[derive(Default)]
struct Gf2Basis {
    rows: Vec<(usize, Vec<bool>)>,
}

impl Gf2Basis {
    /// Insert `vector` if it is independent of the rows so far.
    fn insert(&mut self, mut vector: Vec<bool>) -> bool {
        for (pivot, row) in &self.rows {
            if vector[*pivot] {
                for (bit, r) in vector.iter_mut().zip(row) {
                    *bit ^= *r;
                }
            }
        }
        match vector.iter().position(|b| *b) {
            Some(pivot) => {
                self.rows.push((pivot, vector));
                true
            }
            None => false,
        }
    }
}

/// Keep the smallest surfaces whose stabilizers over `leaves` generate all
/// the others, sorted by span.
fn minimal_generators(
    surfaces: impl IntoIterator<Item = CorrelationSurface>,
    leaves: &[Position3D],
) -> Vec<CorrelationSurface> {
    let mut by_stabilizer: BTreeMap<String, CorrelationSurface> = BTreeMap::new();
    for surface in surfaces {
        let stabilizer = surface.external_stabilizer(leaves);
        let keep_existing = by_stabilizer
            .get(&stabilizer)
            .is_some_and(|existing| (existing.area(), existing) <= (surface.area(), &surface));
        if !keep_existing {
            by_stabilizer.insert(stabilizer, surface);
        }
    }

    let mut ordered: Vec<(String, CorrelationSurface)> = by_stabilizer.into_iter().collect();
    ordered.sort_by(|(sa, a), (sb, b)| (a.area(), sa, a).cmp(&(b.area(), sb, b)));

    let mut basis = Gf2Basis::default();
    let mut generators: Vec<CorrelationSurface> = ordered
        .into_iter()
        .filter(|(stabilizer, _)| basis.insert(symplectic(stabilizer)))
        .map(|(_, surface)| surface)
        .collect();
    generators.sort();
    generators
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zx::ZXEdgeKind;

    fn p(i: i32) -> Position3D {
        Position3D::new(i, 0, 0)
    }

    fn n(i: i32, basis: Basis) -> ZXNode {
        ZXNode::new(p(i), basis)
    }

    fn e(a: ZXNode, b: ZXNode) -> ZXEdge {
        ZXEdge::new(a, b)
    }

    fn graph(nodes: &[ZXKind], edges: &[(i32, i32)]) -> ZXGraph {
        let mut g = ZXGraph::new();
        for (i, kind) in nodes.iter().enumerate() {
            g.add_node(p(i as i32), *kind);
        }
        for (a, b) in edges {
            assert!(g.add_edge(p(*a), p(*b), ZXEdgeKind::Simple));
        }
        g
    }

    #[test]
    fn test_edge_normalization() {
        let edge = e(n(1, Basis::Z), n(0, Basis::Z));
        assert_eq!(edge.u().position, p(0));
        assert!(!edge.has_hadamard());
        assert!(e(n(1, Basis::Z), n(2, Basis::X)).has_hadamard());
        assert!(e(n(0, Basis::Z), n(0, Basis::Z)).is_self_loop());
    }

    #[test]
    fn test_surface_queries() {
        let y = CorrelationSurface::new([
            e(n(0, Basis::Z), n(1, Basis::Z)),
            e(n(0, Basis::X), n(1, Basis::X)),
        ]);
        assert_eq!(y.area(), 4);
        assert_eq!(y.external_stabilizer(&[p(0), p(1), p(2)]), "YYI");
        assert!(!y.is_single_node());

        let x = CorrelationSurface::new([e(n(0, Basis::X), n(1, Basis::X))]);
        assert_eq!(
            y.xor(&x),
            CorrelationSurface::new([e(n(0, Basis::Z), n(1, Basis::Z))])
        );
    }

    #[test]
    fn test_single_node() {
        let g = graph(&[ZXKind::X], &[]);
        let surfaces = g.find_correlation_surfaces().unwrap();
        assert_eq!(surfaces.len(), 1);
        assert!(surfaces[0].is_single_node());
        assert_eq!(surfaces[0].bases_at(p(0)), BTreeSet::from([Basis::Z]));
    }

    #[test]
    fn test_two_same_spiders() {
        for kind in [ZXKind::X, ZXKind::Z] {
            let g = graph(&[kind, kind], &[(0, 1)]);
            let surfaces = g.find_correlation_surfaces().unwrap();
            let basis = if kind == ZXKind::X { Basis::Z } else { Basis::X };
            assert_eq!(
                surfaces,
                vec![CorrelationSurface::new([e(n(0, basis), n(1, basis))])]
            );
        }
    }

    #[test]
    fn test_mismatched_spiders_have_no_flow() {
        let g = graph(&[ZXKind::X, ZXKind::Z], &[(0, 1)]);
        assert!(g.find_correlation_surfaces().unwrap().is_empty());
    }

    #[test]
    fn test_hadamard_edge() {
        let mut g = ZXGraph::new();
        g.add_node(p(0), ZXKind::X);
        g.add_node(p(1), ZXKind::Z);
        g.add_edge(p(0), p(1), ZXEdgeKind::Hadamard);
        let surfaces = g.find_correlation_surfaces().unwrap();
        assert_eq!(
            surfaces,
            vec![CorrelationSurface::new([e(n(0, Basis::Z), n(1, Basis::X))])]
        );
    }

    #[test]
    fn test_y_leaf() {
        let g = graph(&[ZXKind::Y, ZXKind::Boundary], &[(0, 1)]);
        let surfaces = g.find_correlation_surfaces().unwrap();
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].external_stabilizer(&[p(0), p(1)]), "YY");
    }

    #[test]
    fn test_port_passthrough() {
        let g = graph(
            &[ZXKind::Boundary, ZXKind::X, ZXKind::Boundary],
            &[(0, 1), (1, 2)],
        );
        let surfaces = g.find_correlation_surfaces().unwrap();
        assert_eq!(
            surfaces,
            vec![
                CorrelationSurface::new([
                    e(n(0, Basis::X), n(1, Basis::X)),
                    e(n(1, Basis::X), n(2, Basis::X)),
                ]),
                CorrelationSurface::new([
                    e(n(0, Basis::Z), n(1, Basis::Z)),
                    e(n(1, Basis::Z), n(2, Basis::Z)),
                ]),
            ]
        );
    }

    #[test]
    fn test_s_gate_teleportation() {
        let g = graph(
            &[
                ZXKind::Boundary,
                ZXKind::Z,
                ZXKind::Boundary,
                ZXKind::Z,
                ZXKind::Y,
            ],
            &[(0, 1), (1, 2), (1, 3), (3, 4)],
        );
        let all = g.find_all_correlation_surfaces().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&CorrelationSurface::new([
            e(n(0, Basis::Z), n(1, Basis::Z)),
            e(n(1, Basis::Z), n(2, Basis::Z)),
        ])));

        let generators = g.find_correlation_surfaces().unwrap();
        let stabilizers: BTreeSet<String> = generators
            .iter()
            .map(|s| s.external_stabilizer(&[p(0), p(2)]))
            .collect();
        assert_eq!(stabilizers, BTreeSet::from(["ZZ".to_string(), "XY".to_string()]));
    }

    #[test]
    fn test_four_node_circle() {
        let mut g = graph(
            &[ZXKind::Boundary, ZXKind::Z, ZXKind::Z, ZXKind::Z, ZXKind::Z],
            &[(0, 1), (1, 2), (2, 3), (3, 4), (1, 4)],
        );
        assert_eq!(g.find_correlation_surfaces().unwrap().len(), 1);

        g.add_node(p(5), ZXKind::Boundary);
        g.add_edge(p(1), p(5), ZXEdgeKind::Simple);
        assert_eq!(g.find_all_correlation_surfaces().unwrap().len(), 3);
    }

    #[test]
    fn test_no_leaves_is_empty() {
        let g = graph(&[ZXKind::Z, ZXKind::Z, ZXKind::Z], &[(0, 1), (1, 2), (0, 2)]);
        assert!(g.find_correlation_surfaces().unwrap().is_empty());
    }

    #[test]
    fn test_dangling_boundary_rejected() {
        let g = graph(
            &[ZXKind::Z, ZXKind::Boundary, ZXKind::Z],
            &[(0, 1), (1, 2)],
        );
        assert!(matches!(
            g.find_correlation_surfaces(),
            Err(GraphError::UnsupportedZXGraph(_))
        ));
    }

    #[test]
    fn test_gf2_independence() {
        let mut basis = Gf2Basis::default();
        assert!(basis.insert(symplectic("ZZI")));
        assert!(basis.insert(symplectic("XYY")));
        assert!(!basis.insert(symplectic("YXY")));
        assert!(!basis.insert(symplectic("III")));
    }
}
