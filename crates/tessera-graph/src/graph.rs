//! The block graph: cubes keyed by position, pipes keyed by endpoint pair.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use tessera_ir::{Direction3D, Position3D};

use crate::cube::{Cube, CubeKind};
use crate::error::{GraphError, GraphResult};
use crate::pipe::{Pipe, PipeKind};

/// A computation expressed as cubes joined by pipes.
///
/// The graph owns every cube and pipe; traversal is by position lookup.
/// All mutation goes through [`BlockGraph::add_cube`] and
/// [`BlockGraph::add_pipe`], which enforce the structural invariants, so
/// every pipe of a graph joins neighbouring positions and matches the ZX
/// cubes at its ends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "BlockGraphData", into = "BlockGraphData")]
pub struct BlockGraph {
    name: String,
    cubes: BTreeMap<Position3D, Cube>,
    pipes: BTreeMap<(Position3D, Position3D), Pipe>,
    adjacency: BTreeMap<Position3D, BTreeSet<Position3D>>,
    ports: BTreeMap<String, Position3D>,
}

/// Serialized form; loading replays every insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlockGraphData {
    #[serde(default)]
    name: String,
    cubes: Vec<Cube>,
    pipes: Vec<Pipe>,
}

impl TryFrom<BlockGraphData> for BlockGraph {
    type Error = GraphError;

    fn try_from(data: BlockGraphData) -> Result<Self, Self::Error> {
        let mut graph = BlockGraph::new(data.name);
        for cube in data.cubes {
            graph.add_cube(cube.position, cube.kind, cube.label)?;
        }
        for pipe in data.pipes {
            graph.add_pipe(pipe.u(), pipe.v(), pipe.kind())?;
        }
        Ok(graph)
    }
}

impl From<BlockGraph> for BlockGraphData {
    fn from(graph: BlockGraph) -> Self {
        Self {
            name: graph.name,
            cubes: graph.cubes.into_values().collect(),
            pipes: graph.pipes.into_values().collect(),
        }
    }
}

fn pipe_key(a: Position3D, b: Position3D) -> (Position3D, Position3D) {
    if a < b { (a, b) } else { (b, a) }
}

impl BlockGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a cube.
    ///
    /// Ports need a non-empty label that no other port uses.
    pub fn add_cube(
        &mut self,
        position: Position3D,
        kind: CubeKind,
        label: impl Into<String>,
    ) -> GraphResult<Position3D> {
        let label = label.into();
        if self.cubes.contains_key(&position) {
            return Err(GraphError::OccupiedPosition(position));
        }
        if kind.is_port() {
            if label.is_empty() {
                return Err(GraphError::EmptyPortLabel(position));
            }
            if self.ports.contains_key(&label) {
                return Err(GraphError::DuplicatePortLabel(label));
            }
            self.ports.insert(label.clone(), position);
        }
        self.cubes.insert(position, Cube::new(position, kind, label));
        Ok(position)
    }

    /// Add a pipe of the given kind between two existing cubes.
    pub fn add_pipe(&mut self, a: Position3D, b: Position3D, kind: PipeKind) -> GraphResult<()> {
        let cube_a = self.cubes.get(&a).ok_or(GraphError::MissingCube(a))?;
        let cube_b = self.cubes.get(&b).ok_or(GraphError::MissingCube(b))?;
        let pipe = Pipe::new(a, b, kind)?;
        if self.pipes.contains_key(&pipe.key()) {
            return Err(GraphError::DuplicatePipe {
                a: pipe.u(),
                b: pipe.v(),
            });
        }
        for cube in [cube_a, cube_b] {
            let at_head = pipe.at_head(cube.position);
            kind.check_compatible_with(&cube.kind, cube.position, at_head)?;
            self.check_single_pipe_endpoint(cube, &pipe)?;
        }

        debug!(pipe = %pipe, "adding pipe");
        self.adjacency.entry(pipe.u()).or_default().insert(pipe.v());
        self.adjacency.entry(pipe.v()).or_default().insert(pipe.u());
        self.pipes.insert(pipe.key(), pipe);
        Ok(())
    }

    /// Ports and Y half cubes take exactly one pipe; Y half cubes only
    /// a temporal one.
    fn check_single_pipe_endpoint(&self, cube: &Cube, pipe: &Pipe) -> GraphResult<()> {
        let degree = self.degree(cube.position);
        match cube.kind {
            CubeKind::Port if degree >= 1 => Err(GraphError::DanglingPort {
                label: cube.label.clone(),
                position: cube.position,
                degree: degree + 1,
            }),
            CubeKind::YHalfCube if pipe.direction() != Direction3D::Z => {
                Err(GraphError::InvalidYHalfCube {
                    position: cube.position,
                    reason: format!("pipe along {} is not temporal", pipe.direction()),
                })
            }
            CubeKind::YHalfCube if degree >= 1 => Err(GraphError::InvalidYHalfCube {
                position: cube.position,
                reason: "already has a pipe".to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Add a pipe whose kind is inferred from the cubes at its ends.
    pub fn add_pipe_inferred(&mut self, a: Position3D, b: Position3D) -> GraphResult<()> {
        let cube_a = self.cubes.get(&a).ok_or(GraphError::MissingCube(a))?;
        let cube_b = self.cubes.get(&b).ok_or(GraphError::MissingCube(b))?;
        let (head, tail) = if a < b {
            (cube_a, cube_b)
        } else {
            (cube_b, cube_a)
        };
        let direction = Direction3D::between(head.position, tail.position).ok_or(
            GraphError::NotNeighbours {
                a: head.position,
                b: tail.position,
            },
        )?;
        let inference_error = || GraphError::PipeInference {
            a: head.position,
            b: tail.position,
        };
        let kind = match (head.kind.as_zx(), tail.kind.as_zx()) {
            (Some(h), Some(t)) => PipeKind::infer(h, t, direction).ok_or_else(inference_error)?,
            (Some(h), None) => PipeKind::from_cube_kind(h, direction, true, false)?,
            (None, Some(t)) => PipeKind::from_cube_kind(t, direction, false, false)?,
            (None, None) => return Err(inference_error()),
        };
        self.add_pipe(a, b, kind)
    }

    pub fn contains(&self, position: Position3D) -> bool {
        self.cubes.contains_key(&position)
    }

    pub fn cube(&self, position: Position3D) -> Option<&Cube> {
        self.cubes.get(&position)
    }

    pub fn pipe(&self, a: Position3D, b: Position3D) -> Option<&Pipe> {
        self.pipes.get(&pipe_key(a, b))
    }

    pub fn has_pipe_between(&self, a: Position3D, b: Position3D) -> bool {
        self.pipes.contains_key(&pipe_key(a, b))
    }

    /// Cubes in position order.
    pub fn cubes(&self) -> impl Iterator<Item = &Cube> {
        self.cubes.values()
    }

    /// Pipes in `(u, v)` order.
    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.values()
    }

    /// Pipes incident to `position`, ordered by the other endpoint.
    pub fn pipes_at(&self, position: Position3D) -> Vec<&Pipe> {
        self.neighbours(position)
            .filter_map(|other| self.pipe(position, other))
            .collect()
    }

    /// Positions joined to `position` by a pipe.
    pub fn neighbours(&self, position: Position3D) -> impl Iterator<Item = Position3D> + '_ {
        self.adjacency
            .get(&position)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn degree(&self, position: Position3D) -> usize {
        self.adjacency.get(&position).map_or(0, BTreeSet::len)
    }

    pub fn num_cubes(&self) -> usize {
        self.cubes.len()
    }

    pub fn num_pipes(&self) -> usize {
        self.pipes.len()
    }

    pub fn num_ports(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Whether any port is still unfilled.
    pub fn is_open(&self) -> bool {
        !self.ports.is_empty()
    }

    /// Port label to position.
    pub fn ports(&self) -> &BTreeMap<String, Position3D> {
        &self.ports
    }

    /// Port labels in sorted order.
    pub fn ordered_ports(&self) -> Vec<&str> {
        self.ports.keys().map(String::as_str).collect()
    }

    /// Cubes with exactly one pipe.
    pub fn leaf_cubes(&self) -> Vec<&Cube> {
        self.cubes
            .values()
            .filter(|c| self.degree(c.position) == 1)
            .collect()
    }

    /// `ZZX` and `XXZ` cubes.
    pub fn spatial_junctions(&self) -> Vec<&Cube> {
        self.cubes.values().filter(|c| c.is_spatial()).collect()
    }

    /// Range of `z` coordinates, `None` for an empty graph.
    pub fn z_range(&self) -> Option<(i32, i32)> {
        let min = self.cubes.keys().map(|p| p.z).min()?;
        let max = self.cubes.keys().map(|p| p.z).max()?;
        Some((min, max))
    }

    /// Check the structural rules that construction alone cannot enforce.
    ///
    /// - every port and Y half cube has exactly one pipe
    /// - Y half cubes only have temporal pipes
    ///
    /// ZX cubes need no check: their walls leave room for pipes along two
    /// axes at most, which pipe compatibility already enforces.
    pub fn validate(&self) -> GraphResult<()> {
        for cube in self.cubes.values() {
            let pipes = self.pipes_at(cube.position);
            match cube.kind {
                CubeKind::Port => {
                    if pipes.len() != 1 {
                        return Err(GraphError::DanglingPort {
                            label: cube.label.clone(),
                            position: cube.position,
                            degree: pipes.len(),
                        });
                    }
                }
                CubeKind::YHalfCube => {
                    if pipes.len() != 1 {
                        return Err(GraphError::InvalidYHalfCube {
                            position: cube.position,
                            reason: format!("has {} pipes, expected exactly one", pipes.len()),
                        });
                    }
                    if pipes[0].direction() != Direction3D::Z {
                        return Err(GraphError::InvalidYHalfCube {
                            position: cube.position,
                            reason: "pipe is not temporal".to_string(),
                        });
                    }
                }
                CubeKind::ZX(_) => {}
            }
        }
        Ok(())
    }

    /// Replace every port with a cube of the given kind.
    pub fn fill_ports(&self, kind: CubeKind) -> GraphResult<BlockGraph> {
        let fill: BTreeMap<String, CubeKind> =
            self.ports.keys().map(|label| (label.clone(), kind)).collect();
        self.fill_ports_with(&fill)
    }

    /// Replace the named ports with cubes of the given kinds.
    ///
    /// Returns a new graph; every pipe is re-checked against its new
    /// endpoints.
    pub fn fill_ports_with(&self, fill: &BTreeMap<String, CubeKind>) -> GraphResult<BlockGraph> {
        let mut replaced: BTreeMap<Position3D, CubeKind> = BTreeMap::new();
        for (label, kind) in fill {
            let position = *self
                .ports
                .get(label)
                .ok_or_else(|| GraphError::UnknownPort(label.clone()))?;
            if kind.is_port() {
                return Err(GraphError::InvalidCubeKind(format!(
                    "cannot fill port '{label}' with another port"
                )));
            }
            replaced.insert(position, *kind);
        }

        let mut graph = BlockGraph::new(self.name.clone());
        for cube in self.cubes.values() {
            match replaced.get(&cube.position) {
                Some(kind) => graph.add_cube(cube.position, *kind, "")?,
                None => graph.add_cube(cube.position, cube.kind, cube.label.clone())?,
            };
        }
        for pipe in self.pipes.values() {
            graph.add_pipe(pipe.u(), pipe.v(), pipe.kind())?;
        }
        Ok(graph)
    }

    /// New graph translated by the given offsets.
    pub fn shift_by(&self, dx: i32, dy: i32, dz: i32) -> GraphResult<BlockGraph> {
        let mut graph = BlockGraph::new(self.name.clone());
        for cube in self.cubes.values() {
            graph.add_cube(
                cube.position.shift_by(dx, dy, dz),
                cube.kind,
                cube.label.clone(),
            )?;
        }
        for pipe in self.pipes.values() {
            let moved = pipe.shift_by(dx, dy, dz);
            graph.add_pipe(moved.u(), moved.v(), moved.kind())?;
        }
        Ok(graph)
    }

    /// New graph whose lowest cube sits at `z = 0`.
    pub fn shift_min_z_to_zero(&self) -> GraphResult<BlockGraph> {
        match self.z_range() {
            Some((min_z, _)) => self.shift_by(0, 0, -min_z),
            None => Ok(self.clone()),
        }
    }

    pub fn to_json(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a graph, replaying every insertion check.
    pub fn from_json(json: &str) -> GraphResult<BlockGraph> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32, z: i32) -> Position3D {
        Position3D::new(x, y, z)
    }

    fn kind(s: &str) -> CubeKind {
        s.parse().unwrap()
    }

    fn two_cube_graph() -> BlockGraph {
        let mut g = BlockGraph::new("pair");
        g.add_cube(p(0, 0, 0), kind("ZXZ"), "").unwrap();
        g.add_cube(p(0, 0, 1), kind("ZXX"), "").unwrap();
        g.add_pipe_inferred(p(0, 0, 0), p(0, 0, 1)).unwrap();
        g
    }

    #[test]
    fn test_add_cube_rejects_occupied_position() {
        let mut g = two_cube_graph();
        assert!(matches!(
            g.add_cube(p(0, 0, 0), kind("XZX"), ""),
            Err(GraphError::OccupiedPosition(_))
        ));
    }

    #[test]
    fn test_port_labels() {
        let mut g = BlockGraph::new("ports");
        assert!(matches!(
            g.add_cube(p(0, 0, 0), CubeKind::Port, ""),
            Err(GraphError::EmptyPortLabel(_))
        ));
        g.add_cube(p(0, 0, 0), CubeKind::Port, "In").unwrap();
        assert!(matches!(
            g.add_cube(p(1, 0, 0), CubeKind::Port, "In"),
            Err(GraphError::DuplicatePortLabel(_))
        ));
        assert_eq!(g.ordered_ports(), vec!["In"]);
    }

    #[test]
    fn test_add_pipe_checks() {
        let mut g = two_cube_graph();
        g.add_cube(p(2, 0, 0), kind("ZXZ"), "").unwrap();
        assert!(matches!(
            g.add_pipe(p(0, 0, 0), p(2, 0, 0), "OXZ".parse().unwrap()),
            Err(GraphError::NotNeighbours { .. })
        ));
        assert!(matches!(
            g.add_pipe(p(0, 0, 1), p(0, 0, 0), "ZXO".parse().unwrap()),
            Err(GraphError::DuplicatePipe { .. })
        ));
        g.add_cube(p(1, 0, 0), kind("XZX"), "").unwrap();
        assert!(matches!(
            g.add_pipe(p(0, 0, 0), p(1, 0, 0), "OXZ".parse().unwrap()),
            Err(GraphError::IncompatiblePipe { .. })
        ));
        assert!(g.add_pipe(p(0, 0, 0), p(1, 0, 0), "OXZH".parse().unwrap()).is_ok());
        assert!(matches!(
            g.add_pipe(p(0, 0, 0), p(0, 0, 5), "ZXO".parse().unwrap()),
            Err(GraphError::MissingCube(_))
        ));
    }

    #[test]
    fn test_queries() {
        let g = two_cube_graph();
        assert_eq!(g.num_cubes(), 2);
        assert_eq!(g.num_pipes(), 1);
        assert_eq!(g.leaf_cubes().len(), 2);
        assert_eq!(g.pipes_at(p(0, 0, 0)).len(), 1);
        assert!(g.has_pipe_between(p(0, 0, 1), p(0, 0, 0)));
        assert_eq!(g.z_range(), Some((0, 1)));
        assert!(!g.is_open());
        g.validate().unwrap();
    }

    #[test]
    fn test_validate_dangling_port() {
        let mut g = BlockGraph::new("dangling");
        g.add_cube(p(0, 0, 0), CubeKind::Port, "In").unwrap();
        assert!(matches!(g.validate(), Err(GraphError::DanglingPort { .. })));
    }

    #[test]
    fn test_y_half_cube_rules() {
        let mut g = BlockGraph::new("y");
        g.add_cube(p(0, 0, 0), kind("XZX"), "").unwrap();
        g.add_cube(p(1, 0, 0), CubeKind::YHalfCube, "").unwrap();
        assert!(matches!(
            g.add_pipe_inferred(p(0, 0, 0), p(1, 0, 0)),
            Err(GraphError::InvalidYHalfCube { .. })
        ));
        g.add_cube(p(0, 0, 1), CubeKind::YHalfCube, "").unwrap();
        g.add_pipe_inferred(p(0, 0, 0), p(0, 0, 1)).unwrap();
        assert!(matches!(g.validate(), Err(GraphError::InvalidYHalfCube { .. })));
    }

    #[test]
    fn test_pipes_along_two_axes_at_most() {
        let mut g = BlockGraph::new("corner");
        g.add_cube(p(0, 0, 0), kind("ZXZ"), "").unwrap();
        g.add_cube(p(1, 0, 0), kind("ZXZ"), "").unwrap();
        g.add_cube(p(0, 1, 0), kind("ZXZ"), "").unwrap();
        g.add_cube(p(0, 0, 1), kind("ZXZ"), "").unwrap();
        g.add_pipe_inferred(p(0, 0, 0), p(1, 0, 0)).unwrap();
        g.add_pipe_inferred(p(0, 0, 0), p(0, 0, 1)).unwrap();
        // x and z walls are both Z: no pipe can open along y.
        assert!(matches!(
            g.add_pipe_inferred(p(0, 0, 0), p(0, 1, 0)),
            Err(GraphError::PipeInference { .. })
        ));
        assert!("ZOZ".parse::<PipeKind>().is_err());
        g.validate().unwrap();
    }

    #[test]
    fn test_fill_ports() {
        let mut g = BlockGraph::new("open");
        g.add_cube(p(0, 0, 0), CubeKind::Port, "In").unwrap();
        g.add_cube(p(0, 0, 1), kind("ZXZ"), "").unwrap();
        g.add_pipe_inferred(p(0, 0, 0), p(0, 0, 1)).unwrap();
        assert!(g.is_open());

        let filled = g.fill_ports(kind("ZXX")).unwrap();
        assert!(!filled.is_open());
        assert_eq!(filled.cube(p(0, 0, 0)).unwrap().kind, kind("ZXX"));

        assert!(matches!(
            g.fill_ports(kind("XZX")),
            Err(GraphError::IncompatiblePipe { .. })
        ));
        let mut fill = BTreeMap::new();
        fill.insert("Out".to_string(), kind("ZXZ"));
        assert!(matches!(
            g.fill_ports_with(&fill),
            Err(GraphError::UnknownPort(_))
        ));
    }

    #[test]
    fn test_shift_and_json() {
        let g = two_cube_graph().shift_by(0, 0, -3).unwrap();
        assert_eq!(g.z_range(), Some((-3, -2)));
        let g = g.shift_min_z_to_zero().unwrap();
        assert_eq!(g, two_cube_graph());

        let json = g.to_json().unwrap();
        let back = BlockGraph::from_json(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_json_load_rechecks_pipes() {
        let json = r#"{
            "name": "bad",
            "cubes": [
                {"position": {"x": 0, "y": 0, "z": 0}, "kind": "ZXZ"},
                {"position": {"x": 1, "y": 0, "z": 0}, "kind": "XZX"}
            ],
            "pipes": [
                {"u": {"x": 0, "y": 0, "z": 0}, "v": {"x": 1, "y": 0, "z": 0}, "kind": "OXZ"}
            ]
        }"#;
        assert!(BlockGraph::from_json(json).is_err());
    }
}
