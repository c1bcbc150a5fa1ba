//! Tessera block graphs
//!
//! A computation is described as a graph of cubes on a 3D lattice joined
//! by pipes. This crate builds and checks such graphs, converts them to a
//! ZX graph and finds the correlation surfaces that define their logical
//! observables.
//!
//! # Overview
//!
//! - A [`Cube`] sits at a [`Position3D`] and has a [`CubeKind`]: a
//!   [`ZXCube`] with a boundary basis on each axis, an open `Port`, or a
//!   Y half cube.
//! - A [`Pipe`] joins two neighbouring cubes; its [`PipeKind`] gives the
//!   wall bases, the open axis and an optional Hadamard.
//! - [`BlockGraph`] owns both, enforces the construction rules and
//!   serializes to JSON.
//! - [`ZXGraph`] is the ZX-calculus view and the input of
//!   [`ZXGraph::find_correlation_surfaces`].
//!
//! # Example: Two Stacked Memory Cubes
//!
//! ```rust
//! use tessera_graph::{BlockGraph, Position3D};
//!
//! let mut graph = BlockGraph::new("memory");
//! let bottom = Position3D::new(0, 0, 0);
//! let top = Position3D::new(0, 0, 1);
//! graph.add_cube(bottom, "ZXZ".parse().unwrap(), "").unwrap();
//! graph.add_cube(top, "ZXZ".parse().unwrap(), "").unwrap();
//! graph.add_pipe_inferred(bottom, top).unwrap();
//! graph.validate().unwrap();
//!
//! let surfaces = graph.find_correlation_surfaces().unwrap();
//! assert_eq!(surfaces.len(), 1);
//! assert_eq!(surfaces[0].external_stabilizer(&[bottom, top]), "ZZ");
//! ```
//!
//! # Cube Kinds
//!
//! | Kind | ZX node | Notes |
//! |------|---------|-------|
//! | `ZXZ`, `XZX`, ... | Z or X spider | spider type is the basis that appears once |
//! | `ZZX`, `XXZ` | X or Z spider | spatial junction |
//! | `PORT` | boundary | exactly one pipe, needs a label |
//! | `Y` | Z spider with phase 1/2 | exactly one temporal pipe |

pub mod correlation;
pub mod cube;
pub mod error;
pub mod gallery;
pub mod graph;
pub mod pipe;
pub mod zx;

pub use correlation::{CorrelationSurface, ZXEdge, ZXNode};
pub use cube::{Cube, CubeKind, ZXCube};
pub use error::{GraphError, GraphResult};
pub use graph::BlockGraph;
pub use pipe::{Pipe, PipeKind};
pub use zx::{ZXEdgeKind, ZXGraph, ZXKind};

pub use tessera_ir::{Basis, Direction3D, Position3D};
