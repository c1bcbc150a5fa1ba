//! Tessera block graph compiler
//!
//! Turns a closed [`BlockGraph`](tessera_graph::BlockGraph) into a
//! [`ScheduledCircuit`](tessera_ir::ScheduledCircuit) at a chosen scale
//! `k`. Every cube becomes a block of stabilizer measurement rounds laid
//! out on a template; pipes then rewrite the plaquettes on the borders of
//! the blocks they join.
//!
//! # Overview
//!
//! Compilation runs in four steps:
//!
//! 1. **Plan**: classify every cube and pipe into a [`BlockCategory`],
//!    collect the neighbourhood each builder needs ([`CubeSpec`],
//!    [`PipeSpec`]) and align the stabilizer checkerboards across pipes.
//! 2. **Build**: the [`BuilderRegistry`] maps each category to a
//!    [`CubeBuilder`] or [`PipeBuilder`]. Cubes build independently;
//!    pipes build against the untouched endpoint blocks.
//! 3. **Substitute**: pipe overrides are replayed in a fixed order,
//!    temporal pipes first.
//! 4. **Assemble**: blocks sharing a `z` form a slice; slices run one
//!    after the other.
//!
//! # Core Components
//!
//! - **Driver**: [`BlockGraphCompiler`], [`compile_block_graph`],
//!   [`CompiledGraph`]
//! - **Options**: [`CompileOptions`], loaded from YAML or the environment
//! - **Builders**: [`builders`] and the [`BuilderRegistry`]
//!
//! # Example: Memory Experiment
//!
//! ```rust
//! use tessera_compile::{CompileOptions, compile_block_graph};
//! use tessera_graph::{Basis, gallery};
//!
//! let graph = gallery::memory(Basis::Z).unwrap();
//! let compiled = compile_block_graph(&graph, 1, &CompileOptions::default(), None).unwrap();
//!
//! // 2k - 1 = 1 round of 6 moments.
//! assert_eq!(compiled.num_moments(), 6);
//! assert!(compiled.circuit.check_conflict_free().is_ok());
//! assert_eq!(compiled.observables.len(), 1);
//! ```
//!
//! # Standard Builders
//!
//! | Category | Builder | Template |
//! |----------|---------|----------|
//! | memory cube | `MemoryCube` | qubit, 14 classes |
//! | spatial junction | `SpatialJunction` | spatial cube, 24 classes |
//! | half cube | `HalfCube` | qubit, 14 classes |
//! | temporal pipe | `TemporalPipe` | none |
//! | temporal Hadamard pipe | `TemporalHadamardPipe` | head block |
//! | spatial pipe | `SpatialPipe` | endpoint borders |
//! | spatial Hadamard pipe | `SpatialHadamardPipe` | endpoint borders |

pub mod assemble;
pub mod block;
pub mod builder;
pub mod builders;
pub mod compile;
pub mod config;
pub mod error;
pub mod registry;

pub use assemble::SliceSummary;
pub use block::{BlockCategory, BlockPlan, CubeSpec, PipeSpec};
pub use builder::{CompiledBlock, CubeBuilder, PipeBuilder, RoundPlaquettes, Substitution};
pub use compile::{BlockGraphCompiler, CompiledGraph, compile_block_graph};
pub use config::{CompileOptions, ConfigError};
pub use error::{CompileError, CompileResult};
pub use registry::BuilderRegistry;
