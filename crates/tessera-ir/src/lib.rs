//! Tessera intermediate representation
//!
//! This crate holds the value types shared by every stage of the Tessera
//! compiler and the circuit representation it produces.
//!
//! # Overview
//!
//! Blocks of a computation live on a 3D integer lattice
//! ([`Position3D`], with `z` as time). Templates and plaquettes are
//! functions of a scale parameter `k` ([`LinearFunction`]). The final
//! product is a [`ScheduledCircuit`]: a list of moments of physical
//! [`Operation`]s on indexed qubits, built by splicing local fragments
//! together with a [`CircuitAssembler`].
//!
//! # Core Components
//!
//! - **Geometry**: [`Position3D`], [`Direction3D`], [`Basis`],
//!   [`Position2D`] (physical qubit coordinates), [`BlockPosition2D`]
//! - **Scale**: [`LinearFunction`], [`Scalable2D`]
//! - **Operations**: [`Operation`] over relative offsets, absolute
//!   coordinates or [`QubitIndex`]
//! - **Assembly**: [`CircuitAssembler`] (`Empty -> Assembling -> Sealed`)
//! - **Circuit**: [`ScheduledCircuit`], [`Moment`], [`StabilizerRecord`]
//!
//! # Example: Assembling a Tiny Circuit
//!
//! ```rust
//! use tessera_ir::{Basis, CircuitAssembler, Operation, Position2D};
//!
//! let mut asm = CircuitAssembler::new();
//! asm.begin().unwrap();
//!
//! let syndrome = Position2D::new(0, 0);
//! let data = Position2D::new(1, 1);
//! asm.add_operation(0, Operation::reset(Basis::X, syndrome), "demo").unwrap();
//! asm.add_operation(1, Operation::controlled_pauli(Basis::Z, syndrome, data), "demo").unwrap();
//! asm.add_operation(2, Operation::measure(Basis::X, syndrome), "demo").unwrap();
//!
//! let circuit = asm.seal().unwrap();
//! assert_eq!(circuit.num_moments(), 3);
//! assert_eq!(circuit.num_qubits(), 2);
//! ```
//!
//! # Operations
//!
//! | Operation | Qubits | Mergeable |
//! |-----------|--------|-----------|
//! | `RX`, `RY`, `RZ` | 1 | yes |
//! | `MX`, `MY`, `MZ` | 1 | yes |
//! | `H` | 1 | yes |
//! | `CX`, `CZ` | 2 | no |

pub mod assembler;
pub mod circuit;
pub mod error;
pub mod geometry;
pub mod operation;
pub mod qubit;
pub mod scale;

pub use assembler::{AssemblerState, CircuitAssembler};
pub use circuit::{Moment, ScheduledCircuit, StabilizerRecord, StabilizerTag};
pub use error::{IrError, IrResult};
pub use geometry::{Basis, BlockPosition2D, DataBasis, Direction3D, Position2D, Position3D};
pub use operation::{IndexedOperation, Operation, OperationKind};
pub use qubit::{QubitIndex, QubitMap};
pub use scale::{LinearFunction, Scalable2D};
