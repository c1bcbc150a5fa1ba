//! Tessera plaquettes
//!
//! A plaquette is the local circuit measuring one stabilizer: a syndrome
//! qubit at the origin interacting with up to four data qubits at the
//! corners `(±1, ±1)`. This crate parses the RPNG description language,
//! translates descriptions into scheduled fragments and holds the
//! library of plaquettes used by the block compiler.
//!
//! # Core Components
//!
//! - **Descriptions**: [`Rpng`], [`RpngCorner`], [`Corner`], [`DataEnd`]
//! - **Fragments**: [`Plaquette`] and its [`Timing`]
//! - **Library**: [`PlaquetteContext`], [`PlaquetteFamily`], [`ArmSet`],
//!   [`PipeEnd`], [`descriptions`], [`plaquette_for`]
//!
//! # Example: Translating a Description
//!
//! ```rust
//! use tessera_plaquette::{Plaquette, Rpng, Timing};
//!
//! let rpng: Rpng = "zz1- zz2- zz3- zz4-".parse().unwrap();
//! let plaquette = Plaquette::from_rpng(&rpng, Timing::Regular).unwrap();
//! assert_eq!(plaquette.num_moments(), 6);
//! assert_eq!(plaquette.interactions().count(), 4);
//!
//! // Pad to the extended round length: the measurement moves to the end.
//! let padded = plaquette.padded(8).unwrap();
//! assert_eq!(padded.syndrome_measurement(), Some(7));
//! ```
//!
//! # Timings
//!
//! | Timing | Interaction steps | Measurement moment | Moments |
//! |--------|-------------------|--------------------|---------|
//! | `Regular` | 1..=4 | 5 | 6 |
//! | `Extended` | 1..=6 | 7 | 8 |

pub mod error;
pub mod library;
pub mod plaquette;
pub mod rpng;

pub use error::{PlaquetteError, PlaquetteResult, RpngField};
pub use library::{
    ArmSet, JunctionArm, PipeEnd, PlaquetteContext, PlaquetteFamily, SpatialAxis, descriptions,
    plaquette_for, plaquettes_for,
};
pub use plaquette::{Plaquette, SYNDROME_QUBIT, Timing};
pub use rpng::{Corner, DataEnd, Rpng, RpngCorner};
