//! Built-in block builders.
//!
//! Builders are organized by the blocks they compile:
//! - [`cube`]: templates and plaquettes of memory cubes, spatial junctions
//!   and Y half cubes
//! - [`pipe`]: substitutions of temporal and spatial pipes

pub mod cube;
pub mod pipe;

pub use cube::{HalfCubeBuilder, MemoryCubeBuilder, SpatialJunctionBuilder};
pub use pipe::{
    SpatialHadamardPipeBuilder, SpatialPipeBuilder, TemporalHadamardPipeBuilder,
    TemporalPipeBuilder,
};
