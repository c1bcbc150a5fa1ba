//! Error types for plaquette descriptions and translation.

use std::fmt;

use thiserror::Error;

use crate::plaquette::Timing;

/// One of the four fields of an RPNG corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpngField {
    Reset,
    Pauli,
    Schedule,
    End,
}

impl fmt::Display for RpngField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RpngField::Reset => "reset",
            RpngField::Pauli => "pauli",
            RpngField::Schedule => "schedule",
            RpngField::End => "measurement",
        };
        write!(f, "{name}")
    }
}

/// Errors raised while parsing or translating plaquettes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaquetteError {
    /// A description must list exactly four corners.
    #[error("RPNG description '{text}' has {found} corners, expected 4")]
    WrongCornerCount {
        /// Offending description.
        text: String,
        /// Number of corners found.
        found: usize,
    },

    /// A corner must be exactly four characters long.
    #[error("RPNG corner '{corner}' must be exactly 4 characters long")]
    WrongCornerLength {
        /// Offending corner.
        corner: String,
    },

    /// A corner field holds an unexpected character.
    #[error("Invalid character '{found}' in the {field} field of RPNG corner '{corner}'")]
    InvalidField {
        /// Offending corner.
        corner: String,
        /// Field containing the character.
        field: RpngField,
        /// The character.
        found: char,
    },

    /// An interaction step does not fit the plaquette timing.
    #[error("Interaction step {step} is outside 1..={max} for {timing} plaquettes")]
    ScheduleOutOfRange {
        /// Requested step.
        step: u8,
        /// Largest step of the timing.
        max: u8,
        /// Timing of the plaquette.
        timing: Timing,
    },

    /// Two corners interact at the same step.
    #[error("Interaction step {step} is used by more than one corner")]
    DuplicateSchedule {
        /// The shared step.
        step: u8,
    },

    /// Padding cannot shorten a plaquette.
    #[error("Cannot pad a plaquette of {length} moments to {requested} moments")]
    InvalidPadding {
        /// Current number of moments.
        length: usize,
        /// Requested number of moments.
        requested: usize,
    },
}

/// Result type for plaquette operations.
pub type PlaquetteResult<T> = Result<T, PlaquetteError>;
