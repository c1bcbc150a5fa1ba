//! Tessera scalable templates
//!
//! A template is a 2D arrangement of plaquette classes whose width and
//! height are linear functions of the scale parameter `k`. Instantiating a
//! template at a given `k` yields an integer array in which every cell
//! holds the index of the plaquette to place there.
//!
//! # Overview
//!
//! Templates never know which plaquettes they will hold; they only
//! describe where each class goes. The compiler pairs a template with a
//! list of plaquettes (one per class) to produce a layer of the final
//! circuit.
//!
//! # Core Components
//!
//! - **Traits**: [`Template`], [`RectangularTemplate`]
//! - **Library**: [`QubitTemplate`], [`QubitSpatialCubeTemplate`],
//!   [`QubitVerticalBorders`], [`QubitHorizontalBorders`]
//! - **Composition**: [`horizontal`], [`vertical`], [`trim`]
//! - **Layouts**: [`LayoutTemplate`] placing equally shaped templates on a
//!   block grid
//!
//! # Example: A Qubit Next to a Pipe
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera_templates::{QubitTemplate, QubitVerticalBorders, Template, horizontal};
//!
//! let t = horizontal(Arc::new(QubitTemplate), Arc::new(QubitVerticalBorders)).unwrap();
//! assert_eq!(t.expected_plaquettes_number(), 22);
//! assert_eq!(t.shape(1), (6, 4));
//!
//! let arr = t.instantiate(1).unwrap();
//! assert_eq!(arr.row(0).to_vec(), vec![1, 5, 6, 2, 15, 16]);
//! ```
//!
//! # Library Templates
//!
//! | Template | Width | Height | Classes |
//! |----------|-------|--------|---------|
//! | `QubitTemplate` | `2k + 2` | `2k + 2` | 14 |
//! | `QubitSpatialCubeTemplate` | `2k + 2` | `2k + 2` | 24 |
//! | `QubitVerticalBorders` | `2` | `2k + 2` | 8 |
//! | `QubitHorizontalBorders` | `2k + 2` | `2` | 8 |

pub mod base;
pub mod border;
pub mod compose;
pub mod error;
pub mod layout;
pub mod library;

pub use base::{RectangularTemplate, Template};
pub use border::{BorderIndices, TemplateBorder};
pub use compose::{ComposedTemplate, TrimmedTemplate, horizontal, trim, vertical};
pub use error::{TemplateError, TemplateResult};
pub use layout::LayoutTemplate;
pub use library::{
    QUBIT_SIDE, QubitHorizontalBorders, QubitSpatialCubeTemplate, QubitTemplate,
    QubitVerticalBorders,
};
