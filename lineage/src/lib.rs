//! Lineage: C3 method resolution order
//!
//! Computes the linear order in which a multiple-inheritance runtime
//! searches a class and its ancestors when resolving a name, using the C3
//! linearization.
//!
//! # Overview
//!
//! - [`Hierarchy`]: classes mapped to their declared bases, in order
//! - [`Linearizer`] / [`linearize`]: the C3 linearization itself
//! - [`merge`](merge::merge): the C3 merge of a list of sequences
//! - [`MethodTable`]: name lookup along a class's MRO
//!
//! # Example
//!
//! ```rust
//! use lineage::{linearize, Hierarchy};
//!
//! let hierarchy = Hierarchy::with_root("object")
//!     .class("F", ["object"])
//!     .class("E", ["object"])
//!     .class("D", ["object"])
//!     .class("C", ["D", "F"])
//!     .class("B", ["D", "E"])
//!     .class("A", ["B", "C"]);
//!
//! let mro = linearize(&"A", &hierarchy)?;
//! assert_eq!(mro, ["A", "B", "C", "D", "E", "F", "object"]);
//! # Ok::<(), lineage::LinearizeError<&str>>(())
//! ```

pub mod dispatch;
pub mod error;
pub mod hierarchy;
pub mod linearize;
pub mod merge;

pub use dispatch::{next_in_mro, MethodTable};
pub use error::{ErrorKind, LinearizeError, LinearizeResult};
pub use hierarchy::{ClassId, Hierarchy};
pub use linearize::{linearize, Linearizer};
pub use merge::MergeConflict;
