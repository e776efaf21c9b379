//! Core types and traits for the Tessel finite-element framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary shared by the rest of the workspace:
//! strongly-typed IDs, points and gradients, error types, and the
//! parameter bags consumed by initial conditions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod params;

pub use error::{ElementError, IcError, MeshError, ParamError};
pub use geometry::{Point, Real, RealGradient};
pub use id::{ElementId, NodeId, NodeList, SubdomainId, VariableId};
pub use params::{InputParameters, ParamKind, ParamSchema, ParamValue, ValidParams};
