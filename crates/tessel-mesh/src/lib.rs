//! Mesh abstraction and splittable element ranges for Tessel.
//!
//! This crate defines the [`Mesh`] trait, the read-only view of a
//! discretized domain that threaded loops traverse, together with
//! [`ElementRange`], the ordered splittable sequence of elements that
//! feeds the fork-join scheduler.
//!
//! # Backends
//!
//! - [`StructuredMesh`]: generated line (EDGE2) and quadrilateral (QUAD4)
//!   meshes, or arbitrary connectivity via [`StructuredMesh::from_parts`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod mesh;
pub mod range;
pub mod structured;

#[cfg(test)]
pub(crate) mod compliance;

pub use element::Element;
pub use mesh::Mesh;
pub use range::ElementRange;
pub use structured::StructuredMesh;
