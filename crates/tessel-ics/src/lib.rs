//! Initial conditions for the Tessel finite-element framework.
//!
//! An [`InitialCondition`] supplies a variable's starting value (and
//! optionally its gradient) at a point. Library conditions:
//!
//! - [`ConstantIc`]: one value everywhere.
//! - [`BoundingBoxIc`]: one value inside an axis-aligned box, another outside.
//! - [`FunctionIc`]: user closures for value and gradient.
//! - [`RandomIc`]: uniform noise, deterministic per point and seed.
//!
//! Conditions are built by name through an [`IcFactory`], collected in an
//! [`IcSet`], and applied to the mesh nodes in parallel by
//! [`ProjectInitialCondition`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounding_box;
pub mod constant;
pub mod factory;
pub mod function;
pub mod initial_condition;
pub mod project;
pub mod random;
pub mod set;

pub use bounding_box::BoundingBoxIc;
pub use constant::ConstantIc;
pub use factory::{IcConstructor, IcFactory};
pub use function::FunctionIc;
pub use initial_condition::{IcBase, InitialCondition};
pub use project::{NodalValue, ProjectInitialCondition};
pub use random::RandomIc;
pub use set::IcSet;
