//! Tessel: parallel element traversal for finite-element problems.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tessel sub-crates. For most users, adding `tessel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessel::prelude::*;
//!
//! // Each node gets an equal share of the element's length.
//! struct Lumped;
//! impl ElementKernel for Lumped {
//!     fn name(&self) -> &str { "lumped" }
//!     fn variable(&self) -> VariableId { VariableId(0) }
//!     fn compute(&self, data: &ElementData<'_>, local: &mut [Real]) -> Result<(), ElementError> {
//!         let share = data.measure / local.len() as Real;
//!         for (r, u) in local.iter_mut().zip(&data.u) {
//!             *r = share * u;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let config = ProblemConfig::new(StructuredMesh::line(8, 0.0, 2.0).unwrap())
//!     .variable("u")
//!     .initial_condition(
//!         "ConstantIC",
//!         "u0",
//!         InputParameters::new().with("variable", "u").with("value", 3.0),
//!     )
//!     .parallel(ParallelConfig { n_threads: Some(2), grain_size: 2, ..Default::default() });
//!
//! let mut problem = FeProblem::new(config).unwrap();
//! assert_eq!(problem.project_initial_conditions().unwrap(), 9);
//!
//! let residual = problem.compute_residual(&Lumped).unwrap();
//! let total: Real = residual.iter().sum();
//! assert!((total - 6.0).abs() < 1e-12);
//! assert_eq!(problem.last_metrics().elements_visited, 8);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessel-core` | IDs, geometry, parameters, error types |
//! | [`mesh`] | `tessel-mesh` | Elements, the `Mesh` trait, splittable ranges |
//! | [`threading`] | `tessel-loop` | The threaded element loop and fault recording |
//! | [`ics`] | `tessel-ics` | Initial conditions, their factory and projection |
//! | [`engine`] | `tessel-engine` | Problem orchestration and residual assembly |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, parameters and errors (`tessel-core`).
///
/// Contains the id newtypes, [`types::Point`] and [`types::RealGradient`],
/// the parameter schema machinery, and every error enum shared across
/// crates.
pub use tessel_core as types;

/// Meshes and element ranges (`tessel-mesh`).
///
/// Provides the [`mesh::Mesh`] trait, [`mesh::StructuredMesh`], and the
/// [`mesh::ElementRange`] the loop splits.
pub use tessel_mesh as mesh;

/// Threaded element loops (`tessel-loop`).
///
/// [`threading::ThreadedElementLoop`] drives any
/// [`threading::ElementOperation`] across a rayon pool and records faults
/// through a [`threading::ProblemContext`].
pub use tessel_loop as threading;

/// Initial conditions (`tessel-ics`).
///
/// Library conditions, the [`ics::IcFactory`] that builds them from
/// parameters, and [`ics::ProjectInitialCondition`].
pub use tessel_ics as ics;

/// Problem orchestration (`tessel-engine`).
///
/// [`engine::FeProblem`] owns the system, the worker pool and the fault
/// record.
pub use tessel_engine as engine;

/// Common imports for typical Tessel usage.
///
/// ```rust
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tessel_core::{
        ElementId, InputParameters, NodeId, Point, Real, RealGradient, SubdomainId, VariableId,
    };

    // Errors
    pub use tessel_core::{ElementError, IcError, MeshError, ParamError};

    // Mesh
    pub use tessel_mesh::{Element, Mesh, StructuredMesh};

    // Loop
    pub use tessel_loop::{
        ElementOperation, FaultPolicy, ProblemContext, SystemContext, ThreadedElementLoop,
        TraversalStats, VisitContext,
    };

    // Initial conditions
    pub use tessel_ics::{IcFactory, InitialCondition};

    // Engine
    pub use tessel_engine::{
        ConfigError, ElementData, ElementKernel, FeProblem, ParallelConfig, ProblemConfig,
        SolveError, TraversalMetrics,
    };
}
