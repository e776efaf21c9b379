//! Problem orchestration for Tessel.
//!
//! [`FeProblem`] ties a [`NonlinearSystem`] to a worker pool and a
//! problem-scoped fault record, and runs the two built-in traversals
//! through the threaded element loop: initial-condition projection and
//! residual assembly. Arbitrary [`ElementOperation`](tessel_loop::ElementOperation)s
//! can be run with [`FeProblem::run_loop()`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod assembly;
pub mod config;
pub mod error;
pub mod metrics;
pub mod problem;
pub mod system;

pub use assembly::{ElementData, ElementKernel, ResidualAssembly};
pub use config::{ConfigError, IcConfig, ParallelConfig, ProblemConfig, VariableConfig};
pub use error::SolveError;
pub use metrics::TraversalMetrics;
pub use problem::{FeProblem, PHASE_INITIAL_CONDITIONS, PHASE_RESIDUAL};
pub use system::NonlinearSystem;
