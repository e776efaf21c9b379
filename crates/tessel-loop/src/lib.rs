//! Fork-join threaded element loops for Tessel.
//!
//! The [`ThreadedElementLoop`] drives an [`ElementOperation`] over an
//! [`ElementRange`](tessel_mesh::ElementRange), splitting the range
//! recursively onto a rayon work-stealing pool. Each forked half gets its
//! own copy of the operation (fresh thread-local scratch) which is merged
//! back at the join point. Per-element faults are caught at the loop
//! boundary and recorded once on the [`ProblemContext`]; the loop never
//! lets an error or panic escape a worker thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod exception;
pub mod operation;
pub mod threaded;

pub use context::{ProblemContext, SystemContext, VariableInfo, VisitContext};
pub use exception::{ExceptionGuard, ExceptionLock, ExceptionRecord};
pub use operation::ElementOperation;
pub use threaded::{FaultPolicy, ThreadedElementLoop, TraversalStats};
