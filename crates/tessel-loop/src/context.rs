//! Contexts a threaded loop borrows for the duration of a traversal.
//!
//! [`ProblemContext`] owns the fault record and the exception lock.
//! [`SystemContext`] owns the mesh and variable metadata being assembled.
//! [`VisitContext`] is what an operation sees for each element.

use crate::exception::ExceptionLock;
use tessel_core::{SubdomainId, VariableId};
use tessel_mesh::Mesh;

/// The coordinating problem: owner of the problem-scoped fault record.
///
/// A loop borrows its problem for the whole traversal and every split
/// copy shares the same reference. The problem must outlive all of them.
///
/// # Contract
///
/// - `set_exception()` is called with the exception lock held. It must
///   not block on anything a worker might hold, must not log, and must
///   not start a new traversal.
/// - Once `has_exception()` returns `true` it stays `true` until the
///   problem clears the record before its next traversal.
pub trait ProblemContext: Sync {
    /// Whether a fault has been recorded in the current traversal.
    fn has_exception(&self) -> bool;

    /// Record a fault message. Returns `true` if this message was stored,
    /// `false` if an earlier fault already holds the slot.
    fn set_exception(&self, message: String) -> bool;

    /// The lock that serializes fault recording across workers.
    ///
    /// Dedicated to fault capture and never taken by the thread pool,
    /// so a worker can acquire it while the scheduler holds its own locks.
    fn exception_lock(&self) -> &ExceptionLock;
}

/// Metadata for one field variable of a system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableInfo {
    /// Variable id; its position in [`SystemContext::variables()`].
    pub id: VariableId,
    /// User-facing name.
    pub name: String,
    /// Subdomains the variable lives on. `None` means the whole mesh.
    pub subdomains: Option<Vec<SubdomainId>>,
}

impl VariableInfo {
    /// Returns `true` if the variable is defined on `subdomain`.
    pub fn is_active_on(&self, subdomain: SubdomainId) -> bool {
        match &self.subdomains {
            None => true,
            Some(ids) => ids.contains(&subdomain),
        }
    }
}

/// The variable/equation system being assembled.
///
/// Supplies the mesh a traversal iterates and the variable metadata
/// used to dispatch initial conditions. Read-only during a traversal.
pub trait SystemContext: Sync {
    /// System name for diagnostics.
    fn name(&self) -> &str;

    /// The mesh this system is discretized on.
    fn mesh(&self) -> &dyn Mesh;

    /// Variables in id order.
    fn variables(&self) -> &[VariableInfo];

    /// Look up a variable by name.
    fn variable_by_name(&self, name: &str) -> Option<&VariableInfo> {
        self.variables().iter().find(|v| v.name == name)
    }

    /// Look up a variable by id.
    fn variable(&self, id: VariableId) -> Option<&VariableInfo> {
        self.variables().get(id.0 as usize)
    }
}

/// Per-visit context handed to [`ElementOperation::on_element`](crate::ElementOperation::on_element).
///
/// Cheap to construct; one is built per leaf range.
#[derive(Clone, Copy)]
pub struct VisitContext<'a> {
    system: &'a dyn SystemContext,
    worker: Option<usize>,
}

impl<'a> VisitContext<'a> {
    /// Construct a visit context.
    ///
    /// Typically called by the loop, not by operations directly.
    pub fn new(system: &'a dyn SystemContext, worker: Option<usize>) -> Self {
        Self { system, worker }
    }

    /// The system being assembled.
    pub fn system(&self) -> &'a dyn SystemContext {
        self.system
    }

    /// The system's mesh.
    pub fn mesh(&self) -> &'a dyn Mesh {
        self.system.mesh()
    }

    /// Index of the rayon worker running this visit, or `None` when the
    /// visit runs outside a pool (serial traversal).
    pub fn worker_index(&self) -> Option<usize> {
        self.worker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_without_subdomains_is_active_everywhere() {
        let v = VariableInfo {
            id: VariableId(0),
            name: "u".into(),
            subdomains: None,
        };
        assert!(v.is_active_on(SubdomainId(0)));
        assert!(v.is_active_on(SubdomainId(7)));
    }

    #[test]
    fn restricted_variable_is_active_only_on_its_blocks() {
        let v = VariableInfo {
            id: VariableId(1),
            name: "T".into(),
            subdomains: Some(vec![SubdomainId(2)]),
        };
        assert!(v.is_active_on(SubdomainId(2)));
        assert!(!v.is_active_on(SubdomainId(0)));
    }
}
