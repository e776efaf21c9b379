//! Test utilities and mock contexts for Tessel development.
//!
//! Provides mock implementations of the loop's context traits
//! ([`ProblemContext`], [`SystemContext`]) and a set of fixture
//! operations in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use tessel_core::{SubdomainId, VariableId};
use tessel_loop::{ExceptionLock, ExceptionRecord, ProblemContext, SystemContext, VariableInfo};
use tessel_mesh::{Mesh, StructuredMesh};

pub use fixtures::{
    CountingOperation, FailingOperation, HookPanicOperation, PanickingOperation,
    RecordingOperation,
};

/// Mock implementation of [`ProblemContext`].
///
/// Backed by a real [`ExceptionRecord`] (first writer wins) and counts
/// every `set_exception` call so tests can tell recorded faults from
/// suppressed ones.
#[derive(Default)]
pub struct MockProblem {
    record: ExceptionRecord,
    lock: ExceptionLock,
    set_calls: AtomicUsize,
}

impl MockProblem {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded message, if any.
    pub fn message(&self) -> Option<String> {
        self.record.message()
    }

    /// How many times `set_exception` was called.
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    /// Faults dropped because one was already recorded.
    pub fn suppressed(&self) -> usize {
        self.record.suppressed()
    }

    /// Reset the record between traversals.
    pub fn clear(&self) {
        self.record.clear();
        self.set_calls.store(0, Ordering::SeqCst);
    }

    pub fn lock(&self) -> &ExceptionLock {
        &self.lock
    }
}

impl ProblemContext for MockProblem {
    fn has_exception(&self) -> bool {
        self.record.is_set()
    }

    fn set_exception(&self, message: String) -> bool {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.record.record(message)
    }

    fn exception_lock(&self) -> &ExceptionLock {
        &self.lock
    }
}

/// Mock implementation of [`SystemContext`] over a [`StructuredMesh`].
pub struct MockSystem {
    mesh: StructuredMesh,
    variables: Vec<VariableInfo>,
}

impl MockSystem {
    /// A system with the given mesh and no variables.
    pub fn new(mesh: StructuredMesh) -> Self {
        Self {
            mesh,
            variables: Vec::new(),
        }
    }

    /// A system over a uniform line mesh of `n` elements on `[0, 1]`.
    pub fn line(n: u32) -> Self {
        Self::new(StructuredMesh::line(n, 0.0, 1.0).expect("n > 0"))
    }

    /// Register a variable on the whole mesh. Builder style.
    pub fn with_variable(mut self, name: &str) -> Self {
        self.push_variable(name, None);
        self
    }

    /// Register a variable restricted to `subdomains`. Builder style.
    pub fn with_block_variable(mut self, name: &str, subdomains: Vec<SubdomainId>) -> Self {
        self.push_variable(name, Some(subdomains));
        self
    }

    fn push_variable(&mut self, name: &str, subdomains: Option<Vec<SubdomainId>>) {
        let id = VariableId(self.variables.len() as u32);
        self.variables.push(VariableInfo {
            id,
            name: name.to_string(),
            subdomains,
        });
    }

    pub fn structured_mesh(&self) -> &StructuredMesh {
        &self.mesh
    }
}

impl SystemContext for MockSystem {
    fn name(&self) -> &str {
        "mock"
    }

    fn mesh(&self) -> &dyn Mesh {
        &self.mesh
    }

    fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }
}
