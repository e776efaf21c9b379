//! Reusable element-operation fixtures.
//!
//! - [`CountingOperation`]: counts visits per element.
//! - [`RecordingOperation`]: records visit order.
//! - [`FailingOperation`]: counts visits and fails on chosen elements.
//! - [`PanickingOperation`]: panics on one element.
//! - [`HookPanicOperation`]: panics inside one loop hook.

use std::collections::BTreeSet;

use tessel_core::{ElementError, ElementId, SubdomainId};
use tessel_loop::{ElementOperation, VisitContext};
use tessel_mesh::Element;

/// Counts how many times each element is visited.
///
/// Per-element counts live in thread-local scratch and are summed at
/// join, so after a traversal `counts[i]` is the number of completed
/// visits of `ElementId(i)`.
pub struct CountingOperation {
    pub counts: Vec<u32>,
    pub leaves: usize,
    pub subdomain_changes: usize,
}

impl CountingOperation {
    pub fn new(n_elements: usize) -> Self {
        Self {
            counts: vec![0; n_elements],
            leaves: 0,
            subdomain_changes: 0,
        }
    }

    /// Total visits across all elements.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

impl ElementOperation for CountingOperation {
    fn fork(&self) -> Self {
        Self::new(self.counts.len())
    }

    fn pre(&mut self) {
        self.leaves += 1;
    }

    fn on_subdomain_changed(&mut self, _subdomain: SubdomainId) {
        self.subdomain_changes += 1;
    }

    fn on_element(&mut self, _ctx: &VisitContext<'_>, element: &Element) -> Result<(), ElementError> {
        self.counts[element.id().index()] += 1;
        Ok(())
    }

    fn join(&mut self, other: Self) {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self.leaves += other.leaves;
        self.subdomain_changes += other.subdomain_changes;
    }
}

/// Records element ids in visit order; join appends the right sibling.
#[derive(Default)]
pub struct RecordingOperation {
    pub order: Vec<ElementId>,
}

impl RecordingOperation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementOperation for RecordingOperation {
    fn fork(&self) -> Self {
        Self::new()
    }

    fn on_element(&mut self, _ctx: &VisitContext<'_>, element: &Element) -> Result<(), ElementError> {
        self.order.push(element.id());
        Ok(())
    }

    fn join(&mut self, other: Self) {
        self.order.extend(other.order);
    }
}

/// Counts completed visits and fails on every element in `fail_on`.
///
/// A failing visit is still a completed visit: it increments its count
/// before returning the error.
pub struct FailingOperation {
    pub fail_on: BTreeSet<ElementId>,
    pub counts: Vec<u32>,
}

impl FailingOperation {
    pub fn new(n_elements: usize, fail_on: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            fail_on: fail_on.into_iter().collect(),
            counts: vec![0; n_elements],
        }
    }

    /// Number of distinct elements visited at least once.
    pub fn distinct_visited(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

impl ElementOperation for FailingOperation {
    fn fork(&self) -> Self {
        Self {
            fail_on: self.fail_on.clone(),
            counts: vec![0; self.counts.len()],
        }
    }

    fn on_element(&mut self, _ctx: &VisitContext<'_>, element: &Element) -> Result<(), ElementError> {
        self.counts[element.id().index()] += 1;
        if self.fail_on.contains(&element.id()) {
            return Err(ElementError::EvaluationFailed {
                element: element.id(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn join(&mut self, other: Self) {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
    }
}

/// Panics when it visits `panic_on`; otherwise counts visits.
pub struct PanickingOperation {
    pub panic_on: ElementId,
    pub visited: usize,
}

impl PanickingOperation {
    pub fn new(panic_on: ElementId) -> Self {
        Self {
            panic_on,
            visited: 0,
        }
    }
}

impl ElementOperation for PanickingOperation {
    fn fork(&self) -> Self {
        Self::new(self.panic_on)
    }

    fn on_element(&mut self, _ctx: &VisitContext<'_>, element: &Element) -> Result<(), ElementError> {
        if element.id() == self.panic_on {
            panic!("element {} exploded", element.id());
        }
        self.visited += 1;
        Ok(())
    }

    fn join(&mut self, other: Self) {
        self.visited += other.visited;
    }
}

/// Panics inside one named loop hook and counts element visits.
///
/// `hook` is one of `"fork"`, `"pre"`, `"on_subdomain_changed"`, `"post"`
/// or `"join"`.
pub struct HookPanicOperation {
    pub hook: &'static str,
    pub visited: usize,
}

impl HookPanicOperation {
    pub fn new(hook: &'static str) -> Self {
        Self { hook, visited: 0 }
    }

    fn trip(&self, hook: &str) {
        if self.hook == hook {
            panic!("{hook} exploded");
        }
    }
}

impl ElementOperation for HookPanicOperation {
    fn fork(&self) -> Self {
        self.trip("fork");
        Self::new(self.hook)
    }

    fn pre(&mut self) {
        self.trip("pre");
    }

    fn on_subdomain_changed(&mut self, _subdomain: SubdomainId) {
        self.trip("on_subdomain_changed");
    }

    fn on_element(&mut self, _ctx: &VisitContext<'_>, _element: &Element) -> Result<(), ElementError> {
        self.visited += 1;
        Ok(())
    }

    fn post(&mut self) {
        self.trip("post");
    }

    fn join(&mut self, other: Self) {
        self.visited += other.visited;
        self.trip("join");
    }
}
