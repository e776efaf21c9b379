//! Residual assembly as a concrete element operation.
//!
//! An [`ElementKernel`] computes local contributions for one element;
//! [`ResidualAssembly`] runs it inside the threaded loop, accumulating
//! into per-split dense scratch that is summed at join.

use smallvec::SmallVec;

use tessel_core::{ElementError, Point, Real, SubdomainId, VariableId};
use tessel_loop::{ElementOperation, SystemContext, VisitContext};
use tessel_mesh::Element;

/// Geometry and current solution on one element.
pub struct ElementData<'a> {
    /// The element being assembled.
    pub element: &'a Element,
    /// Node positions, in element node order.
    pub points: SmallVec<[Point; 8]>,
    /// Current solution of the kernel's variable at each node.
    pub u: SmallVec<[Real; 8]>,
    /// Signed length, area or volume. Always positive here: inverted
    /// elements are rejected before the kernel runs.
    pub measure: Real,
}

/// Local residual computation for one variable.
///
/// `compute` is called concurrently from many workers and must not
/// mutate shared state. It writes one contribution per element node into
/// `local`, which arrives zeroed and sized to the element's node count.
pub trait ElementKernel: Sync {
    /// Name used in fault messages.
    fn name(&self) -> &str;

    /// The variable whose residual this kernel contributes to.
    fn variable(&self) -> VariableId;

    /// Fill `local` with this element's contributions.
    fn compute(&self, data: &ElementData<'_>, local: &mut [Real]) -> Result<(), ElementError>;
}

/// Assembles a global residual vector for one kernel.
///
/// Each split owns a dense accumulator over all nodes, allocated on the
/// first element it visits; [`join()`](ElementOperation::join) adds the
/// sibling's accumulator into its own. Elements whose subdomain does not
/// carry the kernel's variable are skipped.
///
/// Faults raised here:
/// - [`ElementError::NegativeJacobian`] when the element's signed
///   measure is not positive.
/// - [`ElementError::NonFinite`] when the kernel produces NaN or
///   infinity.
/// - [`ElementError::EvaluationFailed`] when an element node has no
///   entry in the solution slice.
pub struct ResidualAssembly<'a, K: ElementKernel> {
    kernel: &'a K,
    system: &'a dyn SystemContext,
    solution: &'a [Real],
    n_nodes: usize,
    active: bool,
    local: SmallVec<[Real; 8]>,
    residual: Vec<Real>,
}

impl<'a, K: ElementKernel> ResidualAssembly<'a, K> {
    /// Assemble `kernel` over `system`'s mesh against `solution`, the
    /// kernel variable's nodal values.
    pub fn new(kernel: &'a K, system: &'a dyn SystemContext, solution: &'a [Real]) -> Self {
        Self {
            kernel,
            system,
            solution,
            n_nodes: system.mesh().n_nodes(),
            active: false,
            local: SmallVec::new(),
            residual: Vec::new(),
        }
    }

    /// The accumulated residual, one entry per node.
    pub fn into_residual(self) -> Vec<Real> {
        if self.residual.is_empty() {
            vec![0.0; self.n_nodes]
        } else {
            self.residual
        }
    }

    fn gather(&self, element: &Element) -> Result<SmallVec<[Real; 8]>, ElementError> {
        element
            .nodes()
            .iter()
            .map(|n| {
                self.solution.get(n.index()).copied().ok_or_else(|| {
                    ElementError::EvaluationFailed {
                        element: element.id(),
                        reason: format!(
                            "node {n} outside solution of length {}",
                            self.solution.len()
                        ),
                    }
                })
            })
            .collect()
    }
}

impl<K: ElementKernel> ElementOperation for ResidualAssembly<'_, K> {
    fn fork(&self) -> Self {
        Self::new(self.kernel, self.system, self.solution)
    }

    fn on_subdomain_changed(&mut self, subdomain: SubdomainId) {
        self.active = self
            .system
            .variable(self.kernel.variable())
            .is_some_and(|v| v.is_active_on(subdomain));
    }

    fn on_element(&mut self, ctx: &VisitContext<'_>, element: &Element) -> Result<(), ElementError> {
        if !self.active {
            return Ok(());
        }

        let mesh = ctx.mesh();
        let measure = mesh.signed_measure(element);
        if !(measure > 0.0) {
            return Err(ElementError::NegativeJacobian {
                element: element.id(),
                determinant: measure,
            });
        }

        let data = ElementData {
            element,
            points: mesh.element_points(element),
            u: self.gather(element)?,
            measure,
        };

        self.local.clear();
        self.local.resize(element.n_nodes(), 0.0);
        self.kernel.compute(&data, &mut self.local)?;
        if self.local.iter().any(|r| !r.is_finite()) {
            return Err(ElementError::NonFinite {
                element: element.id(),
                origin: self.kernel.name().to_string(),
            });
        }

        if self.residual.is_empty() {
            self.residual = vec![0.0; self.n_nodes];
        }
        for (node, r) in element.nodes().iter().zip(&self.local) {
            if let Some(slot) = self.residual.get_mut(node.index()) {
                *slot += r;
            }
        }
        Ok(())
    }

    fn join(&mut self, other: Self) {
        if other.residual.is_empty() {
            return;
        }
        if self.residual.is_empty() {
            self.residual = other.residual;
            return;
        }
        for (a, b) in self.residual.iter_mut().zip(other.residual) {
            *a += b;
        }
    }
}
