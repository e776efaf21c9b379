//! Parallel evaluation of initial conditions at mesh nodes.

use smallvec::SmallVec;

use crate::initial_condition::InitialCondition;
use crate::set::IcSet;
use tessel_core::{ElementError, NodeId, Real, RealGradient, SubdomainId, VariableId};
use tessel_loop::{ElementOperation, SystemContext, VisitContext};
use tessel_mesh::Element;

/// One evaluated nodal value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodalValue {
    /// The seeded variable.
    pub variable: VariableId,
    /// The node the value belongs to.
    pub node: NodeId,
    /// The initial value.
    pub value: Real,
    /// The initial gradient, present only for conditions that compute one.
    pub gradient: Option<RealGradient>,
}

/// Evaluates every applicable initial condition at the nodes of each
/// visited element.
///
/// A condition applies to an element when its variable is active on the
/// element's subdomain and its own subdomain restriction (if any)
/// matches. The applicable set is recomputed only when the traversal
/// crosses a subdomain boundary.
///
/// Results accumulate in per-split scratch and are concatenated at join.
/// A node shared by several elements appears once per element; since
/// conditions are pure the duplicates agree, and
/// [`into_values()`](Self::into_values) keeps one.
///
/// A non-finite value or gradient fails the element with
/// [`ElementError::NonFinite`].
pub struct ProjectInitialCondition<'a> {
    ics: &'a IcSet,
    system: &'a dyn SystemContext,
    active: SmallVec<[&'a dyn InitialCondition; 4]>,
    values: Vec<NodalValue>,
}

impl<'a> ProjectInitialCondition<'a> {
    /// A projection of `ics` over `system`.
    pub fn new(ics: &'a IcSet, system: &'a dyn SystemContext) -> Self {
        Self {
            ics,
            system,
            active: SmallVec::new(),
            values: Vec::new(),
        }
    }

    /// Values evaluated so far, in join order.
    pub fn values(&self) -> &[NodalValue] {
        &self.values
    }

    /// Evaluated values sorted by `(variable, node)`, one per pair.
    pub fn into_values(self) -> Vec<NodalValue> {
        let mut values = self.values;
        values.sort_by_key(|v| (v.variable, v.node));
        values.dedup_by_key(|v| (v.variable, v.node));
        values
    }
}

impl ElementOperation for ProjectInitialCondition<'_> {
    fn fork(&self) -> Self {
        Self::new(self.ics, self.system)
    }

    fn on_subdomain_changed(&mut self, subdomain: SubdomainId) {
        let (ics, system) = (self.ics, self.system);
        self.active.clear();
        self.active.extend(ics.iter().filter(|ic| {
            let on_block = ic.subdomain().map_or(true, |s| s == subdomain);
            let var_active = system
                .variable(ic.variable())
                .is_some_and(|v| v.is_active_on(subdomain));
            on_block && var_active
        }));
    }

    fn on_element(&mut self, ctx: &VisitContext<'_>, element: &Element) -> Result<(), ElementError> {
        let mesh = ctx.mesh();
        for ic in &self.active {
            for &node in element.nodes() {
                let p = mesh.node(node).ok_or_else(|| ElementError::EvaluationFailed {
                    element: element.id(),
                    reason: format!("node {node} has no coordinates"),
                })?;

                let value = ic.value(&p);
                if !value.is_finite() {
                    return Err(ElementError::NonFinite {
                        element: element.id(),
                        origin: ic.name().to_string(),
                    });
                }

                let gradient = if ic.provides_gradient() {
                    let g = ic.gradient(&p);
                    if !g.is_finite() {
                        return Err(ElementError::NonFinite {
                            element: element.id(),
                            origin: format!("{} gradient", ic.name()),
                        });
                    }
                    Some(g)
                } else {
                    None
                };

                self.values.push(NodalValue {
                    variable: ic.variable(),
                    node,
                    value,
                    gradient,
                });
            }
        }
        Ok(())
    }

    fn join(&mut self, other: Self) {
        self.values.extend(other.values);
    }
}
