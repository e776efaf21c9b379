//! The collection of initial conditions applied in one projection.

use crate::initial_condition::InitialCondition;
use tessel_core::{IcError, SubdomainId, VariableId};

/// Initial conditions keyed by `(variable, subdomain)`.
///
/// At most one condition may target a given variable on a given
/// subdomain. A whole-mesh condition (`subdomain() == None`) conflicts
/// with every other condition on the same variable.
#[derive(Default)]
pub struct IcSet {
    ics: Vec<Box<dyn InitialCondition>>,
}

impl IcSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, rejecting overlaps with one already present.
    pub fn add(&mut self, ic: Box<dyn InitialCondition>) -> Result<(), IcError> {
        let clash = self.ics.iter().any(|existing| {
            existing.variable() == ic.variable()
                && match (existing.subdomain(), ic.subdomain()) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                }
        });
        if clash {
            return Err(IcError::Duplicate {
                variable: ic.variable(),
                name: ic.name().to_string(),
            });
        }
        self.ics.push(ic);
        Ok(())
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.ics.len()
    }

    /// Returns `true` if the set holds no conditions.
    pub fn is_empty(&self) -> bool {
        self.ics.is_empty()
    }

    /// Conditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn InitialCondition> {
        self.ics.iter().map(|ic| ic.as_ref())
    }

    /// The condition at insertion index `index`.
    pub fn get(&self, index: usize) -> Option<&dyn InitialCondition> {
        self.ics.get(index).map(|ic| ic.as_ref())
    }

    /// The condition seeding `variable` on `subdomain`, if any.
    pub fn find(&self, variable: VariableId, subdomain: SubdomainId) -> Option<&dyn InitialCondition> {
        self.iter().find(|ic| {
            ic.variable() == variable && ic.subdomain().map_or(true, |s| s == subdomain)
        })
    }
}
