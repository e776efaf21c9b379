//! The variable system: mesh, variable table and nodal solution.

use indexmap::IndexMap;

use crate::config::VariableConfig;
use tessel_core::{NodeId, Real, RealGradient, VariableId};
use tessel_ics::NodalValue;
use tessel_loop::{SystemContext, VariableInfo};
use tessel_mesh::Mesh;

/// A set of nodal field variables over one mesh.
///
/// The solution stores one value per node per variable, variable-major:
/// the value of variable `v` at node `n` lives at `v * n_nodes + n`.
/// Nodal gradients are stored alongside and stay zero unless an initial
/// condition provided them.
pub struct NonlinearSystem {
    name: String,
    mesh: Box<dyn Mesh>,
    variables: Vec<VariableInfo>,
    by_name: IndexMap<String, VariableId>,
    solution: Vec<Real>,
    gradients: Vec<RealGradient>,
}

impl NonlinearSystem {
    /// A system named `name` over `mesh` with the given variables, in id
    /// order. The solution starts at zero.
    ///
    /// Variable names are assumed unique; see
    /// [`ProblemConfig::validate()`](crate::config::ProblemConfig::validate).
    pub fn new(name: impl Into<String>, mesh: Box<dyn Mesh>, variables: &[VariableConfig]) -> Self {
        let variables: Vec<VariableInfo> = variables
            .iter()
            .enumerate()
            .map(|(i, v)| VariableInfo {
                id: VariableId(i as u32),
                name: v.name.clone(),
                subdomains: v.subdomains.clone(),
            })
            .collect();
        let by_name = variables.iter().map(|v| (v.name.clone(), v.id)).collect();
        let n_dofs = mesh.n_nodes() * variables.len();
        Self {
            name: name.into(),
            mesh,
            variables,
            by_name,
            solution: vec![0.0; n_dofs],
            gradients: vec![RealGradient::zero(); n_dofs],
        }
    }

    /// Total degrees of freedom.
    pub fn n_dofs(&self) -> usize {
        self.solution.len()
    }

    fn dof(&self, variable: VariableId, node: NodeId) -> Option<usize> {
        let n_nodes = self.mesh.n_nodes();
        if variable.0 as usize >= self.variables.len() || node.index() >= n_nodes {
            return None;
        }
        Some(variable.0 as usize * n_nodes + node.index())
    }

    /// The value of `variable` at `node`.
    pub fn value(&self, variable: VariableId, node: NodeId) -> Option<Real> {
        self.dof(variable, node).map(|i| self.solution[i])
    }

    /// The stored gradient of `variable` at `node`.
    pub fn gradient(&self, variable: VariableId, node: NodeId) -> Option<RealGradient> {
        self.dof(variable, node).map(|i| self.gradients[i])
    }

    /// Overwrite one nodal value. Returns `false` if either id is out of
    /// range.
    pub fn set_value(&mut self, variable: VariableId, node: NodeId, value: Real) -> bool {
        match self.dof(variable, node) {
            Some(i) => {
                self.solution[i] = value;
                true
            }
            None => false,
        }
    }

    /// The whole solution vector.
    pub fn solution(&self) -> &[Real] {
        &self.solution
    }

    /// The nodal values of one variable.
    pub fn variable_values(&self, variable: VariableId) -> Option<&[Real]> {
        let n_nodes = self.mesh.n_nodes();
        let start = variable.0 as usize * n_nodes;
        self.solution.get(start..start + n_nodes)
    }

    /// Write projected initial values into the solution. Returns how many
    /// entries were written; entries with out-of-range ids are skipped.
    /// A value without a gradient resets the stored gradient to zero.
    pub(crate) fn commit(&mut self, values: &[NodalValue]) -> usize {
        let mut written = 0;
        for v in values {
            if let Some(i) = self.dof(v.variable, v.node) {
                self.solution[i] = v.value;
                self.gradients[i] = v.gradient.unwrap_or(RealGradient::zero());
                written += 1;
            }
        }
        written
    }
}

impl SystemContext for NonlinearSystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn mesh(&self) -> &dyn Mesh {
        self.mesh.as_ref()
    }

    fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    fn variable_by_name(&self, name: &str) -> Option<&VariableInfo> {
        self.by_name.get(name).and_then(|id| self.variable(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::SubdomainId;
    use tessel_mesh::StructuredMesh;

    fn system() -> NonlinearSystem {
        let vars = [
            VariableConfig {
                name: "u".into(),
                subdomains: None,
            },
            VariableConfig {
                name: "T".into(),
                subdomains: Some(vec![SubdomainId(0)]),
            },
        ];
        NonlinearSystem::new(
            "nl",
            Box::new(StructuredMesh::line(4, 0.0, 1.0).unwrap()),
            &vars,
        )
    }

    #[test]
    fn solution_is_variable_major_and_zeroed() {
        let sys = system();
        assert_eq!(sys.n_dofs(), 10);
        assert!(sys.solution().iter().all(|&v| v == 0.0));
        assert_eq!(sys.variable_values(VariableId(1)).unwrap().len(), 5);
        assert!(sys.variable_values(VariableId(2)).is_none());
    }

    #[test]
    fn lookup_by_name_uses_index() {
        let sys = system();
        assert_eq!(sys.variable_by_name("T").unwrap().id, VariableId(1));
        assert!(sys.variable_by_name("p").is_none());
        assert_eq!(sys.name(), "nl");
    }

    #[test]
    fn set_value_bounds_checked() {
        let mut sys = system();
        assert!(sys.set_value(VariableId(1), NodeId(4), 2.5));
        assert_eq!(sys.solution()[9], 2.5);
        assert!(!sys.set_value(VariableId(1), NodeId(5), 1.0));
        assert!(!sys.set_value(VariableId(2), NodeId(0), 1.0));
    }

    #[test]
    fn commit_writes_values_and_gradients() {
        let mut sys = system();
        let g = RealGradient::new(1.0, 0.0, 0.0);
        let written = sys.commit(&[
            NodalValue {
                variable: VariableId(0),
                node: NodeId(1),
                value: 3.0,
                gradient: Some(g),
            },
            NodalValue {
                variable: VariableId(1),
                node: NodeId(2),
                value: -1.0,
                gradient: None,
            },
            NodalValue {
                variable: VariableId(0),
                node: NodeId(99),
                value: 7.0,
                gradient: None,
            },
        ]);
        assert_eq!(written, 2);
        assert_eq!(sys.value(VariableId(0), NodeId(1)), Some(3.0));
        assert_eq!(sys.gradient(VariableId(0), NodeId(1)), Some(g));
        assert_eq!(sys.value(VariableId(1), NodeId(2)), Some(-1.0));
        assert!(sys.gradient(VariableId(1), NodeId(2)).unwrap().is_zero());
    }

    #[test]
    fn commit_without_gradient_clears_previous_one() {
        let mut sys = system();
        let at = |gradient| NodalValue {
            variable: VariableId(0),
            node: NodeId(1),
            value: 2.0,
            gradient,
        };
        sys.commit(&[at(Some(RealGradient::new(0.0, 4.0, 0.0)))]);
        assert!(!sys.gradient(VariableId(0), NodeId(1)).unwrap().is_zero());

        sys.commit(&[at(None)]);
        assert!(sys.gradient(VariableId(0), NodeId(1)).unwrap().is_zero());
    }
}
