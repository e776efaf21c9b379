//! The [`InitialCondition`] trait and the state every condition shares.

use tessel_core::{
    IcError, InputParameters, ParamError, ParamKind, ParamSchema, ParamValue, Point, Real,
    RealGradient, SubdomainId, ValidParams, VariableId,
};
use tessel_loop::SystemContext;

/// A variable's starting value and gradient as functions of position.
///
/// # Concurrency
///
/// `value()` and `gradient()` are called from every worker of a
/// projection traversal at once, in no particular element order. They
/// must be pure: the same point always yields the same result, and no
/// shared mutable state is touched without internal synchronization.
///
/// # Gradient
///
/// The default `gradient()` is the zero vector. A condition that
/// computes a real gradient overrides it and returns `true` from
/// [`provides_gradient()`](Self::provides_gradient), so callers that
/// need C1 data can tell "zero because unset" from "computed zero".
pub trait InitialCondition: Send + Sync {
    /// Shared construction-time state.
    fn base(&self) -> &IcBase;

    /// The name given to this condition at construction.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// The variable this condition seeds.
    fn variable(&self) -> VariableId {
        self.base().variable()
    }

    /// The subdomain this condition is restricted to, or `None` for the
    /// whole mesh.
    fn subdomain(&self) -> Option<SubdomainId> {
        self.base().subdomain()
    }

    /// The value at `p`.
    fn value(&self, p: &Point) -> Real;

    /// The gradient at `p`. Zero unless overridden.
    fn gradient(&self, _p: &Point) -> RealGradient {
        RealGradient::zero()
    }

    /// Whether `gradient()` is computed rather than the zero default.
    fn provides_gradient(&self) -> bool {
        false
    }
}

/// Name, target variable, subdomain and parameters of one condition.
///
/// Every library condition embeds an `IcBase` and exposes it through
/// [`InitialCondition::base()`]. The parameters must already have been
/// validated against a schema that extends [`IcBase::schema()`].
#[derive(Clone, Debug)]
pub struct IcBase {
    name: String,
    variable: VariableId,
    subdomain: Option<SubdomainId>,
    params: ValidParams,
}

impl IcBase {
    /// Parameters every initial condition accepts.
    ///
    /// - `variable` (string, required): the variable to seed.
    /// - `block` (integer, default `-1`): restrict to one subdomain;
    ///   `-1` means the whole mesh.
    pub fn schema() -> ParamSchema {
        ParamSchema::new()
            .required("variable", ParamKind::Str, "The variable this condition seeds")
            .optional("block", -1i64, "Subdomain to restrict to, or -1 for all")
            .check(check_block)
    }

    /// Bind validated parameters to `system`.
    ///
    /// Resolves the `variable` name against the system's variable table.
    pub fn new(
        name: impl Into<String>,
        system: &dyn SystemContext,
        params: ValidParams,
    ) -> Result<Self, IcError> {
        let name = name.into();
        let wrap = |reason: ParamError| IcError::Params {
            name: name.clone(),
            reason,
        };

        let var_name = params.str("variable").map_err(wrap)?;
        let variable = system
            .variable_by_name(var_name)
            .ok_or_else(|| IcError::UnknownVariable {
                variable: var_name.to_string(),
            })?
            .id;

        // Range checked by `check_block`.
        let block = params.int("block").map_err(wrap)?;
        let subdomain = if block < 0 {
            None
        } else {
            Some(SubdomainId(block as u16))
        };

        Ok(Self {
            name,
            variable,
            subdomain,
            params,
        })
    }

    /// The condition's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The seeded variable.
    pub fn variable(&self) -> VariableId {
        self.variable
    }

    /// The subdomain restriction.
    pub fn subdomain(&self) -> Option<SubdomainId> {
        self.subdomain
    }

    /// The validated parameters.
    pub fn params(&self) -> &ValidParams {
        &self.params
    }

    /// Read a real parameter, attributing failures to this condition.
    pub fn real(&self, key: &str) -> Result<Real, IcError> {
        self.params.real(key).map_err(|reason| self.param_error(reason))
    }

    /// Read an integer parameter, attributing failures to this condition.
    pub fn int(&self, key: &str) -> Result<i64, IcError> {
        self.params.int(key).map_err(|reason| self.param_error(reason))
    }

    fn param_error(&self, reason: ParamError) -> IcError {
        IcError::Params {
            name: self.name.clone(),
            reason,
        }
    }
}

fn check_block(params: &InputParameters) -> Result<(), ParamError> {
    match params.get("block") {
        Some(ParamValue::Int(b)) if *b < -1 || *b > u16::MAX as i64 => {
            Err(ParamError::OutOfRange {
                name: "block".to_string(),
                reason: format!("{b} is neither -1 nor a subdomain id"),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_loop::VariableInfo;
    use tessel_mesh::{Mesh, StructuredMesh};

    struct System {
        mesh: StructuredMesh,
        vars: Vec<VariableInfo>,
    }

    impl SystemContext for System {
        fn name(&self) -> &str {
            "unit"
        }

        fn mesh(&self) -> &dyn Mesh {
            &self.mesh
        }

        fn variables(&self) -> &[VariableInfo] {
            &self.vars
        }
    }

    fn system() -> System {
        System {
            mesh: StructuredMesh::line(2, 0.0, 1.0).unwrap(),
            vars: vec![
                VariableInfo {
                    id: VariableId(0),
                    name: "u".into(),
                    subdomains: None,
                },
                VariableInfo {
                    id: VariableId(1),
                    name: "T".into(),
                    subdomains: None,
                },
            ],
        }
    }

    struct Zero(IcBase);

    impl InitialCondition for Zero {
        fn base(&self) -> &IcBase {
            &self.0
        }

        fn value(&self, _p: &Point) -> Real {
            0.0
        }
    }

    fn valid(raw: InputParameters) -> ValidParams {
        IcBase::schema().validate(&raw).unwrap()
    }

    #[test]
    fn base_resolves_variable_by_name() {
        let sys = system();
        let base = IcBase::new("ic", &sys, valid(InputParameters::new().with("variable", "T")))
            .unwrap();
        assert_eq!(base.variable(), VariableId(1));
        assert_eq!(base.subdomain(), None);
        assert_eq!(base.name(), "ic");
    }

    #[test]
    fn block_restricts_subdomain() {
        let sys = system();
        let raw = InputParameters::new().with("variable", "u").with("block", 3i64);
        let base = IcBase::new("ic", &sys, valid(raw)).unwrap();
        assert_eq!(base.subdomain(), Some(SubdomainId(3)));
    }

    #[test]
    fn out_of_range_block_rejected_by_schema() {
        let raw = InputParameters::new().with("variable", "u").with("block", -5i64);
        let err = IcBase::schema().validate(&raw).unwrap_err();
        assert!(matches!(err, ParamError::OutOfRange { .. }));
    }

    #[test]
    fn unknown_variable_rejected() {
        let sys = system();
        let err = IcBase::new("ic", &sys, valid(InputParameters::new().with("variable", "p")))
            .unwrap_err();
        assert_eq!(
            err,
            IcError::UnknownVariable {
                variable: "p".into()
            }
        );
    }

    #[test]
    fn default_gradient_is_zero_and_not_provided() {
        let sys = system();
        let ic = Zero(
            IcBase::new("z", &sys, valid(InputParameters::new().with("variable", "u"))).unwrap(),
        );
        for p in [Point::ORIGIN, Point::new(1.0, -2.0, 3.5), Point::new(1e9, 0.0, -1e-9)] {
            assert!(ic.gradient(&p).is_zero());
        }
        assert!(!ic.provides_gradient());
        assert_eq!(ic.name(), "z");
        assert_eq!(ic.variable(), VariableId(0));
    }
}
