//! Registry that builds initial conditions by type name.

use indexmap::IndexMap;

use crate::bounding_box::BoundingBoxIc;
use crate::constant::ConstantIc;
use crate::initial_condition::InitialCondition;
use crate::random::RandomIc;
use tessel_core::{IcError, InputParameters, ParamSchema, ValidParams};
use tessel_loop::SystemContext;

/// Builds one initial condition from a name, a system and validated
/// parameters.
pub type IcConstructor = Box<
    dyn Fn(String, &dyn SystemContext, ValidParams) -> Result<Box<dyn InitialCondition>, IcError>
        + Send
        + Sync,
>;

struct Registration {
    schema: ParamSchema,
    build: IcConstructor,
}

/// Maps type names to a parameter schema and a constructor.
///
/// [`build()`](Self::build) validates the raw parameters against the
/// registered schema before calling the constructor, so constructors
/// only ever see well-formed parameters.
///
/// # Examples
///
/// ```
/// use tessel_core::{InputParameters, Point};
/// use tessel_ics::IcFactory;
/// use tessel_test_utils::MockSystem;
///
/// let sys = MockSystem::line(4).with_variable("u");
/// let factory = IcFactory::with_builtins();
/// let raw = InputParameters::new().with("variable", "u").with("value", 1.5);
/// let ic = factory.build("ConstantIC", "init_u", &sys, &raw).unwrap();
/// assert_eq!(ic.value(&Point::ORIGIN), 1.5);
/// ```
#[derive(Default)]
pub struct IcFactory {
    registry: IndexMap<String, Registration>,
}

impl IcFactory {
    /// An empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory with the library conditions registered:
    /// `ConstantIC`, `BoundingBoxIC` and `RandomIC`.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register(ConstantIc::TYPE_NAME, ConstantIc::valid_params(), |name, sys, p| {
            Ok(Box::new(ConstantIc::new(name, sys, p)?))
        });
        factory.register(
            BoundingBoxIc::TYPE_NAME,
            BoundingBoxIc::valid_params(),
            |name, sys, p| Ok(Box::new(BoundingBoxIc::new(name, sys, p)?)),
        );
        factory.register(RandomIc::TYPE_NAME, RandomIc::valid_params(), |name, sys, p| {
            Ok(Box::new(RandomIc::new(name, sys, p)?))
        });
        factory
    }

    /// Register (or replace) a type.
    pub fn register<F>(&mut self, type_name: impl Into<String>, schema: ParamSchema, build: F)
    where
        F: Fn(String, &dyn SystemContext, ValidParams) -> Result<Box<dyn InitialCondition>, IcError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.insert(
            type_name.into(),
            Registration {
                schema,
                build: Box::new(build),
            },
        );
    }

    /// Whether `type_name` is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.registry.contains_key(type_name)
    }

    /// The schema registered for `type_name`.
    pub fn schema(&self, type_name: &str) -> Option<&ParamSchema> {
        self.registry.get(type_name).map(|r| &r.schema)
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// Validate `raw` against the schema for `type_name` and construct.
    pub fn build(
        &self,
        type_name: &str,
        name: impl Into<String>,
        system: &dyn SystemContext,
        raw: &InputParameters,
    ) -> Result<Box<dyn InitialCondition>, IcError> {
        let name = name.into();
        let registration = self
            .registry
            .get(type_name)
            .ok_or_else(|| IcError::UnknownType {
                type_name: type_name.to_string(),
            })?;
        let params = registration
            .schema
            .validate(raw)
            .map_err(|reason| IcError::Params {
                name: name.clone(),
                reason,
            })?;
        log::debug!("building {type_name} '{name}'");
        (registration.build)(name, system, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::FunctionIc;
    use tessel_core::{ParamError, Point, VariableId};
    use tessel_test_utils::MockSystem;

    fn system() -> MockSystem {
        MockSystem::line(4).with_variable("u").with_variable("v")
    }

    #[test]
    fn builtins_registered_in_order() {
        let f = IcFactory::with_builtins();
        let names: Vec<&str> = f.type_names().collect();
        assert_eq!(names, vec!["ConstantIC", "BoundingBoxIC", "RandomIC"]);
        assert!(f.schema("RandomIC").unwrap().spec("seed").is_some());
    }

    #[test]
    fn unknown_type_reported() {
        let f = IcFactory::with_builtins();
        let err = f
            .build("GaussianIC", "g", &system(), &InputParameters::new())
            .err()
            .unwrap();
        assert_eq!(
            err,
            IcError::UnknownType {
                type_name: "GaussianIC".into()
            }
        );
    }

    #[test]
    fn validation_errors_carry_the_condition_name() {
        let f = IcFactory::with_builtins();
        let raw = InputParameters::new().with("variable", "u").with("valu", 1.0);
        let err = f.build("ConstantIC", "init", &system(), &raw).err().unwrap();
        assert_eq!(
            err,
            IcError::Params {
                name: "init".into(),
                reason: ParamError::Unknown {
                    name: "valu".into()
                },
            }
        );
    }

    #[test]
    fn builds_bound_to_the_named_variable() {
        let f = IcFactory::with_builtins();
        let raw = InputParameters::new()
            .with("variable", "v")
            .with("x1", 0.0)
            .with("x2", 0.5)
            .with("inside", 1.0);
        let ic = f.build("BoundingBoxIC", "half", &system(), &raw).unwrap();
        assert_eq!(ic.variable(), VariableId(1));
        assert_eq!(ic.value(&Point::new(0.25, 0.0, 0.0)), 1.0);
        assert_eq!(ic.value(&Point::new(0.75, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn custom_function_registration() {
        let mut f = IcFactory::new();
        f.register("LinearIC", FunctionIc::valid_params(), |name, sys, p| {
            Ok(Box::new(FunctionIc::new(name, sys, p, |pt: &Point| 2.0 * pt.x)?))
        });
        let raw = InputParameters::new().with("variable", "u");
        let ic = f.build("LinearIC", "lin", &system(), &raw).unwrap();
        assert_eq!(ic.value(&Point::new(0.5, 0.0, 0.0)), 1.0);
        assert_eq!(ic.name(), "lin");
    }
}
