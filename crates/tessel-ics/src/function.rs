//! Initial condition backed by user closures.

use std::fmt;
use std::sync::Arc;

use crate::initial_condition::{IcBase, InitialCondition};
use tessel_core::{IcError, ParamSchema, Point, Real, RealGradient, ValidParams};
use tessel_loop::SystemContext;

type ValueFn = Arc<dyn Fn(&Point) -> Real + Send + Sync>;
type GradientFn = Arc<dyn Fn(&Point) -> RealGradient + Send + Sync>;

/// Evaluates a closure for the value and, optionally, another for the
/// gradient.
///
/// Both closures are shared (`Arc`) so a registered constructor can hand
/// the same functions to several conditions. They are called from many
/// worker threads at once and must be pure.
///
/// # Examples
///
/// ```
/// use tessel_core::{InputParameters, Point, RealGradient};
/// use tessel_ics::{FunctionIc, InitialCondition};
/// use tessel_test_utils::MockSystem;
///
/// let sys = MockSystem::line(4).with_variable("u");
/// let params = FunctionIc::valid_params()
///     .validate(&InputParameters::new().with("variable", "u"))
///     .unwrap();
/// let ic = FunctionIc::new("quadratic", &sys, params, |p: &Point| p.x * p.x)
///     .unwrap()
///     .with_gradient(|p: &Point| RealGradient::new(2.0 * p.x, 0.0, 0.0));
///
/// assert_eq!(ic.value(&Point::new(3.0, 0.0, 0.0)), 9.0);
/// assert!(ic.provides_gradient());
/// ```
#[derive(Clone)]
pub struct FunctionIc {
    base: IcBase,
    value: ValueFn,
    gradient: Option<GradientFn>,
}

impl FunctionIc {
    /// Accepted parameters: exactly [`IcBase::schema()`].
    pub fn valid_params() -> ParamSchema {
        IcBase::schema()
    }

    /// Construct with a value closure and no gradient.
    pub fn new<F>(
        name: impl Into<String>,
        system: &dyn SystemContext,
        params: ValidParams,
        value: F,
    ) -> Result<Self, IcError>
    where
        F: Fn(&Point) -> Real + Send + Sync + 'static,
    {
        Ok(Self {
            base: IcBase::new(name, system, params)?,
            value: Arc::new(value),
            gradient: None,
        })
    }

    /// Attach a gradient closure. Builder style.
    pub fn with_gradient<G>(mut self, gradient: G) -> Self
    where
        G: Fn(&Point) -> RealGradient + Send + Sync + 'static,
    {
        self.gradient = Some(Arc::new(gradient));
        self
    }
}

impl fmt::Debug for FunctionIc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionIc")
            .field("base", &self.base)
            .field("gradient", &self.gradient.is_some())
            .finish_non_exhaustive()
    }
}

impl InitialCondition for FunctionIc {
    fn base(&self) -> &IcBase {
        &self.base
    }

    fn value(&self, p: &Point) -> Real {
        (self.value)(p)
    }

    fn gradient(&self, p: &Point) -> RealGradient {
        match &self.gradient {
            Some(g) => g(p),
            None => RealGradient::zero(),
        }
    }

    fn provides_gradient(&self) -> bool {
        self.gradient.is_some()
    }
}
