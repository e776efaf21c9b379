//! A spatially uniform initial condition.

use crate::initial_condition::{IcBase, InitialCondition};
use tessel_core::{IcError, ParamKind, ParamSchema, Point, Real, ValidParams};
use tessel_loop::SystemContext;

/// Sets the variable to `value` everywhere.
#[derive(Clone, Debug)]
pub struct ConstantIc {
    base: IcBase,
    value: Real,
}

impl ConstantIc {
    /// Registered type name.
    pub const TYPE_NAME: &'static str = "ConstantIC";

    /// Accepted parameters: [`IcBase::schema()`] plus a required `value`.
    pub fn valid_params() -> ParamSchema {
        IcBase::schema().required("value", ParamKind::Real, "The value to be set")
    }

    /// Construct from parameters validated against [`valid_params()`](Self::valid_params).
    pub fn new(
        name: impl Into<String>,
        system: &dyn SystemContext,
        params: ValidParams,
    ) -> Result<Self, IcError> {
        let base = IcBase::new(name, system, params)?;
        let value = base.real("value")?;
        Ok(Self { base, value })
    }
}

impl InitialCondition for ConstantIc {
    fn base(&self) -> &IcBase {
        &self.base
    }

    fn value(&self, _p: &Point) -> Real {
        self.value
    }
}
