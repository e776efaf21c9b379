//! Piecewise-constant initial condition over an axis-aligned box.

use crate::initial_condition::{IcBase, InitialCondition};
use tessel_core::{
    IcError, InputParameters, ParamError, ParamKind, ParamSchema, ParamValue, Point, Real,
    ValidParams,
};
use tessel_loop::SystemContext;

/// `inside` within the closed box `[lower, upper]`, `outside` elsewhere.
///
/// In 1D and 2D the unused `z` (and `y`) bounds default to zero, so
/// points on the `z = 0` plane fall inside.
#[derive(Clone, Debug)]
pub struct BoundingBoxIc {
    base: IcBase,
    lower: Point,
    upper: Point,
    inside: Real,
    outside: Real,
}

impl BoundingBoxIc {
    /// Registered type name.
    pub const TYPE_NAME: &'static str = "BoundingBoxIC";

    /// Accepted parameters: [`IcBase::schema()`] plus the box corners and
    /// the two values.
    pub fn valid_params() -> ParamSchema {
        IcBase::schema()
            .required("x1", ParamKind::Real, "The x coordinate of the lower left-hand corner of the box")
            .optional("y1", 0.0, "The y coordinate of the lower left-hand corner of the box")
            .optional("z1", 0.0, "The z coordinate of the lower left-hand corner of the box")
            .required("x2", ParamKind::Real, "The x coordinate of the upper right-hand corner of the box")
            .optional("y2", 0.0, "The y coordinate of the upper right-hand corner of the box")
            .optional("z2", 0.0, "The z coordinate of the upper right-hand corner of the box")
            .optional("inside", 0.0, "The value of the variable inside the box")
            .optional("outside", 0.0, "The value of the variable outside the box")
            .check(check_corners)
    }

    /// Construct from parameters validated against [`valid_params()`](Self::valid_params).
    pub fn new(
        name: impl Into<String>,
        system: &dyn SystemContext,
        params: ValidParams,
    ) -> Result<Self, IcError> {
        let base = IcBase::new(name, system, params)?;
        let lower = Point::new(base.real("x1")?, base.real("y1")?, base.real("z1")?);
        let upper = Point::new(base.real("x2")?, base.real("y2")?, base.real("z2")?);
        let inside = base.real("inside")?;
        let outside = base.real("outside")?;
        Ok(Self {
            base,
            lower,
            upper,
            inside,
            outside,
        })
    }

    /// Whether `p` lies in the closed box.
    pub fn contains(&self, p: &Point) -> bool {
        (0..3).all(|axis| {
            let v = p.component(axis);
            v >= self.lower.component(axis) && v <= self.upper.component(axis)
        })
    }
}

impl InitialCondition for BoundingBoxIc {
    fn base(&self) -> &IcBase {
        &self.base
    }

    fn value(&self, p: &Point) -> Real {
        if self.contains(p) {
            self.inside
        } else {
            self.outside
        }
    }
}

fn check_corners(params: &InputParameters) -> Result<(), ParamError> {
    for (lo, hi) in [("x1", "x2"), ("y1", "y2"), ("z1", "z2")] {
        if let (Some(ParamValue::Real(a)), Some(ParamValue::Real(b))) =
            (params.get(lo), params.get(hi))
        {
            if !(a <= b) {
                return Err(ParamError::OutOfRange {
                    name: hi.to_string(),
                    reason: format!("{hi} = {b} is below {lo} = {a}"),
                });
            }
        }
    }
    Ok(())
}
