//! Uniform random initial condition, deterministic per point.
//!
//! The RNG is a ChaCha8 stream seeded from the user seed mixed with the
//! bit pattern of the point's coordinates. The same point and seed give
//! the same value on any thread, in any traversal order, with any pool
//! size, so every element touching a node projects the same value there.

use crate::initial_condition::{IcBase, InitialCondition};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tessel_core::{
    IcError, InputParameters, ParamError, ParamSchema, ParamValue, Point, Real, ValidParams,
};
use tessel_loop::SystemContext;

/// Uniform values in `[min, max)`.
#[derive(Clone, Debug)]
pub struct RandomIc {
    base: IcBase,
    min: Real,
    max: Real,
    seed: u64,
}

impl RandomIc {
    /// Registered type name.
    pub const TYPE_NAME: &'static str = "RandomIC";

    /// Accepted parameters: [`IcBase::schema()`] plus `min`, `max`, `seed`.
    pub fn valid_params() -> ParamSchema {
        IcBase::schema()
            .optional("min", 0.0, "Lower bound of the randomly generated values")
            .optional("max", 1.0, "Upper bound of the randomly generated values")
            .optional("seed", 0i64, "Seed value for the random number generator")
            .check(check_bounds)
    }

    /// Construct from parameters validated against [`valid_params()`](Self::valid_params).
    pub fn new(
        name: impl Into<String>,
        system: &dyn SystemContext,
        params: ValidParams,
    ) -> Result<Self, IcError> {
        let base = IcBase::new(name, system, params)?;
        let min = base.real("min")?;
        let max = base.real("max")?;
        // Negative seeds are reinterpreted bitwise.
        let seed = base.int("seed")? as u64;
        Ok(Self {
            base,
            min,
            max,
            seed,
        })
    }

    fn stream(&self, p: &Point) -> ChaCha8Rng {
        let mut key = self.seed;
        for c in p.to_array() {
            // +0.0 and -0.0 name the same node.
            let bits = if c == 0.0 { 0 } else { c.to_bits() };
            key = mix(key ^ bits);
        }
        ChaCha8Rng::seed_from_u64(key)
    }
}

impl InitialCondition for RandomIc {
    fn base(&self) -> &IcBase {
        &self.base
    }

    fn value(&self, p: &Point) -> Real {
        self.stream(p).random_range(self.min..self.max)
    }
}

/// SplitMix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn check_bounds(params: &InputParameters) -> Result<(), ParamError> {
    if let (Some(ParamValue::Real(min)), Some(ParamValue::Real(max))) =
        (params.get("min"), params.get("max"))
    {
        if !(min.is_finite() && max.is_finite() && min < max && (max - min).is_finite()) {
            return Err(ParamError::OutOfRange {
                name: "max".to_string(),
                reason: format!("need finite min < max, got min = {min}, max = {max}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tessel_test_utils::MockSystem;

    fn random_ic(min: Real, max: Real, seed: i64) -> RandomIc {
        let sys = MockSystem::line(2).with_variable("u");
        let raw = InputParameters::new()
            .with("variable", "u")
            .with("min", min)
            .with("max", max)
            .with("seed", seed);
        let params = RandomIc::valid_params().validate(&raw).unwrap();
        RandomIc::new("r", &sys, params).unwrap()
    }

    #[test]
    fn same_point_same_value() {
        let ic = random_ic(0.0, 1.0, 7);
        let p = Point::new(0.25, 0.5, 0.0);
        assert_eq!(ic.value(&p).to_bits(), ic.value(&p).to_bits());
    }

    #[test]
    fn signed_zero_is_one_point() {
        let ic = random_ic(0.0, 1.0, 7);
        assert_eq!(
            ic.value(&Point::new(0.0, 0.0, 0.0)),
            ic.value(&Point::new(-0.0, 0.0, -0.0))
        );
    }

    #[test]
    fn seed_changes_the_field() {
        let a = random_ic(0.0, 1.0, 1);
        let b = random_ic(0.0, 1.0, 2);
        let differs = (0..32)
            .map(|i| Point::new(i as Real * 0.1, 0.0, 0.0))
            .any(|p| a.value(&p) != b.value(&p));
        assert!(differs);
    }

    #[test]
    fn inverted_bounds_rejected() {
        let raw = InputParameters::new()
            .with("variable", "u")
            .with("min", 2.0)
            .with("max", 1.0);
        assert!(RandomIc::valid_params().validate(&raw).is_err());
    }

    #[test]
    fn value_matches_a_freshly_seeded_stream() {
        let ic = random_ic(-1.0, 1.0, 11);
        let p = Point::new(0.5, 0.0, 0.0);
        let expected: Real = ic.stream(&p).random_range(-1.0..1.0);
        assert_eq!(ic.value(&p).to_bits(), expected.to_bits());
    }

    #[test]
    fn overflowing_width_rejected() {
        let raw = InputParameters::new()
            .with("variable", "u")
            .with("min", -Real::MAX)
            .with("max", Real::MAX);
        assert!(RandomIc::valid_params().validate(&raw).is_err());
    }

    proptest! {
        #[test]
        fn values_stay_in_bounds(
            x in -1e6f64..1e6,
            y in -1e6f64..1e6,
            seed in any::<i64>(),
        ) {
            let ic = random_ic(-2.0, 3.0, seed);
            let v = ic.value(&Point::new(x, y, 0.0));
            prop_assert!((-2.0..3.0).contains(&v));
        }
    }
}
