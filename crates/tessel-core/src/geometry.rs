//! Points and gradients in physical space.
//!
//! Tessel always stores three components. Lower-dimensional meshes leave
//! the trailing components at zero.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Floating-point scalar used for field values.
pub type Real = f64;

/// A location in physical space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// x coordinate.
    pub x: Real,
    /// y coordinate.
    pub y: Real,
    /// z coordinate.
    pub z: Real,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Construct a point from three coordinates.
    pub const fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }

    /// Coordinates as an array, in `[x, y, z]` order.
    pub fn to_array(self) -> [Real; 3] {
        [self.x, self.y, self.z]
    }

    /// Component by axis index (0, 1, 2). Out-of-range axes read as zero.
    pub fn component(&self, axis: usize) -> Real {
        match axis {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => 0.0,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> Real {
        (*self - *other).norm()
    }

    /// Returns `true` if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Sub for Point {
    type Output = RealGradient;

    fn sub(self, rhs: Point) -> RealGradient {
        RealGradient::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<RealGradient> for Point {
    type Output = Point;

    fn add(self, rhs: RealGradient) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// A gradient (or any 3-vector) of a scalar field.
///
/// `RealGradient::default()` is the additive identity: every component is
/// exactly `0.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RealGradient {
    /// d/dx component.
    pub x: Real,
    /// d/dy component.
    pub y: Real,
    /// d/dz component.
    pub z: Real,
}

impl RealGradient {
    /// Construct a vector from three components.
    pub const fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns `true` if every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Dot product.
    pub fn dot(&self, other: &RealGradient) -> Real {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean norm.
    pub fn norm(&self) -> Real {
        self.dot(self).sqrt()
    }

    /// Returns `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for RealGradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

impl Add for RealGradient {
    type Output = RealGradient;

    fn add(self, rhs: RealGradient) -> RealGradient {
        RealGradient::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for RealGradient {
    fn add_assign(&mut self, rhs: RealGradient) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for RealGradient {
    type Output = RealGradient;

    fn sub(self, rhs: RealGradient) -> RealGradient {
        RealGradient::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<Real> for RealGradient {
    type Output = RealGradient;

    fn mul(self, rhs: Real) -> RealGradient {
        RealGradient::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for RealGradient {
    type Output = RealGradient;

    fn neg(self) -> RealGradient {
        RealGradient::new(-self.x, -self.y, -self.z)
    }
}
