//! Dual-representation 2D point.
//!
//! - `Point` keeps cartesian `(x, y)` and polar `(r, a)` in sync on every mutation,
//!   so ring code can think in radii/angles while clipping code thinks in x/y.
//! - Equality is by cartesian value only (the polar pair is derived).

use nalgebra::{Rotation2, Vector2};
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A 2D location stored both in cartesian and polar form.
///
/// Invariant: `x = r cos a`, `y = r sin a` (up to rounding) after every
/// constructor and mutator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Point {
    x: f64,
    y: f64,
    r: f64,
    a: f64,
}

impl Point {
    /// Cartesian constructor.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        let mut p = Self { x, y, r: 0.0, a: 0.0 };
        p.update_polar();
        p
    }

    /// Polar constructor. The radius is kept as given (it may be negative).
    #[inline]
    pub fn polar(r: f64, a: f64) -> Self {
        let mut p = Self { x: 0.0, y: 0.0, r, a };
        p.update_cartesian();
        p
    }

    #[inline]
    pub fn origin() -> Self {
        Self::default()
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }
    #[inline]
    pub fn r(&self) -> f64 {
        self.r
    }
    #[inline]
    pub fn a(&self) -> f64 {
        self.a
    }

    #[inline]
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    #[inline]
    pub fn to_vec(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.update_polar();
    }

    pub fn set_polar(&mut self, r: f64, a: f64) {
        self.r = r;
        self.a = a;
        self.update_cartesian();
    }

    /// Shift by `by` (cartesian add).
    pub fn translate(&mut self, by: Point) -> &mut Self {
        self.set_xy(self.x + by.x, self.y + by.y);
        self
    }

    /// Rotate counterclockwise by `angle` radians about `pivot`.
    pub fn rotate(&mut self, pivot: Point, angle: f64) -> &mut Self {
        let q = Rotation2::new(angle) * (self.to_vec() - pivot.to_vec()) + pivot.to_vec();
        self.set_xy(q.x, q.y);
        self
    }

    /// Uniform scaling along the radius (about the origin).
    pub fn scale(&mut self, k: f64) -> &mut Self {
        self.set_polar(self.r * k, self.a);
        self
    }

    #[inline]
    pub fn translated(mut self, by: Point) -> Self {
        self.translate(by);
        self
    }

    #[inline]
    pub fn rotated(mut self, pivot: Point, angle: f64) -> Self {
        self.rotate(pivot, angle);
        self
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn dist(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint of `self` and `other`.
    #[inline]
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    fn update_cartesian(&mut self) {
        self.x = self.r * self.a.cos();
        self.y = self.r * self.a.sin();
    }

    fn update_polar(&mut self) {
        self.r = self.x.hypot(self.y);
        self.a = self.y.atan2(self.x);
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.translate(rhs);
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.set_xy(self.x - rhs.x, self.y - rhs.y);
    }
}

/// Radius scaling: `p * k` keeps the angle and multiplies the radius.
impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, k: f64) -> Point {
        Point::polar(self.r * k, self.a)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(v: Vector2<f64>) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(p: Point) -> Self {
        p.to_vec()
    }
}
