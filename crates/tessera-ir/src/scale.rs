//! Functions of the scale parameter `k`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// `slope * k + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinearFunction {
    pub slope: i64,
    pub offset: i64,
}

impl LinearFunction {
    pub const fn new(slope: i64, offset: i64) -> Self {
        Self { slope, offset }
    }

    /// A function that ignores `k`.
    pub const fn constant(value: i64) -> Self {
        Self::new(0, value)
    }

    pub fn eval(&self, k: u32) -> i64 {
        self.slope * i64::from(k) + self.offset
    }

    /// Evaluate and clamp to a non-negative size.
    pub fn eval_size(&self, k: u32) -> usize {
        usize::try_from(self.eval(k)).unwrap_or(0)
    }

    pub fn is_constant(&self) -> bool {
        self.slope == 0
    }
}

impl Add for LinearFunction {
    type Output = LinearFunction;

    fn add(self, rhs: LinearFunction) -> Self::Output {
        LinearFunction::new(self.slope + rhs.slope, self.offset + rhs.offset)
    }
}

impl Add<i64> for LinearFunction {
    type Output = LinearFunction;

    fn add(self, rhs: i64) -> Self::Output {
        LinearFunction::new(self.slope, self.offset + rhs)
    }
}

impl Mul<i64> for LinearFunction {
    type Output = LinearFunction;

    fn mul(self, rhs: i64) -> Self::Output {
        LinearFunction::new(self.slope * rhs, self.offset * rhs)
    }
}

impl fmt::Display for LinearFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.slope, self.offset) {
            (0, offset) => write!(f, "{offset}"),
            (slope, 0) => write!(f, "{slope}k"),
            (slope, offset) if offset < 0 => write!(f, "{slope}k - {}", -offset),
            (slope, offset) => write!(f, "{slope}k + {offset}"),
        }
    }
}

/// Width and height of a scalable 2D array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scalable2D {
    pub x: LinearFunction,
    pub y: LinearFunction,
}

impl Scalable2D {
    pub const fn new(x: LinearFunction, y: LinearFunction) -> Self {
        Self { x, y }
    }

    /// `(width, height)` at scale `k`.
    pub fn to_shape(&self, k: u32) -> (usize, usize) {
        (self.x.eval_size(k), self.y.eval_size(k))
    }
}

impl fmt::Display for Scalable2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_function_eval() {
        let f = LinearFunction::new(2, 2);
        assert_eq!(f.eval(0), 2);
        assert_eq!(f.eval(3), 8);
        assert_eq!(LinearFunction::new(2, -1).eval(1), 1);
        assert_eq!(LinearFunction::new(-1, 0).eval_size(4), 0);
    }

    #[test]
    fn test_linear_function_arithmetic() {
        let f = LinearFunction::new(2, 2) + LinearFunction::constant(-1);
        assert_eq!(f, LinearFunction::new(2, 1));
        assert_eq!(f * 3, LinearFunction::new(6, 3));
        assert_eq!(f + 1, LinearFunction::new(2, 2));
    }

    #[test]
    fn test_linear_function_display() {
        assert_eq!(LinearFunction::new(2, 2).to_string(), "2k + 2");
        assert_eq!(LinearFunction::new(2, -1).to_string(), "2k - 1");
        assert_eq!(LinearFunction::constant(4).to_string(), "4");
        assert_eq!(LinearFunction::new(3, 0).to_string(), "3k");
    }

    #[test]
    fn test_scalable_shape() {
        let s = Scalable2D::new(LinearFunction::constant(2), LinearFunction::new(2, 2));
        assert_eq!(s.to_shape(2), (2, 6));
    }
}
