/*!
A minimal immutable integer 2D vector, used for grid positions and offsets.
*/

use std::{fmt, ops};

/// An immutable 2D integer point.
///
/// All arithmetic returns a new value; a `Vec2` is never mutated in place.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// Horizontal component, in grid columns.
    pub x: i32,
    /// Vertical component, in grid rows, growing downwards.
    pub y: i32,
}

impl Vec2 {
    /// The origin, `(0; 0)`.
    pub const ZERO: Self = Self::of(0, 0);
    /// One cell down, the direction of gravity.
    pub const DOWN: Self = Self::of(0, 1);
    /// One cell to the left.
    pub const LEFT: Self = Self::of(-1, 0);
    /// One cell to the right.
    pub const RIGHT: Self = Self::of(1, 0);

    /// Creates a vector from its components.
    pub const fn of(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Self) -> Self::Output {
        Vec2::of(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Mul<i32> for Vec2 {
    type Output = Vec2;

    fn mul(self, factor: i32) -> Self::Output {
        Vec2::of(self.x * factor, self.y * factor)
    }
}

impl ops::Div<i32> for Vec2 {
    type Output = Vec2;

    /// Componentwise integer division.
    ///
    /// # Panics
    /// Panics when `dividend == 0`; calling this with zero is a programming
    /// error, not a recoverable condition.
    fn div(self, dividend: i32) -> Self::Output {
        assert!(dividend != 0, "attempt to divide Vec2 by zero");
        Vec2::of(self.x / dividend, self.y / dividend)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}; {})", self.x, self.y)
    }
}
