use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable position in image space.
///
/// Coordinates are stored as `f64` so integer pixel positions and sub-pixel
/// mouse positions can be mixed freely.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: impl Into<f64>, y: impl Into<f64>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Scale both coordinates by `factor`. Any factor is accepted, including zero and negatives.
    pub fn resize(&self, factor: impl Into<f64>) -> Self {
        let factor = factor.into();
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl<X: Into<f64>, Y: Into<f64>> From<(X, Y)> for Point {
    fn from((x, y): (X, Y)) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        p.coords()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
