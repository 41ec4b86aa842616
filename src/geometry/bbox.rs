use std::fmt;
use std::ops::{BitAnd, BitOr};

use ndarray::{s, Array2};
use ndarray_stats::errors::MinMaxError;
use ndarray_stats::QuantileExt;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Point;

/// An axis-aligned rectangle in image space.
///
/// The corners are normalized on construction, so `top_left` is componentwise
/// less than or equal to `bottom_right` no matter which two opposite corners
/// were passed in. Boxes with zero width or height are valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    top_left: Point,
    bottom_right: Point,
}

impl BoundingBox {
    /// Build a box from two opposite corners given in any order.
    pub fn new(p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        let (p1, p2) = (p1.into(), p2.into());
        Self {
            top_left: Point::new(p1.x().min(p2.x()), p1.y().min(p2.y())),
            bottom_right: Point::new(p1.x().max(p2.x()), p1.y().max(p2.y())),
        }
    }

    /// Build a box from an origin corner and an extent, as rectangle patches report them.
    pub fn from_origin_size(origin: impl Into<Point>, width: f64, height: f64) -> Self {
        let origin = origin.into();
        Self::new(origin, (origin.x() + width, origin.y() + height))
    }

    /// Build a box from corner coordinates whose length is only known at runtime.
    ///
    /// Fails with [`Error::InvalidArgument`] unless both slices hold exactly two finite numbers.
    pub fn try_from_slices(p1: &[f64], p2: &[f64]) -> Result<Self> {
        fn corner(name: &str, p: &[f64]) -> Result<Point> {
            match *p {
                [x, y] if x.is_finite() && y.is_finite() => Ok(Point::new(x, y)),
                [_, _] => Err(Error::InvalidArgument(format!(
                    "{} has non-finite coordinates: {:?}",
                    name, p
                ))),
                _ => Err(Error::InvalidArgument(format!(
                    "{} must have exactly 2 coordinates, got {}",
                    name,
                    p.len()
                ))),
            }
        }
        Ok(Self::new(corner("p1", p1)?, corner("p2", p2)?))
    }

    /// The smallest box enclosing every row of an `N x 2` matrix of `(x, y)` positions.
    pub fn enclosing(points: &Array2<f64>) -> Result<Self> {
        if points.ncols() != 2 {
            return Err(Error::InvalidArgument(format!(
                "expected an N x 2 matrix of points, got {:?}",
                points.shape()
            )));
        }
        let extreme = |r: std::result::Result<&f64, MinMaxError>| -> Result<f64> {
            match r {
                Ok(v) => Ok(*v),
                Err(MinMaxError::EmptyInput) => Err(Error::EmptyInput),
                Err(_) => Err(Error::InvalidArgument(
                    "points contain NaN coordinates".to_string(),
                )),
            }
        };
        let xs = points.slice(s![.., 0]);
        let ys = points.slice(s![.., 1]);
        Ok(Self::new(
            (extreme(xs.min())?, extreme(ys.min())?),
            (extreme(xs.max())?, extreme(ys.max())?),
        ))
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x() - self.top_left.x()
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y() - self.top_left.y()
    }

    /// `(width, height)`
    pub fn size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.top_left.x() + self.width() / 2.,
            self.top_left.y() + self.height() / 2.,
        )
    }

    /// The overlap of both boxes, or `None` unless it has strictly positive width and height.
    ///
    /// Boxes that only share an edge or a corner do not overlap.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let tl = (
            self.top_left.x().max(other.top_left.x()),
            self.top_left.y().max(other.top_left.y()),
        );
        let br = (
            self.bottom_right.x().min(other.bottom_right.x()),
            self.bottom_right.y().min(other.bottom_right.y()),
        );
        if tl.0 < br.0 && tl.1 < br.1 {
            Some(BoundingBox::new(tl, br))
        } else {
            None
        }
    }

    /// Whether [`intersection`](Self::intersection) is non-empty.
    pub fn intersect(&self, other: &BoundingBox) -> bool {
        self.intersection(other).is_some()
    }

    /// The smallest box enclosing both boxes, including any gap between them.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            (
                self.top_left.x().min(other.top_left.x()),
                self.top_left.y().min(other.top_left.y()),
            ),
            (
                self.bottom_right.x().max(other.bottom_right.x()),
                self.bottom_right.y().max(other.bottom_right.y()),
            ),
        )
    }

    /// Closed containment test, points on an edge or corner are inside.
    pub fn contains(&self, point: &Point) -> bool {
        self.top_left.x() <= point.x()
            && point.x() <= self.bottom_right.x()
            && self.top_left.y() <= point.y()
            && point.y() <= self.bottom_right.y()
    }

    /// Scale both corners by `factor` and re-normalize, e.g. `0.25` for two pyramid levels down.
    pub fn resize(&self, factor: impl Into<f64>) -> BoundingBox {
        let factor = factor.into();
        BoundingBox::new(
            self.top_left.resize(factor),
            self.bottom_right.resize(factor),
        )
    }
}

impl BitAnd for BoundingBox {
    type Output = Option<BoundingBox>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(&rhs)
    }
}

impl<'a> BitAnd<&'a BoundingBox> for &'a BoundingBox {
    type Output = Option<BoundingBox>;

    fn bitand(self, rhs: &'a BoundingBox) -> Self::Output {
        self.intersection(rhs)
    }
}

impl BitOr for BoundingBox {
    type Output = BoundingBox;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(&rhs)
    }
}

impl<'a> BitOr<&'a BoundingBox> for &'a BoundingBox {
    type Output = BoundingBox;

    fn bitor(self, rhs: &'a BoundingBox) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BBox origin: {}; end: {}; width: {}; height: {}; center: {}",
            self.top_left,
            self.bottom_right,
            self.width(),
            self.height(),
            self.center()
        )
    }
}
