//! 2-D geometry primitives.
//!
//! `Point2D` uses `f64` Cartesian coordinates in map units (metres for the
//! generated road networks).  All vehicle kinematics reduce to the three
//! operations here: Euclidean distance, linear interpolation along an edge,
//! and a unit direction vector for velocity.

/// A point (or free vector) in the 2-D map plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation: `lerp(a, b, 0) = a`, `lerp(a, b, 1) = b`.
    ///
    /// `t` is not clamped; callers clamp progress before interpolating.
    #[inline]
    pub fn lerp(a: Point2D, b: Point2D, t: f64) -> Point2D {
        Point2D {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }

    /// Midpoint of the segment from `self` to `other`.
    #[inline]
    pub fn midpoint(self, other: Point2D) -> Point2D {
        Point2D::lerp(self, other, 0.5)
    }

    /// Unit vector pointing from `self` towards `other`.
    ///
    /// Returns [`Point2D::ZERO`] when the points coincide, so scaling the
    /// result by a speed never produces NaN components.
    pub fn direction_to(self, other: Point2D) -> Point2D {
        let d = self.distance(other);
        if d == 0.0 {
            return Point2D::ZERO;
        }
        Point2D {
            x: (other.x - self.x) / d,
            y: (other.y - self.y) / d,
        }
    }

    /// Scale both components by `factor` (e.g. a unit direction by a speed).
    #[inline]
    pub fn scale(self, factor: f64) -> Point2D {
        Point2D {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
