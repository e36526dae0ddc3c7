use crate::complex::Complex;
use crate::error::CoreError;

/// A rectangular region of the plane given as `(xmin, xmax)` and `(ymin, ymax)`.
///
/// The limits are kept in the order supplied. A grid built from a viewport
/// whose y-limits run from high to low therefore starts at the top edge, which
/// is how image rows are laid out.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Viewport {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Validates limits on deserialization so settings files cannot smuggle in a
/// degenerate viewport.
impl<'de> serde::Deserialize<'de> for Viewport {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            x: (f64, f64),
            y: (f64, f64),
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.x, raw.y).map_err(serde::de::Error::custom)
    }
}

impl Viewport {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> crate::Result<Self> {
        for (axis, (lo, hi)) in [("x", x), ("y", y)] {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(CoreError::InvalidViewport {
                    reason: format!("{axis} limits must be finite, got ({lo}, {hi})"),
                });
            }
            if lo == hi {
                return Err(CoreError::InvalidViewport {
                    reason: format!("{axis} extent must be non-zero, got ({lo}, {hi})"),
                });
            }
        }
        Ok(Self { x, y })
    }

    /// The same limit on both axes.
    pub fn square(lim: (f64, f64)) -> crate::Result<Self> {
        Self::new(lim, lim)
    }

    /// Absolute width of the region.
    pub fn width(&self) -> f64 {
        (self.x.1 - self.x.0).abs()
    }

    /// Absolute height of the region.
    pub fn height(&self) -> f64 {
        (self.y.1 - self.y.0).abs()
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    pub fn center(&self) -> Complex {
        Complex::new((self.x.0 + self.x.1) / 2.0, (self.y.0 + self.y.1) / 2.0)
    }

    /// The y-limits reversed, so row 0 of a grid lies on the input `ymax`.
    pub fn flipped_y(&self) -> Self {
        Self {
            x: self.x,
            y: (self.y.1, self.y.0),
        }
    }

    /// The four corners in `(xmin, ymin), (xmin, ymax), (xmax, ymin), (xmax, ymax)`
    /// order, flattened to `[x, y]` pairs.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        [
            [self.x.0, self.y.0],
            [self.x.0, self.y.1],
            [self.x.1, self.y.0],
            [self.x.1, self.y.1],
        ]
    }

    /// Rebuild a viewport from the first and last of [`corners`](Self::corners).
    ///
    /// Unlike [`new`](Self::new) this does not validate, since interpolated
    /// frames can legitimately collapse far below `f64` resolution.
    pub fn from_corners(corners: &[[f64; 2]; 4]) -> Self {
        Self {
            x: (corners[0][0], corners[3][0]),
            y: (corners[0][1], corners[3][1]),
        }
    }

    /// `true` if the two viewports agree on every limit within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        (self.x.0 - other.x.0).abs() <= tol
            && (self.x.1 - other.x.1).abs() <= tol
            && (self.y.0 - other.y.0).abs() <= tol
            && (self.y.1 - other.y.1).abs() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn dimensions_and_aspect() {
        let vp = Viewport::new((-2.0, 2.0), (-1.0, 1.0)).unwrap();
        assert!((vp.width() - 4.0).abs() < EPSILON);
        assert!((vp.height() - 2.0).abs() < EPSILON);
        assert!((vp.aspect_ratio() - 2.0).abs() < EPSILON);
        assert_eq!(vp.center(), Complex::ZERO);
    }

    #[test]
    fn flipped_extent_is_positive() {
        let vp = Viewport::new((-1.0, 1.0), (3.0, 1.0)).unwrap();
        assert!((vp.height() - 2.0).abs() < EPSILON);
        assert_eq!(vp.flipped_y().y, (1.0, 3.0));
    }

    #[test]
    fn zero_extent_is_rejected() {
        assert!(Viewport::new((1.0, 1.0), (-1.0, 1.0)).is_err());
        assert!(Viewport::new((-1.0, 1.0), (0.5, 0.5)).is_err());
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(Viewport::new((f64::NAN, 1.0), (-1.0, 1.0)).is_err());
        assert!(Viewport::new((-1.0, 1.0), (-1.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn corners_round_trip() {
        let vp = Viewport::new((-1.5, 0.5), (-0.25, 2.0)).unwrap();
        assert_eq!(Viewport::from_corners(&vp.corners()), vp);
    }

    #[test]
    fn deserialize_validates() {
        let ok: Viewport = serde_json::from_str(r#"{"x":[-1.0,1.0],"y":[-2.0,2.0]}"#).unwrap();
        assert_eq!(ok.y, (-2.0, 2.0));
        let bad = serde_json::from_str::<Viewport>(r#"{"x":[1.0,1.0],"y":[-2.0,2.0]}"#);
        assert!(bad.is_err());
    }
}
