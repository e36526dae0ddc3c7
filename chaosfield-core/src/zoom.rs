//! Viewport interpolation for zoom animations.

use crate::error::CoreError;
use crate::viewport::Viewport;

/// Smallest offset the geometric mode approaches. Geometric interpolation is
/// undefined at zero, so the final frame stops this far short of the target.
pub const GEOMETRIC_FLOOR: f64 = 1e-15;

/// How intermediate viewports are spaced between start and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMode {
    /// Corners move in equal steps.
    Linear,
    /// The offset from the target shrinks by a constant factor per frame, so
    /// the apparent zoom speed stays steady all the way in.
    #[default]
    Geometric,
}

/// Produce `n` viewports from `start` to `end`.
///
/// Both modes interpolate the four corners independently and rebuild each
/// frame from the lower-left and upper-right corners. Frames share nothing,
/// so callers are free to render them in parallel.
pub fn zoom_frames(
    start: &Viewport,
    end: &Viewport,
    n: usize,
    mode: ZoomMode,
) -> crate::Result<Vec<Viewport>> {
    if n == 0 {
        return Err(CoreError::InvalidFrameCount(n));
    }
    if n == 1 {
        return Ok(vec![*start]);
    }

    let vs = start.corners();
    let ve = end.corners();
    let last = (n - 1) as f64;

    let frames = (0..n)
        .map(|i| {
            if i == 0 {
                return *start;
            }
            let t = i as f64 / last;
            let mut corners = [[0.0; 2]; 4];
            for (k, corner) in corners.iter_mut().enumerate() {
                for axis in 0..2 {
                    let s = vs[k][axis];
                    let e = ve[k][axis];
                    corner[axis] = match mode {
                        ZoomMode::Linear if i == n - 1 => e,
                        ZoomMode::Linear => s + (e - s) * t,
                        ZoomMode::Geometric => e + geometric_offset(s - e, t),
                    };
                }
            }
            Viewport::from_corners(&corners)
        })
        .collect();

    Ok(frames)
}

/// Offset at fraction `t` of the way from `offset` down to the signed floor.
///
/// An offset of exactly zero has no direction and stays zero.
#[inline]
fn geometric_offset(offset: f64, t: f64) -> f64 {
    if offset == 0.0 {
        return 0.0;
    }
    let floor = GEOMETRIC_FLOOR.copysign(offset);
    if t >= 1.0 {
        return floor;
    }
    offset * (floor / offset).powf(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Viewport {
        Viewport::new((-1.5, 1.5), (-1.5, 1.5)).unwrap()
    }

    fn end() -> Viewport {
        Viewport::new((-1.009290, -1.009265), (0.147300, 0.147325)).unwrap()
    }

    #[test]
    fn zero_frames_rejected() {
        assert!(matches!(
            zoom_frames(&start(), &end(), 0, ZoomMode::Linear),
            Err(CoreError::InvalidFrameCount(0))
        ));
    }

    #[test]
    fn single_frame_is_start() {
        let frames = zoom_frames(&start(), &end(), 1, ZoomMode::Geometric).unwrap();
        assert_eq!(frames, vec![start()]);
    }

    #[test]
    fn linear_endpoints() {
        let frames = zoom_frames(&start(), &end(), 10, ZoomMode::Linear).unwrap();
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0], start());
        assert_eq!(frames[9], end());
    }

    #[test]
    fn linear_midpoint() {
        let a = Viewport::new((0.0, 2.0), (0.0, 2.0)).unwrap();
        let b = Viewport::new((1.0, 3.0), (-1.0, 1.0)).unwrap();
        let frames = zoom_frames(&a, &b, 3, ZoomMode::Linear).unwrap();
        let mid = Viewport::new((0.5, 2.5), (-0.5, 1.5)).unwrap();
        assert!(frames[1].approx_eq(&mid, 1e-12));
    }

    #[test]
    fn geometric_endpoints() {
        let frames = zoom_frames(&start(), &end(), 10, ZoomMode::Geometric).unwrap();
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0], start());
        assert!(frames[9].approx_eq(&end(), 1e-14));
    }

    #[test]
    fn geometric_compresses_towards_target() {
        let frames = zoom_frames(&start(), &end(), 20, ZoomMode::Geometric).unwrap();
        let widths: Vec<f64> = frames.iter().map(|f| f.width()).collect();
        for pair in widths.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        // Halfway through, a geometric zoom is much closer than a linear one.
        let linear = zoom_frames(&start(), &end(), 20, ZoomMode::Linear).unwrap();
        assert!(frames[10].width() < linear[10].width());
    }

    #[test]
    fn geometric_keeps_zero_offsets_fixed() {
        let a = Viewport::new((-1.0, 1.0), (-1.0, 1.0)).unwrap();
        let b = Viewport::new((-1.0, 0.5), (-0.5, 1.0)).unwrap();
        let frames = zoom_frames(&a, &b, 5, ZoomMode::Geometric).unwrap();
        for f in &frames {
            assert_eq!(f.x.0, -1.0);
            assert_eq!(f.y.1, 1.0);
        }
    }

    #[test]
    fn geometric_offset_keeps_sign() {
        assert!(geometric_offset(-2.0, 0.5) < 0.0);
        assert!(geometric_offset(2.0, 0.5) > 0.0);
        assert_eq!(geometric_offset(-2.0, 1.0), -GEOMETRIC_FLOOR);
    }
}
