/// Tolerance used when the two perpendicular candidates have effectively
/// equal y-components and the tie must be broken on x instead.
pub const PERPENDICULAR_TIE_EPSILON: f64 = 0.01;

/// Linearly interpolates between two points.
///
/// # Arguments
/// * `from` - Start point, returned when `t = 0`
/// * `to` - End point, returned when `t = 1`
/// * `t` - Interpolation parameter, not clamped
#[must_use]
pub fn lerp_point(from: (f64, f64), to: (f64, f64), t: f64) -> (f64, f64) {
    (
        from.0 + (to.0 - from.0) * t,
        from.1 + (to.1 - from.1) * t,
    )
}

/// Heading of a segment vector in degrees, as `atan2(dy, dx)`.
///
/// A zero-length vector yields 0.0 rather than a NaN so degenerate
/// segments never poison downstream rendering math.
#[must_use]
pub fn heading_degrees(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx).to_degrees()
}

/// The canonical "upward" unit perpendicular of a segment vector.
///
/// Every segment has two unit perpendiculars that swap places when the
/// segment direction flips. This picks one of them deterministically -
/// the candidate with the smaller y-component, falling back to the smaller
/// x-component when the y-components are within
/// [`PERPENDICULAR_TIE_EPSILON`] of each other - so the choice is stable
/// no matter which way the segment happens to be traversed.
///
/// Returns `(0.0, 0.0)` for a zero-length segment.
#[must_use]
pub fn upward_perpendicular(dx: f64, dy: f64) -> (f64, f64) {
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return (0.0, 0.0);
    }
    let ndx = dx / len;
    let ndy = dy / len;

    let (ax, ay) = (-ndy, ndx);
    let (bx, by) = (ndy, -ndx);

    if (ay - by).abs() > PERPENDICULAR_TIE_EPSILON {
        if ay < by {
            (ax, ay)
        } else {
            (bx, by)
        }
    } else if ax < bx {
        (ax, ay)
    } else {
        (bx, by)
    }
}

/// Mean of a set of points. Returns the origin for an empty set.
#[must_use]
pub fn centroid(points: impl Iterator<Item = (f64, f64)>) -> (f64, f64) {
    let mut sum = (0.0, 0.0);
    let mut count = 0usize;
    for (x, y) in points {
        sum.0 += x;
        sum.1 += y;
        count += 1;
    }
    if count == 0 {
        return (0.0, 0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    (sum.0 / n, sum.1 / n)
}
