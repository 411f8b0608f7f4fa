use super::{cross_2d, Point2, UnitVector2, TOLERANCE};

/// Squared distance from `pt` to the segment starting at `start` with unit
/// `tangent` and `length`.
///
/// Returns `(distance_squared, t)` where `t` is the distance along the
/// segment of the closest point, clamped to `[0, length]`. Endpoint cases
/// measure against the stored endpoint so that two segments sharing a
/// vertex report bit-identical distances for it.
#[must_use]
pub fn dist_sq_to_segment(
    pt: &Point2,
    start: &Point2,
    end: &Point2,
    tangent: &UnitVector2,
    length: f64,
) -> (f64, f64) {
    let v = pt - start;
    let dot = v.dot(&**tangent);
    if dot <= 0.0 {
        (v.norm_squared(), 0.0)
    } else if dot >= length {
        ((pt - end).norm_squared(), length)
    } else {
        let c = cross_2d(tangent, &v);
        (c * c, dot)
    }
}

/// Returns `true` if two segments cross, or come closer than `tolerance`
/// at one of their endpoints (which also covers colinear overlap).
#[must_use]
pub fn segments_touch(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2, tolerance: f64) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = cross_2d(&da, &db);
    if cross.abs() > TOLERANCE {
        let d = b0 - a0;
        let t = cross_2d(&d, &db) / cross;
        let u = cross_2d(&d, &da) / cross;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            return true;
        }
    }

    let tol_sq = tolerance * tolerance;
    endpoint_dist_sq(a0, b0, b1) <= tol_sq
        || endpoint_dist_sq(a1, b0, b1) <= tol_sq
        || endpoint_dist_sq(b0, a0, a1) <= tol_sq
        || endpoint_dist_sq(b1, a0, a1) <= tol_sq
}

fn endpoint_dist_sq(p: &Point2, s0: &Point2, s1: &Point2) -> f64 {
    let d = s1 - s0;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (p - s0).norm_squared();
    }
    let t = ((p - s0).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (s0 + d * t)).norm_squared()
}
