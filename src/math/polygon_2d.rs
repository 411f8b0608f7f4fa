use super::Point2;

/// Computes the signed area of a closed ring (shoelace formula).
///
/// The ring must repeat its first point at the end; the closing pair is
/// taken from the data rather than added implicitly.
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_closed(points: &[Point2]) -> f64 {
    let mut sum = 0.0;
    for w in points.windows(2) {
        sum += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    sum * 0.5
}
