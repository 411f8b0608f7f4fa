//! Translation-invariant comparison of point sets.

use crate::math::{Point3, Vector3};

/// Component-wise minimum of all points, or the origin for an empty set.
fn min_corner(points: &[Point3]) -> Vector3 {
    points
        .iter()
        .map(|p| p.coords)
        .reduce(|acc, c| acc.inf(&c))
        .unwrap_or_else(Vector3::zeros)
}

/// Returns `true` if `a` and `b` contain the same points up to a
/// translation.
///
/// Both sets are moved so their bounding boxes start at the origin. Each
/// point of `a` is then paired with the first unpaired point of `b` within
/// `tolerance`. Point order does not matter.
#[must_use]
pub fn are_similar(a: &[Point3], b: &[Point3], tolerance: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let shift_a = min_corner(a);
    let shift_b = min_corner(b);
    let candidates: Vec<Point3> = b.iter().map(|p| p - shift_b).collect();
    let mut used = vec![false; candidates.len()];

    a.iter().all(|p| {
        let q = p - shift_a;
        let hit = candidates
            .iter()
            .enumerate()
            .find(|&(j, c)| !used[j] && (c - q).norm() <= tolerance)
            .map(|(j, _)| j);
        match hit {
            Some(j) => {
                used[j] = true;
                true
            }
            None => false,
        }
    })
}

/// Groups items whose point sets are similar.
///
/// Groups are seeded in input order. Every later item joins the first group
/// whose seed it is similar to, or starts a new one.
pub fn group_similar<T, F>(items: Vec<T>, tolerance: f64, get_points: F) -> Vec<Vec<T>>
where
    F: Fn(&T) -> Vec<Point3>,
{
    let total = items.len();
    let mut seeds: Vec<Vec<Point3>> = Vec::new();
    let mut groups: Vec<Vec<T>> = Vec::new();

    for item in items {
        let pts = get_points(&item);
        match seeds.iter().position(|s| are_similar(s, &pts, tolerance)) {
            Some(g) => groups[g].push(item),
            None => {
                seeds.push(pts);
                groups.push(vec![item]);
            }
        }
    }

    tracing::debug!(items = total, groups = groups.len(), "grouped similar point sets");
    groups
}
