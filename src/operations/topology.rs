//! Chaining of loose curve elements into connected sequences.
//!
//! Elements are anything that can be viewed as a line through
//! [`Endpoints`]. All searches are brute force; inputs are expected to be
//! a few hundred to a few thousand elements.

use crate::error::{OperationError, Result};
use crate::math::{Line2D, Line3D, Point3};

/// Start and end point of a directed curve element.
pub trait Endpoints {
    fn start_point(&self) -> Point3;
    fn end_point(&self) -> Point3;
}

impl Endpoints for Line3D {
    fn start_point(&self) -> Point3 {
        *self.from()
    }

    fn end_point(&self) -> Point3 {
        *self.to()
    }
}

/// 2D lines are lifted into the XY plane.
impl Endpoints for Line2D {
    fn start_point(&self) -> Point3 {
        Point3::new(self.from().x, self.from().y, 0.0)
    }

    fn end_point(&self) -> Point3 {
        Point3::new(self.to().x, self.to().y, 0.0)
    }
}

/// A chain growing at both ends.
///
/// Prepended items are kept in reverse insertion order so both ends are
/// amortized O(1).
#[derive(Debug, Clone)]
pub struct LoopCollector<T> {
    forward: Vec<T>,
    backward: Vec<T>,
}

impl<T> LoopCollector<T> {
    /// Starts a chain with a single element.
    #[must_use]
    pub fn new(seed: T) -> Self {
        Self {
            forward: vec![seed],
            backward: Vec::new(),
        }
    }

    /// Appends at the open end.
    pub fn push_back(&mut self, item: T) {
        self.forward.push(item);
    }

    /// Prepends at the open start.
    pub fn push_front(&mut self, item: T) {
        self.backward.push(item);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The chain in connected order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        let mut out = self.backward;
        out.reverse();
        out.extend(self.forward);
        out
    }
}

/// How a matched candidate attaches to the chain.
#[derive(Debug, Clone, Copy)]
enum Attach {
    Append { reversed: bool },
    Prepend { reversed: bool },
}

fn check_split_distance(split_distance: f64) -> Result<()> {
    if !(split_distance >= 0.0) {
        return Err(OperationError::NegativeTolerance {
            name: "split_distance",
            value: split_distance,
        }
        .into());
    }
    Ok(())
}

fn near(a: &Point3, b: &Point3, split_distance: f64) -> bool {
    (a - b).norm() <= split_distance
}

/// Greedy chain builder shared by [`join`] and [`join_reversing`].
///
/// Each chain is seeded by the first unconsumed element. The remaining
/// elements are then scanned from the front and the earliest one that
/// fits either end is consumed, until none fits. A chain may pass through
/// the same point several times.
fn build_chains<T, L, F>(
    elements: Vec<T>,
    split_distance: f64,
    get_line: F,
    allow_reversed: bool,
) -> Result<Vec<Vec<(T, bool)>>>
where
    L: Endpoints,
    F: Fn(&T) -> L,
{
    check_split_distance(split_distance)?;
    let total = elements.len();
    let mut rest = elements;
    let mut groups = Vec::new();

    while !rest.is_empty() {
        let seed = rest.remove(0);
        let line = get_line(&seed);
        let mut start = line.start_point();
        let mut end = line.end_point();
        let mut chain = LoopCollector::new((seed, false));

        loop {
            let found = rest.iter().enumerate().find_map(|(i, candidate)| {
                let l = get_line(candidate);
                let (s, e) = (l.start_point(), l.end_point());
                let attach = if near(&s, &end, split_distance) {
                    Some(Attach::Append { reversed: false })
                } else if near(&e, &start, split_distance) {
                    Some(Attach::Prepend { reversed: false })
                } else if allow_reversed && near(&e, &end, split_distance) {
                    Some(Attach::Append { reversed: true })
                } else if allow_reversed && near(&s, &start, split_distance) {
                    Some(Attach::Prepend { reversed: true })
                } else {
                    None
                };
                attach.map(|a| (i, s, e, a))
            });
            let Some((i, s, e, attach)) = found else {
                break;
            };
            let item = rest.remove(i);
            match attach {
                Attach::Append { reversed } => {
                    end = if reversed { s } else { e };
                    chain.push_back((item, reversed));
                }
                Attach::Prepend { reversed } => {
                    start = if reversed { e } else { s };
                    chain.push_front((item, reversed));
                }
            }
        }
        groups.push(chain.into_vec());
    }

    tracing::debug!(elements = total, groups = groups.len(), "joined elements into chains");
    Ok(groups)
}

/// Groups elements into chains where each element starts where the
/// previous one ends, within `split_distance`.
///
/// Elements keep their direction. Each returned group is in connected
/// order and every input element appears in exactly one group.
///
/// # Errors
///
/// Returns `OperationError::NegativeTolerance` if `split_distance` is
/// negative or NaN.
pub fn join<T, L, F>(elements: Vec<T>, split_distance: f64, get_line: F) -> Result<Vec<Vec<T>>>
where
    L: Endpoints,
    F: Fn(&T) -> L,
{
    let groups = build_chains(elements, split_distance, get_line, false)?;
    Ok(groups
        .into_iter()
        .map(|g| g.into_iter().map(|(item, _)| item).collect())
        .collect())
}

/// Like [`join`], but an element may also be attached backwards.
///
/// The flag next to each element is `true` when it has to be traversed
/// from end to start to follow the chain.
///
/// # Errors
///
/// Returns `OperationError::NegativeTolerance` if `split_distance` is
/// negative or NaN.
pub fn join_reversing<T, L, F>(
    elements: Vec<T>,
    split_distance: f64,
    get_line: F,
) -> Result<Vec<Vec<(T, bool)>>>
where
    L: Endpoints,
    F: Fn(&T) -> L,
{
    build_chains(elements, split_distance, get_line, true)
}

/// Reorders `elements` in place so each one is followed by the remaining
/// element whose start is nearest to its end.
///
/// Always produces a single sequence, even if the input forms several
/// disjoint loops. Use [`join`] to detect those.
pub fn sort_to_loop<T, L, F>(elements: &mut [T], get_line: F)
where
    L: Endpoints,
    F: Fn(&T) -> L,
{
    for i in 0..elements.len().saturating_sub(1) {
        let end = get_line(&elements[i]).end_point();
        let mut best = i + 1;
        let mut best_dist = f64::INFINITY;
        for (j, candidate) in elements.iter().enumerate().skip(i + 1) {
            let d = (get_line(candidate).start_point() - end).norm();
            if d < best_dist {
                best = j;
                best_dist = d;
            }
        }
        elements.swap(i + 1, best);
    }
}

/// Like [`sort_to_loop`], but also considers each remaining element
/// backwards. Elements that fit better reversed are flipped with
/// `reverse` before they are moved into place.
pub fn sort_to_loop_with_reversing<T, L, F, R>(elements: &mut [T], get_line: F, mut reverse: R)
where
    L: Endpoints,
    F: Fn(&T) -> L,
    R: FnMut(&mut T),
{
    for i in 0..elements.len().saturating_sub(1) {
        let end = get_line(&elements[i]).end_point();
        let mut best = i + 1;
        let mut best_dist = f64::INFINITY;
        let mut best_reversed = false;
        for (j, candidate) in elements.iter().enumerate().skip(i + 1) {
            let line = get_line(candidate);
            let forward = (line.start_point() - end).norm();
            let backward = (line.end_point() - end).norm();
            if forward < best_dist {
                best = j;
                best_dist = forward;
                best_reversed = false;
            }
            if backward < best_dist {
                best = j;
                best_dist = backward;
                best_reversed = true;
            }
        }
        if best_reversed {
            reverse(&mut elements[best]);
        }
        elements.swap(i + 1, best);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn line(a: (f64, f64), b: (f64, f64)) -> Line2D {
        Line2D::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))
    }

    /// Unit square, counter-clockwise, as (id, line) pairs.
    fn square() -> Vec<(usize, Line2D)> {
        vec![
            (0, line((0.0, 0.0), (1.0, 0.0))),
            (1, line((1.0, 0.0), (1.0, 1.0))),
            (2, line((1.0, 1.0), (0.0, 1.0))),
            (3, line((0.0, 1.0), (0.0, 0.0))),
        ]
    }

    fn ids<T>(group: &[(usize, T)]) -> Vec<usize> {
        group.iter().map(|(id, _)| *id).collect()
    }

    fn assert_connected(group: &[(usize, Line2D)], tol: f64) {
        for w in group.windows(2) {
            let gap = (w[0].1.end_point() - w[1].1.start_point()).norm();
            assert!(gap <= tol, "gap {gap} between {} and {}", w[0].0, w[1].0);
        }
    }

    #[test]
    fn collector_order() {
        let mut c = LoopCollector::new(2);
        c.push_back(3);
        c.push_front(1);
        c.push_front(0);
        c.push_back(4);
        assert_eq!(c.len(), 5);
        assert_eq!(c.into_vec(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn join_shuffled_square_into_one_chain() {
        let sq = square();
        let shuffled = vec![sq[2], sq[0], sq[3], sq[1]];
        let groups = join(shuffled, 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec![2, 3, 0, 1]);
        assert_connected(&groups[0], 1e-9);
    }

    #[test]
    fn join_prepends_earlier_elements() {
        let sq = square();
        let input = vec![sq[2], sq[1], sq[0]];
        let groups = join(input, 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec![0, 1, 2]);
    }

    #[test]
    fn join_tolerates_small_gaps() {
        let input = vec![
            (0, line((0.0, 0.0), (1.0, 0.0))),
            (1, line((1.005, 0.0), (2.0, 0.0))),
        ];
        assert_eq!(join(input.clone(), 0.01, |e: &(usize, Line2D)| e.1).unwrap().len(), 1);
        assert_eq!(join(input, 0.001, |e: &(usize, Line2D)| e.1).unwrap().len(), 2);
    }

    #[test]
    fn join_gaps_split_into_groups_covering_all() {
        let mut input = square();
        input.push((4, line((5.0, 5.0), (6.0, 5.0))));
        input.push((5, line((6.0, 5.0), (6.0, 6.0))));
        input.push((6, line((10.0, 10.0), (11.0, 10.0))));
        let groups = join(input, 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 3);
        let mut all: Vec<usize> = groups.iter().flat_map(|g| ids(g)).collect();
        all.sort_unstable();
        assert_eq!(all, (0..7).collect::<Vec<_>>());
        for g in &groups {
            assert_connected(g, 1e-9);
        }
    }

    fn two_squares() -> Vec<(usize, Line2D)> {
        // Second square shares the corner (1, 1) with the unit square.
        let mut input = square();
        input.push((4, line((1.0, 1.0), (2.0, 1.0))));
        input.push((5, line((2.0, 1.0), (2.0, 2.0))));
        input.push((6, line((2.0, 2.0), (1.0, 2.0))));
        input.push((7, line((1.0, 2.0), (1.0, 1.0))));
        input
    }

    #[test]
    fn join_continues_through_shared_vertex() {
        let all = two_squares();
        let input: Vec<_> = [0, 1, 4, 5, 6, 7, 2, 3].iter().map(|&i| all[i]).collect();
        let groups = join(input, 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec![0, 1, 4, 5, 6, 7, 2, 3]);
        assert_connected(&groups[0], 1e-9);
    }

    #[test]
    fn join_prefers_earliest_candidate() {
        // At (1, 1) segment 2 comes before 4, so the first square closes
        // first and nothing fits its ends afterwards.
        let groups = join(two_squares(), 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), vec![0, 1, 2, 3]);
        assert_eq!(ids(&groups[1]), vec![4, 5, 6, 7]);
    }

    #[test]
    fn join_figure_eight_is_one_chain() {
        let input = vec![
            (0, line((0.0, 0.0), (1.0, 0.0))),
            (1, line((1.0, 0.0), (1.0, 1.0))),
            (2, line((1.0, 1.0), (0.0, 0.0))),
            (3, line((0.0, 0.0), (-1.0, 0.0))),
            (4, line((-1.0, 0.0), (-1.0, -1.0))),
            (5, line((-1.0, -1.0), (0.0, 0.0))),
        ];
        let groups = join(input.clone(), 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec![0, 1, 2, 3, 4, 5]);
        assert_connected(&groups[0], 1e-9);

        let groups = join_reversing(input, 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 6);
        assert!(groups[0].iter().all(|(_, reversed)| !reversed));
    }

    #[test]
    fn join_does_not_reverse() {
        let sq = square();
        let input = vec![sq[0], (1, sq[1].1.reversed())];
        let groups = join(input, 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn join_negative_distance_fails() {
        assert!(join(square(), -1.0, |e: &(usize, Line2D)| e.1).is_err());
        assert!(join(square(), f64::NAN, |e: &(usize, Line2D)| e.1).is_err());
    }

    #[test]
    fn join_empty_input() {
        let groups = join(Vec::<Line3D>::new(), 0.0, |l: &Line3D| *l).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn join_reversing_absorbs_flipped_elements() {
        let sq = square();
        let input = vec![
            sq[0],
            (1, sq[1].1.reversed()),
            sq[2],
            (3, sq[3].1.reversed()),
        ];
        let groups = join_reversing(input, 1e-9, |e: &(usize, Line2D)| e.1).unwrap();
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.iter().map(|((id, _), _)| *id).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(g.iter().map(|(_, r)| *r).collect::<Vec<_>>(), vec![false, true, false, true]);

        // Following the flags gives a connected path.
        let oriented: Vec<Line2D> = g
            .iter()
            .map(|((_, l), r)| if *r { l.reversed() } else { *l })
            .collect();
        for w in oriented.windows(2) {
            assert!((w[0].end_point() - w[1].start_point()).norm() < 1e-9);
        }
    }

    #[test]
    fn join_reversing_with_3d_lines() {
        let a = Line3D::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0));
        let b = Line3D::new(Point3::new(1.0, 0.0, 1.0), Point3::new(0.0, 0.0, 1.0));
        let groups = join_reversing(vec![a, b], 1e-9, |l: &Line3D| *l).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0], vec![(a, false), (b, true)]);
    }

    #[test]
    fn sort_to_loop_orders_square() {
        let sq = square();
        let mut input = vec![sq[0], sq[3], sq[2], sq[1]];
        sort_to_loop(&mut input, |e: &(usize, Line2D)| e.1);
        assert_eq!(ids(&input), vec![0, 1, 2, 3]);
        assert_connected(&input, 1e-9);
    }

    #[test]
    fn sort_to_loop_keeps_disjoint_loops_in_one_sequence() {
        let mut input = square();
        input.push((4, line((5.0, 5.0), (6.0, 5.0))));
        input.swap(1, 4);
        sort_to_loop(&mut input, |e: &(usize, Line2D)| e.1);
        assert_eq!(input.len(), 5);
        assert_eq!(ids(&input)[..4], [0, 1, 2, 3]);
        assert_eq!(input[4].0, 4);
    }

    #[test]
    fn sort_to_loop_with_reversing_flips_elements() {
        let sq = square();
        let mut input = vec![sq[0], (2, sq[2].1.reversed()), (1, sq[1].1.reversed()), sq[3]];
        sort_to_loop_with_reversing(
            &mut input,
            |e: &(usize, Line2D)| e.1,
            |e: &mut (usize, Line2D)| e.1 = e.1.reversed(),
        );
        assert_eq!(ids(&input), vec![0, 1, 2, 3]);
        assert_connected(&input, 1e-9);
    }

    #[test]
    fn sort_to_loop_trivial_inputs() {
        let mut empty: Vec<Line2D> = Vec::new();
        sort_to_loop(&mut empty, |l: &Line2D| *l);
        let mut one = vec![line((0.0, 0.0), (1.0, 0.0))];
        sort_to_loop(&mut one, |l: &Line2D| *l);
        assert_eq!(one.len(), 1);
    }
}
