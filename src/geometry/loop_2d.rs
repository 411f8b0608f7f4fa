use crate::error::{GeometryError, OperationError, Result, TopologyError};
use crate::math::cosine::{to_degrees, COS_177_5};
use crate::math::polygon_2d::signed_area_closed;
use crate::math::segment_2d::{dist_sq_to_segment, segments_touch};
use crate::math::{cross_2d, BRect, Point2, UnitVector2, TOLERANCE};

/// Relation of a point to a [`Loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLoopRel {
    /// Strictly inside the loop.
    In,
    /// Within the snap threshold of the boundary.
    On,
    /// Outside the loop.
    Out,
}

/// A closed, counter-clockwise, non-self-intersecting polygon in the XY plane.
///
/// The point list repeats its first point at the end, so it holds
/// `segment_count() + 1` points. Per-segment unit tangents, lengths and
/// bounding rectangles are computed once in [`Loop::create`] and reused by
/// every query.
#[derive(Debug, Clone)]
pub struct Loop {
    points: Vec<Point2>,
    unit_tangents: Vec<UnitVector2>,
    lengths: Vec<f64>,
    expanded_rects: Vec<BRect>,
    area: f64,
    min_segment_length: f64,
    snap_threshold: f64,
    bounding_rect: BRect,
}

impl Loop {
    /// Builds a validated loop from a raw point list.
    ///
    /// Consecutive points closer than `min_segment_length` are merged into
    /// their midpoint. The ring is closed if needed and reversed if it runs
    /// clockwise.
    ///
    /// # Errors
    ///
    /// - `OperationError::NegativeTolerance` if a tolerance is negative
    /// - `OperationError::InvalidInput` if a coordinate is NaN or infinite
    /// - `OperationError::TooFewPoints` if fewer than 3 distinct points remain
    /// - `GeometryError::ZeroArea` if the enclosed area is (near) zero
    /// - `TopologyError::UTurn` if two segments fold back by more than 177.5°
    /// - `TopologyError::SelfIntersection` if two non-adjacent segments
    ///   cross or come within `snap_threshold` of each other
    pub fn create(min_segment_length: f64, snap_threshold: f64, points: &[Point2]) -> Result<Self> {
        // Negated comparisons also reject NaN.
        if !(min_segment_length >= 0.0) {
            return Err(OperationError::NegativeTolerance {
                name: "min_segment_length",
                value: min_segment_length,
            }
            .into());
        }
        if !(snap_threshold >= 0.0) {
            return Err(OperationError::NegativeTolerance {
                name: "snap_threshold",
                value: snap_threshold,
            }
            .into());
        }
        if points.len() < 3 {
            return Err(OperationError::TooFewPoints {
                required: 3,
                found: points.len(),
            }
            .into());
        }
        if let Some(i) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(OperationError::InvalidInput(format!("point {i} is not finite")).into());
        }

        let mut pts = merge_short_segments(points, min_segment_length);
        close_ring(&mut pts, min_segment_length);

        if pts.len() < 4 {
            return Err(OperationError::TooFewPoints {
                required: 3,
                found: pts.len() - 1,
            }
            .into());
        }

        let mut area = signed_area_closed(&pts);
        if area.abs() < TOLERANCE {
            return Err(GeometryError::ZeroArea { area }.into());
        }
        if area < 0.0 {
            tracing::trace!(area, "reversing clockwise loop");
            pts.reverse();
            area = -area;
        }

        let segment_count = pts.len() - 1;
        let mut unit_tangents = Vec::with_capacity(segment_count);
        let mut lengths = Vec::with_capacity(segment_count);
        let mut expanded_rects = Vec::with_capacity(segment_count);
        let mut bounding_rect = BRect::from_points(&pts[0], &pts[0]);

        for i in 0..segment_count {
            let (a, b) = (pts[i], pts[i + 1]);
            let d = b - a;
            let len = d.norm();
            let tangent = UnitVector2::try_new(d, TOLERANCE).ok_or(
                GeometryError::CoincidentPoints {
                    index: i,
                    distance: len,
                },
            )?;
            unit_tangents.push(tangent);
            lengths.push(len);
            expanded_rects.push(BRect::from_points(&a, &b).expand(snap_threshold));
            bounding_rect.include(&b);
        }

        let lp = Self {
            points: pts,
            unit_tangents,
            lengths,
            expanded_rects,
            area,
            min_segment_length,
            snap_threshold,
            bounding_rect: bounding_rect.expand(snap_threshold),
        };
        lp.check_u_turns()?;
        lp.check_self_intersection()?;
        Ok(lp)
    }

    /// Rejects any vertex where the loop folds back onto itself.
    fn check_u_turns(&self) -> Result<()> {
        let n = self.segment_count();
        for i in 0..n {
            let prev = &self.unit_tangents[(i + n - 1) % n];
            let next = &self.unit_tangents[i];
            let dot = prev.dot(&**next);
            if dot < COS_177_5 {
                return Err(TopologyError::UTurn {
                    index: i,
                    angle_degrees: to_degrees(dot),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Brute force test of every pair of non-adjacent segments.
    ///
    /// Triangles cannot self-intersect once the U-turn check has passed.
    fn check_self_intersection(&self) -> Result<()> {
        let n = self.segment_count();
        if n <= 3 {
            return Ok(());
        }
        // TODO: use a spatial index here once loops with many thousand
        // segments need to be validated.
        let pts = &self.points;
        for i in 0..n - 2 {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                if !self.expanded_rects[i].intersects(&self.expanded_rects[j]) {
                    continue;
                }
                if segments_touch(&pts[i], &pts[i + 1], &pts[j], &pts[j + 1], self.snap_threshold)
                {
                    return Err(TopologyError::SelfIntersection {
                        first: i,
                        second: j,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// The closed point ring, first point repeated at the end.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Unit tangent of each segment.
    #[must_use]
    pub fn unit_tangents(&self) -> &[UnitVector2] {
        &self.unit_tangents
    }

    /// Length of each segment.
    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Bounding rectangle of each segment, grown by the snap threshold.
    #[must_use]
    pub fn expanded_rects(&self) -> &[BRect] {
        &self.expanded_rects
    }

    /// Enclosed area, always positive.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    #[must_use]
    pub fn min_segment_length(&self) -> f64 {
        self.min_segment_length
    }

    #[must_use]
    pub fn snap_threshold(&self) -> f64 {
        self.snap_threshold
    }

    /// Bounding rectangle of all points, grown by the snap threshold.
    #[must_use]
    pub fn bounding_rect(&self) -> &BRect {
        &self.bounding_rect
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.unit_tangents.len()
    }

    /// Squared distance from `pt` to segment `i` and the clamped distance
    /// along the segment of the closest point.
    fn segment_dist_sq(&self, i: usize, pt: &Point2) -> (f64, f64) {
        dist_sq_to_segment(
            pt,
            &self.points[i],
            &self.points[i + 1],
            &self.unit_tangents[i],
            self.lengths[i],
        )
    }

    /// Index of the segment closest to `pt`. On ties the first one wins.
    #[must_use]
    pub fn closest_segment(&self, pt: &Point2) -> usize {
        let mut min_d = f64::MAX;
        let mut min_i = 0;
        for i in 0..self.segment_count() {
            let (d, _) = self.segment_dist_sq(i, pt);
            if d < min_d {
                min_d = d;
                min_i = i;
            }
        }
        min_i
    }

    /// The closest segment and the one that held the minimum before it.
    ///
    /// Ties advance the pair, so when the closest point is a vertex shared
    /// by two segments both of them are usually returned.
    #[must_use]
    pub fn closest_segments(&self, pt: &Point2) -> (usize, Option<usize>) {
        let mut min_d = f64::MAX;
        let mut first: Option<usize> = None;
        let mut second: Option<usize> = None;
        for i in 0..self.segment_count() {
            let (d, _) = self.segment_dist_sq(i, pt);
            if d <= min_d {
                min_d = d;
                second = first;
                first = Some(i);
            }
        }
        (first.unwrap_or(0), second)
    }

    /// Closest point on the loop boundary.
    #[must_use]
    pub fn closest_point(&self, pt: &Point2) -> Point2 {
        let i = self.closest_segment(pt);
        let (_, t) = self.segment_dist_sq(i, pt);
        self.points[i] + self.unit_tangents[i].into_inner() * t
    }

    /// Signed number of times the loop winds around `pt`.
    ///
    /// Non-zero means inside. Points exactly on the boundary may be
    /// counted either way; use [`Loop::contains_point`] for a tolerant test.
    #[must_use]
    pub fn winding_number(&self, pt: &Point2) -> i32 {
        const EPS: f64 = 1e-12;
        let mut winding = 0;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let is_left = cross_2d(&(b - a), &(pt - a));
            if a.y <= pt.y {
                if b.y > pt.y && is_left > EPS {
                    winding += 1;
                }
            } else if b.y <= pt.y && is_left < -EPS {
                winding -= 1;
            }
        }
        winding
    }

    /// Classifies `pt` as inside, on or outside the loop.
    ///
    /// Uses the side of the closest segment instead of ray crossing, which
    /// breaks down when loop edges are colinear with the ray. When the
    /// closest point is a vertex shared by two segments, the side is taken
    /// against the sum of both tangents: a probe nudged inwards from that
    /// vertex lies left of the summed direction for convex and reflex
    /// corners alike. [`Loop::closest_segments`] plays no part in this.
    #[must_use]
    pub fn contains_point(&self, pt: &Point2) -> PointLoopRel {
        if !self.bounding_rect.contains(pt) {
            return PointLoopRel::Out;
        }

        let closest = self.closest_segment(pt);
        let (d_sq, t) = self.segment_dist_sq(closest, pt);
        if d_sq < self.snap_threshold * self.snap_threshold {
            return PointLoopRel::On;
        }

        let side = match self.shared_vertex(closest, t) {
            Some((other, vertex)) => {
                let summed =
                    self.unit_tangents[closest].into_inner() + self.unit_tangents[other].into_inner();
                cross_2d(&summed, &(pt - self.points[vertex]))
            }
            None => cross_2d(&self.unit_tangents[closest], &(pt - self.points[closest])),
        };

        if side < 0.0 {
            PointLoopRel::Out
        } else {
            PointLoopRel::In
        }
    }

    /// If the closest point on segment `i` is one of its end vertices,
    /// returns the neighbouring segment sharing that vertex and the vertex
    /// index.
    fn shared_vertex(&self, i: usize, t: f64) -> Option<(usize, usize)> {
        let n = self.segment_count();
        if t <= 0.0 {
            Some(((i + n - 1) % n, i))
        } else if t >= self.lengths[i] {
            Some(((i + 1) % n, i + 1))
        } else {
            None
        }
    }
}

/// Walks the input and merges every point closer than `min_len` to the last
/// kept point into their midpoint. Merging cascades backwards, so no kept
/// pair ends up closer than `min_len`.
fn merge_short_segments(points: &[Point2], min_len: f64) -> Vec<Point2> {
    let limit_sq = (min_len * min_len).max(TOLERANCE * TOLERANCE);
    let mut pts: Vec<Point2> = Vec::with_capacity(points.len() + 1);
    let mut merged = 0usize;
    for p in points {
        let mut candidate = *p;
        while let Some(last) = pts.last() {
            if (candidate - *last).norm_squared() >= limit_sq {
                break;
            }
            candidate = nalgebra::center(last, &candidate);
            pts.pop();
            merged += 1;
        }
        pts.push(candidate);
    }
    if merged > 0 {
        tracing::debug!(merged, min_len, "merged points closer than minimum segment length");
    }
    pts
}

/// Closes the ring so that its last point equals the first exactly.
/// Trailing points within `min_len` of the start are dropped.
fn close_ring(pts: &mut Vec<Point2>, min_len: f64) {
    let limit_sq = (min_len * min_len).max(TOLERANCE * TOLERANCE);
    let first = pts[0];
    while pts.len() > 1 && (pts[pts.len() - 1] - first).norm_squared() < limit_sq {
        pts.pop();
    }
    pts.push(first);
}
