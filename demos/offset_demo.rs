//! Builds a loop, offsets a wall outline and joins loose segments, logging
//! each result. Run with `RUST_LOG=geoloop=debug` to see the library's
//! decisions.

use geoloop::geometry::{Loop, PointLoopRel, Polyline3D};
use geoloop::math::{Line2D, Point2, Point3, Vector3};
use geoloop::operations::offset::{OffsetParams, VarDistParallel};
use geoloop::operations::topology;

fn main() -> geoloop::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("offset_demo=info".parse().unwrap_or_default())
        .add_directive("geoloop=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Clockwise L shape with a near-duplicate point; both get fixed up.
    let outline = [
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 6.0),
        Point2::new(3.0, 6.0),
        Point2::new(3.0, 3.0),
        Point2::new(3.0005, 3.0),
        Point2::new(8.0, 3.0),
        Point2::new(8.0, 0.0),
    ];
    let shape = Loop::create(0.01, 0.001, &outline)?;
    tracing::info!(
        segments = shape.segment_count(),
        area = shape.area(),
        "created loop"
    );
    for probe in [Point2::new(1.0, 1.0), Point2::new(5.0, 5.0), Point2::new(0.0, 2.0)] {
        let rel = shape.contains_point(&probe);
        tracing::info!(x = probe.x, y = probe.y, ?rel, "containment");
        if rel == PointLoopRel::On {
            let seg = shape.closest_segment(&probe);
            tracing::info!(segment = seg, "point lies on the boundary");
        }
    }

    // A rising wall axis, offset to both sides.
    let axis = Polyline3D::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 0.5),
        Point3::new(8.0, 0.0, 1.0),
        Point3::new(8.0, 5.0, 1.0),
    ])?;
    let params = OffsetParams::default();
    let left = axis.offset_with_normal(&Vector3::z(), 0.2, 0.0, &params)?;
    let right = axis.offset_with_normal(&Vector3::z(), -0.2, 0.0, &params)?;
    tracing::info!(left = ?left.points(), right = ?right.points(), "wall sides");

    let stepped = axis.offset_variable(
        Some(&Vector3::z()),
        &[0.2, 0.3, 0.3],
        &[0.0, 0.0, 0.1],
        VarDistParallel::Proportional,
        &params,
    )?;
    tracing::info!(points = ?stepped.points(), "stepped wall side");

    // Segments of two rectangles, shuffled and partly flipped.
    let seg = |a: (f64, f64), b: (f64, f64)| {
        Line2D::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))
    };
    let segments = vec![
        seg((2.0, 0.0), (2.0, 1.0)),
        seg((10.0, 0.0), (11.0, 0.0)),
        seg((0.0, 0.0), (2.0, 0.0)),
        seg((0.0, 1.0), (2.0, 1.0)),
        seg((11.0, 0.0), (11.0, 1.0)),
        seg((0.0, 1.0), (0.0, 0.0)),
    ];
    let groups = topology::join(segments.clone(), 1e-6, |l: &Line2D| *l)?;
    tracing::info!(groups = groups.len(), "joined without reversing");
    let groups = topology::join_reversing(segments, 1e-6, |l: &Line2D| *l)?;
    for (i, g) in groups.iter().enumerate() {
        let flipped = g.iter().filter(|(_, reversed)| *reversed).count();
        tracing::info!(group = i, len = g.len(), flipped, "joined with reversing");
    }

    Ok(())
}
