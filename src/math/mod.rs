pub mod cosine;
pub mod line_2d;
pub mod line_3d;
pub mod polygon_2d;
pub mod rect_2d;
pub mod segment_2d;

pub use line_2d::Line2D;
pub use line_3d::Line3D;
pub use rect_2d::BRect;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 2D vector of length one.
pub type UnitVector2 = nalgebra::Unit<Vector2>;

/// 3D vector of length one.
pub type UnitVector3 = nalgebra::Unit<Vector3>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// 2D cross product: `(ax * by - ay * bx)`.
#[inline]
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Unitizes a 3D vector, failing on vectors shorter than [`TOLERANCE`].
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the vector is too short.
pub fn unitize_3d(v: Vector3) -> crate::Result<UnitVector3> {
    UnitVector3::try_new(v, TOLERANCE).ok_or_else(|| crate::error::GeometryError::ZeroVector.into())
}
