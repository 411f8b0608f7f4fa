use thiserror::Error;

/// Top-level error type for the geoloop library.
#[derive(Debug, Error)]
pub enum GeoloopError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised when the input geometry is degenerate.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("points {index} and {} are only {distance} apart", .index + 1)]
    CoincidentPoints { index: usize, distance: f64 },

    #[error("loop area {area} is too small")]
    ZeroArea { area: f64 },
}

/// Errors raised when a shape violates a topological rule.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("segments {first} and {second} intersect or overlap")]
    SelfIntersection { first: usize, second: usize },

    #[error("turn of {angle_degrees:.3} degrees at point {index} is too close to a U-turn")]
    UTurn { index: usize, angle_degrees: f64 },
}

/// Errors related to operation arguments and results.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{name} must not be negative, got {value}")]
    NegativeTolerance { name: &'static str, value: f64 },

    #[error("at least {required} points are required, got {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("expected {expected} values, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error(
        "colinear point {index} has different offset distances {prev_distance} and {next_distance}"
    )]
    AmbiguousOffset {
        index: usize,
        prev_distance: f64,
        next_distance: f64,
    },
}

/// Convenience type alias for results using [`GeoloopError`].
pub type Result<T> = std::result::Result<T, GeoloopError>;
