pub mod loop_2d;
pub mod polyline;

pub use loop_2d::{Loop, PointLoopRel};
pub use polyline::Polyline3D;
