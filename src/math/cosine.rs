//! Named cosine thresholds for angle based tolerance checks.
//!
//! Comparing the dot product of two unit vectors against one of these
//! avoids calling `acos` in hot loops. A dot product above `COS_2_5` means
//! the vectors are within 2.5° of each other; below `COS_175` means they
//! turn by more than 175°.

/// Cosine of 0.25°.
pub const COS_0_25: f64 = 0.999_990_480_720_734_5;

/// Cosine of 2.5°.
pub const COS_2_5: f64 = 0.999_048_221_581_857_8;

/// Cosine of 5°.
pub const COS_5: f64 = 0.996_194_698_091_745_5;

/// Cosine of 170°.
pub const COS_170: f64 = -0.984_807_753_012_208;

/// Cosine of 175°.
pub const COS_175: f64 = -0.996_194_698_091_745_5;

/// Cosine of 177.5°.
pub const COS_177_5: f64 = -0.999_048_221_581_857_8;

/// Converts a cosine back to the angle in degrees, for error messages.
#[must_use]
pub fn to_degrees(cosine: f64) -> f64 {
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}
