//! Math utilities and types
//!
//! Provides the math types used by placement transforms. Forest files carry
//! plain JSON numbers, so everything here is double precision.

pub use nalgebra::{
    Vector3,
    Matrix3,
    Quaternion,
    Rotation3,
    Unit,
    UnitQuaternion,
};
use serde::{Deserialize, Serialize};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// Unit quaternion type for orientations
pub type Quat = UnitQuaternion<f64>;

/// Principal rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis (vertical in the source scene)
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Unit<Vec3> {
        match self {
            Self::X => Vec3::x_axis(),
            Self::Y => Vec3::y_axis(),
            Self::Z => Vec3::z_axis(),
        }
    }
}

/// Euler rotation in radians with fixed XYZ order
///
/// The composed rotation is `Rz(z) * Ry(y) * Rx(x)`: X is applied first,
/// Z last, all about world axes. This is the default rotation mode of the
/// source scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerXyz {
    /// Rotation about X (radians)
    pub x: f64,
    /// Rotation about Y (radians)
    pub y: f64,
    /// Rotation about Z (radians)
    pub z: f64,
}

impl EulerXyz {
    /// Create a new Euler triple
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert to a unit quaternion
    pub fn to_quaternion(&self) -> Quat {
        Quat::from_euler_angles(self.x, self.y, self.z)
    }

    /// Extract Euler angles from a unit quaternion
    ///
    /// The result lies in the principal range: `x` and `z` in `[-pi, pi]`,
    /// `y` in `[-pi/2, pi/2]`.
    pub fn from_quaternion(rotation: &Quat) -> Self {
        let (x, y, z) = rotation.euler_angles();
        Self { x, y, z }
    }

    /// Convert to a 3x3 rotation matrix
    pub fn to_matrix(&self) -> Mat3 {
        self.to_quaternion().to_rotation_matrix().into_inner()
    }

    /// Extract Euler angles from a 3x3 matrix
    ///
    /// The matrix is orthonormalized first, so slightly drifted rotation
    /// matrices from external tools are accepted.
    pub fn from_matrix(matrix: &Mat3) -> Self {
        let (x, y, z) = Rotation3::from_matrix(matrix).euler_angles();
        Self { x, y, z }
    }

    /// Rotate about one of the orientation's own axes
    ///
    /// The extra rotation is applied in the local frame, i.e. the new
    /// orientation is `R * R_axis(angle)`.
    #[must_use]
    pub fn rotate_axis(&self, axis: Axis, angle: f64) -> Self {
        let turned = self.to_quaternion() * Quat::from_axis_angle(&axis.unit(), angle);
        Self::from_quaternion(&turned)
    }

    /// Components as `[x, y, z]`
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f64 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f64 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * constants::RAD_TO_DEG
    }

    /// Whether every value is finite
    pub fn all_finite(values: &[f64]) -> bool {
        values.iter().all(|v| v.is_finite())
    }
}
