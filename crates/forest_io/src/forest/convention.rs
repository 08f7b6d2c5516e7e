//! Coordinate convention mapping between the scene graph and forest files
//!
//! The source scene is right-handed and Z-up. Forest files reverse the
//! forward axis and use a different rotation axis labelling:
//!
//! - orientations are turned a half revolution about their own Z axis
//!   before leaving the scene, and turned back on the way in;
//! - quaternion components are permuted as `(x, y, z, w) -> (z, -y, x, w)`,
//!   a permutation that is its own inverse;
//! - positions are copied unchanged;
//! - scale is reduced to one uniform value.
//!
//! Every forest envelope goes through these functions, so any axis or sign
//! mistake shows up here and only here.

use crate::foundation::math::{
    constants::PI, utils::deg_to_rad, Axis, EulerXyz, Mat3, Quat, Quaternion, Vec3,
};
use crate::forest::error::ForestError;
use crate::forest::record::{SourceKind, SourceRotation, SourceScale};

/// Half-turn about local Z applied to every exported orientation
pub const FORWARD_CORRECTION: f64 = PI;

/// Extra yaw, in degrees, applied to particle orientations before export
pub const PARTICLE_YAW_DEGREES: f64 = 90.0;

/// Allowed deviation from unit length for source quaternions
pub const UNIT_QUATERNION_TOLERANCE: f64 = 1e-4;

/// Permute a source quaternion into the forest convention
pub fn to_wire_quaternion(q: &Quaternion<f64>) -> Quaternion<f64> {
    // Quaternion::new takes (w, i, j, k)
    Quaternion::new(q.w, q.k, -q.j, q.i)
}

/// Permute a forest quaternion back into the source convention
pub fn from_wire_quaternion(q: &Quaternion<f64>) -> Quaternion<f64> {
    Quaternion::new(q.w, q.k, -q.j, q.i)
}

/// Reduce a source scale to the single value forest files store
pub fn uniform_scale(scale: &SourceScale) -> f64 {
    match scale {
        SourceScale::Axes(axes) => (axes.x + axes.y + axes.z) / 3.0,
        SourceScale::Uniform(size) => *size,
    }
}

/// Resolve a source rotation to a unit quaternion in the source convention
///
/// Particle orientations get their quarter-turn yaw here. Quaternions that
/// are not unit length are rejected rather than renormalized.
pub fn source_orientation(rotation: &SourceRotation, kind: SourceKind) -> Result<Quat, ForestError> {
    let orientation = match rotation {
        SourceRotation::Euler(euler) => euler.to_quaternion(),
        SourceRotation::Quaternion(q) => {
            let norm = q.norm();
            if !norm.is_finite() || (norm - 1.0).abs() > UNIT_QUATERNION_TOLERANCE {
                return Err(ForestError::invalid_input(format!(
                    "quaternion is not unit length (norm {norm})"
                )));
            }
            Quat::new_unchecked(*q)
        }
    };

    Ok(match kind {
        SourceKind::Object => orientation,
        SourceKind::Particle => {
            orientation * Quat::from_axis_angle(&Axis::Z.unit(), deg_to_rad(PARTICLE_YAW_DEGREES))
        }
    })
}

/// Map a source orientation to a forest quaternion
pub fn encode_orientation(orientation: &Quat) -> Quaternion<f64> {
    let turned = orientation * Quat::from_axis_angle(&Axis::Z.unit(), FORWARD_CORRECTION);
    to_wire_quaternion(turned.quaternion())
}

/// Map a forest quaternion back to source Euler angles
pub fn decode_quaternion(wire: &Quaternion<f64>) -> Result<EulerXyz, ForestError> {
    let source = from_wire_quaternion(wire);
    let orientation = Quat::try_new(source, f64::EPSILON)
        .ok_or_else(|| ForestError::invalid_input("quaternion has zero length"))?;

    Ok(EulerXyz::from_quaternion(&orientation).rotate_axis(Axis::Z, FORWARD_CORRECTION))
}

/// Map a forest row-major rotation matrix back to source Euler angles
///
/// Unlike the quaternion path, the matrix path negates the extracted Z
/// angle before the half-turn correction. Existing matrix-encoded files
/// depend on this.
pub fn decode_matrix(rows: &[f64; 9]) -> EulerXyz {
    let matrix = Mat3::from_row_slice(rows);
    let mut euler = EulerXyz::from_matrix(&matrix);
    euler.z = -euler.z;
    euler.rotate_axis(Axis::Z, FORWARD_CORRECTION)
}

/// Positions share axis labelling on both sides
pub fn map_position(position: &Vec3) -> [f64; 3] {
    [position.x, position.y, position.z]
}
