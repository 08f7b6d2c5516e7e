//! Placement records on both sides of the conversion
//!
//! [`PlacementRecord`] is what the host scene hands to the encoder, in the
//! source convention. [`SerializedRecord`] is one forest item in the target
//! convention, independent of the envelope it is written in.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{EulerXyz, Quaternion, Vec3};

/// Orientation as supplied by the host scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRotation {
    /// XYZ Euler angles in radians
    Euler(EulerXyz),
    /// Quaternion stored as `[x, y, z, w]`; must be unit length
    Quaternion(Quaternion<f64>),
}

/// Scale as supplied by the host scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceScale {
    /// Per-axis scale; reduced to its mean on export
    Axes(Vec3),
    /// Single size value
    Uniform(f64),
}

/// What kind of host instance produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Regular scene object
    #[default]
    Object,
    /// Particle instance; its orientation convention is a quarter turn off
    Particle,
}

/// One instance to export, in the source scene's convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    /// World position
    pub position: Vec3,
    /// Orientation
    pub rotation: SourceRotation,
    /// Scale
    pub scale: SourceScale,
    /// Producer of this record
    #[serde(default)]
    pub kind: SourceKind,
    /// Item name overriding the export batch tag for this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
}

impl PlacementRecord {
    /// Create a record for a regular scene object
    pub fn object(position: Vec3, rotation: EulerXyz, scale: Vec3) -> Self {
        Self {
            position,
            rotation: SourceRotation::Euler(rotation),
            scale: SourceScale::Axes(scale),
            kind: SourceKind::Object,
            type_tag: None,
        }
    }

    /// Create a record for a particle instance
    pub fn particle(position: Vec3, rotation: Quaternion<f64>, size: f64) -> Self {
        Self {
            position,
            rotation: SourceRotation::Quaternion(rotation),
            scale: SourceScale::Uniform(size),
            kind: SourceKind::Particle,
            type_tag: None,
        }
    }

    /// Builder pattern: set the per-record item name
    #[must_use]
    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = Some(tag.into());
        self
    }
}

/// Rotation as stored in a forest file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WireRotation {
    /// Quaternion `[x, y, z, w]` in the target convention
    Quaternion([f64; 4]),
    /// Row-major 3x3 rotation matrix
    Matrix([f64; 9]),
}

/// One forest item in the target convention
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedRecord {
    /// Forest item name
    pub type_tag: String,
    /// World position
    pub position: [f64; 3],
    /// Orientation
    pub rotation: WireRotation,
    /// Uniform scale
    pub scale: f64,
}

/// Serde shape of one line of the canonical format
///
/// Field order matches the canonical line layout
/// `{"type":..,"pos":..,"quat":..,"scale":..}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireLine {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default)]
    pub pos: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quat: Option<[f64; 4]>,
    #[serde(rename = "rotationMatrix", default, skip_serializing_if = "Option::is_none")]
    pub rotation_matrix: Option<[f64; 9]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl From<&SerializedRecord> for WireLine {
    fn from(record: &SerializedRecord) -> Self {
        let (quat, rotation_matrix) = match record.rotation {
            WireRotation::Quaternion(q) => (Some(q), None),
            WireRotation::Matrix(m) => (None, Some(m)),
        };
        Self {
            type_tag: Some(record.type_tag.clone()),
            pos: Some(record.position),
            quat,
            rotation_matrix,
            scale: Some(record.scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_constructor() {
        let record = PlacementRecord::object(
            Vec3::new(1.0, 2.0, 3.0),
            EulerXyz::new(0.0, 0.0, 1.0),
            Vec3::new(2.0, 4.0, 6.0),
        );

        assert_eq!(record.kind, SourceKind::Object);
        assert_eq!(record.scale, SourceScale::Axes(Vec3::new(2.0, 4.0, 6.0)));
        assert!(record.type_tag.is_none());
    }

    #[test]
    fn test_particle_constructor() {
        let q = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        let record = PlacementRecord::particle(Vec3::zeros(), q, 0.5).with_type_tag("bush");

        assert_eq!(record.kind, SourceKind::Particle);
        assert_eq!(record.scale, SourceScale::Uniform(0.5));
        assert_eq!(record.type_tag.as_deref(), Some("bush"));
    }

    #[test]
    fn test_wire_line_field_order() {
        let record = SerializedRecord {
            type_tag: "oak".to_string(),
            position: [1.0, 2.0, 3.0],
            rotation: WireRotation::Quaternion([0.0, 0.0, 0.0, 1.0]),
            scale: 1.5,
        };

        let json = serde_json::to_string(&WireLine::from(&record)).unwrap();
        assert_eq!(
            json,
            r#"{"type":"oak","pos":[1.0,2.0,3.0],"quat":[0.0,0.0,0.0,1.0],"scale":1.5}"#
        );
    }

    #[test]
    fn test_wire_line_matrix_field() {
        let line: WireLine = serde_json::from_str(
            r#"{"type":"oak","pos":[0,0,0],"rotationMatrix":[1,0,0,0,1,0,0,0,1]}"#,
        )
        .unwrap();

        assert!(line.quat.is_none());
        assert_eq!(line.rotation_matrix, Some([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]));
        assert!(line.scale.is_none());
    }

    #[test]
    fn test_placement_record_from_ron() {
        let text = r#"(
            position: (4.0, 5.0, 6.0),
            rotation: euler((x: 0.0, y: 0.0, z: 1.5)),
            scale: uniform(2.0),
            type_tag: Some("pine"),
        )"#;
        let record: PlacementRecord = ron::from_str(text).unwrap();

        assert_eq!(record.position, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(record.rotation, SourceRotation::Euler(EulerXyz::new(0.0, 0.0, 1.5)));
        assert_eq!(record.kind, SourceKind::Object);
        assert_eq!(record.type_tag.as_deref(), Some("pine"));
    }
}
