//! Placement decoder
//!
//! Reads the canonical line-delimited forest format and produces one
//! [`CreateInstance`] instruction per line, in the source convention. The
//! legacy array formats cannot be imported.
//!
//! A line that cannot be decoded either aborts the import
//! ([`ErrorPolicy::FailFast`]) or is recorded in the [`ImportReport`] while
//! the remaining lines are still decoded ([`ErrorPolicy::CollectAndReport`],
//! the default).

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils::all_finite, EulerXyz, Quaternion, Vec3};
use crate::forest::convention;
use crate::forest::error::ForestError;
use crate::forest::record::{SerializedRecord, WireLine, WireRotation};

/// Kind of host object created for each imported item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Lightweight marker object (an empty)
    #[default]
    Marker,
    /// Full renderable instance
    Instance,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Marker => "marker",
            Self::Instance => "instance",
        })
    }
}

impl FromStr for ObjectKind {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marker" | "empty" => Ok(Self::Marker),
            "instance" | "mesh" => Ok(Self::Instance),
            other => Err(ForestError::InvalidConfiguration(format!(
                "unknown object kind '{other}' (expected marker or instance)"
            ))),
        }
    }
}

/// What to do when a line cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the whole import on the first bad line
    FailFast,
    /// Skip bad lines, keep decoding and report them afterwards
    #[default]
    CollectAndReport,
}

/// Instruction to create one host object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateInstance {
    /// Host object kind
    pub kind: ObjectKind,
    /// Forest item name; empty when the line carried none
    pub type_tag: String,
    /// World position
    pub position: Vec3,
    /// XYZ Euler rotation in radians
    pub rotation: EulerXyz,
    /// Uniform scale
    pub scale: f64,
}

/// A line that could not be decoded
#[derive(Debug)]
pub struct LineFailure {
    /// 1-based input line number
    pub line: usize,
    /// Why the line was rejected
    pub error: ForestError,
}

/// Result of an import run
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Instructions for every decoded line, in input order
    pub instructions: Vec<CreateInstance>,
    /// Lines that were rejected
    pub failures: Vec<LineFailure>,
}

impl ImportReport {
    /// Whether every line decoded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parse one canonical line into a forest item
///
/// A `rotationMatrix` field takes precedence over `quat`. A missing `scale`
/// defaults to 1 and a missing `type` to an empty name.
pub fn parse_line(line: &str) -> Result<SerializedRecord, ForestError> {
    let wire: WireLine = serde_json::from_str(line)
        .map_err(|e| ForestError::invalid_input(format!("malformed forest line: {e}")))?;

    let position = wire
        .pos
        .ok_or_else(|| ForestError::invalid_input("position information missing"))?;

    let rotation = match (wire.rotation_matrix, wire.quat) {
        (Some(matrix), _) => WireRotation::Matrix(matrix),
        (None, Some(quat)) => WireRotation::Quaternion(quat),
        (None, None) => return Err(ForestError::invalid_input("rotation information missing")),
    };

    Ok(SerializedRecord {
        type_tag: wire.type_tag.unwrap_or_default(),
        position,
        rotation,
        scale: wire.scale.unwrap_or(1.0),
    })
}

/// Convert a forest item to a create-instance instruction
pub fn decode_record(record: &SerializedRecord, kind: ObjectKind) -> Result<CreateInstance, ForestError> {
    let rotation = match &record.rotation {
        WireRotation::Quaternion(q @ [x, y, z, w]) => {
            if !all_finite(q) {
                return Err(ForestError::invalid_input("quaternion is not finite"));
            }
            convention::decode_quaternion(&Quaternion::new(*w, *x, *y, *z))?
        }
        WireRotation::Matrix(rows) => {
            if !all_finite(rows) {
                return Err(ForestError::invalid_input("rotation matrix is not finite"));
            }
            convention::decode_matrix(rows)
        }
    };

    if record.scale <= 0.0 {
        warn!("Forest item '{}' has non-positive scale {}", record.type_tag, record.scale);
    }

    let [x, y, z] = record.position;
    Ok(CreateInstance {
        kind,
        type_tag: record.type_tag.clone(),
        position: Vec3::new(x, y, z),
        rotation,
        scale: record.scale,
    })
}

/// Import a canonical forest stream, collecting per-line failures
pub fn import<R: BufRead>(source: R, kind: ObjectKind) -> Result<ImportReport, ForestError> {
    import_with_policy(source, kind, ErrorPolicy::default())
}

/// Byte order mark some editors put at the start of a UTF-8 file
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Decode one raw input line; `None` for a blank line
fn decode_line(bytes: &[u8], first: bool, kind: ObjectKind) -> Result<Option<CreateInstance>, ForestError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ForestError::invalid_input(format!("line is not valid UTF-8: {e}")))?;
    let text = text.strip_suffix('\r').unwrap_or(text);
    let text = if first {
        text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
    } else {
        text
    };

    if text.trim().is_empty() {
        return Ok(None);
    }
    let record = parse_line(text)?;
    decode_record(&record, kind).map(Some)
}

/// Import a canonical forest stream with an explicit failure policy
///
/// Read errors always abort the import. Lines are handled as raw bytes, so
/// a line that is not valid UTF-8 is a bad record like any other. Blank
/// lines are skipped and a leading byte order mark is ignored.
pub fn import_with_policy<R: BufRead>(
    source: R,
    kind: ObjectKind,
    policy: ErrorPolicy,
) -> Result<ImportReport, ForestError> {
    let mut report = ImportReport::default();

    for (index, bytes) in source.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line_number = index + 1;

        match decode_line(&bytes, index == 0, kind) {
            Ok(Some(instruction)) => report.instructions.push(instruction),
            Ok(None) => {}
            Err(error) => {
                let error = error.at_line(line_number);
                if policy == ErrorPolicy::FailFast {
                    return Err(error);
                }
                warn!("Skipping forest line: {}", error);
                report.failures.push(LineFailure {
                    line: line_number,
                    error,
                });
            }
        }
    }

    debug!(
        "Decoded {} forest items, rejected {} lines",
        report.instructions.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Import a canonical forest file
pub fn import_from_path(
    path: impl AsRef<Path>,
    kind: ObjectKind,
    policy: ErrorPolicy,
) -> Result<ImportReport, ForestError> {
    let path = path.as_ref();
    info!("importing forest: {}...", path.display());

    let reader = BufReader::new(File::open(path)?);
    let report = import_with_policy(reader, kind, policy)?;

    info!(" {} items read", report.instructions.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn import_str(text: &str, policy: ErrorPolicy) -> Result<ImportReport, ForestError> {
        import_with_policy(Cursor::new(text), ObjectKind::Marker, policy)
    }

    #[test]
    fn test_object_kind_parsing() {
        assert_eq!("marker".parse::<ObjectKind>().unwrap(), ObjectKind::Marker);
        assert_eq!("MESH".parse::<ObjectKind>().unwrap(), ObjectKind::Instance);
        assert!("cube".parse::<ObjectKind>().is_err());
        assert_eq!(ObjectKind::Instance.to_string(), "instance");
    }

    #[test]
    fn test_parse_canonical_line() {
        let record = parse_line(r#"{"type":"oak","pos":[1,2,3],"quat":[1,0,0,0],"scale":2.5}"#).unwrap();

        assert_eq!(record.type_tag, "oak");
        assert_eq!(record.position, [1.0, 2.0, 3.0]);
        assert_eq!(record.rotation, WireRotation::Quaternion([1.0, 0.0, 0.0, 0.0]));
        assert_eq!(record.scale, 2.5);
    }

    #[test]
    fn test_scale_defaults_to_one() {
        let record = parse_line(r#"{"type":"oak","pos":[0,0,0],"quat":[1,0,0,0]}"#).unwrap();
        assert_eq!(record.scale, 1.0);
    }

    #[test]
    fn test_matrix_preferred_over_quaternion() {
        let record = parse_line(
            r#"{"pos":[0,0,0],"quat":[1,0,0,0],"rotationMatrix":[1,0,0,0,1,0,0,0,1]}"#,
        )
        .unwrap();

        assert!(matches!(record.rotation, WireRotation::Matrix(_)));
        assert_eq!(record.type_tag, "");
    }

    #[test]
    fn test_missing_rotation_is_invalid_input() {
        let err = parse_line(r#"{"type":"oak","pos":[0,0,0],"scale":1}"#).unwrap_err();
        assert!(matches!(err, ForestError::InvalidInput { ref reason, .. } if reason.contains("rotation")));
    }

    #[test]
    fn test_missing_position_is_invalid_input() {
        let err = parse_line(r#"{"type":"oak","quat":[1,0,0,0]}"#).unwrap_err();
        assert!(matches!(err, ForestError::InvalidInput { ref reason, .. } if reason.contains("position")));
    }

    #[test]
    fn test_short_array_is_invalid_input() {
        let err = parse_line(r#"{"pos":[0,0],"quat":[1,0,0,0]}"#).unwrap_err();
        assert!(err.is_record_error());
    }

    #[test]
    fn test_decode_identity_wire_quaternion() {
        // The wire identity decodes to the half-turned source orientation
        let record = parse_line(r#"{"type":"oak","pos":[5,6,7],"quat":[0,0,0,1]}"#).unwrap();
        let instruction = decode_record(&record, ObjectKind::Instance).unwrap();

        assert_eq!(instruction.kind, ObjectKind::Instance);
        assert_eq!(instruction.position, Vec3::new(5.0, 6.0, 7.0));
        let angle = instruction
            .rotation
            .to_quaternion()
            .angle_to(&EulerXyz::new(0.0, 0.0, PI).to_quaternion());
        assert!(angle < 1e-9);
    }

    #[test]
    fn test_empty_stream() {
        let report = import_str("", ErrorPolicy::FailFast).unwrap();
        assert!(report.instructions.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "\n{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n   \n";
        let report = import_str(text, ErrorPolicy::FailFast).unwrap();
        assert_eq!(report.instructions.len(), 1);
    }

    #[test]
    fn test_fail_fast_aborts_on_first_bad_line() {
        let text = concat!(
            "{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n",
            "{\"type\":\"oak\",\"pos\":[0,0,0]}\n",
            "{\"type\":\"oak\",\"pos\":[1,1,1],\"quat\":[1,0,0,0]}\n",
        );
        let err = import_str(text, ErrorPolicy::FailFast).unwrap_err();
        assert!(matches!(err, ForestError::InvalidInput { line: Some(2), .. }));
    }

    #[test]
    fn test_collect_keeps_good_lines() {
        let text = concat!(
            "{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n",
            "not json\n",
            "{\"type\":\"oak\",\"pos\":[0,0,0]}\n",
            "{\"type\":\"oak\",\"pos\":[1,1,1],\"quat\":[1,0,0,0],\"scale\":3}\n",
        );
        let report = import_str(text, ErrorPolicy::CollectAndReport).unwrap();

        assert_eq!(report.instructions.len(), 2);
        assert_relative_eq!(report.instructions[1].scale, 3.0);
        let lines: Vec<usize> = report.failures.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![2, 3]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_invalid_utf8_line_is_a_bad_record() {
        let mut bytes = b"{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n".to_vec();
        bytes.extend_from_slice(b"{\"type\":\"\xff\xfe\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n");
        bytes.extend_from_slice(b"{\"type\":\"pine\",\"pos\":[1,2,3],\"quat\":[1,0,0,0]}\n");

        let report = import_with_policy(Cursor::new(&bytes), ObjectKind::Marker, ErrorPolicy::CollectAndReport).unwrap();
        assert_eq!(report.instructions.len(), 2);
        assert_eq!(report.instructions[1].type_tag, "pine");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 2);
        assert!(report.failures[0].error.is_record_error());

        let err = import_with_policy(Cursor::new(&bytes), ObjectKind::Marker, ErrorPolicy::FailFast).unwrap_err();
        assert!(matches!(err, ForestError::InvalidInput { line: Some(2), .. }));
    }

    #[test]
    fn test_read_failure_is_io_error() {
        struct BrokenSource;

        impl std::io::Read for BrokenSource {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
            }
        }

        let source = std::io::BufReader::new(BrokenSource);
        let err = import_with_policy(source, ObjectKind::Marker, ErrorPolicy::CollectAndReport).unwrap_err();
        assert!(matches!(err, ForestError::Io(_)));
    }

    #[test]
    fn test_leading_byte_order_mark_is_ignored() {
        let text = "\u{feff}{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n";
        let report = import_str(text, ErrorPolicy::FailFast).unwrap();

        assert_eq!(report.instructions.len(), 1);
        assert_eq!(report.instructions[0].type_tag, "oak");
    }

    #[test]
    fn test_byte_order_mark_only_stripped_on_first_line() {
        let text = concat!(
            "{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n",
            "\u{feff}{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\n",
        );
        let report = import_str(text, ErrorPolicy::CollectAndReport).unwrap();

        assert_eq!(report.instructions.len(), 1);
        assert_eq!(report.failures[0].line, 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "{\"type\":\"oak\",\"pos\":[0,0,0],\"quat\":[1,0,0,0]}\r\n\r\n{\"type\":\"oak\",\"pos\":[1,1,1],\"quat\":[1,0,0,0]}\r\n";
        let report = import_str(text, ErrorPolicy::FailFast).unwrap();
        assert_eq!(report.instructions.len(), 2);
    }

    #[test]
    fn test_default_policy_collects() {
        let text = "{\"pos\":[0,0,0]}\n";
        let report = import(Cursor::new(text), ObjectKind::Marker).unwrap();
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = import_from_path("/nonexistent/dir/none.forest4.json", ObjectKind::Marker, ErrorPolicy::FailFast)
            .unwrap_err();
        assert!(matches!(err, ForestError::Io(_)));
    }
}
