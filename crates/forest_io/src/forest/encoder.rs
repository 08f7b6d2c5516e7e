//! Placement encoder
//!
//! Converts host placement records to forest items and writes them in one
//! of the supported envelopes:
//!
//! - **v1**: a single object holding a format marker and one array of rows
//!   per item name, one row per line
//! - **v3**: a header describing the row layout plus a `data` list whose
//!   rows start with the item name
//! - **v4**: one self-describing JSON object per line (NDJSON)
//!
//! Only v4 can be imported again.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils::all_finite, Mat3, Quat, Rotation3};
use crate::forest::convention;
use crate::forest::error::ForestError;
use crate::forest::naming::{CANONICAL_EXTENSION, LEGACY_EXTENSION};
use crate::forest::record::{PlacementRecord, SerializedRecord, WireLine, WireRotation};

/// Item name written when the caller did not provide one
pub const PLACEHOLDER_TYPE_TAG: &str = "you_forgot_to_set_this";

/// Format marker of the v1 envelope
pub const V1_FORMAT_NAME: &str = "Json Forest Data v1";

/// Top-level key holding the v1 format marker; not usable as an item name
pub const V1_FORMAT_KEY: &str = "format";

/// Row layout announced in the v3 header
pub const V3_FIELDS: [&str; 9] = ["type", "x", "y", "z", "qx", "qy", "qz", "qw", "scale"];

/// Forest file envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForestFormat {
    /// Legacy grouped array format
    V1,
    /// Legacy header + data array format
    V3,
    /// Canonical line-delimited object format
    #[default]
    V4,
}

impl ForestFormat {
    /// Format version number
    pub const fn version(self) -> u32 {
        match self {
            Self::V1 => 1,
            Self::V3 => 3,
            Self::V4 => 4,
        }
    }

    /// File extension used for this format
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::V1 | Self::V3 => LEGACY_EXTENSION,
            Self::V4 => CANONICAL_EXTENSION,
        }
    }

    /// Whether the decoder can read this format back
    pub const fn is_importable(self) -> bool {
        matches!(self, Self::V4)
    }
}

impl fmt::Display for ForestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version())
    }
}

impl FromStr for ForestFormat {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v3" | "3" => Ok(Self::V3),
            "v4" | "4" => Ok(Self::V4),
            other => Err(ForestError::InvalidConfiguration(format!(
                "unknown forest format '{other}' (expected v1, v3 or v4)"
            ))),
        }
    }
}

/// Resolve the batch item name, substituting the placeholder for an empty one
pub fn resolve_type_tag(type_tag: &str) -> &str {
    if type_tag.is_empty() {
        warn!("No forest item name set, using '{}'", PLACEHOLDER_TYPE_TAG);
        PLACEHOLDER_TYPE_TAG
    } else {
        type_tag
    }
}

/// Convert one placement record to a forest item
///
/// `batch_tag` is used when the record carries no name of its own; an empty
/// name resolves to [`PLACEHOLDER_TYPE_TAG`].
pub fn encode_record(record: &PlacementRecord, batch_tag: &str) -> Result<SerializedRecord, ForestError> {
    let position = convention::map_position(&record.position);
    if !all_finite(&position) {
        return Err(ForestError::invalid_input("position is not finite"));
    }

    let scale = convention::uniform_scale(&record.scale);
    if !scale.is_finite() {
        return Err(ForestError::invalid_input("scale is not finite"));
    }
    if scale <= 0.0 {
        return Err(ForestError::invalid_input(format!("scale must be positive, got {scale}")));
    }

    let orientation = convention::source_orientation(&record.rotation, record.kind)?;
    let wire = convention::encode_orientation(&orientation);
    let quat = [wire.i, wire.j, wire.k, wire.w];
    if !all_finite(&quat) {
        return Err(ForestError::invalid_input("rotation is not finite"));
    }

    let type_tag = match record.type_tag.as_deref() {
        Some(tag) if !tag.is_empty() => tag,
        _ => resolve_type_tag(batch_tag),
    };

    Ok(SerializedRecord {
        type_tag: type_tag.to_string(),
        position,
        rotation: WireRotation::Quaternion(quat),
        scale,
    })
}

/// Export placement records to `sink`
///
/// All records are converted before anything is written, so an invalid
/// record leaves the sink untouched. Zero records produce a valid empty
/// document.
pub fn export<W: Write>(
    sink: W,
    type_tag: &str,
    records: &[PlacementRecord],
    format: ForestFormat,
) -> Result<(), ForestError> {
    let batch_tag = resolve_type_tag(type_tag);
    let items = records
        .iter()
        .map(|record| encode_record(record, batch_tag))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Encoded {} forest items as {}", items.len(), format);
    write_items(sink, batch_tag, &items, format)
}

/// Export placement records to a file
///
/// The file is created (or truncated), fully written and closed before
/// returning, including on error.
pub fn export_to_path(
    path: impl AsRef<Path>,
    type_tag: &str,
    records: &[PlacementRecord],
    format: ForestFormat,
) -> Result<(), ForestError> {
    let path = path.as_ref();
    info!("exporting forest: {}...", path.display());
    let start = Instant::now();

    let writer = BufWriter::new(File::create(path)?);
    export(writer, type_tag, records, format)?;

    info!(" done in {:.4} sec.", start.elapsed().as_secs_f64());
    Ok(())
}

/// Write already converted forest items in the selected envelope
pub fn write_items<W: Write>(
    mut sink: W,
    batch_tag: &str,
    items: &[SerializedRecord],
    format: ForestFormat,
) -> Result<(), ForestError> {
    if format == ForestFormat::V1 {
        let reserved = items.iter().any(|item| item.type_tag == V1_FORMAT_KEY)
            || (items.is_empty() && batch_tag == V1_FORMAT_KEY);
        if reserved {
            return Err(ForestError::invalid_input(format!(
                "item name '{V1_FORMAT_KEY}' is reserved in v1 files"
            )));
        }
    }

    match format {
        ForestFormat::V1 => write_v1(&mut sink, batch_tag, items)?,
        ForestFormat::V3 => write_v3(&mut sink, items)?,
        ForestFormat::V4 => write_v4(&mut sink, items)?,
    }
    sink.flush()?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(sink: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(sink, value).map_err(io::Error::from)
}

/// Quaternion components of a wire rotation in the forest convention
fn wire_quaternion(rotation: &WireRotation) -> [f64; 4] {
    match rotation {
        WireRotation::Quaternion(q) => *q,
        WireRotation::Matrix(m) => {
            let rotation = Rotation3::from_matrix(&Mat3::from_row_slice(m));
            let q = Quat::from_rotation_matrix(&rotation);
            [q.i, q.j, q.k, q.w]
        }
    }
}

fn row(item: &SerializedRecord) -> [f64; 8] {
    let [x, y, z] = item.position;
    let [qx, qy, qz, qw] = wire_quaternion(&item.rotation);
    [x, y, z, qx, qy, qz, qw, item.scale]
}

/// Group items by name, keeping first-appearance order
fn group_by_tag<'a>(batch_tag: &'a str, items: &'a [SerializedRecord]) -> Vec<(&'a str, Vec<&'a SerializedRecord>)> {
    let mut groups: Vec<(&str, Vec<&SerializedRecord>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(tag, _)| *tag == item.type_tag) {
            Some((_, members)) => members.push(item),
            None => groups.push((item.type_tag.as_str(), vec![item])),
        }
    }
    if groups.is_empty() {
        groups.push((batch_tag, Vec::new()));
    }
    groups
}

fn write_rows<W: Write, T: Serialize>(sink: &mut W, rows: impl Iterator<Item = T>, indent: &str) -> io::Result<()> {
    let mut first = true;
    for row in rows {
        sink.write_all(if first { b"\n" } else { b",\n" })?;
        sink.write_all(indent.as_bytes())?;
        write_json(sink, &row)?;
        first = false;
    }
    if !first {
        sink.write_all(b"\n ")?;
    }
    Ok(())
}

fn write_v1<W: Write>(sink: &mut W, batch_tag: &str, items: &[SerializedRecord]) -> io::Result<()> {
    sink.write_all(b"{\n ")?;
    write_json(sink, V1_FORMAT_KEY)?;
    sink.write_all(b":")?;
    write_json(sink, V1_FORMAT_NAME)?;

    for (tag, members) in group_by_tag(batch_tag, items) {
        sink.write_all(b",\n ")?;
        write_json(sink, tag)?;
        sink.write_all(b":[")?;
        write_rows(sink, members.into_iter().map(row), "   ")?;
        sink.write_all(b"]")?;
    }

    sink.write_all(b"\n}\n")
}

#[derive(Serialize)]
struct V3Header {
    format: &'static str,
    fields: [&'static str; 9],
    version: u32,
}

fn write_v3<W: Write>(sink: &mut W, items: &[SerializedRecord]) -> io::Result<()> {
    let header = V3Header {
        format: "Json Forest Data",
        fields: V3_FIELDS,
        version: ForestFormat::V3.version(),
    };

    sink.write_all(b"{\n \"header\":")?;
    write_json(sink, &header)?;
    sink.write_all(b",\n \"data\":[")?;
    write_rows(
        sink,
        items.iter().map(|item| {
            let [x, y, z, qx, qy, qz, qw, scale] = row(item);
            (item.type_tag.as_str(), x, y, z, qx, qy, qz, qw, scale)
        }),
        "   ",
    )?;
    sink.write_all(b"]\n}\n")
}

fn write_v4<W: Write>(sink: &mut W, items: &[SerializedRecord]) -> io::Result<()> {
    for item in items {
        let mut line = WireLine::from(item);
        if let WireRotation::Matrix(_) = item.rotation {
            line.quat = Some(wire_quaternion(&item.rotation));
            line.rotation_matrix = None;
        }
        write_json(sink, &line)?;
        sink.write_all(b"\n")?;
    }
    Ok(())
}
