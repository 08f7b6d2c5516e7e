//! Forest placement import/export
//!
//! Converts placement records between the host scene's right-handed Z-up
//! convention and forest item files. One geometry core
//! ([`convention`]) is shared by the encoder and the decoder; the envelopes
//! only differ in shape.
//!
//! ## Data flow
//!
//! ```text
//! PlacementRecord --encoder--> SerializedRecord --envelope--> bytes
//! bytes (v4) --parse_line--> SerializedRecord --decoder--> CreateInstance
//! ```

pub mod convention;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod naming;
pub mod record;

#[cfg(test)]
mod tests;

pub use decoder::{
    decode_record, import, import_from_path, import_with_policy, parse_line, CreateInstance,
    ErrorPolicy, ImportReport, LineFailure, ObjectKind,
};
pub use encoder::{
    encode_record, export, export_to_path, write_items, ForestFormat, PLACEHOLDER_TYPE_TAG,
};
pub use error::ForestError;
pub use naming::{container_name_from_path, with_format_extension};
pub use record::{
    PlacementRecord, SerializedRecord, SourceKind, SourceRotation, SourceScale, WireRotation,
};
