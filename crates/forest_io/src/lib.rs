//! # Forest IO
//!
//! Import and export of forest item placements between a right-handed Z-up
//! scene graph and forest JSON files.
//!
//! ## Features
//!
//! - **Coordinate Convention**: one shared mapping for positions, rotations and scale
//! - **Legacy Envelopes**: v1 grouped arrays and v3 header plus rows
//! - **Canonical Format**: v4 line-delimited JSON, one item per line
//! - **Scene Import**: decoded items placed into a new named container
//! - **Configuration**: TOML or RON files for both directions
//!
//! ## Quick Start
//!
//! ```rust
//! use forest_io::prelude::*;
//! use std::io::Cursor;
//!
//! let records = vec![PlacementRecord::object(
//!     Vec3::new(1.0, 2.0, 3.0),
//!     EulerXyz::new(0.0, 0.0, 0.5),
//!     Vec3::new(1.0, 1.0, 1.0),
//! )];
//!
//! let mut bytes = Vec::new();
//! export(&mut bytes, "tree_oak", &records, ForestFormat::V4)?;
//!
//! let report = import(Cursor::new(bytes), ObjectKind::Marker)?;
//! assert_eq!(report.instructions[0].type_tag, "tree_oak");
//! # Ok::<(), ForestError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod forest;
pub mod foundation;
pub mod scene;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        core::{Config, ExportConfig, ForestConfig, ImportConfig},
        forest::{
            export, export_to_path, import, import_from_path, import_with_policy,
            CreateInstance, ErrorPolicy, ForestError, ForestFormat, ImportReport, ObjectKind,
            PlacementRecord, SourceKind, SourceRotation, SourceScale,
        },
        foundation::math::{EulerXyz, Quat, Quaternion, Vec3},
        scene::{ForestScene, SceneCollections, SceneImporter},
    };
}
