//! Scene collaborator
//!
//! The forest decoder only produces instructions; creating host objects is
//! the scene's job. This module defines the seam between the two.
//!
//! ## Architecture
//!
//! ```text
//! forest4 file
//!      ↓
//! Decoder (CreateInstance instructions)
//!      ↓
//! SceneImporter (collision check, container creation)
//!      ↓
//! ForestScene (host scene graph)
//! ```

mod scene_graph;
mod scene_importer;

pub use scene_graph::{ForestScene, SceneCollection, SceneCollections};
pub use scene_importer::{SceneImport, SceneImporter};
