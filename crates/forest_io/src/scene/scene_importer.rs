//! Scene Importer - Bridge between the forest decoder and a host scene
//!
//! The importer:
//! 1. Refuses to import into a container that already exists
//! 2. Decodes the whole stream before touching the scene
//! 3. Creates the container and one host object per decoded item

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::core::config::ImportConfig;
use crate::forest::decoder::{import_with_policy, ErrorPolicy, LineFailure, ObjectKind};
use crate::forest::error::ForestError;
use crate::forest::naming::container_name_from_path;
use crate::scene::ForestScene;

/// Outcome of importing one forest stream into a scene
#[derive(Debug)]
pub struct SceneImport {
    /// Container the items were placed in
    pub collection: String,
    /// Number of host objects created
    pub created: usize,
    /// Lines that were skipped
    pub failures: Vec<LineFailure>,
}

/// Imports forest streams into a [`ForestScene`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneImporter {
    kind: ObjectKind,
    policy: ErrorPolicy,
}

impl SceneImporter {
    /// Create an importer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an importer from import configuration
    pub const fn with_config(config: &ImportConfig) -> Self {
        Self {
            kind: config.object_kind,
            policy: config.error_policy,
        }
    }

    /// Builder pattern: set the host object kind
    #[must_use]
    pub const fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder pattern: set the failure policy
    #[must_use]
    pub const fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Import `source` into a new container named `collection`
    ///
    /// Fails with [`ForestError::NameCollision`] before reading anything if
    /// the container exists. Under [`ErrorPolicy::FailFast`] a bad line
    /// leaves the scene untouched.
    pub fn import<S: ForestScene, R: BufRead>(
        &self,
        scene: &mut S,
        collection: &str,
        source: R,
    ) -> Result<SceneImport, ForestError> {
        if scene.contains_collection(collection) {
            return Err(ForestError::NameCollision(collection.to_string()));
        }

        let report = import_with_policy(source, self.kind, self.policy)?;

        scene.create_collection(collection);
        let created = report.instructions.len();
        for instruction in report.instructions {
            scene.add_instance(collection, instruction);
        }

        info!("Created {} {} objects in '{}'", created, self.kind, collection);
        Ok(SceneImport {
            collection: collection.to_string(),
            created,
            failures: report.failures,
        })
    }

    /// Import a forest file, naming the container after the file
    pub fn import_path<S: ForestScene>(
        &self,
        scene: &mut S,
        path: impl AsRef<Path>,
    ) -> Result<SceneImport, ForestError> {
        let path = path.as_ref();
        let collection = container_name_from_path(path);
        if scene.contains_collection(&collection) {
            return Err(ForestError::NameCollision(collection));
        }

        let reader = BufReader::new(File::open(path)?);
        self.import(scene, &collection, reader)
    }
}
