//! Scene graph trait and an in-memory implementation
//!
//! Hosts plug their own object model in through [`ForestScene`].

use crate::forest::decoder::CreateInstance;

/// Host scene that receives imported forest items
pub trait ForestScene {
    /// Whether a container with this name already exists
    fn contains_collection(&self, name: &str) -> bool;

    /// Create an empty container
    fn create_collection(&mut self, name: &str);

    /// Create one host object inside a container
    fn add_instance(&mut self, collection: &str, instance: CreateInstance);
}

/// A named group of created instances
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneCollection {
    /// Container name
    pub name: String,
    /// Instances in creation order
    pub instances: Vec<CreateInstance>,
}

/// In-memory scene holding collections in creation order
#[derive(Debug, Clone, Default)]
pub struct SceneCollections {
    collections: Vec<SceneCollection>,
}

impl SceneCollections {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&SceneCollection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Collection names in creation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }

    /// Number of collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the scene has no collections
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Total number of instances across all collections
    pub fn instance_count(&self) -> usize {
        self.collections.iter().map(|c| c.instances.len()).sum()
    }
}

impl ForestScene for SceneCollections {
    fn contains_collection(&self, name: &str) -> bool {
        self.collection(name).is_some()
    }

    fn create_collection(&mut self, name: &str) {
        if !self.contains_collection(name) {
            self.collections.push(SceneCollection {
                name: name.to_string(),
                instances: Vec::new(),
            });
        }
    }

    fn add_instance(&mut self, collection: &str, instance: CreateInstance) {
        match self.collections.iter_mut().find(|c| c.name == collection) {
            Some(target) => target.instances.push(instance),
            None => {
                log::warn!("Instance added to unknown collection '{}', creating it", collection);
                self.collections.push(SceneCollection {
                    name: collection.to_string(),
                    instances: vec![instance],
                });
            }
        }
    }
}
