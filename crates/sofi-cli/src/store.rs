//! The JSON entity store and its agent.
//!
//! Entities live in a single JSON document, one entry per name, each entry
//! carrying the serialized entity and a SHA-256 checksum. The checksum is
//! verified on import; a mismatch means the stored body cannot be
//! authenticated and the import reports [`AgentResult::Untrusted`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

use sofi::{Agent, AgentResult};

use crate::entity::DemoEntity;

/// Errors of store encoding and I/O.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("store I/O: {0}")]
    Io(#[from] std::io::Error),
    /// An entity or the store document could not be encoded or decoded.
    #[error("store encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// One stored entity: the serialized body and its checksum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntity {
    /// The entity serialized as JSON.
    pub body: String,
    /// Hex SHA-256 of the body.
    pub checksum: String,
}

/// A named collection of stored entities.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EntityStore {
    entities: BTreeMap<String, StoredEntity>,
}

fn checksum(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl EntityStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store document from a file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the store document to a file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Serializes `entity` and stores it under its name, replacing any
    /// previous entry.
    pub fn insert(&mut self, entity: &DemoEntity) -> Result<(), StoreError> {
        let body = serde_json::to_string(entity)?;
        let checksum = checksum(&body);
        self.entities
            .insert(entity.name.clone(), StoredEntity { body, checksum });
        Ok(())
    }

    /// Removes the entry for `name`; reports whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entities.remove(name).is_some()
    }

    /// Whether an entry for `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// The stored entry for `name`.
    pub fn get(&self, name: &str) -> Option<&StoredEntity> {
        self.entities.get(name)
    }

    /// Direct mutable access to an entry, for tampering in tests.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut StoredEntity> {
        self.entities.get_mut(name)
    }

    /// The stored names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

/// The agent bridging the engine to an [`EntityStore`].
///
/// Messages are entity names. Export serializes the entity into the store;
/// import looks the name up, verifies the checksum and deserializes.
pub struct StoreAgent<'a> {
    store: &'a RefCell<EntityStore>,
}

impl<'a> StoreAgent<'a> {
    /// An agent over a shared store.
    pub fn new(store: &'a RefCell<EntityStore>) -> Self {
        Self { store }
    }
}

impl Agent for StoreAgent<'_> {
    type Entity = DemoEntity;
    type Message = String;

    fn export_msg(&self, entity: &DemoEntity, message: &mut String) -> AgentResult {
        match self.store.borrow_mut().insert(entity) {
            Ok(()) => {
                message.clone_from(&entity.name);
                AgentResult::Success
            }
            Err(error) => {
                warn!(name = %entity.name, %error, "entity export failed");
                AgentResult::Error
            }
        }
    }

    fn import_msg(&self, message: &String, entity: &mut DemoEntity) -> AgentResult {
        let store = self.store.borrow();
        let Some(stored) = store.get(message) else {
            warn!(name = %message, "entity is not in the store");
            return AgentResult::Error;
        };
        if checksum(&stored.body) != stored.checksum {
            warn!(name = %message, "stored entity failed its checksum");
            return AgentResult::Untrusted;
        }
        match serde_json::from_str(&stored.body) {
            Ok(imported) => {
                *entity = imported;
                AgentResult::Success
            }
            Err(error) => {
                warn!(name = %message, %error, "entity import failed");
                AgentResult::Error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> DemoEntity {
        let mut entity = DemoEntity::named("alice");
        entity.data = "payload".into();
        entity
    }

    #[test]
    fn export_then_import_round_trips() {
        let store = RefCell::new(EntityStore::new());
        let agent = StoreAgent::new(&store);

        let mut message = String::new();
        assert!(agent.export_msg(&alice(), &mut message).ok());
        assert_eq!(message, "alice");

        let mut imported = DemoEntity::default();
        assert!(agent.import_msg(&message, &mut imported).ok());
        assert_eq!(imported, alice());
    }

    #[test]
    fn missing_entity_is_an_error() {
        let store = RefCell::new(EntityStore::new());
        let agent = StoreAgent::new(&store);
        let mut imported = DemoEntity::default();
        assert_eq!(
            agent.import_msg(&"nobody".to_string(), &mut imported),
            AgentResult::Error
        );
    }

    #[test]
    fn tampered_body_is_untrusted() {
        let store = RefCell::new(EntityStore::new());
        store.borrow_mut().insert(&alice()).unwrap();
        store
            .borrow_mut()
            .get_mut("alice")
            .unwrap()
            .body
            .push_str(" ");

        let agent = StoreAgent::new(&store);
        let mut imported = DemoEntity::default();
        assert_eq!(
            agent.import_msg(&"alice".to_string(), &mut imported),
            AgentResult::Untrusted
        );
    }

    #[test]
    fn save_and_load_preserve_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = EntityStore::new();
        store.insert(&alice()).unwrap();
        store.save(&path).unwrap();

        let loaded = EntityStore::load(&path).unwrap();
        assert!(loaded.contains("alice"));
        assert_eq!(loaded.names().collect::<Vec<_>>(), vec!["alice"]);
    }
}
