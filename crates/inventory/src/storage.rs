//! Storage locations (warehouses), identified by an opaque code.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use storehouse_core::{DomainError, DomainResult, Entity, StorageId, validate};

const MAX_ADDRESS_LEN: usize = 255;

/// A storage location.
///
/// Equality and hashing use the code only; name and address are descriptive.
#[derive(Debug, Clone)]
pub struct Storage {
    code: StorageId,
    name: String,
    address: String,
}

impl Storage {
    pub fn new(name: &str, address: &str) -> DomainResult<Self> {
        Self::with_code(StorageId::new(), name, address)
    }

    pub fn with_code(code: StorageId, name: &str, address: &str) -> DomainResult<Self> {
        Ok(Self {
            code,
            name: validate::name("storage name", name)?,
            address: validate::text("storage address", address, MAX_ADDRESS_LEN)?,
        })
    }

    pub fn code(&self) -> StorageId {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Entity for Storage {
    type Id = StorageId;

    fn id(&self) -> StorageId {
        self.code
    }
}

impl PartialEq for Storage {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Storage {}

impl Hash for Storage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// Registered storages, looked up by code or by name.
#[derive(Debug, Default)]
pub struct StorageRegistry {
    storages: Vec<Arc<Storage>>,
    by_code: HashMap<StorageId, usize>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, storage: Storage) -> DomainResult<Arc<Storage>> {
        if self.by_code.contains_key(&storage.code) {
            return Err(DomainError::conflict(format!(
                "storage {} is already registered",
                storage.code
            )));
        }
        let storage = Arc::new(storage);
        self.by_code.insert(storage.code, self.storages.len());
        self.storages.push(Arc::clone(&storage));
        Ok(storage)
    }

    pub fn get(&self, code: &StorageId) -> Option<&Arc<Storage>> {
        self.by_code.get(code).map(|&idx| &self.storages[idx])
    }

    /// Resolve a storage from user input: its code if `key` parses as one,
    /// otherwise its name.
    pub fn find(&self, key: &str) -> DomainResult<Arc<Storage>> {
        let key = key.trim();
        let by_code = key.parse::<StorageId>().ok().and_then(|code| self.get(&code));
        by_code
            .or_else(|| self.storages.iter().find(|s| s.name == key))
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("storage '{key}'")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Storage>> {
        self.storages.iter()
    }

    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }
}
