//! In-memory identity registry with unique email and phone indexes.

use super::IdentityRecord;
use crate::error::RegistrationError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use uuid::Uuid;

/// Snapshot schema version.
const DATA_VERSION: u32 = 1;

/// Persisted form of the registry.
#[derive(Debug, Deserialize)]
struct RegistrySnapshot {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    records: Vec<IdentityRecord>,
}

#[derive(Serialize)]
struct RegistrySnapshotRef<'a> {
    version: u32,
    records: &'a [IdentityRecord],
}

fn default_version() -> u32 {
    DATA_VERSION
}

/// In-memory identity registry.
///
/// Email and phone are unique keys: `insert` refuses a record whose email or
/// phone is already taken, so the check and the write cannot be separated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RegistrySnapshot")]
pub struct Registry {
    /// Records in registration order
    records: Vec<IdentityRecord>,
    /// Email -> index into `records`
    by_email: HashMap<String, usize>,
    /// Phone -> index into `records`
    by_phone: HashMap<String, usize>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail if the email or phone is already taken. Email is checked first.
    pub fn check_available(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), RegistrationError> {
        if email.is_some_and(|e| self.by_email.contains_key(e)) {
            return Err(RegistrationError::EmailTaken);
        }
        if phone.is_some_and(|p| self.by_phone.contains_key(p)) {
            return Err(RegistrationError::PhoneTaken);
        }
        Ok(())
    }

    /// Insert a new record, enforcing email and phone uniqueness.
    pub fn insert(&mut self, record: IdentityRecord) -> Result<(), RegistrationError> {
        if record.email.is_none() && record.phone.is_none() {
            return Err(RegistrationError::MissingIdentifier);
        }
        self.check_available(record.email.as_deref(), record.phone.as_deref())?;

        let index = self.records.len();
        if let Some(email) = &record.email {
            self.by_email.insert(email.clone(), index);
        }
        if let Some(phone) = &record.phone {
            self.by_phone.insert(phone.clone(), index);
        }
        self.records.push(record);
        Ok(())
    }

    /// Remove a record by id.
    pub fn remove(&mut self, id: Uuid) -> Option<IdentityRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let record = self.records.remove(index);
        self.reindex();
        Some(record)
    }

    /// Replace a stored record with an earlier copy of itself.
    ///
    /// Email and phone must be unchanged; returns `false` if no record has the
    /// same id.
    pub fn restore(&mut self, record: IdentityRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    /// Get a record by id.
    pub fn get(&self, id: Uuid) -> Option<&IdentityRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Find a record by email, or failing that by phone.
    pub fn find(&self, email_or_phone: &str) -> Option<&IdentityRecord> {
        self.index_of(email_or_phone).map(|i| &self.records[i])
    }

    /// Find a mutable record by email, or failing that by phone.
    pub fn find_mut(&mut self, email_or_phone: &str) -> Option<&mut IdentityRecord> {
        self.index_of(email_or_phone)
            .map(move |i| &mut self.records[i])
    }

    /// Get the number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Get the number of verified records.
    pub fn count_verified(&self) -> usize {
        self.records.iter().filter(|r| r.verified).count()
    }

    fn index_of(&self, email_or_phone: &str) -> Option<usize> {
        self.by_email
            .get(email_or_phone)
            .or_else(|| self.by_phone.get(email_or_phone))
            .copied()
    }

    fn reindex(&mut self) {
        self.by_email.clear();
        self.by_phone.clear();
        for (index, record) in self.records.iter().enumerate() {
            if let Some(email) = &record.email {
                self.by_email.insert(email.clone(), index);
            }
            if let Some(phone) = &record.phone {
                self.by_phone.insert(phone.clone(), index);
            }
        }
    }
}

impl Serialize for Registry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RegistrySnapshotRef {
            version: DATA_VERSION,
            records: &self.records,
        }
        .serialize(serializer)
    }
}

impl TryFrom<RegistrySnapshot> for Registry {
    type Error = String;

    fn try_from(snapshot: RegistrySnapshot) -> Result<Self, Self::Error> {
        if snapshot.version > DATA_VERSION {
            return Err(format!(
                "unsupported registry snapshot version {}",
                snapshot.version
            ));
        }

        let mut registry = Registry::new();
        for record in snapshot.records {
            let id = record.id;
            registry
                .insert(record)
                .map_err(|e| format!("record {id} rejected: {e}"))?;
        }
        Ok(registry)
    }
}
