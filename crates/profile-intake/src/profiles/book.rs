//! In-memory collection of student profiles.

use super::{StudentProfile, ValidProfile};
use crate::error::ProfileError;
use chrono::Utc;
use serde::{Deserialize, Serialize, Serializer};

/// Snapshot schema version.
const DATA_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookSnapshot {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    profiles: Vec<StudentProfile>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookSnapshotRef<'a> {
    version: u32,
    next_id: u64,
    profiles: &'a [StudentProfile],
}

fn default_version() -> u32 {
    DATA_VERSION
}

/// Student profiles in creation order.
///
/// Ids are assigned sequentially from 1 and never reused, including after a
/// failed write is rolled back.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "BookSnapshot")]
pub struct ProfileBook {
    next_id: u64,
    profiles: Vec<StudentProfile>,
}

impl Default for ProfileBook {
    fn default() -> Self {
        Self {
            next_id: 1,
            profiles: Vec::new(),
        }
    }
}

impl ProfileBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a validated profile, assigning its id and creation time.
    pub fn add(&mut self, profile: ValidProfile) -> Result<StudentProfile, ProfileError> {
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or(ProfileError::IdsExhausted)?;

        let stored = StudentProfile {
            id: self.next_id,
            full_name: profile.full_name,
            email: profile.email,
            date_of_birth: profile.date_of_birth,
            address: profile.address,
            education_background: profile.education_background,
            created_at: Utc::now(),
        };
        self.next_id = next_id;
        self.profiles.push(stored.clone());
        Ok(stored)
    }

    /// Remove a profile by id.
    pub fn remove(&mut self, id: u64) -> Option<StudentProfile> {
        let index = self.profiles.iter().position(|p| p.id == id)?;
        Some(self.profiles.remove(index))
    }

    /// All profiles, oldest first.
    pub fn list(&self) -> &[StudentProfile] {
        &self.profiles
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    /// Find a profile by email, ignoring ASCII case.
    pub fn find_by_email(&self, email: &str) -> Option<&StudentProfile> {
        let email = email.trim();
        self.profiles
            .iter()
            .find(|p| p.email.trim().eq_ignore_ascii_case(email))
    }
}

impl Serialize for ProfileBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BookSnapshotRef {
            version: DATA_VERSION,
            next_id: self.next_id,
            profiles: &self.profiles,
        }
        .serialize(serializer)
    }
}

impl TryFrom<BookSnapshot> for ProfileBook {
    type Error = String;

    fn try_from(snapshot: BookSnapshot) -> Result<Self, Self::Error> {
        if snapshot.version > DATA_VERSION {
            return Err(format!(
                "unsupported profile snapshot version {}",
                snapshot.version
            ));
        }

        let max_id = snapshot.profiles.iter().map(|p| p.id).max().unwrap_or(0);
        if max_id == u64::MAX || snapshot.next_id == u64::MAX {
            return Err("profile id space exhausted".to_string());
        }

        let mut profiles = snapshot.profiles;
        profiles.sort_by_key(|p| p.id);
        if profiles.windows(2).any(|w| w[0].id == w[1].id) {
            return Err("duplicate profile id in snapshot".to_string());
        }

        Ok(Self {
            next_id: snapshot.next_id.max(max_id + 1),
            profiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(name: &str, email: &str) -> ValidProfile {
        ValidProfile {
            full_name: name.into(),
            email: email.into(),
            date_of_birth: "2005-03-01".into(),
            address: "1 Main St".into(),
            education_background: "High school".into(),
        }
    }

    #[test]
    fn test_sequential_ids() {
        let mut book = ProfileBook::new();
        let a = book.add(valid("A", "a@x.com")).unwrap();
        let b = book.add(valid("B", "b@x.com")).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(book.count(), 2);
        assert_eq!(book.list()[1].full_name, "B");
    }

    #[test]
    fn test_removed_id_not_reused() {
        let mut book = ProfileBook::new();
        let a = book.add(valid("A", "a@x.com")).unwrap();
        assert!(book.remove(a.id).is_some());
        assert!(book.remove(a.id).is_none());

        let b = book.add(valid("B", "b@x.com")).unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(book.count(), 1);
    }

    #[test]
    fn test_find_by_email_ignores_case() {
        let mut book = ProfileBook::new();
        book.add(valid("A", "Ada@Example.edu")).unwrap();

        assert!(book.find_by_email("ada@example.edu").is_some());
        assert!(book.find_by_email("bob@example.edu").is_none());
    }

    #[test]
    fn test_snapshot_restores_next_id() {
        let mut book = ProfileBook::new();
        book.add(valid("A", "a@x.com")).unwrap();
        book.add(valid("B", "b@x.com")).unwrap();

        let json = serde_json::to_string(&book).unwrap();
        let mut restored: ProfileBook = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.list(), book.list());
        assert_eq!(restored.add(valid("C", "c@x.com")).unwrap().id, 3);
    }

    #[test]
    fn test_snapshot_next_id_above_existing() {
        let json = r#"{"nextId": 1, "profiles": [{
            "id": 9, "fullName": "A", "email": "a@x.com", "dateOfBirth": "2005-03-01",
            "address": "x", "educationBackground": "y", "createdAt": "2026-01-01T00:00:00Z"
        }]}"#;

        let mut book: ProfileBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.add(valid("B", "b@x.com")).unwrap().id, 10);
    }

    #[test]
    fn test_snapshot_rejects_exhausted_next_id() {
        let json = format!(r#"{{"nextId": {}}}"#, u64::MAX);
        let result: Result<ProfileBook, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_stops_at_last_id() {
        let json = format!(r#"{{"nextId": {}}}"#, u64::MAX - 1);
        let mut book: ProfileBook = serde_json::from_str(&json).unwrap();

        let last = book.add(valid("A", "a@x.com")).unwrap();
        assert_eq!(last.id, u64::MAX - 1);

        let result = book.add(valid("B", "b@x.com"));
        assert!(matches!(result, Err(ProfileError::IdsExhausted)));
        assert_eq!(book.count(), 1);
    }

    #[test]
    fn test_snapshot_rejects_newer_version() {
        let result: Result<ProfileBook, _> = serde_json::from_str(r#"{"version": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_snapshot() {
        let mut book: ProfileBook = serde_json::from_str("{}").unwrap();
        assert_eq!(book.count(), 0);
        assert_eq!(book.add(valid("A", "a@x.com")).unwrap().id, 1);
    }
}
