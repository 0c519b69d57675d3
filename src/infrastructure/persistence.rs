//! Local document store for farmer records, and JSON export of snapshots.

use crate::domain::{
    FarmerStore, RecordUpdate, StoreError, StoreResult, UserRecord, hash_password,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Farmer records keyed by mobile number, optionally mirrored to a JSON file.
///
/// There is no separate identity provider here: credentials are checked by
/// comparing SHA-256 digests against the stored record. That is good
/// enough for local development and tests, not for production.
#[derive(Debug, Default)]
pub struct DocumentStore {
    path: Option<PathBuf>,
    records: BTreeMap<String, UserRecord>,
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a file-backed store. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), records = records.len(), "opened document store");
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    fn flush(&self) -> StoreResult<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&self.records)?;
            fs::write(path, json)?;
        }
        Ok(())
    }
}

impl FarmerStore for DocumentStore {
    fn create_credential(&mut self, _mobile: &str, _secret: &SecretString) -> StoreResult<String> {
        Ok(format!("local-{}", Uuid::new_v4()))
    }

    fn verify_credential(
        &mut self,
        mobile: &str,
        secret: &SecretString,
    ) -> StoreResult<Option<UserRecord>> {
        let digest = hash_password(secret.expose_secret());
        Ok(self
            .records
            .get(mobile)
            .filter(|record| record.password_hash == digest)
            .cloned())
    }

    fn record_exists(&mut self, mobile: &str) -> StoreResult<bool> {
        Ok(self.records.contains_key(mobile))
    }

    fn create_record(&mut self, mobile: &str, record: &UserRecord) -> StoreResult<()> {
        if self.records.contains_key(mobile) {
            return Err(StoreError::AlreadyExists(mobile.to_string()));
        }
        self.records.insert(mobile.to_string(), record.clone());
        if let Err(err) = self.flush() {
            self.records.remove(mobile);
            return Err(err);
        }
        Ok(())
    }

    fn update_record(&mut self, mobile: &str, update: &RecordUpdate) -> StoreResult<()> {
        let record = self
            .records
            .get_mut(mobile)
            .ok_or_else(|| StoreError::NotFound(mobile.to_string()))?;
        let previous = record.clone();
        record.apply(update);
        if let Err(err) = self.flush() {
            self.records.insert(mobile.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }

    fn get_record(&mut self, mobile: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.records.get(mobile).cloned())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("JSON file store ({})", path.display()),
            None => "in-memory store".to_string(),
        }
    }
}

/// Writes snapshots for the developer panel.
pub struct SessionExporter;

impl SessionExporter {
    pub fn export<T: Serialize>(snapshot: &T, filename: &str) -> Result<String, String> {
        match serde_json::to_string_pretty(snapshot) {
            Ok(json) => match fs::write(filename, &json) {
                Ok(_) => Ok(filename.to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Profile, Season, SoilType};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn record(mobile: &str, password: &str) -> UserRecord {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        UserRecord::new(mobile, hash_password(password), "local-test", now)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_create_and_verify() {
        let mut store = DocumentStore::in_memory();
        store.create_record("9876543210", &record("9876543210", "secret1")).unwrap();

        assert!(store.record_exists("9876543210").unwrap());
        assert!(store.verify_credential("9876543210", &secret("secret1")).unwrap().is_some());
        assert!(store.verify_credential("9876543210", &secret("Secret1")).unwrap().is_none());
        assert!(store.verify_credential("9000000000", &secret("secret1")).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let mut store = DocumentStore::in_memory();
        store.create_record("9876543210", &record("9876543210", "secret1")).unwrap();
        let result = store.create_record("9876543210", &record("9876543210", "other12"));
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));

        let kept = store.get_record("9876543210").unwrap().unwrap();
        assert_eq!(kept.password_hash, hash_password("secret1"));
    }

    #[test]
    fn test_update_missing_record() {
        let mut store = DocumentStore::in_memory();
        let update = RecordUpdate::last_login(Utc::now());
        assert!(matches!(
            store.update_record("9876543210", &update),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_credentials_are_unique() {
        let mut store = DocumentStore::in_memory();
        let a = store.create_credential("9876543210", &secret("secret1")).unwrap();
        let b = store.create_credential("9876543211", &secret("secret1")).unwrap();
        assert!(a.starts_with("local-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("farmers.json");

        let mut store = DocumentStore::open(&path).unwrap();
        assert!(!store.record_exists("9876543210").unwrap());
        store.create_record("9876543210", &record("9876543210", "secret1")).unwrap();
        let profile = Profile {
            name: "Asha".to_string(),
            land_size: 2.5,
            soil_type: SoilType::Silt,
            previous_crop: Some("Tea".to_string()),
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        store
            .update_record("9876543210", &RecordUpdate::profile(profile, Season::Summer, now))
            .unwrap();

        let mut reopened = DocumentStore::open(&path).unwrap();
        let stored = reopened.get_record("9876543210").unwrap().unwrap();
        assert!(stored.profile_completed);
        assert_eq!(stored.soil_type, Some(SoilType::Silt));
        assert_eq!(stored.updated_at, Some(now));
        assert!(reopened.describe().contains("farmers.json"));
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("farmers.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(DocumentStore::open(&path), Err(StoreError::Serde(_))));
    }

    #[test]
    fn test_failed_flush_rolls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("farmers.json");
        let mut store = DocumentStore::open(&path).unwrap();

        let result = store.create_record("9876543210", &record("9876543210", "secret1"));
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!store.record_exists("9876543210").unwrap());
    }

    #[test]
    fn test_session_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let filename = path.to_str().unwrap();

        let snapshot = serde_json::json!({ "screen": "Dashboard" });
        assert_eq!(SessionExporter::export(&snapshot, filename), Ok(filename.to_string()));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Dashboard"));

        let bad = dir.path().join("nope").join("session.json");
        assert!(SessionExporter::export(&snapshot, bad.to_str().unwrap()).is_err());
    }
}
