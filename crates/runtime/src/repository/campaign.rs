//! Campaign flag persistence.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use engine_core::FlagValue;

use super::RepositoryError;

/// Serialized form of one campaign session: a flat key → value table.
///
/// Keys are opaque strings chosen by content authors and round-trip
/// byte-exact through save/load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub session_id: String,
    pub flags: BTreeMap<String, FlagValue>,
}

impl CampaignRecord {
    pub fn new(session_id: impl Into<String>, flags: BTreeMap<String, FlagValue>) -> Self {
        Self {
            session_id: session_id.into(),
            flags,
        }
    }
}

/// Store for campaign records.
pub trait CampaignStore: Send + Sync {
    fn save(&self, record: &CampaignRecord) -> Result<(), RepositoryError>;

    /// Loads a session, `Ok(None)` when it was never saved.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::CorruptedData`] when the saved table cannot be
    /// deserialized - fatal to campaign load.
    fn load(&self, session_id: &str) -> Result<Option<CampaignRecord>, RepositoryError>;
}

/// File-backed store keeping one JSON document per session.
pub struct FileCampaignStore {
    root: PathBuf,
}

impl FileCampaignStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform data directory for campaign saves.
    pub fn default_root() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "emberkeep")
            .map(|dirs| dirs.data_dir().join("campaigns"))
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.root.join(format!("{session_id}.json"))
    }
}

impl CampaignStore for FileCampaignStore {
    fn save(&self, record: &CampaignRecord) -> Result<(), RepositoryError> {
        std::fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        // Write-then-rename keeps a crash from truncating the previous save.
        let target = self.path_for(&record.session_id);
        let tmp = target.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<CampaignRecord>, RepositoryError> {
        let path = self.path_for(session_id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
        })?;
        Ok(Some(record))
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryCampaignStore {
    records: RwLock<BTreeMap<String, CampaignRecord>>,
}

impl InMemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CampaignStore for InMemoryCampaignStore {
    fn save(&self, record: &CampaignRecord) -> Result<(), RepositoryError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.session_id.clone(), record.clone());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<CampaignRecord>, RepositoryError> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(session_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CampaignRecord {
        let mut flags = BTreeMap::new();
        flags.insert("area.12.loaded".to_string(), FlagValue::Bool(true));
        flags.insert("weird key/π\t".to_string(), FlagValue::Text("kept".into()));
        flags.insert("gold_owed".to_string(), FlagValue::Int(-250));
        CampaignRecord::new("bg-night-one", flags)
    }

    #[test]
    fn file_store_round_trips_keys_byte_exact() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCampaignStore::new(dir.path());

        store.save(&record()).unwrap();
        let loaded = store.load("bg-night-one").unwrap().unwrap();

        assert_eq!(loaded.flags, record().flags);
        assert_eq!(
            loaded.flags.get("weird key/π\t"),
            Some(&FlagValue::Text("kept".into()))
        );
    }

    #[test]
    fn missing_session_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCampaignStore::new(dir.path());
        assert!(store.load("never-saved").unwrap().is_none());
    }

    #[test]
    fn corrupted_save_is_a_fatal_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCampaignStore::new(dir.path());
        store.save(&record()).unwrap();

        std::fs::write(dir.path().join("bg-night-one.json"), "{not json").unwrap();

        let err = store.load("bg-night-one").unwrap_err();
        assert!(matches!(err, RepositoryError::CorruptedData(_)));
    }

    #[test]
    fn save_overwrites_the_previous_table() {
        let store = InMemoryCampaignStore::new();
        store.save(&record()).unwrap();

        let mut updated = record();
        updated
            .flags
            .insert("chapter".to_string(), FlagValue::Int(2));
        store.save(&updated).unwrap();

        let loaded = store.load("bg-night-one").unwrap().unwrap();
        assert_eq!(loaded.flags.get("chapter"), Some(&FlagValue::Int(2)));
    }
}
