//! Character dataset service.
//!
//! One [CharacterDataset] is built at startup and passed by reference to every
//! consumer. It loads lazily on first use; a forced reload swaps in a complete
//! new [DatasetSnapshot], so a request that already holds a snapshot never sees
//! a mix of old and new records.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{SecondsFormat, Utc};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::AppConfig;
use crate::data::character::{parse_character_record, CharacterRecord};
use crate::data::model::CharacterModel;
use crate::data::DatasetError;
use crate::parallel::WorkerPool;

pub const DEFAULT_CHAR_DATA_DIR: &str = "resource/map/detail_json/char";

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of the last load: counts, skipped files and a content fingerprint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedFile>,
    /// SHA-256 (hex) over every readable JSON file, in sorted path order.
    pub fingerprint: String,
    /// RFC 3339 timestamp; `None` for snapshots not read from disk.
    pub loaded_at: Option<String>,
}

/// Immutable view of the dataset: character id -> record, in load order.
#[derive(Debug, Default)]
pub struct DatasetSnapshot {
    order: Vec<String>,
    records: HashMap<String, Arc<CharacterRecord>>,
    report: LoadReport,
}

impl DatasetSnapshot {
    /// Build a snapshot from in-memory records, keeping iteration order.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, CharacterRecord)>,
        S: Into<String>,
    {
        let mut snapshot = DatasetSnapshot::default();
        for (id, record) in records {
            snapshot.insert(id.into(), record);
        }
        snapshot.report.loaded = snapshot.len();
        snapshot
    }

    /// A repeated id replaces the record but keeps its first position.
    fn insert(&mut self, id: String, record: CharacterRecord) {
        if self.records.insert(id.clone(), Arc::new(record)).is_none() {
            self.order.push(id);
        } else {
            debug!(char_id = %id, "duplicate character id; later file wins");
        }
    }

    pub fn get(&self, char_id: &str) -> Option<&Arc<CharacterRecord>> {
        self.records.get(char_id)
    }

    pub fn contains(&self, char_id: &str) -> bool {
        self.records.contains_key(char_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<CharacterRecord>)> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|record| (id.as_str(), record)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// First id (load order) whose record name matches. Exact mode needs
    /// equality; loose mode accepts either string containing the other.
    pub fn find_id(&self, name: &str, loose: bool) -> Option<&str> {
        self.iter()
            .find(|(_, record)| {
                if loose {
                    name.contains(record.name.as_str()) || record.name.contains(name)
                } else {
                    record.name == name
                }
            })
            .map(|(id, _)| id)
    }
}

#[derive(Debug, Default)]
struct DatasetState {
    snapshot: Arc<DatasetSnapshot>,
    loaded: bool,
}

/// Lazily loaded, explicitly reloadable character dataset.
#[derive(Debug)]
pub struct CharacterDataset {
    data_dir: PathBuf,
    workers: WorkerPool,
    state: RwLock<DatasetState>,
}

impl CharacterDataset {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            workers: WorkerPool::default(),
            state: RwLock::new(DatasetState::default()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.data_dir).with_workers(WorkerPool::with_workers(config.load_workers))
    }

    /// Dataset seeded from memory. Counts as loaded, so the directory is only
    /// read on a forced reload.
    pub fn from_snapshot(data_dir: impl Into<PathBuf>, snapshot: DatasetSnapshot) -> Self {
        Self {
            data_dir: data_dir.into(),
            workers: WorkerPool::default(),
            state: RwLock::new(DatasetState {
                snapshot: Arc::new(snapshot),
                loaded: true,
            }),
        }
    }

    pub fn with_workers(mut self, workers: WorkerPool) -> Self {
        self.workers = workers;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn is_loaded(&self) -> bool {
        self.read_state().loaded
    }

    /// Load the dataset unless already loaded. `force` re-reads the directory.
    ///
    /// A missing directory leaves the dataset empty and unloaded. Malformed
    /// files are logged and skipped; this never fails.
    pub fn ensure_loaded(&self, force: bool) {
        if !force && self.is_loaded() {
            return;
        }
        if !self.data_dir.exists() {
            debug!(dir = %self.data_dir.display(), "character data directory missing");
            return;
        }
        let snapshot = read_char_json_files(&self.data_dir, self.workers);
        info!(
            dir = %self.data_dir.display(),
            loaded = snapshot.len(),
            skipped = snapshot.report().skipped.len(),
            "character dataset loaded"
        );
        let mut state = self.write_state();
        state.snapshot = Arc::new(snapshot);
        state.loaded = true;
    }

    /// Startup load: like [Self::ensure_loaded] but reports a missing directory.
    pub fn load(&self) -> Result<Arc<DatasetSnapshot>, DatasetError> {
        if !self.is_loaded() && !self.data_dir.exists() {
            return Err(DatasetError::MissingDirectory(self.data_dir.clone()));
        }
        self.ensure_loaded(false);
        Ok(self.current())
    }

    /// Re-read the directory and replace the snapshot. Returns whether the
    /// content fingerprint changed. A missing directory keeps the old snapshot.
    pub fn reload(&self) -> Result<bool, DatasetError> {
        if !self.data_dir.exists() {
            warn!(dir = %self.data_dir.display(), "reload skipped: directory missing");
            return Err(DatasetError::MissingDirectory(self.data_dir.clone()));
        }
        let previous = self.current().report().fingerprint.clone();
        self.ensure_loaded(true);
        Ok(self.current().report().fingerprint != previous)
    }

    /// Current snapshot, loading first if needed.
    pub fn snapshot(&self) -> Arc<DatasetSnapshot> {
        self.ensure_loaded(false);
        self.current()
    }

    pub fn lookup(&self, char_id: impl Display) -> Option<Arc<CharacterRecord>> {
        self.snapshot().get(&char_id.to_string()).cloned()
    }

    pub fn get_char_id(&self, name: &str, loose: bool) -> Option<String> {
        self.snapshot().find_id(name, loose).map(str::to_string)
    }

    pub fn get_char_model(&self, char_id: impl Display) -> Option<CharacterModel> {
        let char_id = char_id.to_string();
        let record = self.snapshot().get(&char_id).cloned()?;
        Some(CharacterModel::from_record(char_id, &record))
    }

    fn current(&self) -> Arc<DatasetSnapshot> {
        Arc::clone(&self.read_state().snapshot)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, DatasetState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, DatasetState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

struct DecodedFile {
    path: PathBuf,
    bytes: Option<Vec<u8>>,
    record: Result<CharacterRecord, DatasetError>,
}

fn decode_file(path: PathBuf) -> DecodedFile {
    match fs::read(&path) {
        Ok(bytes) => {
            let record = parse_character_record(&bytes).map_err(|source| DatasetError::Parse {
                path: path.clone(),
                source,
            });
            DecodedFile {
                path,
                bytes: Some(bytes),
                record,
            }
        }
        Err(source) => DecodedFile {
            record: Err(DatasetError::Read {
                path: path.clone(),
                source,
            }),
            bytes: None,
            path,
        },
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Character id for a dataset file: the file name up to its first dot.
pub fn char_id_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let id = name.split('.').next()?;
    (!id.is_empty()).then(|| id.to_string())
}

/// Every `*.json` path under `dir`, recursively, in sorted order.
pub fn collect_json_paths(dir: &Path) -> (Vec<PathBuf>, Vec<SkippedFile>) {
    let mut paths = Vec::new();
    let mut skipped = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_json(entry.path()) => {
                paths.push(entry.into_path());
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "skipping unreadable dataset entry");
                skipped.push(SkippedFile {
                    path: err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
                    reason: err.to_string(),
                });
            }
        }
    }
    paths.sort();
    (paths, skipped)
}

/// Read and decode every character file under `dir`.
///
/// Files are decoded in parallel on `pool` and indexed in sorted path order.
/// Unreadable or malformed files are logged and listed in the report.
pub fn read_char_json_files(dir: &Path, pool: WorkerPool) -> DatasetSnapshot {
    let (paths, mut skipped) = collect_json_paths(dir);
    let decoded: Vec<DecodedFile> =
        pool.install(|| paths.into_par_iter().map(decode_file).collect());

    let mut snapshot = DatasetSnapshot::default();
    let mut hasher = Sha256::new();
    for file in decoded {
        if let Some(bytes) = &file.bytes {
            hasher.update(bytes);
            let relative = file.path.strip_prefix(dir).unwrap_or(&file.path);
            hasher.update(relative.to_string_lossy().as_bytes());
        }
        let record = match file.record {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "read_char_json_files skipped file");
                skipped.push(SkippedFile {
                    path: file.path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        match char_id_from_path(&file.path) {
            Some(id) => snapshot.insert(id, record),
            None => {
                warn!(path = %file.path.display(), "file name does not yield a character id");
                skipped.push(SkippedFile {
                    path: file.path,
                    reason: "file name does not yield a character id".to_string(),
                });
            }
        }
    }

    snapshot.report = LoadReport {
        loaded: snapshot.len(),
        skipped,
        fingerprint: format!("{:x}", hasher.finalize()),
        loaded_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    };
    snapshot
}
