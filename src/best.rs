use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app_dirs::AppDirs;
use crate::error::{StoreError, StoreResult};

/// Best run seen so far for one storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestRecord {
    pub wpm: u32,
    pub accuracy: u32,
    pub raw_speed: u32,
}

pub trait BestStore {
    /// Stored record, or the zero record when absent or unreadable.
    fn load(&self) -> BestRecord;
    fn save(&self, record: &BestRecord) -> StoreResult<()>;
}

/// JSON file per storage key in the application data directory
#[derive(Debug, Clone)]
pub struct FileBestStore {
    path: PathBuf,
}

impl FileBestStore {
    pub fn for_key(key: &str) -> Self {
        let file_name = format!("{}.json", sanitize_key(key));
        let path = match AppDirs::best_record_dir() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(format!("keyrace_{file_name}")),
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "best".to_string()
    } else {
        cleaned
    }
}

impl BestStore for FileBestStore {
    fn load(&self) -> BestRecord {
        let Ok(bytes) = fs::read(&self.path) else {
            return BestRecord::default();
        };
        match serde_json::from_slice::<BestRecord>(&bytes) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring malformed best record");
                BestRecord::default()
            }
        }
    }

    fn save(&self, record: &BestRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(record)?;
        fs::write(&self.path, data).map_err(StoreError::from)
    }
}

/// In-memory store; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct MemoryBestStore {
    record: Rc<RefCell<BestRecord>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryBestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: BestRecord) -> Self {
        let store = Self::default();
        *store.record.borrow_mut() = record;
        store
    }

    pub fn record(&self) -> BestRecord {
        *self.record.borrow()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl BestStore for MemoryBestStore {
    fn load(&self) -> BestRecord {
        self.record()
    }

    fn save(&self, record: &BestRecord) -> StoreResult<()> {
        *self.record.borrow_mut() = *record;
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
