/// Extraction Cache Module
///
/// Incremental mode: per-file scan results cached and validated against file
/// modification time and size. Correctness never depends on the cache; a
/// cold run reproduces identical declarations, references, and bindings.
///
/// Cache entries pair a `FileStamp` with the `FileScan` it was taken from;
/// a mismatched stamp is a miss and the file is rescanned.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sled::Db;

use crate::domain::module::FileScan;

/// Identity of a file's content at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStamp {
    /// Modification time, unix seconds.
    pub mtime: u64,
    pub len: u64,
}

impl FileStamp {
    pub fn of(path: &Path) -> Result<FileStamp> {
        let metadata = fs::metadata(path)?;
        let mtime = metadata
            .modified()?
            .duration_since(SystemTime::UNIX_EPOCH)?
            .as_secs();
        Ok(FileStamp { mtime, len: metadata.len() })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    stamp: FileStamp,
    scan: FileScan,
}

/// Trait for scan-result cache backends.
/// Implementations must be thread-safe (Send + Sync): the scan phase reads
/// and writes from rayon workers.
pub trait DeclarationCache: Send + Sync {
    /// Return the cached scan if the stamp still matches.
    fn get(&self, path: &Path, stamp: &FileStamp) -> Option<FileScan>;
    fn put(&self, path: &Path, stamp: &FileStamp, scan: &FileScan);
}

// ============================================================================
// MemoryDeclarationCache - In-process storage using DashMap
// ============================================================================

#[derive(Default)]
pub struct MemoryDeclarationCache {
    entries: DashMap<String, CacheEntry>,
}

impl DeclarationCache for MemoryDeclarationCache {
    fn get(&self, path: &Path, stamp: &FileStamp) -> Option<FileScan> {
        self.entries
            .get(&path.to_string_lossy().to_string())
            .filter(|entry| entry.stamp == *stamp)
            .map(|entry| entry.scan.clone())
    }

    fn put(&self, path: &Path, stamp: &FileStamp, scan: &FileScan) {
        self.entries.insert(
            path.to_string_lossy().to_string(),
            CacheEntry { stamp: *stamp, scan: scan.clone() },
        );
    }
}

// ============================================================================
// DiskDeclarationCache - Persistent storage using sled
// ============================================================================

pub struct DiskDeclarationCache {
    db: Db,
    scans_tree: sled::Tree,
}

impl DiskDeclarationCache {
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        let scans_tree = db.open_tree("file_scans")?;
        Ok(Self { db, scans_tree })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl DeclarationCache for DiskDeclarationCache {
    fn get(&self, path: &Path, stamp: &FileStamp) -> Option<FileScan> {
        self.scans_tree
            .get(path.to_string_lossy().as_bytes())
            .ok()
            .flatten()
            .and_then(|bytes| bincode::deserialize::<CacheEntry>(&bytes).ok())
            .filter(|entry| entry.stamp == *stamp)
            .map(|entry| entry.scan)
    }

    fn put(&self, path: &Path, stamp: &FileStamp, scan: &FileScan) {
        let entry = CacheEntry { stamp: *stamp, scan: scan.clone() };
        if let Ok(bytes) = bincode::serialize(&entry) {
            let _ = self
                .scans_tree
                .insert(path.to_string_lossy().as_bytes(), bytes);
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
