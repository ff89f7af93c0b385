//! Durable file-backed same-as cache.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CacheError;
use crate::sameas::SameAsRetriever;

/// One persisted cache entry. The file holds one JSON record per line,
/// append-only; on reload a later record for the same URI wins, so an
/// entry can be updated without rewriting the file.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    uri: String,
    same_as: BTreeSet<String>,
}

/// Caching decorator persisting resolved equivalence sets to a file.
///
/// All reads are served from an in-memory map guarded by a read-write
/// lock, so concurrent hits never block each other and no reader can
/// observe a partially written entry. A miss resolves through the wrapped
/// retriever and appends one complete record line under a writer mutex,
/// flushed before the entry becomes visible in the map.
pub struct FileBackedCache {
    inner: Arc<dyn SameAsRetriever>,
    entries: RwLock<HashMap<String, Arc<BTreeSet<String>>>>,
    writer: Mutex<File>,
    path: PathBuf,
}

impl FileBackedCache {
    /// Open or create the cache file and replay its records.
    pub fn create(
        inner: Arc<dyn SameAsRetriever>,
        path: impl AsRef<Path>,
    ) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let mut entries = HashMap::new();

        if path.exists() {
            let file = File::open(&path).map_err(|source| CacheError::OpenFile {
                path: path.display().to_string(),
                source,
            })?;
            for (number, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(|source| CacheError::OpenFile {
                    path: path.display().to_string(),
                    source,
                })?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<CacheRecord>(&line) {
                    Ok(record) => {
                        entries.insert(record.uri, Arc::new(record.same_as));
                    }
                    Err(e) => {
                        // A torn trailing line from an interrupted write is
                        // dropped; the entry will simply be resolved again.
                        tracing::warn!(
                            "Skipping unreadable cache record at {}:{}: {e}",
                            path.display(),
                            number + 1
                        );
                    }
                }
            }
        }

        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| CacheError::OpenFile {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(
            "File-backed same-as cache at {} loaded with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            inner,
            entries: RwLock::new(entries),
            writer: Mutex::new(writer),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries currently held.
    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }

    fn persist(&self, uri: &str, same_as: &BTreeSet<String>) -> Result<(), CacheError> {
        let record = CacheRecord {
            uri: uri.to_owned(),
            same_as: same_as.clone(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes()).map_err(CacheError::Write)?;
        writer.flush().map_err(CacheError::Write)
    }
}

#[async_trait]
impl SameAsRetriever for FileBackedCache {
    async fn retrieve(&self, uri: &str) -> BTreeSet<String> {
        if let Some(hit) = self.entries.read().get(uri) {
            return (**hit).clone();
        }

        let resolved = self.inner.retrieve(uri).await;

        if let Err(e) = self.persist(uri, &resolved) {
            tracing::warn!("Could not persist cache entry for {uri}: {e}");
        }
        self.entries
            .write()
            .insert(uri.to_owned(), Arc::new(resolved.clone()));

        resolved
    }
}
