//! The offer store: a flat vector index with a parallel list of offers.
//!
//! Position `i` in the metadata list is the offer whose embedding sits at
//! position `i` in the index. Both halves only ever grow together.
//!
//! Persistence writes `{base}.bin` and `{base}_metadata.json`. Each file is
//! written to a `.tmp` sibling and synced first, then both are renamed into
//! place. A crash before the renames leaves the previous pair untouched; a
//! crash between them leaves mismatched lengths, which
//! [`OfferStore::load_or_init`] reports as [`MemoryError::Corrupted`].

use crate::error::MemoryError;
use crate::index::FlatIndex;
use crate::Result;
use promosensei_core::paths;
use promosensei_core::OfferRecord;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Insertion position of the offer.
    pub position: usize,

    /// Squared Euclidean distance to the query.
    pub distance: f32,

    /// The offer.
    pub offer: OfferRecord,
}

/// File-backed offer store.
#[derive(Debug)]
pub struct OfferStore {
    base: PathBuf,
    index: FlatIndex,
    records: Vec<OfferRecord>,
}

impl OfferStore {
    /// Open the store at `base`, or start an empty one.
    ///
    /// Both files must exist for anything to be loaded. If only one exists
    /// it is ignored with a warning and the next save replaces it. The
    /// containing directory is created when missing.
    pub fn load_or_init(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        let index_path = paths::index_file(&base);
        let metadata_path = paths::metadata_file(&base);

        match (index_path.exists(), metadata_path.exists()) {
            (true, true) => {
                info!("Loading offer index from {}", index_path.display());
                let index = FlatIndex::read_from(BufReader::new(File::open(&index_path)?))?;
                let records: Vec<OfferRecord> =
                    serde_json::from_reader(BufReader::new(File::open(&metadata_path)?))?;

                if index.len() != records.len() {
                    return Err(MemoryError::Corrupted {
                        index_len: index.len(),
                        metadata_len: records.len(),
                    });
                }

                info!("Loaded {} existing offers", records.len());
                Ok(Self {
                    base,
                    index,
                    records,
                })
            }
            (index_exists, metadata_exists) => {
                if index_exists || metadata_exists {
                    warn!(
                        "Found only one of {} and {}; starting with an empty store",
                        index_path.display(),
                        metadata_path.display()
                    );
                } else {
                    info!("Initializing new offer index at {}", base.display());
                }

                if let Some(dir) = base.parent().filter(|d| !d.as_os_str().is_empty()) {
                    if !dir.exists() {
                        fs::create_dir_all(dir)?;
                        info!("Created directory: {}", dir.display());
                    }
                }

                Ok(Self {
                    base,
                    index: FlatIndex::new(),
                    records: Vec::new(),
                })
            }
        }
    }

    /// Append offers with their embeddings, then persist.
    ///
    /// The batch is rejected as a whole on a length or dimension mismatch.
    /// If persisting fails the in-memory append is undone. When the failure
    /// came after the index file was already replaced, that file is rewritten
    /// from the restored state so disk holds the previous pair again.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>, records: Vec<OfferRecord>) -> Result<()> {
        if vectors.len() != records.len() {
            return Err(MemoryError::LengthMismatch {
                vectors: vectors.len(),
                records: records.len(),
            });
        }
        if vectors.is_empty() {
            return Ok(());
        }

        let prev_len = self.records.len();
        let prev_dim = self.index.dimension();

        self.index.add(&vectors)?;
        if prev_dim.is_none() {
            info!("Offer index initialized with dimension: {}", vectors[0].len());
        }
        info!("Adding {} new embeddings to offer index", vectors.len());
        self.records.extend(records);

        if let Err(failure) = self.persist() {
            self.index.rollback(prev_len, prev_dim);
            self.records.truncate(prev_len);
            if failure.index_replaced {
                if let Err(e) = self.write_index_file() {
                    warn!(
                        "Could not restore {} after a failed save: {}",
                        self.index_path().display(),
                        e
                    );
                }
            }
            return Err(failure.error);
        }
        Ok(())
    }

    /// The `k` nearest offers, closest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<OfferRecord>> {
        Ok(self
            .search_hits(query, k)?
            .into_iter()
            .map(|hit| hit.offer)
            .collect())
    }

    /// The `k` nearest offers with their positions and distances.
    pub fn search_hits(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if self.records.is_empty() {
            debug!("Offer index is empty; nothing to search");
            return Ok(Vec::new());
        }

        let hits = self
            .index
            .search(query, k)?
            .into_iter()
            .filter_map(|(position, distance)| {
                // Positions past the metadata can only come from a damaged store.
                self.records.get(position).map(|offer| SearchHit {
                    position,
                    distance,
                    offer: offer.clone(),
                })
            })
            .collect();
        Ok(hits)
    }

    /// Persist both files.
    pub fn save(&self) -> Result<()> {
        self.persist().map_err(|failure| failure.error)
    }

    fn persist(&self) -> std::result::Result<(), SaveFailure> {
        let index_path = self.index_path();
        let metadata_path = self.metadata_path();
        let index_tmp = paths::with_suffix(&index_path, ".tmp");
        let metadata_tmp = paths::with_suffix(&metadata_path, ".tmp");

        debug!("Saving offer index to {}", index_path.display());
        self.stage(&index_tmp, &metadata_tmp).map_err(|e| {
            discard(&[index_tmp.as_path(), metadata_tmp.as_path()]);
            SaveFailure::new(e, false)
        })?;

        fs::rename(&index_tmp, &index_path).map_err(|e| {
            discard(&[index_tmp.as_path(), metadata_tmp.as_path()]);
            SaveFailure::new(e.into(), false)
        })?;
        fs::rename(&metadata_tmp, &metadata_path).map_err(|e| {
            discard(&[metadata_tmp.as_path()]);
            SaveFailure::new(e.into(), true)
        })?;

        info!("Offer index and metadata saved ({} offers)", self.records.len());
        Ok(())
    }

    /// Write both temp files.
    fn stage(&self, index_tmp: &Path, metadata_tmp: &Path) -> Result<()> {
        if let Some(dir) = self.base.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        write_synced(index_tmp, |w| self.index.write_to(w))?;
        write_synced(metadata_tmp, |w| {
            serde_json::to_writer(&mut *w, &self.records)?;
            Ok(())
        })
    }

    /// Rewrite only the index file from memory.
    fn write_index_file(&self) -> Result<()> {
        let index_path = self.index_path();
        let index_tmp = paths::with_suffix(&index_path, ".tmp");
        write_synced(&index_tmp, |w| self.index.write_to(w))?;
        fs::rename(&index_tmp, &index_path)?;
        Ok(())
    }

    /// All stored offers in insertion order.
    pub fn records(&self) -> &[OfferRecord] {
        &self.records
    }

    /// The last `k` offers ingested, oldest first.
    pub fn recent(&self, k: usize) -> &[OfferRecord] {
        let start = self.records.len().saturating_sub(k);
        &self.records[start..]
    }

    /// Number of stored offers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimension, once known.
    pub fn dimension(&self) -> Option<usize> {
        self.index.dimension()
    }

    /// Number of vectors in the index.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Base path the two files are derived from.
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// Path of the index file.
    pub fn index_path(&self) -> PathBuf {
        paths::index_file(&self.base)
    }

    /// Path of the metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        paths::metadata_file(&self.base)
    }
}

/// A failed save, and whether the index file had already been replaced.
struct SaveFailure {
    error: MemoryError,
    index_replaced: bool,
}

impl SaveFailure {
    fn new(error: MemoryError, index_replaced: bool) -> Self {
        Self {
            error,
            index_replaced,
        }
    }
}

/// Best-effort removal of leftover temp files.
fn discard(files: &[&Path]) {
    for path in files {
        if path.is_file() {
            let _ = fs::remove_file(path);
        }
    }
}

fn write_synced<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let file = File::create(path)?;
    {
        let mut writer = BufWriter::new(&file);
        write(&mut writer)?;
        writer.flush()?;
    }
    file.sync_all()?;
    Ok(())
}
