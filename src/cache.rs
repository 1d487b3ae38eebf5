use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::data::loader::{LoadError, load_csv_bytes};
use crate::data::model::ListingTable;

// ---------------------------------------------------------------------------
// Upload cache
// ---------------------------------------------------------------------------

/// Hex SHA-256 of an upload's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn of(bytes: &[u8]) -> Self {
        ContentKey(hex::encode(Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single-entry cache of the most recently parsed upload.
///
/// A new successful parse replaces the entry. Failed parses are never stored
/// and leave the current entry untouched.
#[derive(Debug, Default)]
pub struct TableCache {
    entry: Option<(ContentKey, Arc<ListingTable>)>,
    hits: u64,
    misses: u64,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `bytes`, parsing only on a key mismatch.
    pub fn get_or_load(&mut self, bytes: &[u8]) -> Result<Arc<ListingTable>, LoadError> {
        let key = ContentKey::of(bytes);

        if let Some((cached, table)) = &self.entry {
            if *cached == key {
                self.hits += 1;
                log::debug!("upload cache hit for {}", key.as_str());
                return Ok(Arc::clone(table));
            }
        }

        self.misses += 1;
        log::debug!("upload cache miss for {}", key.as_str());
        let table = Arc::new(load_csv_bytes(bytes)?);
        self.entry = Some((key, Arc::clone(&table)));
        Ok(table)
    }

    pub fn key(&self) -> Option<&ContentKey> {
        self.entry.as_ref().map(|(k, _)| k)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
