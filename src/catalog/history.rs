//! Records of where files with a given content were seen before.
//!
//! Keys are `/<kind>/<hex digest>`; each value is the bincode encoding of the
//! list of locations carrying that digest, kept sorted by game and file name.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::catalog::kv::{KeyValueStore, StorageError};
use crate::core::hashes::{HashComparison, HashKind, Hashes};
use crate::utils::array::DynamicArray;
use crate::utils::validation::ValidationError;

/// A previously recorded file location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalRecord {
    pub game: String,
    pub file: String,
    pub size: u64,
    pub hashes: Hashes,
}

/// On-disk shape of a record: raw digests, fixed field order
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    game: String,
    file: String,
    size: u64,
    crc: Option<u32>,
    md5: Option<[u8; 16]>,
    sha1: Option<[u8; 20]>,
}

impl From<&HistoricalRecord> for StoredRecord {
    fn from(r: &HistoricalRecord) -> Self {
        Self {
            game: r.game.clone(),
            file: r.file.clone(),
            size: r.size,
            crc: r.hashes.crc(),
            md5: r.hashes.md5().copied(),
            sha1: r.hashes.sha1().copied(),
        }
    }
}

impl From<StoredRecord> for HistoricalRecord {
    fn from(r: StoredRecord) -> Self {
        let mut hashes = Hashes::new();
        if let Some(crc) = r.crc {
            hashes.set_crc(crc);
        }
        if let Some(md5) = r.md5 {
            hashes.set_md5(md5);
        }
        if let Some(sha1) = r.sha1 {
            hashes.set_sha1(sha1);
        }
        Self {
            game: r.game,
            file: r.file,
            size: r.size,
            hashes,
        }
    }
}

fn location_cmp(a: &StoredRecord, b: &StoredRecord) -> Ordering {
    a.game
        .to_ascii_lowercase()
        .cmp(&b.game.to_ascii_lowercase())
        .then_with(|| a.file.cmp(&b.file))
}

fn make_key(kind: HashKind, hashes: &Hashes) -> Result<Vec<u8>, ValidationError> {
    let hex = hashes
        .to_hex(kind)
        .ok_or(ValidationError::MissingHashKind(kind))?;
    Ok(format!("/{kind}/{hex}").into_bytes())
}

/// Historical location database over any [`KeyValueStore`].
///
/// Constructed explicitly by the caller and owned for the duration of a run.
#[derive(Debug)]
pub struct HistoryDb<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryDb<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record that `game`/`file` holds content with `hashes`, under every
    /// digest kind present. Recording the same location twice is a no-op.
    pub fn record(&mut self, game: &str, file: &str, size: u64, hashes: &Hashes) -> Result<(), StorageError> {
        let record = HistoricalRecord {
            game: game.to_string(),
            file: file.to_string(),
            size,
            hashes: *hashes,
        };

        for kind in hashes.kinds().iter() {
            let key = make_key(kind, hashes)?;
            let mut records = self.read_records(&key)?;
            records.push(StoredRecord::from(&record));
            records.sort_unique(location_cmp);
            let value = bincode::serialize(&records.into_vec())?;
            self.store.put(&key, &value)?;
        }

        debug!("Recorded {}/{} ({})", game, file, hashes);
        Ok(())
    }

    /// Locations whose `kind` digest matches and whose other digests and
    /// size do not contradict `hashes`/`size` (size 0 = unknown)
    pub fn lookup(&self, kind: HashKind, hashes: &Hashes, size: u64) -> Result<Vec<HistoricalRecord>, StorageError> {
        let key = make_key(kind, hashes)?;
        let records = self.read_records(&key)?;

        Ok(records
            .into_iter()
            .map(HistoricalRecord::from)
            .filter(|r| r.hashes.compare(hashes) != HashComparison::Mismatch)
            .filter(|r| size == 0 || r.size == 0 || r.size == size)
            .collect())
    }

    /// Every stored location, grouped by key
    pub fn all_records(&self) -> Result<Vec<HistoricalRecord>, StorageError> {
        let mut out = Vec::new();
        for (_, value) in self.store.scan_prefix(b"/")? {
            let records: Vec<StoredRecord> = bincode::deserialize(&value)?;
            out.extend(records.into_iter().map(HistoricalRecord::from));
        }
        Ok(out)
    }

    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.store.flush()
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn read_records(&self, key: &[u8]) -> Result<DynamicArray<StoredRecord>, StorageError> {
        match self.store.get(key)? {
            Some(value) => {
                let records: Vec<StoredRecord> = bincode::deserialize(&value)?;
                Ok(records.into())
            }
            None => Ok(DynamicArray::new()),
        }
    }
}
