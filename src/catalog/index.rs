use std::collections::HashMap;

use crate::core::hashes::{HashKind, Hashes};
use crate::utils::validation::ValidationError;

/// Bucket key: the digest kind plus that digest's raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IndexKey {
    kind: HashKind,
    digest: Vec<u8>,
}

impl IndexKey {
    fn new(kind: HashKind, hashes: &Hashes) -> Result<Self, ValidationError> {
        let digest = hashes
            .digest(kind)
            .ok_or(ValidationError::MissingHashKind(kind))?;
        Ok(Self { kind, digest })
    }

    fn to_hashes(&self) -> Result<Hashes, ValidationError> {
        Hashes::from_digest(self.kind, &self.digest)
    }
}

/// Maps a digest to every candidate carrying it.
///
/// Candidates are appended in insertion order and never deduplicated. The
/// index lives for one scanning run; buckets are not removed when a caller
/// stops caring about their candidates.
#[derive(Debug, Clone)]
pub struct IdentityIndex<T> {
    buckets: HashMap<IndexKey, Vec<T>>,
}

impl<T> IdentityIndex<T> {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    /// Append `candidate` to the bucket for `hashes`' digest of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingHashKind` if `hashes` has no `kind` digest.
    pub fn add(&mut self, kind: HashKind, hashes: &Hashes, candidate: T) -> Result<(), ValidationError> {
        let key = IndexKey::new(kind, hashes)?;
        self.buckets.entry(key).or_default().push(candidate);
        Ok(())
    }

    /// Candidates sharing `hashes`' digest of `kind`; empty if none were added.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingHashKind` if `hashes` has no `kind` digest.
    pub fn get(&self, kind: HashKind, hashes: &Hashes) -> Result<&[T], ValidationError> {
        let key = IndexKey::new(kind, hashes)?;
        Ok(self.buckets.get(&key).map_or(&[][..], Vec::as_slice))
    }

    /// Mutable access to an existing bucket, for callers that invalidate candidates
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingHashKind` if `hashes` has no `kind` digest.
    pub fn get_mut(&mut self, kind: HashKind, hashes: &Hashes) -> Result<Option<&mut Vec<T>>, ValidationError> {
        let key = IndexKey::new(kind, hashes)?;
        Ok(self.buckets.get_mut(&key))
    }

    /// Candidates matching any digest present in `hashes`, in kind order
    /// (CRC32, MD5, SHA1). A candidate indexed under several kinds appears
    /// once per kind.
    pub fn find_any(&self, hashes: &Hashes) -> Vec<&T> {
        hashes
            .kinds()
            .iter()
            .filter_map(|kind| self.get(kind, hashes).ok())
            .flatten()
            .collect()
    }

    /// Visit every bucket with a single-kind `Hashes` rebuilt from its key.
    ///
    /// Stops at the first error returned by `f`.
    pub fn for_each<F, E>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&Hashes, &[T]) -> Result<(), E>,
        E: From<ValidationError>,
    {
        for (key, candidates) in &self.buckets {
            let hashes = key.to_hashes()?;
            f(&hashes, candidates)?;
        }
        Ok(())
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total candidates over all buckets
    pub fn candidate_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Tear down the index, running `destructor` once per candidate if given
    pub fn free<D>(self, destructor: Option<D>)
    where
        D: FnMut(T),
    {
        match destructor {
            Some(mut destructor) => {
                for (_, candidates) in self.buckets {
                    candidates.into_iter().for_each(&mut destructor);
                }
            }
            None => drop(self.buckets),
        }
    }
}

impl<T> Default for IdentityIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
