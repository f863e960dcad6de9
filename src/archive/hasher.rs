//! Streaming digest computation over archive entries.

use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;

use sha1::Digest as _;

use crate::archive::detector::{HeaderSkip, SkipRule, Transform};
use crate::archive::ArchiveReader;
use crate::core::hashes::{HashComparison, HashKind, HashKinds, Hashes};

/// Bytes read from a stream per digest update
pub const CHUNK_SIZE: usize = 8192;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("I/O error while hashing: {0}")]
    Io(#[from] io::Error),

    #[error("Archive has no entry at index {0}")]
    NoSuchEntry(usize),
}

/// Running state for the requested digest kinds
struct Digester {
    crc: Option<crc32fast::Hasher>,
    md5: Option<md5::Context>,
    sha1: Option<sha1::Sha1>,
}

impl Digester {
    fn new(kinds: HashKinds) -> Self {
        Self {
            crc: kinds
                .contains(HashKind::Crc32)
                .then(crc32fast::Hasher::new),
            md5: kinds.contains(HashKind::Md5).then(md5::Context::new),
            sha1: kinds.contains(HashKind::Sha1).then(sha1::Sha1::new),
        }
    }

    fn update(&mut self, data: &[u8]) {
        if let Some(crc) = &mut self.crc {
            crc.update(data);
        }
        if let Some(md5) = &mut self.md5 {
            md5.consume(data);
        }
        if let Some(sha1) = &mut self.sha1 {
            sha1.update(data);
        }
    }

    fn finish(self) -> Hashes {
        let mut hashes = Hashes::new();
        if let Some(crc) = self.crc {
            hashes.set_crc(crc.finalize());
        }
        if let Some(md5) = self.md5 {
            hashes.set_md5(md5.compute().0);
        }
        if let Some(sha1) = self.sha1 {
            let mut digest = [0u8; 20];
            digest.copy_from_slice(&sha1.finalize());
            hashes.set_sha1(digest);
        }
        hashes
    }
}

/// Hash exactly `length` bytes from `reader`.
///
/// # Errors
///
/// `HashError::Io` with `UnexpectedEof` if the stream ends early, or any
/// read error from the stream.
pub fn compute_hashes<R: Read + ?Sized>(reader: &mut R, length: u64, kinds: HashKinds) -> Result<Hashes, HashError> {
    compute_transformed(reader, length, kinds, Transform::None)
}

/// Like [`compute_hashes`], reordering each chunk with `transform` first
pub fn compute_transformed<R: Read + ?Sized>(
    reader: &mut R,
    length: u64,
    kinds: HashKinds,
    transform: Transform,
) -> Result<Hashes, HashError> {
    let mut digester = Digester::new(kinds);
    let mut buf = [0u8; CHUNK_SIZE];
    let mut remaining = length;

    while remaining > 0 {
        let n = usize::try_from(remaining).map_or(CHUNK_SIZE, |r| r.min(CHUNK_SIZE));
        let chunk = &mut buf[..n];
        reader.read_exact(chunk)?;
        transform.apply(chunk);
        digester.update(chunk);
        remaining -= n as u64;
    }

    Ok(digester.finish())
}

/// Look for `target` in consecutive non-overlapping windows of
/// `window_size` bytes, starting at offset 0.
///
/// Only the kinds present in `target` are computed. Returns the offset of the
/// first matching window, or `None` once no further whole window fits in
/// `entry_total_size`. Content at offsets that are not a multiple of
/// `window_size` is never found.
pub fn find_embedded<R: Read + ?Sized>(
    reader: &mut R,
    entry_total_size: u64,
    window_size: u64,
    target: &Hashes,
) -> Result<Option<u64>, HashError> {
    let kinds = target.kinds();
    if window_size == 0 || kinds.is_empty() {
        return Ok(None);
    }

    let mut offset = 0u64;
    while offset
        .checked_add(window_size)
        .is_some_and(|end| end <= entry_total_size)
    {
        let window = compute_hashes(reader, window_size, kinds)?;
        if window.compare(target) == HashComparison::Match {
            return Ok(Some(offset));
        }
        offset += window_size;
    }

    Ok(None)
}

/// Digests of one archive entry and the number of bytes they cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedEntry {
    pub hashes: Hashes,
    pub size: u64,
}

/// Hash a stream of `size` bytes, restricted to the region `rule` selects.
///
/// A rule that does not fit the stream is ignored and the whole stream is
/// hashed.
pub fn hash_region<R: Read + ?Sized>(
    reader: &mut R,
    size: u64,
    kinds: HashKinds,
    rule: Option<SkipRule>,
) -> Result<HashedEntry, HashError> {
    let Some(((start, length), transform)) =
        rule.and_then(|rule| rule.resolve(size).map(|region| (region, rule.transform)))
    else {
        return Ok(HashedEntry {
            hashes: compute_hashes(reader, size, kinds)?,
            size,
        });
    };

    let skipped = io::copy(&mut (&mut *reader).take(start), &mut io::sink())?;
    if skipped != start {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(HashedEntry {
        hashes: compute_transformed(reader, length, kinds, transform)?,
        size: length,
    })
}

/// Open entry `index` and hash it, applying the header-skip adjustment
/// `skip` reports for it. The entry stream is released before returning.
pub fn hash_entry(
    archive: &dyn ArchiveReader,
    index: usize,
    kinds: HashKinds,
    skip: Option<&dyn HeaderSkip>,
) -> Result<HashedEntry, HashError> {
    let (name, size) = archive
        .entry_name(index)
        .zip(archive.entry_size(index))
        .ok_or(HashError::NoSuchEntry(index))?;

    let rule = skip.and_then(|s| s.adjustment(name, size));
    if let Some(rule) = &rule {
        debug!("Applying {:?} to {}", rule, name);
    }

    let mut stream = archive.open_entry(index)?;
    hash_region(&mut stream, size, kinds, rule)
}

/// [`find_embedded`] over archive entry `index`
pub fn find_embedded_in_entry(
    archive: &dyn ArchiveReader,
    index: usize,
    window_size: u64,
    target: &Hashes,
) -> Result<Option<u64>, HashError> {
    let size = archive
        .entry_size(index)
        .ok_or(HashError::NoSuchEntry(index))?;
    let mut stream = archive.open_entry(index)?;
    find_embedded(&mut stream, size, window_size, target)
}
