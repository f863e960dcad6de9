//! Archive containers and the hashing of their entries.
//!
//! An archive is any indexed set of named byte streams. The checker only
//! needs the [`ArchiveReader`] contract; two implementations are provided:
//!
//! - [`DirArchive`]: a directory whose regular files are the entries
//! - [`MemoryArchive`]: named in-memory buffers
//!
//! Entry streams are opened immediately before reading and dropped when the
//! hashing call that opened them returns.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

pub mod detector;
pub mod hasher;

/// Read access to the entries of one archive
pub trait ArchiveReader {
    /// Display name of the archive
    fn name(&self) -> &str;

    /// Number of entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_name(&self, index: usize) -> Option<&str>;

    fn entry_size(&self, index: usize) -> Option<u64>;

    /// CRC32 recorded by the container, if it keeps one
    fn entry_crc(&self, _index: usize) -> Option<u32> {
        None
    }

    /// Open a fresh stream over one entry's bytes
    fn open_entry(&self, index: usize) -> io::Result<Box<dyn Read + '_>>;
}

impl std::fmt::Debug for dyn ArchiveReader + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("name", &self.name())
            .field("len", &self.len())
            .finish()
    }
}

fn no_such_entry(index: usize) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no entry at index {index}"))
}

#[derive(Debug, Clone)]
struct DirEntry {
    name: String,
    path: PathBuf,
    size: u64,
}

/// A directory read as an archive: its regular files, sorted by name
#[derive(Debug, Clone)]
pub struct DirArchive {
    name: String,
    entries: Vec<DirEntry>,
}

impl DirArchive {
    /// List the regular files directly inside `path`.
    ///
    /// Subdirectories and non-UTF-8 file names are skipped.
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut entries = Vec::new();
        for item in std::fs::read_dir(path)? {
            let item = item?;
            let metadata = item.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let Ok(name) = item.file_name().into_string() else {
                tracing::debug!("Skipping non-UTF-8 file name in {}", path.display());
                continue;
            };
            entries.push(DirEntry {
                name,
                path: item.path(),
                size: metadata.len(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self { name, entries })
    }
}

impl ArchiveReader for DirArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry_name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    fn entry_size(&self, index: usize) -> Option<u64> {
        self.entries.get(index).map(|e| e.size)
    }

    fn open_entry(&self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        let entry = self.entries.get(index).ok_or_else(|| no_such_entry(index))?;
        Ok(Box::new(io::BufReader::new(File::open(&entry.path)?)))
    }
}

/// Named byte buffers held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    name: String,
    entries: Vec<(String, Vec<u8>)>,
}

impl MemoryArchive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.add_entry(name, data);
        self
    }

    pub fn add_entry(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.push((name.into(), data.into()));
    }
}

impl ArchiveReader for MemoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry_name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(name, _)| name.as_str())
    }

    fn entry_size(&self, index: usize) -> Option<u64> {
        self.entries.get(index).map(|(_, data)| data.len() as u64)
    }

    fn open_entry(&self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        let (_, data) = self.entries.get(index).ok_or_else(|| no_such_entry(index))?;
        Ok(Box::new(Cursor::new(data.as_slice())))
    }
}
