use serde::{Deserialize, Serialize};

use crate::core::hashes::Hashes;
use crate::core::types::{DumpStatus, RomLocation};

/// A single file: either a reference definition from the catalog or a
/// candidate found inside an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rom {
    /// File name within its game
    pub name: String,

    /// Name under which the rom appears in its parent set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<String>,

    /// Declared size in bytes, 0 when unknown
    #[serde(default)]
    pub size: u64,

    /// Known digests
    #[serde(flatten)]
    pub hashes: Hashes,

    #[serde(default, skip_serializing_if = "is_ok_status")]
    pub status: DumpStatus,

    #[serde(default, skip_serializing_if = "is_in_archive")]
    pub location: RomLocation,

    /// Other names this rom is known under
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_names: Vec<String>,
}

fn is_ok_status(status: &DumpStatus) -> bool {
    matches!(status, DumpStatus::Ok)
}

fn is_in_archive(location: &RomLocation) -> bool {
    matches!(location, RomLocation::InArchive)
}

impl Rom {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            merge: None,
            size,
            hashes: Hashes::new(),
            status: DumpStatus::Ok,
            location: RomLocation::InArchive,
            alt_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hashes(mut self, hashes: Hashes) -> Self {
        self.hashes = hashes;
        self
    }

    #[must_use]
    pub fn with_crc(mut self, crc: u32) -> Self {
        self.hashes.set_crc(crc);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: DumpStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_merge(mut self, merge: impl Into<String>) -> Self {
        self.merge = Some(merge.into());
        self
    }

    /// Record another name for this rom
    pub fn add_alt_name(&mut self, name: impl Into<String>) {
        self.alt_names.push(name.into());
    }

    /// Name to look for, honouring the merge name when asked to
    #[must_use]
    pub fn effective_name(&self, honor_merge_name: bool) -> &str {
        match (&self.merge, honor_merge_name) {
            (Some(merge), true) => merge,
            _ => &self.name,
        }
    }

    #[must_use]
    pub fn is_no_dump(&self) -> bool {
        self.status == DumpStatus::NoDump
    }

    #[must_use]
    pub fn is_bad_dump(&self) -> bool {
        self.status == DumpStatus::BadDump
    }

    /// Whether the size can be used for verification
    #[must_use]
    pub fn has_size(&self) -> bool {
        self.size != 0
    }
}

/// A named set of reference roms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub roms: Vec<Rom>,
}

impl Game {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            roms: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_roms(mut self, roms: Vec<Rom>) -> Self {
        self.roms = roms;
        self
    }

    /// Find a rom by name, case-insensitively, including alternate names
    #[must_use]
    pub fn rom_by_name(&self, name: &str) -> Option<&Rom> {
        self.roms.iter().find(|r| {
            r.name.eq_ignore_ascii_case(name)
                || r.alt_names.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }
}
