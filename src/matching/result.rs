use crate::archive::ArchiveReader;
use crate::core::types::Quality;

/// Where the file behind a match was found
#[derive(Debug, Clone)]
pub enum MatchLocation<'a> {
    /// Not found anywhere
    Nowhere,
    /// An entry of an archive open during this run
    Live {
        archive: &'a dyn ArchiveReader,
        index: usize,
        /// Start of the rom inside a longer entry
        offset: Option<u64>,
    },
    /// A location remembered from an earlier run
    Historical { game: String, file: String },
}

/// Outcome of looking for one reference rom
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub quality: Quality,
    pub location: MatchLocation<'a>,
}

impl<'a> MatchResult<'a> {
    /// A rom not (yet) found
    pub fn new() -> Self {
        Self {
            quality: Quality::Missing,
            location: MatchLocation::Nowhere,
        }
    }

    pub fn set_live(&mut self, quality: Quality, archive: &'a dyn ArchiveReader, index: usize, offset: Option<u64>) {
        self.quality = quality;
        self.location = MatchLocation::Live {
            archive,
            index,
            offset,
        };
    }

    pub fn set_historical(&mut self, quality: Quality, game: &str, file: &str) {
        self.quality = quality;
        self.location = MatchLocation::Historical {
            game: game.to_string(),
            file: file.to_string(),
        };
    }

    /// Name of the matched file
    pub fn file_name(&self) -> Option<&str> {
        match &self.location {
            MatchLocation::Nowhere => None,
            MatchLocation::Live { archive, index, .. } => archive.entry_name(*index),
            MatchLocation::Historical { file, .. } => Some(file),
        }
    }

    /// Name of the game or archive holding the matched file
    pub fn game_name(&self) -> Option<&str> {
        match &self.location {
            MatchLocation::Nowhere => None,
            MatchLocation::Live { archive, .. } => Some(archive.name()),
            MatchLocation::Historical { game, .. } => Some(game),
        }
    }

    pub fn offset(&self) -> Option<u64> {
        match self.location {
            MatchLocation::Live { offset, .. } => offset,
            _ => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.location, MatchLocation::Live { .. })
    }

    /// Higher quality wins; on equal quality a file in the archive being
    /// checked beats one remembered elsewhere.
    pub fn is_better_than(&self, other: &MatchResult<'_>) -> bool {
        match self.quality.cmp(&other.quality) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.is_live() && !other.is_live(),
        }
    }
}

impl Default for MatchResult<'_> {
    fn default() -> Self {
        Self::new()
    }
}
