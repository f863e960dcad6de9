use tracing::{debug, warn};

use crate::archive::detector::HeaderSkip;
use crate::archive::hasher::{find_embedded_in_entry, hash_entry, HashedEntry};
use crate::archive::ArchiveReader;
use crate::catalog::history::HistoryDb;
use crate::catalog::index::IdentityIndex;
use crate::catalog::kv::{KeyValueStore, MemoryStore};
use crate::core::hashes::{HashKind, HashKinds, Hashes};
use crate::core::rom::{Game, Rom};
use crate::core::types::Quality;
use crate::matching::compare::classify;
use crate::matching::result::MatchResult;

/// Configuration for checking games
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Look for roms under the name they have in their parent set
    pub honor_merge_names: bool,
    /// Digest kinds computed for every archive entry up front
    pub hash_kinds: HashKinds,
    /// Look for a rom inside entries that are longer than it
    pub scan_embedded: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            honor_merge_names: true,
            hash_kinds: HashKinds::CRC32,
            scan_embedded: true,
        }
    }
}

/// Checks the roms of a game against the entries of its archive
pub struct GameChecker<'c, S = MemoryStore> {
    config: CheckConfig,
    history: Option<&'c HistoryDb<S>>,
    header_skip: Option<&'c dyn HeaderSkip>,
}

impl<'c> GameChecker<'c, MemoryStore> {
    /// Create a checker with default configuration
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker with custom configuration
    pub fn with_config(config: CheckConfig) -> Self {
        Self {
            config,
            history: None,
            header_skip: None,
        }
    }
}

impl Default for GameChecker<'_, MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c, S: KeyValueStore> GameChecker<'c, S> {
    /// Also look up roms not found in the archive among remembered locations
    #[must_use]
    pub fn with_history<T: KeyValueStore>(self, history: &'c HistoryDb<T>) -> GameChecker<'c, T> {
        GameChecker {
            config: self.config,
            history: Some(history),
            header_skip: self.header_skip,
        }
    }

    /// Hash entries after the adjustment `skip` reports for them
    #[must_use]
    pub fn with_header_skip(mut self, skip: &'c dyn HeaderSkip) -> Self {
        self.header_skip = Some(skip);
        self
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// One result per rom of `game`, in the order of `game.roms`.
    ///
    /// Entries that cannot be read are logged and ignored; roms that could
    /// only have matched them stay missing.
    pub fn check_game<'a>(&self, game: &Game, archive: Option<&'a dyn ArchiveReader>) -> Vec<MatchResult<'a>> {
        let mut results = vec![MatchResult::new(); game.roms.len()];

        if let Some(archive) = archive {
            let mut candidates = self.hash_candidates(archive);
            let by_content = index_candidates(&candidates);

            for (rom, result) in game.roms.iter().zip(results.iter_mut()) {
                self.match_by_name(rom, archive, &mut candidates, result);
                if !result.quality.is_correct() {
                    self.match_by_content(rom, archive, &candidates, &by_content, result);
                }
            }
        }

        if let Some(history) = self.history {
            for (rom, result) in game.roms.iter().zip(results.iter_mut()) {
                if result.quality < Quality::NameErr {
                    match_in_history(history, game, rom, result);
                }
            }
        }

        for (rom, result) in game.roms.iter().zip(&results) {
            debug!(
                "{}/{}: {} ({})",
                game.name,
                rom.name,
                result.quality,
                result.file_name().unwrap_or("-")
            );
        }

        results
    }

    fn hash_candidates(&self, archive: &dyn ArchiveReader) -> Vec<Option<Rom>> {
        (0..archive.len())
            .map(|index| {
                let name = archive.entry_name(index)?;
                let entry = self.hash_entry_logged(archive, index, self.config.hash_kinds)?;
                Some(Rom::new(name, entry.size).with_hashes(entry.hashes))
            })
            .collect()
    }

    fn hash_entry_logged(&self, archive: &dyn ArchiveReader, index: usize, kinds: HashKinds) -> Option<HashedEntry> {
        let skip_applies = self.header_skip.is_some_and(|skip| {
            archive
                .entry_name(index)
                .zip(archive.entry_size(index))
                .is_some_and(|(name, size)| skip.adjustment(name, size).is_some())
        });

        if kinds == HashKinds::CRC32 && !skip_applies {
            if let (Some(crc), Some(size)) = (archive.entry_crc(index), archive.entry_size(index)) {
                return Some(HashedEntry {
                    hashes: Hashes::new().with_crc(crc),
                    size,
                });
            }
        }

        match hash_entry(archive, index, kinds, self.header_skip) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(
                    "Skipping {}/{}: {}",
                    archive.name(),
                    archive.entry_name(index).unwrap_or("?"),
                    e
                );
                None
            }
        }
    }

    /// Grade every entry whose name matches the rom
    fn match_by_name<'a>(
        &self,
        rom: &Rom,
        archive: &'a dyn ArchiveReader,
        candidates: &mut [Option<Rom>],
        result: &mut MatchResult<'a>,
    ) {
        let honor = self.config.honor_merge_names;
        let wanted = rom.effective_name(honor);

        for index in 0..candidates.len() {
            let names_match = candidates[index]
                .as_ref()
                .is_some_and(|c| c.name.eq_ignore_ascii_case(wanted));
            if !names_match {
                continue;
            }

            self.complete_hashes(rom, archive, index, &mut candidates[index]);
            let Some(candidate) = &candidates[index] else {
                continue;
            };

            let quality = classify(candidate, rom, honor);
            let mut found = MatchResult::new();
            found.set_live(quality, archive, index, None);

            if quality == Quality::Long && self.config.scan_embedded {
                match find_embedded_in_entry(archive, index, rom.size, &rom.hashes) {
                    Ok(Some(offset)) => {
                        debug!("{} found at offset {} in {}", rom.name, offset, candidate.name);
                        found.set_live(quality, archive, index, Some(offset));
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Scanning {}/{} failed: {}", archive.name(), candidate.name, e),
                }
            }

            if found.is_better_than(result) {
                *result = found;
            }
        }
    }

    /// Compute the rom's digest kinds the candidate lacks, when their sizes
    /// agree and the digests are about to be compared
    fn complete_hashes(&self, rom: &Rom, archive: &dyn ArchiveReader, index: usize, candidate: &mut Option<Rom>) {
        let Some(c) = candidate.as_mut() else { return };
        let missing = rom.hashes.kinds().difference(c.hashes.kinds());
        if c.size != rom.size || missing.is_empty() {
            return;
        }

        match self.hash_entry_logged(archive, index, missing) {
            Some(entry) => c.hashes.merge(&entry.hashes),
            None => *candidate = None,
        }
    }

    /// Look for the rom's content among all entries, whatever their name
    fn match_by_content<'a>(
        &self,
        rom: &Rom,
        archive: &'a dyn ArchiveReader,
        candidates: &[Option<Rom>],
        by_content: &IdentityIndex<usize>,
        result: &mut MatchResult<'a>,
    ) {
        let mut hits: Vec<usize> = by_content.find_any(&rom.hashes).into_iter().copied().collect();
        hits.sort_unstable();
        hits.dedup();

        for index in hits {
            let Some(candidate) = &candidates[index] else {
                continue;
            };
            let quality = classify(candidate, rom, self.config.honor_merge_names);
            if quality != Quality::NameErr {
                continue;
            }
            let mut found = MatchResult::new();
            found.set_live(quality, archive, index, None);
            if found.is_better_than(result) {
                debug!("{} found as {}", rom.name, candidate.name);
                *result = found;
            }
        }
    }
}

/// Index every hashed entry by each digest it has
fn index_candidates(candidates: &[Option<Rom>]) -> IdentityIndex<usize> {
    let mut index = IdentityIndex::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let Some(candidate) = candidate else { continue };
        for kind in candidate.hashes.kinds().iter() {
            // kinds() only yields present kinds, so add cannot fail
            let _ = index.add(kind, &candidate.hashes, i);
        }
    }
    index
}

/// Look the rom up under each digest kind it carries, strongest first, and
/// take the first location remembered for another game
fn match_in_history<S: KeyValueStore>(history: &HistoryDb<S>, game: &Game, rom: &Rom, result: &mut MatchResult<'_>) {
    let mut kinds: Vec<HashKind> = rom.hashes.kinds().iter().collect();
    kinds.reverse();

    for kind in kinds {
        let records = match history.lookup(kind, &rom.hashes, rom.size) {
            Ok(records) => records,
            Err(e) => {
                warn!("History lookup for {}/{} failed: {}", game.name, rom.name, e);
                continue;
            }
        };

        let Some(record) = records
            .iter()
            .find(|r| !r.game.eq_ignore_ascii_case(&game.name))
        else {
            continue;
        };

        debug!("{} remembered in {}/{} by {}", rom.name, record.game, record.file, kind);
        let mut found = MatchResult::new();
        found.set_historical(Quality::Ok, &record.game, &record.file);
        if found.is_better_than(result) {
            *result = found;
        }
        return;
    }
}
