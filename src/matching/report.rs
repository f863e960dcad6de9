use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::rom::Game;
use crate::core::types::{DumpStatus, Quality};
use crate::matching::result::MatchResult;

/// Outcome for one rom, detached from the archive it was found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RomStatusLine {
    pub rom: String,
    pub size: u64,
    pub status: DumpStatus,
    pub quality: Quality,
    /// Game or archive holding the matched file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Matched a location remembered from another game
    pub elsewhere: bool,
}

impl RomStatusLine {
    /// Nothing to do for this rom
    pub fn is_fine(&self) -> bool {
        if self.quality == Quality::Missing {
            return self.status == DumpStatus::NoDump;
        }
        self.quality.is_correct() && !self.elsewhere
    }
}

impl fmt::Display for RomStatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rom  {:<20} size {:>9}: ", self.rom, self.size)?;
        match (self.quality, &self.file) {
            (Quality::Missing, _) if self.status == DumpStatus::NoDump => write!(f, "no good dump exists"),
            (Quality::Missing, _) => write!(f, "missing"),
            (quality, Some(file)) if self.elsewhere => write!(
                f,
                "{} in '{}' as '{}'",
                quality,
                self.found_in.as_deref().unwrap_or("?"),
                file
            ),
            (Quality::NameErr, Some(file)) => write!(f, "wrong name ({file})"),
            (Quality::Long, _) => match self.offset {
                Some(offset) => write!(f, "too long, valid subsection at byte {offset}"),
                None => write!(f, "too long, unknown content"),
            },
            (quality, _) => write!(f, "{quality}"),
        }
    }
}

/// Summary of checking one game
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub game: String,
    pub roms: Vec<RomStatusLine>,
    pub counts: BTreeMap<Quality, usize>,
}

impl GameReport {
    /// Pair each rom of `game` with its result; `results` is in rom order
    pub fn new(game: &Game, results: &[MatchResult<'_>]) -> Self {
        let roms: Vec<RomStatusLine> = game
            .roms
            .iter()
            .zip(results)
            .map(|(rom, result)| RomStatusLine {
                rom: rom.name.clone(),
                size: rom.size,
                status: rom.status,
                quality: result.quality,
                found_in: result.game_name().map(str::to_string),
                file: result.file_name().map(str::to_string),
                offset: result.offset(),
                elsewhere: result.quality != Quality::Missing && !result.is_live(),
            })
            .collect();

        let mut counts = BTreeMap::new();
        for line in &roms {
            *counts.entry(line.quality).or_insert(0) += 1;
        }

        Self {
            game: game.name.clone(),
            roms,
            counts,
        }
    }

    /// Every rom is present and correct in the game's own archive
    pub fn is_complete(&self) -> bool {
        self.roms.iter().all(RomStatusLine::is_fine)
    }

    pub fn has_problems(&self) -> bool {
        !self.is_complete()
    }

    /// Lines that need attention
    pub fn problems(&self) -> impl Iterator<Item = &RomStatusLine> {
        self.roms.iter().filter(|line| !line.is_fine())
    }

    pub fn count(&self, quality: Quality) -> usize {
        self.counts.get(&quality).copied().unwrap_or(0)
    }
}
