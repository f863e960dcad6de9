use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::catalog::index::IdentityIndex;
use crate::core::hashes::{HashComparison, HashKind, HashKinds, Hashes};
use crate::core::rom::{Game, Rom};
use crate::utils::validation::{check_rom_limit, validate_name, ValidationError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid catalog entry in game '{game}': {source}")]
    InvalidEntry {
        game: String,
        #[source]
        source: ValidationError,
    },

    #[error("Duplicate game '{0}' in catalog")]
    DuplicateGame(String),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    #[serde(default)]
    pub games: Vec<Game>,
}

/// Position of a rom inside the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomRef {
    pub game: usize,
    pub rom: usize,
}

/// The reference catalog with its lookup indexes
#[derive(Debug, Default)]
pub struct RomCatalog {
    /// All known games
    pub games: Vec<Game>,

    /// Index: lowercase game name -> index in games vec
    name_to_index: HashMap<String, usize>,

    /// Index: digest -> every rom carrying it
    by_hash: IdentityIndex<RomRef>,

    /// Union of digest kinds used by any rom
    kinds_in_use: HashKinds,
}

impl RomCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION, data.version
            );
        }

        let mut catalog = Self::new();
        for game in data.games {
            catalog.add_game(game)?;
        }

        Ok(catalog)
    }

    /// Add a game to the catalog, indexing every digest of every rom
    pub fn add_game(&mut self, game: Game) -> Result<(), CatalogError> {
        let invalid = |source| CatalogError::InvalidEntry {
            game: game.name.clone(),
            source,
        };

        validate_name(&game.name).map_err(invalid)?;
        for (i, rom) in game.roms.iter().enumerate() {
            check_rom_limit(i).map_err(invalid)?;
            validate_name(&rom.name).map_err(invalid)?;
            if let Some(merge) = &rom.merge {
                validate_name(merge).map_err(invalid)?;
            }
        }

        let key = game.name.to_ascii_lowercase();
        if self.name_to_index.contains_key(&key) {
            return Err(CatalogError::DuplicateGame(game.name));
        }

        let index = self.games.len();
        self.name_to_index.insert(key, index);

        for (rom_index, rom) in game.roms.iter().enumerate() {
            let rom_ref = RomRef {
                game: index,
                rom: rom_index,
            };
            for kind in rom.hashes.kinds().iter() {
                self.by_hash
                    .add(kind, &rom.hashes, rom_ref)
                    .map_err(|source| CatalogError::InvalidEntry {
                        game: game.name.clone(),
                        source,
                    })?;
            }
            self.kinds_in_use = self.kinds_in_use | rom.hashes.kinds();
        }

        self.games.push(game);
        Ok(())
    }

    /// Get a game by name (case-insensitive)
    pub fn game(&self, name: &str) -> Option<&Game> {
        self.name_to_index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.games[idx])
    }

    /// Resolve a rom reference
    pub fn rom(&self, rom_ref: RomRef) -> Option<&Rom> {
        self.games.get(rom_ref.game)?.roms.get(rom_ref.rom)
    }

    /// Roms whose `kind` digest equals the one in `hashes`
    pub fn find_by_hash(&self, kind: HashKind, hashes: &Hashes) -> Result<&[RomRef], ValidationError> {
        self.by_hash.get(kind, hashes)
    }

    /// Roms a file of `size` bytes with digests `hashes` is a good copy of.
    ///
    /// Candidates are gathered under every kind both the file and the catalog
    /// carry; a rom is kept when no shared digest disagrees and its size, if
    /// known, equals `size`.
    pub fn identify(&self, hashes: &Hashes, size: u64) -> Vec<RomRef> {
        let shared = hashes.restricted_to(self.kinds_in_use);
        let mut found: Vec<RomRef> = Vec::new();

        for kind in shared.kinds().iter() {
            let Ok(refs) = self.find_by_hash(kind, &shared) else {
                continue;
            };
            for rom_ref in refs {
                let Some(rom) = self.rom(*rom_ref) else { continue };
                let agrees = rom.hashes.compare(&shared) == HashComparison::Match;
                let sized = !rom.has_size() || rom.size == size;
                if agrees && sized && !found.contains(rom_ref) {
                    found.push(*rom_ref);
                }
            }
        }

        found.sort_by_key(|r| (r.game, r.rom));
        found
    }

    /// Digest kinds carried by at least one rom
    pub fn hash_kinds_in_use(&self) -> HashKinds {
        self.kinds_in_use
    }

    /// Export catalog to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            games: self.games.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of games in catalog
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
