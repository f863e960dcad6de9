//! # romcheck
//!
//! A library for verifying collections of rom and disk images against a
//! reference catalog.
//!
//! Files are identified by content, not just by name: every archive entry is
//! hashed and compared against the digests the catalog records for each rom.
//! A rom is then reported as correct, a best available bad dump, misnamed,
//! damaged, too long, too short, or missing.
//!
//! ## Features
//!
//! - **Digest matching**: CRC32, MD5 and SHA1, compared over the kinds both sides carry
//! - **Misnamed files**: Right content under a wrong name is found through a digest index
//! - **Embedded roms**: Finds a rom at an aligned offset inside a longer file
//! - **Header skipping**: Hashes past copier headers and byte-swapped dumps
//! - **History**: Remembers where content was seen before
//!
//! ## Example
//!
//! ```rust,no_run
//! use romcheck::{GameChecker, RomCatalog};
//! use romcheck::archive::DirArchive;
//! use std::path::Path;
//!
//! let catalog = RomCatalog::load_from_file(Path::new("catalog.json")).unwrap();
//! let game = catalog.game("pacman").unwrap();
//! let archive = DirArchive::open(Path::new("roms/pacman")).unwrap();
//!
//! let checker = GameChecker::new();
//! for (rom, result) in game.roms.iter().zip(checker.check_game(game, Some(&archive))) {
//!     println!("{}: {}", rom.name, result.quality);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`archive`]: Archive access, entry hashing and header skipping
//! - [`catalog`]: Reference catalog, digest index and history store
//! - [`core`]: Digests, roms and result types
//! - [`matching`]: Classification and per-game checking
//! - [`cli`]: Command-line interface implementation

pub mod archive;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::RomCatalog;
pub use core::hashes::{HashComparison, HashKind, HashKinds, Hashes};
pub use core::rom::{Game, Rom};
pub use core::types::*;
pub use matching::engine::{CheckConfig, GameChecker};
pub use matching::result::{MatchLocation, MatchResult};
