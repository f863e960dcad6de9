//! Grading found files against reference roms.
//!
//! - [`classify`](compare::classify): grades one file against one reference rom
//! - [`MatchResult`](result::MatchResult): the outcome for a rom and where the file was found
//! - [`GameChecker`](engine::GameChecker): checks every rom of a game against an archive
//! - [`GameReport`](report::GameReport): per-rom summary for display
//!
//! ## Quality
//!
//! From best to worst: correct, best bad dump, wrong name, wrong checksum,
//! too long, too short, unknown, missing. A rom keeps the best result found
//! for it; on equal quality a file in the checked archive beats a location
//! remembered from another game.
//!
//! ## Example
//!
//! ```rust
//! use romcheck::archive::MemoryArchive;
//! use romcheck::core::rom::{Game, Rom};
//! use romcheck::core::types::Quality;
//! use romcheck::matching::engine::GameChecker;
//!
//! let game = Game::new("demo").with_roms(vec![Rom::new("a.bin", 3).with_crc(0x3524_41c2)]);
//! let archive = MemoryArchive::new("demo").with_entry("a.bin", b"abc".to_vec());
//!
//! let results = GameChecker::new().check_game(&game, Some(&archive));
//! assert_eq!(results[0].quality, Quality::Ok);
//! ```

pub mod compare;
pub mod engine;
pub mod report;
pub mod result;

pub use compare::classify;
