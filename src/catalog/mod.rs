//! Reference catalog storage and indexing.
//!
//! - [`store`]: the JSON reference catalog of games and their roms
//! - [`index`]: in-memory digest index used while checking
//! - [`kv`]: byte-string key/value stores
//! - [`history`]: where files with a given content were seen before
//!
//! ## Catalog format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "games": [
//!     {
//!       "name": "pacman",
//!       "description": "Pac-Man",
//!       "roms": [
//!         { "name": "pacman.6e", "size": 4096, "crc": "c1e6ab10" },
//!         { "name": "pacman.6f", "size": 4096, "crc": "1a6fb2d4", "status": "baddump" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use romcheck::RomCatalog;
//! use std::path::Path;
//!
//! let catalog = RomCatalog::load_from_file(Path::new("catalog.json")).unwrap();
//! for game in &catalog.games {
//!     println!("{} ({} roms)", game.name, game.roms.len());
//! }
//! ```

pub mod history;
pub mod index;
pub mod kv;
pub mod store;
