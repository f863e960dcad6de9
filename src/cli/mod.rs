//! Command-line interface for romcheck.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **check**: Check rom directories against a catalog
//! - **hash**: Print the digests of files
//! - **catalog**: List or show games from the catalog
//! - **history**: Record or look up where content was seen before
//!
//! ## Usage
//!
//! ```text
//! # Check every game that has a directory under roms/
//! romcheck check --catalog mame.json --roms roms/
//!
//! # Only report games with problems, as JSON
//! romcheck check --catalog mame.json --roms roms/ --only-problems --format json
//!
//! # Digests of a headered dump
//! romcheck hash --sha1 --skip-header 512 game.smc
//!
//! # Which catalog roms a byte-swapped dump is a copy of
//! romcheck hash --swap byte --catalog n64.json game.v64
//!
//! # Remember the contents of a directory, then use it when checking
//! romcheck history record --history seen.db roms/pacman
//! romcheck check --catalog mame.json --roms roms/ --history seen.db
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod check;
pub mod hash;
pub mod history;

#[derive(Parser)]
#[command(name = "romcheck")]
#[command(version)]
#[command(about = "Verify rom collections against a reference catalog")]
#[command(
    long_about = "romcheck identifies the files in rom directories by their CRC32, MD5 and SHA1 digests and checks them against a catalog of known games.\n\nFor every rom it reports whether it is:\n- Correct, or the best known copy of a bad dump\n- Present under a wrong name\n- Damaged, too long or too short\n- Missing, or only known from another game"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check games against their rom directories
    Check(check::CheckArgs),

    /// Print digests of files
    Hash(hash::HashArgs),

    /// Inspect the reference catalog
    Catalog(catalog::CatalogArgs),

    /// Maintain the history of seen files
    History(history::HistoryArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Byte order correction for dumps stored swapped
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SwapOrder {
    /// Reverse the bits of every byte
    Bit,
    /// Swap the bytes of every 16-bit pair
    Byte,
    /// Reverse the bytes of every 32-bit word
    Word,
}

impl From<SwapOrder> for crate::archive::detector::Transform {
    fn from(order: SwapOrder) -> Self {
        match order {
            SwapOrder::Bit => Self::BitSwap,
            SwapOrder::Byte => Self::ByteSwap,
            SwapOrder::Word => Self::WordSwap,
        }
    }
}

/// Digest kinds selected by `--crc`/`--md5`/`--sha1` flags; all when none is given
pub(crate) fn selected_kinds(crc: bool, md5: bool, sha1: bool) -> crate::core::hashes::HashKinds {
    use crate::core::hashes::HashKinds;

    let mut kinds = HashKinds::NONE;
    if crc {
        kinds = kinds | HashKinds::CRC32;
    }
    if md5 {
        kinds = kinds | HashKinds::MD5;
    }
    if sha1 {
        kinds = kinds | HashKinds::SHA1;
    }
    if kinds.is_empty() {
        HashKinds::ALL
    } else {
        kinds
    }
}
