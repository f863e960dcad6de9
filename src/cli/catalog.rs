use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::RomCatalog;
use crate::cli::OutputFormat;
use crate::core::hashes::HashKind;
use crate::core::rom::Rom;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all games in the catalog
    List {
        /// Path to catalog file
        #[arg(long, required = true)]
        catalog: PathBuf,

        /// Only games whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show the roms of a game
    Show {
        /// Game name
        #[arg(required = true)]
        name: String,

        /// Path to catalog file
        #[arg(long, required = true)]
        catalog: PathBuf,
    },
}

pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { catalog, filter } => run_list(catalog, filter.as_deref(), format, verbose),
        CatalogCommands::Show { name, catalog } => run_show(&name, catalog, format),
    }
}

fn run_list(catalog_path: PathBuf, filter: Option<&str>, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = RomCatalog::load_from_file(&catalog_path)?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} games (digests: {})",
            catalog.len(),
            catalog.hash_kinds_in_use()
        );
    }

    let filtered: Vec<_> = catalog
        .games
        .iter()
        .filter(|g| filter.map_or(true, |f| g.name.to_lowercase().contains(&f.to_lowercase())))
        .collect();

    match format {
        OutputFormat::Text => {
            let name_width = filtered
                .iter()
                .map(|g| g.name.len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Rom Catalog ({} games)\n", filtered.len());
            println!("{:<name_w$} {:>6}  Description", "Name", "Roms", name_w = name_width);
            println!("{}", "-".repeat(name_width + 21));
            for game in &filtered {
                println!(
                    "{:<name_w$} {:>6}  {}",
                    game.name,
                    game.roms.len(),
                    game.description.as_deref().unwrap_or("-"),
                    name_w = name_width
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = filtered
                .iter()
                .map(|g| {
                    serde_json::json!({
                        "name": g.name,
                        "description": g.description,
                        "rom_count": g.roms.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("name\troms\tdescription");
            for game in &filtered {
                println!(
                    "{}\t{}\t{}",
                    game.name,
                    game.roms.len(),
                    game.description.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}

fn run_show(name: &str, catalog_path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = RomCatalog::load_from_file(&catalog_path)?;
    let game = catalog
        .game(name)
        .ok_or_else(|| anyhow::anyhow!("Game '{}' not found", name))?;

    let hex = |rom: &Rom, kind| rom.hashes.to_hex(kind).unwrap_or_else(|| "-".to_string());

    match format {
        OutputFormat::Text => {
            println!("Game: {}", game.name);
            if let Some(desc) = &game.description {
                println!("Description: {desc}");
            }
            println!("Roms: {}\n", game.roms.len());

            println!("{:<24} {:>10} {:<8} {:<8} SHA1", "Name", "Size", "CRC32", "Status");
            println!("{}", "-".repeat(96));
            for rom in &game.roms {
                println!(
                    "{:<24} {:>10} {:<8} {:<8} {}",
                    rom.name,
                    rom.size,
                    hex(rom, HashKind::Crc32),
                    rom.status.to_string(),
                    hex(rom, HashKind::Sha1)
                );
                if let Some(merge) = &rom.merge {
                    println!("  merged as {merge}");
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(game)?);
        }
        OutputFormat::Tsv => {
            println!("name\tsize\tcrc32\tmd5\tsha1\tstatus\tmerge");
            for rom in &game.roms {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    rom.name,
                    rom.size,
                    hex(rom, HashKind::Crc32),
                    hex(rom, HashKind::Md5),
                    hex(rom, HashKind::Sha1),
                    rom.status,
                    rom.merge.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}
