use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::archive::hasher::hash_entry;
use crate::archive::{ArchiveReader, DirArchive};
use crate::catalog::history::HistoryDb;
use crate::catalog::kv::FileStore;
use crate::cli::{selected_kinds, OutputFormat};
use crate::core::hashes::Hashes;
use crate::utils::validation::validate_name;

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Remember every file of a directory
    Record {
        /// History file
        #[arg(long, required = true)]
        history: PathBuf,

        /// Directory whose files are recorded
        #[arg(required = true)]
        dir: PathBuf,

        /// Game the files belong to (default: directory name)
        #[arg(long)]
        game: Option<String>,

        /// Record CRC32
        #[arg(long)]
        crc: bool,

        /// Record MD5
        #[arg(long)]
        md5: bool,

        /// Record SHA1
        #[arg(long)]
        sha1: bool,
    },

    /// Find where content with a digest was seen
    Lookup {
        /// History file
        #[arg(long, required = true)]
        history: PathBuf,

        /// CRC32, MD5 or SHA1 digest in hex
        #[arg(required = true)]
        digest: String,

        /// Expected size in bytes
        #[arg(long)]
        size: Option<u64>,
    },
}

pub fn run(args: HistoryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        HistoryCommands::Record {
            history,
            dir,
            game,
            crc,
            md5,
            sha1,
        } => {
            let mut db = HistoryDb::new(FileStore::open(&history)?);
            let archive = DirArchive::open(&dir)?;
            let game = game.unwrap_or_else(|| archive.name().to_string());
            validate_name(&game)?;

            let kinds = selected_kinds(crc, md5, sha1);
            let mut recorded = 0usize;
            for index in 0..archive.len() {
                let Some(file) = archive.entry_name(index) else {
                    continue;
                };
                match hash_entry(&archive, index, kinds, None) {
                    Ok(entry) => {
                        db.record(&game, file, entry.size, &entry.hashes)?;
                        recorded += 1;
                    }
                    Err(e) => tracing::warn!("Skipping {}: {}", file, e),
                }
            }
            db.flush()?;

            if verbose {
                eprintln!("Recorded {} files as {}", recorded, game);
            }
            Ok(())
        }
        HistoryCommands::Lookup {
            history,
            digest,
            size,
        } => {
            let db = HistoryDb::new(FileStore::open(&history)?);
            let hashes = Hashes::from_hex(&digest)?;
            let Some(kind) = hashes.kinds().iter().next() else {
                anyhow::bail!("No digest given");
            };
            let records = db.lookup(kind, &hashes, size.unwrap_or(0))?;

            match format {
                OutputFormat::Text => {
                    if records.is_empty() {
                        println!("{digest}: not found");
                    }
                    for record in &records {
                        println!("{}/{} (size {})", record.game, record.file, record.size);
                    }
                }
                OutputFormat::Json => {
                    let output: Vec<serde_json::Value> = records
                        .iter()
                        .map(|r| {
                            serde_json::json!({
                                "game": r.game,
                                "file": r.file,
                                "size": r.size,
                                "hashes": r.hashes,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Tsv => {
                    println!("game\tfile\tsize");
                    for record in &records {
                        println!("{}\t{}\t{}", record.game, record.file, record.size);
                    }
                }
            }
            Ok(())
        }
    }
}
