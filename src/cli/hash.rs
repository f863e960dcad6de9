use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::archive::detector::{SkipRule, Transform};
use crate::archive::hasher::{hash_region, HashedEntry};
use crate::catalog::store::RomCatalog;
use crate::cli::{selected_kinds, OutputFormat, SwapOrder};
use crate::core::hashes::HashKind;

#[derive(Args)]
pub struct HashArgs {
    /// Files to hash
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Compute CRC32
    #[arg(long)]
    pub crc: bool,

    /// Compute MD5
    #[arg(long)]
    pub md5: bool,

    /// Compute SHA1
    #[arg(long)]
    pub sha1: bool,

    /// Skip this many bytes at the start of each file
    #[arg(long)]
    pub skip_header: Option<u64>,

    /// Undo a byte order swap before hashing
    #[arg(long, value_enum)]
    pub swap: Option<SwapOrder>,

    /// Catalog to look the files up in
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub fn run(args: HashArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let kinds = selected_kinds(args.crc, args.md5, args.sha1);
    let rule = (args.skip_header.is_some() || args.swap.is_some()).then(|| SkipRule {
        transform: args.swap.map_or(Transform::None, Transform::from),
        ..SkipRule::skip_header(args.skip_header.unwrap_or(0))
    });
    let catalog = args
        .catalog
        .as_deref()
        .map(RomCatalog::load_from_file)
        .transpose()?;

    let mut hashed = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if !path.is_file() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        let entry = hash_region(&mut BufReader::new(file), size, kinds, rule)?;

        if verbose && entry.size != size {
            eprintln!("{}: hashed {} of {} bytes", path.display(), entry.size, size);
        }
        let known_as = catalog
            .as_ref()
            .map(|catalog| known_as(catalog, &entry))
            .unwrap_or_default();
        hashed.push((path, entry, known_as));
    }

    match format {
        OutputFormat::Text => {
            for (path, entry, names) in &hashed {
                println!("{}: size {} {}", path.display(), entry.size, entry.hashes);
                if catalog.is_some() && names.is_empty() {
                    println!("  not in catalog");
                }
                for name in names {
                    println!("  = {name}");
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = hashed
                .iter()
                .map(|(path, entry, names)| json_entry(path, entry, names))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("file\tsize\tcrc32\tmd5\tsha1\tknown_as");
            for (path, entry, names) in &hashed {
                let hex = |kind| entry.hashes.to_hex(kind).unwrap_or_else(|| "-".to_string());
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    path.display(),
                    entry.size,
                    hex(HashKind::Crc32),
                    hex(HashKind::Md5),
                    hex(HashKind::Sha1),
                    if names.is_empty() { "-".to_string() } else { names.join(",") }
                );
            }
        }
    }

    Ok(())
}

/// `game/rom` names of the catalog roms the entry is a copy of
fn known_as(catalog: &RomCatalog, entry: &HashedEntry) -> Vec<String> {
    catalog
        .identify(&entry.hashes, entry.size)
        .into_iter()
        .filter_map(|rom_ref| {
            let game = catalog.games.get(rom_ref.game)?;
            let rom = catalog.rom(rom_ref)?;
            Some(format!("{}/{}", game.name, rom.name))
        })
        .collect()
}

fn json_entry(path: &Path, entry: &HashedEntry, names: &[String]) -> serde_json::Value {
    let mut value = serde_json::json!({
        "file": path.display().to_string(),
        "size": entry.size,
    });
    if let Some(object) = value.as_object_mut() {
        if let Ok(serde_json::Value::Object(hashes)) = serde_json::to_value(entry.hashes) {
            object.extend(hashes);
        }
        if !names.is_empty() {
            object.insert("known_as".to_string(), serde_json::json!(names));
        }
    }
    value
}
