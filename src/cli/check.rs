use std::path::{Path, PathBuf};

use clap::Args;

use crate::archive::detector::{FixedHeaderSkip, Transform};
use crate::archive::{ArchiveReader, DirArchive};
use crate::catalog::history::HistoryDb;
use crate::catalog::kv::{FileStore, KeyValueStore};
use crate::catalog::store::RomCatalog;
use crate::cli::{selected_kinds, OutputFormat, SwapOrder};
use crate::core::hashes::HashKinds;
use crate::core::rom::Game;
use crate::core::types::Quality;
use crate::matching::engine::{CheckConfig, GameChecker};
use crate::matching::report::GameReport;

#[derive(Args)]
pub struct CheckArgs {
    /// Catalog file (JSON)
    #[arg(long, required = true)]
    pub catalog: PathBuf,

    /// Directory holding one subdirectory per game
    #[arg(long, required = true)]
    pub roms: PathBuf,

    /// History file used to find roms stored under other games
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Look for roms under their own names, not their parent set names
    #[arg(long)]
    pub no_merge: bool,

    /// Do not look for roms inside longer files
    #[arg(long)]
    pub no_embedded: bool,

    /// Only report games with problems
    #[arg(long)]
    pub only_problems: bool,

    /// Hash CRC32 of every file up front (default when no digest flag is given)
    #[arg(long)]
    pub crc: bool,

    /// Hash MD5 of every file up front
    #[arg(long)]
    pub md5: bool,

    /// Hash SHA1 of every file up front
    #[arg(long)]
    pub sha1: bool,

    /// Strip a header of this many bytes from files that carry one
    #[arg(long)]
    pub skip_header: Option<u64>,

    /// Block size a headerless file is a multiple of
    #[arg(long, default_value = "1024")]
    pub header_block: u64,

    /// Undo a byte order swap in files whose size fits the header rule
    #[arg(long, value_enum)]
    pub swap: Option<SwapOrder>,

    /// Games to check (default: every game in the catalog)
    pub games: Vec<String>,
}

pub fn run(args: CheckArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = RomCatalog::load_from_file(&args.catalog)?;

    if verbose {
        eprintln!("Loaded catalog with {} games", catalog.len());
    }

    let games: Vec<&Game> = if args.games.is_empty() {
        catalog.games.iter().collect()
    } else {
        args.games
            .iter()
            .map(|name| {
                catalog
                    .game(name)
                    .ok_or_else(|| anyhow::anyhow!("Game '{}' not found in catalog", name))
            })
            .collect::<anyhow::Result<_>>()?
    };

    let hash_kinds = if args.crc || args.md5 || args.sha1 {
        selected_kinds(args.crc, args.md5, args.sha1)
    } else {
        HashKinds::CRC32
    };
    let config = CheckConfig {
        honor_merge_names: !args.no_merge,
        hash_kinds,
        scan_embedded: !args.no_embedded,
    };

    let history = args
        .history
        .as_deref()
        .map(|path| FileStore::open(path).map(HistoryDb::new))
        .transpose()?;
    let skip = (args.skip_header.is_some() || args.swap.is_some()).then(|| {
        FixedHeaderSkip::new(args.skip_header.unwrap_or(0), args.header_block)
            .with_transform(args.swap.map_or(Transform::None, Transform::from))
    });

    let mut checker = GameChecker::with_config(config);
    if let Some(skip) = &skip {
        checker = checker.with_header_skip(skip);
    }

    let mut reports = match &history {
        Some(history) => check_all(&checker.with_history(history), &games, &args.roms),
        None => check_all(&checker, &games, &args.roms),
    };

    if args.only_problems {
        reports.retain(GameReport::has_problems);
    }

    if verbose {
        let complete = reports.iter().filter(|r| r.is_complete()).count();
        eprintln!("{} of {} games complete", complete, reports.len());
    }

    match format {
        OutputFormat::Text => print_text(&reports),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Tsv => print_tsv(&reports),
    }

    Ok(())
}

fn check_all<S: KeyValueStore>(checker: &GameChecker<'_, S>, games: &[&Game], roms: &Path) -> Vec<GameReport> {
    games
        .iter()
        .map(|game| {
            let archive = open_game_dir(roms, game);
            let results = checker.check_game(game, archive.as_ref().map(|a| a as &dyn ArchiveReader));
            GameReport::new(game, &results)
        })
        .collect()
}

/// The game's directory under `roms`, if there is one
fn open_game_dir(roms: &Path, game: &Game) -> Option<DirArchive> {
    let path = roms.join(&game.name);
    if !path.is_dir() {
        tracing::debug!("No directory for {}", game.name);
        return None;
    }
    match DirArchive::open(&path) {
        Ok(archive) => Some(archive),
        Err(e) => {
            tracing::warn!("Cannot read {}: {}", path.display(), e);
            None
        }
    }
}

fn print_text(reports: &[GameReport]) {
    for report in reports {
        if report.is_complete() {
            println!("game {}: correct", report.game);
        } else if report.count(Quality::Missing) == report.roms.len() {
            println!("game {}: not a single rom found", report.game);
        } else {
            println!("In game {}:", report.game);
            for line in report.problems() {
                println!("  {line}");
            }
        }
    }
}

fn print_tsv(reports: &[GameReport]) {
    println!("game\trom\tsize\tquality\tfound_in\tfile\toffset");
    for report in reports {
        for line in &report.roms {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                report.game,
                line.rom,
                line.size,
                line.quality,
                line.found_in.as_deref().unwrap_or("-"),
                line.file.as_deref().unwrap_or("-"),
                line.offset.map_or_else(|| "-".to_string(), |o| o.to_string()),
            );
        }
    }
}
