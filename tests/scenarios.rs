//! End-to-end checks of classification, indexing and window scanning
//! through the public library API.

use std::cmp::Ordering;
use std::io::Cursor;

use romcheck::archive::hasher::{compute_hashes, find_embedded};
use romcheck::archive::MemoryArchive;
use romcheck::catalog::history::HistoryDb;
use romcheck::catalog::index::IdentityIndex;
use romcheck::catalog::kv::{FileStore, KeyValueStore};
use romcheck::matching::classify;
use romcheck::matching::report::GameReport;
use romcheck::utils::array::DynamicArray;
use romcheck::utils::validation::ValidationError;
use romcheck::{DumpStatus, Game, GameChecker, HashKind, HashKinds, Hashes, Quality, Rom, RomCatalog};

fn rom(name: &str, size: u64, crc: u32) -> Rom {
    Rom::new(name, size).with_crc(crc)
}

#[test]
fn test_identical_name_size_and_crc_is_ok() {
    let candidate = rom("foo", 100, 0xDEAD_BEEF);
    let reference = rom("foo", 100, 0xDEAD_BEEF);
    assert_eq!(classify(&candidate, &reference, false), Quality::Ok);
}

#[test]
fn test_no_dump_reference_is_ok_despite_crc() {
    let candidate = rom("foo", 100, 0xAAAA_AAAA);
    let reference = rom("foo", 100, 0xBBBB_BBBB).with_status(DumpStatus::NoDump);
    assert_eq!(classify(&candidate, &reference, false), Quality::Ok);
}

#[test]
fn test_complement_crc_is_best_bad_dump() {
    let x = 0x1357_9BDF;
    let candidate = rom("foo", 100, x);
    let reference = rom("foo", 100, !x);
    assert_eq!(classify(&candidate, &reference, false), Quality::BestBadDump);
}

#[test]
fn test_larger_file_is_long() {
    let candidate = Rom::new("foo", 150);
    let reference = Rom::new("foo", 100);
    assert_eq!(classify(&candidate, &reference, false), Quality::Long);
}

#[test]
fn test_same_content_other_name_is_name_error() {
    let candidate = rom("bar", 100, 0x0BAD_F00D);
    let reference = rom("foo", 100, 0x0BAD_F00D);
    assert_eq!(classify(&candidate, &reference, false), Quality::NameErr);
}

#[test]
fn test_unrelated_file_is_unknown() {
    let candidate = rom("bar", 99, 1);
    let reference = rom("foo", 100, 2);
    assert_eq!(classify(&candidate, &reference, false), Quality::Unknown);
}

#[test]
fn test_compare_ignores_one_sided_kinds() {
    let a = Hashes::new().with_crc(5).with_md5([1; 16]);
    let b = Hashes::new().with_crc(5).with_sha1([2; 20]);
    assert_eq!(a.compare(&b), romcheck::HashComparison::Match);

    let c = Hashes::new().with_sha1([2; 20]);
    let d = Hashes::new().with_md5([1; 16]);
    assert_eq!(c.compare(&d), romcheck::HashComparison::NoCommonKind);
}

#[test]
fn test_index_visits_each_distinct_key() {
    let mut index = IdentityIndex::new();
    let n = 50u32;
    let k = 9u32;
    for i in 0..n {
        let hashes = Hashes::new().with_crc(i % k);
        index.add(HashKind::Crc32, &hashes, i).unwrap();
    }

    let mut buckets = 0;
    index
        .for_each(|_, _| {
            buckets += 1;
            Ok::<(), ValidationError>(())
        })
        .unwrap();
    assert_eq!(buckets, k);

    let hits = index
        .get(HashKind::Crc32, &Hashes::new().with_crc(3))
        .unwrap();
    assert!(hits.contains(&3));
    assert!(hits.contains(&12));

    assert!(matches!(
        index.get(HashKind::Md5, &Hashes::new().with_crc(3)),
        Err(ValidationError::MissingHashKind(HashKind::Md5))
    ));
}

#[test]
fn test_sort_unique_extremes() {
    let n = 37;
    let mut distinct: DynamicArray<i32> = (0..n).rev().collect();
    distinct.sort_unique(|a, b| a.cmp(b));
    assert_eq!(distinct.len(), n as usize);
    assert!(distinct.as_slice().windows(2).all(|w| w[0] < w[1]));

    let mut equal: DynamicArray<i32> = (0..n).collect();
    equal.sort_unique(|_, _| Ordering::Equal);
    assert_eq!(equal.len(), 1);
}

#[test]
fn test_find_embedded_is_aligned() {
    let block: Vec<u8> = (0..256u32).map(|i| (i * 7 % 251) as u8).collect();
    let target = compute_hashes(&mut Cursor::new(&block), 256, HashKinds::CRC32).unwrap();

    let mut twice = block.clone();
    twice.extend_from_slice(&block);
    assert_eq!(
        find_embedded(&mut Cursor::new(&twice), 512, 256, &target).unwrap(),
        Some(0)
    );

    let mut shifted = vec![0u8; 3];
    shifted.extend_from_slice(&block);
    shifted.resize(512, 0);
    assert_eq!(
        find_embedded(&mut Cursor::new(&shifted), 512, 256, &target).unwrap(),
        None
    );
}

#[test]
fn test_catalog_game_checked_against_archive() {
    let a = b"first rom contents".to_vec();
    let b = b"second rom".to_vec();
    let crc = |data: &[u8]| {
        compute_hashes(&mut Cursor::new(data), data.len() as u64, HashKinds::CRC32)
            .unwrap()
            .crc()
            .unwrap()
    };

    let json = format!(
        r#"{{"version":"1.0.0","games":[{{"name":"demo","roms":[
            {{"name":"a.bin","size":{},"crc":"{:08x}"}},
            {{"name":"b.bin","size":{},"crc":"{:08x}"}},
            {{"name":"c.bin","size":4,"crc":"00000000"}}
        ]}}]}}"#,
        a.len(),
        crc(&a),
        b.len(),
        crc(&b)
    );
    let catalog = RomCatalog::from_json(&json).unwrap();
    let game: &Game = catalog.game("demo").unwrap();

    let archive = MemoryArchive::new("demo")
        .with_entry("a.bin", a)
        .with_entry("renamed.bin", b);
    let results = GameChecker::new().check_game(game, Some(&archive));

    let qualities: Vec<Quality> = results.iter().map(|r| r.quality).collect();
    assert_eq!(qualities, vec![Quality::Ok, Quality::NameErr, Quality::Missing]);

    let report = GameReport::new(game, &results);
    assert!(report.has_problems());
    assert_eq!(report.count(Quality::Ok), 1);
}

#[test]
fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    let hashes = Hashes::new().with_crc(0xC1E6_AB10);

    {
        let mut db = HistoryDb::new(FileStore::open(&path).unwrap());
        db.record("pacman", "pacman.6e", 4096, &hashes).unwrap();
        db.flush().unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert!(store.get(b"/crc32/c1e6ab10").unwrap().is_some());
    let db = HistoryDb::new(store);
    let found = db.lookup(HashKind::Crc32, &hashes, 4096).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].game, "pacman");
}
