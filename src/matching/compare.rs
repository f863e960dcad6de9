use crate::core::hashes::HashComparison;
use crate::core::rom::Rom;
use crate::core::types::Quality;

/// Grade a found file against a reference definition.
///
/// Checks run in a fixed order and the first applicable rule decides:
///
/// 1. The names match (ASCII case-insensitive) if the candidate carries the
///    reference name. When `honor_merge_name` is set and the reference has a
///    merge name, the merge name is compared instead.
/// 2. With matching names: an unknown reference size is `Ok`; equal sizes are
///    `Ok` when either side is a no-dump or the digests match, `BestBadDump`
///    when the CRCs are complements or either side is a bad dump, otherwise
///    `CrcErr`; a larger candidate is `Long`, a smaller one `Short`.
/// 3. Without matching names: equal nonzero sizes and matching digests give
///    `NameErr`.
/// 4. Anything else is `Unknown`.
///
/// Pure function of its inputs.
#[must_use]
pub fn classify(candidate: &Rom, reference: &Rom, honor_merge_name: bool) -> Quality {
    let name_match = candidate
        .name
        .eq_ignore_ascii_case(reference.effective_name(honor_merge_name));

    if name_match {
        if !reference.has_size() {
            return Quality::Ok;
        }

        if candidate.size == reference.size {
            if candidate.is_no_dump()
                || reference.is_no_dump()
                || candidate.hashes.compare(&reference.hashes) == HashComparison::Match
            {
                return Quality::Ok;
            }
            if candidate.hashes.is_crc_complement(&reference.hashes)
                || candidate.is_bad_dump()
                || reference.is_bad_dump()
            {
                return Quality::BestBadDump;
            }
            return Quality::CrcErr;
        }

        return if candidate.size > reference.size {
            Quality::Long
        } else {
            Quality::Short
        };
    }

    if candidate.size == reference.size
        && reference.has_size()
        && candidate.hashes.compare(&reference.hashes) == HashComparison::Match
    {
        return Quality::NameErr;
    }

    Quality::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hashes::Hashes;
    use crate::core::types::DumpStatus;

    #[test]
    fn test_name_and_digest_match_is_ok() {
        let reference = Rom::new("A.bin", 16).with_crc(0x1234_5678);
        let candidate = Rom::new("a.BIN", 16).with_crc(0x1234_5678);
        assert_eq!(classify(&candidate, &reference, false), Quality::Ok);
    }

    #[test]
    fn test_complement_crc_is_best_bad_dump() {
        let reference = Rom::new("x", 8).with_crc(0x0000_0000);
        let candidate = Rom::new("x", 8).with_crc(0xFFFF_FFFF);
        assert_eq!(classify(&candidate, &reference, false), Quality::BestBadDump);
    }

    #[test]
    fn test_bad_dump_status_is_best_bad_dump() {
        let reference = Rom::new("x", 8)
            .with_crc(1)
            .with_status(DumpStatus::BadDump);
        let candidate = Rom::new("x", 8).with_crc(2);
        assert_eq!(classify(&candidate, &reference, false), Quality::BestBadDump);
    }

    #[test]
    fn test_digest_mismatch_is_crc_error() {
        let reference = Rom::new("x", 8).with_crc(1);
        let candidate = Rom::new("x", 8).with_crc(2);
        assert_eq!(classify(&candidate, &reference, false), Quality::CrcErr);
    }

    #[test]
    fn test_size_difference_under_same_name() {
        let reference = Rom::new("x", 1024).with_crc(1);
        assert_eq!(
            classify(&Rom::new("x", 2048), &reference, false),
            Quality::Long
        );
        assert_eq!(
            classify(&Rom::new("x", 512), &reference, false),
            Quality::Short
        );
    }

    #[test]
    fn test_unknown_reference_size_is_ok() {
        let reference = Rom::new("x", 0).with_crc(1);
        let candidate = Rom::new("x", 77).with_crc(2);
        assert_eq!(classify(&candidate, &reference, false), Quality::Ok);
    }

    #[test]
    fn test_no_dump_is_ok_on_equal_size() {
        let reference = Rom::new("x", 8).with_status(DumpStatus::NoDump);
        let candidate = Rom::new("x", 8).with_crc(9);
        assert_eq!(classify(&candidate, &reference, false), Quality::Ok);
    }

    #[test]
    fn test_no_common_kind_is_crc_error() {
        let reference = Rom::new("x", 8).with_hashes(Hashes::new().with_md5([1; 16]));
        let candidate = Rom::new("x", 8).with_crc(9);
        assert_eq!(classify(&candidate, &reference, false), Quality::CrcErr);
    }

    #[test]
    fn test_right_content_wrong_name() {
        let reference = Rom::new("A.bin", 4096).with_crc(0xDEAD_BEEF);
        let candidate = Rom::new("B.bin", 4096).with_crc(0xDEAD_BEEF);
        assert_eq!(classify(&candidate, &reference, false), Quality::NameErr);
    }

    #[test]
    fn test_unrelated_file_is_unknown() {
        let reference = Rom::new("A.bin", 4096).with_crc(0xDEAD_BEEF);
        let candidate = Rom::new("B.bin", 4096).with_crc(0xCAFE_BABE);
        assert_eq!(classify(&candidate, &reference, false), Quality::Unknown);

        let unknown_size = Rom::new("A.bin", 0).with_crc(1);
        let other = Rom::new("B.bin", 0).with_crc(1);
        assert_eq!(classify(&other, &unknown_size, false), Quality::Unknown);
    }

    #[test]
    fn test_merge_name_only_when_honored() {
        let reference = Rom::new("clone.bin", 8).with_crc(5).with_merge("parent.bin");
        let candidate = Rom::new("PARENT.bin", 8).with_crc(5);
        assert_eq!(classify(&candidate, &reference, true), Quality::Ok);
        assert_eq!(classify(&candidate, &reference, false), Quality::NameErr);
    }

    #[test]
    fn test_own_name_rejected_when_merge_honored() {
        let reference = Rom::new("clone.bin", 8).with_crc(5).with_merge("parent.bin");
        let candidate = Rom::new("clone.bin", 8).with_crc(5);
        assert_eq!(classify(&candidate, &reference, true), Quality::NameErr);
        assert_eq!(classify(&candidate, &reference, false), Quality::Ok);

        let damaged = Rom::new("clone.bin", 8).with_crc(6);
        assert_eq!(classify(&damaged, &reference, true), Quality::Unknown);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let reference = Rom::new("x", 8).with_crc(1).with_status(DumpStatus::BadDump);
        let candidate = Rom::new("X", 8).with_crc(3);
        let first = classify(&candidate, &reference, true);
        for _ in 0..100 {
            assert_eq!(classify(&candidate, &reference, true), first);
        }
    }
}
