use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::validation::{parse_digest, ValidationError};

/// One of the digest algorithms a catalog entry may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    Crc32,
    Md5,
    Sha1,
}

impl HashKind {
    /// All kinds, cheapest first
    pub const ALL: [HashKind; 3] = [HashKind::Crc32, HashKind::Md5, HashKind::Sha1];

    /// Width of the raw digest in bytes
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Self::Crc32 => 4,
            Self::Md5 => 16,
            Self::Sha1 => 20,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Crc32 => "crc32",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Crc32 => 0x1,
            Self::Md5 => 0x2,
            Self::Sha1 => 0x4,
        }
    }

    /// Parse a kind name as used on the command line and in catalogs
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "crc" | "crc32" => Some(Self::Crc32),
            "md5" => Some(Self::Md5),
            "sha1" | "sha-1" => Some(Self::Sha1),
            _ => None,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Bitmask of digest kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HashKinds(u8);

impl HashKinds {
    pub const NONE: HashKinds = HashKinds(0);
    pub const CRC32: HashKinds = HashKinds(0x1);
    pub const MD5: HashKinds = HashKinds(0x2);
    pub const SHA1: HashKinds = HashKinds(0x4);
    pub const ALL: HashKinds = HashKinds(0x7);

    #[must_use]
    pub fn contains(self, kind: HashKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// True if every kind in `other` is also in `self`
    #[must_use]
    pub fn contains_all(self, other: HashKinds) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, kind: HashKind) {
        self.0 |= kind.bit();
    }

    #[must_use]
    pub fn intersection(self, other: HashKinds) -> HashKinds {
        HashKinds(self.0 & other.0)
    }

    #[must_use]
    pub fn difference(self, other: HashKinds) -> HashKinds {
        HashKinds(self.0 & !other.0)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = HashKind> {
        HashKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl From<HashKind> for HashKinds {
    fn from(kind: HashKind) -> Self {
        HashKinds(kind.bit())
    }
}

impl std::ops::BitOr for HashKinds {
    type Output = HashKinds;

    fn bitor(self, rhs: HashKinds) -> HashKinds {
        HashKinds(self.0 | rhs.0)
    }
}

impl FromIterator<HashKind> for HashKinds {
    fn from_iter<I: IntoIterator<Item = HashKind>>(iter: I) -> Self {
        let mut kinds = HashKinds::NONE;
        for kind in iter {
            kinds.insert(kind);
        }
        kinds
    }
}

impl fmt::Display for HashKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(HashKind::name).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Outcome of comparing two sets of digests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashComparison {
    /// Every kind present on both sides is identical
    Match,
    /// At least one shared kind differs
    Mismatch,
    /// No kind is present on both sides; nothing can be concluded
    NoCommonKind,
}

/// Content digests of a file.
///
/// A digest value exists exactly when its kind is present, so an absent kind
/// can never take part in a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "HashesRepr", into = "HashesRepr")]
pub struct Hashes {
    crc: Option<u32>,
    md5: Option<[u8; 16]>,
    sha1: Option<[u8; 20]>,
}

impl Hashes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_crc(mut self, crc: u32) -> Self {
        self.crc = Some(crc);
        self
    }

    #[must_use]
    pub fn with_md5(mut self, md5: [u8; 16]) -> Self {
        self.md5 = Some(md5);
        self
    }

    #[must_use]
    pub fn with_sha1(mut self, sha1: [u8; 20]) -> Self {
        self.sha1 = Some(sha1);
        self
    }

    pub fn set_crc(&mut self, crc: u32) {
        self.crc = Some(crc);
    }

    pub fn set_md5(&mut self, md5: [u8; 16]) {
        self.md5 = Some(md5);
    }

    pub fn set_sha1(&mut self, sha1: [u8; 20]) {
        self.sha1 = Some(sha1);
    }

    #[must_use]
    pub fn crc(&self) -> Option<u32> {
        self.crc
    }

    #[must_use]
    pub fn md5(&self) -> Option<&[u8; 16]> {
        self.md5.as_ref()
    }

    #[must_use]
    pub fn sha1(&self) -> Option<&[u8; 20]> {
        self.sha1.as_ref()
    }

    /// Bitmask of the kinds present
    #[must_use]
    pub fn kinds(&self) -> HashKinds {
        let mut kinds = HashKinds::NONE;
        if self.crc.is_some() {
            kinds.insert(HashKind::Crc32);
        }
        if self.md5.is_some() {
            kinds.insert(HashKind::Md5);
        }
        if self.sha1.is_some() {
            kinds.insert(HashKind::Sha1);
        }
        kinds
    }

    #[must_use]
    pub fn has_kind(&self, kind: HashKind) -> bool {
        self.kinds().contains(kind)
    }

    #[must_use]
    pub fn has_all_kinds(&self, kinds: HashKinds) -> bool {
        self.kinds().contains_all(kinds)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }

    /// Raw digest bytes of one kind; CRC32 is big-endian
    #[must_use]
    pub fn digest(&self, kind: HashKind) -> Option<Vec<u8>> {
        match kind {
            HashKind::Crc32 => self.crc.map(|c| c.to_be_bytes().to_vec()),
            HashKind::Md5 => self.md5.map(|m| m.to_vec()),
            HashKind::Sha1 => self.sha1.map(|s| s.to_vec()),
        }
    }

    /// Set one digest from raw bytes, checking the width
    pub fn set_digest(&mut self, kind: HashKind, bytes: &[u8]) -> Result<(), ValidationError> {
        if bytes.len() != kind.size() {
            return Err(ValidationError::InvalidDigestLength {
                kind,
                length: bytes.len(),
            });
        }
        match kind {
            HashKind::Crc32 => {
                let mut b = [0u8; 4];
                b.copy_from_slice(bytes);
                self.crc = Some(u32::from_be_bytes(b));
            }
            HashKind::Md5 => {
                let mut b = [0u8; 16];
                b.copy_from_slice(bytes);
                self.md5 = Some(b);
            }
            HashKind::Sha1 => {
                let mut b = [0u8; 20];
                b.copy_from_slice(bytes);
                self.sha1 = Some(b);
            }
        }
        Ok(())
    }

    /// Build a single-kind value from a raw digest
    pub fn from_digest(kind: HashKind, bytes: &[u8]) -> Result<Self, ValidationError> {
        let mut hashes = Self::new();
        hashes.set_digest(kind, bytes)?;
        Ok(hashes)
    }

    /// Parse a hex digest, inferring its kind from the length
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let (kind, bytes) = parse_digest(s)?;
        Self::from_digest(kind, &bytes)
    }

    /// Lowercase hex of one digest, `None` if the kind is absent
    #[must_use]
    pub fn to_hex(&self, kind: HashKind) -> Option<String> {
        self.digest(kind).map(hex::encode)
    }

    /// Adopt every kind from `other` that is not already present
    pub fn merge(&mut self, other: &Hashes) {
        if self.crc.is_none() {
            self.crc = other.crc;
        }
        if self.md5.is_none() {
            self.md5 = other.md5;
        }
        if self.sha1.is_none() {
            self.sha1 = other.sha1;
        }
    }

    /// Keep only the kinds in `kinds`
    #[must_use]
    pub fn restricted_to(&self, kinds: HashKinds) -> Hashes {
        Hashes {
            crc: self.crc.filter(|_| kinds.contains(HashKind::Crc32)),
            md5: self.md5.filter(|_| kinds.contains(HashKind::Md5)),
            sha1: self.sha1.filter(|_| kinds.contains(HashKind::Sha1)),
        }
    }

    /// Compare over the kinds present on both sides only
    #[must_use]
    pub fn compare(&self, other: &Hashes) -> HashComparison {
        let common = self.kinds().intersection(other.kinds());
        if common.is_empty() {
            return HashComparison::NoCommonKind;
        }

        if common.contains(HashKind::Crc32) && self.crc != other.crc {
            return HashComparison::Mismatch;
        }
        if common.contains(HashKind::Md5) && self.md5 != other.md5 {
            return HashComparison::Mismatch;
        }
        if common.contains(HashKind::Sha1) && self.sha1 != other.sha1 {
            return HashComparison::Mismatch;
        }

        HashComparison::Match
    }

    /// True if both CRCs are present and one is the bitwise complement of the other
    #[must_use]
    pub fn is_crc_complement(&self, other: &Hashes) -> bool {
        match (self.crc, other.crc) {
            (Some(a), Some(b)) => a == !b,
            _ => false,
        }
    }
}

impl fmt::Display for Hashes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in self.kinds().iter() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if let Some(hex) = self.to_hex(kind) {
                write!(f, "{kind}={hex}")?;
            }
        }
        Ok(())
    }
}

/// Serialized form: one optional hex string per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HashesRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha1: Option<String>,
}

impl TryFrom<HashesRepr> for Hashes {
    type Error = ValidationError;

    fn try_from(repr: HashesRepr) -> Result<Self, Self::Error> {
        let mut hashes = Hashes::new();
        for (expected, value) in [
            (HashKind::Crc32, repr.crc),
            (HashKind::Md5, repr.md5),
            (HashKind::Sha1, repr.sha1),
        ] {
            let Some(value) = value else { continue };
            let (found, bytes) = parse_digest(&value)?;
            if found != expected {
                return Err(ValidationError::WrongDigestKind { expected, found });
            }
            hashes.set_digest(expected, &bytes)?;
        }
        Ok(hashes)
    }
}

impl From<Hashes> for HashesRepr {
    fn from(hashes: Hashes) -> Self {
        Self {
            crc: hashes.to_hex(HashKind::Crc32),
            md5: hashes.to_hex(HashKind::Md5),
            sha1: hashes.to_hex(HashKind::Sha1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md5_of(byte: u8) -> [u8; 16] {
        [byte; 16]
    }

    #[test]
    fn test_compare_no_common_kind() {
        let a = Hashes::new().with_crc(0x1234_5678);
        let b = Hashes::new().with_md5(md5_of(1));
        assert_eq!(a.compare(&b), HashComparison::NoCommonKind);
        assert_eq!(Hashes::new().compare(&Hashes::new()), HashComparison::NoCommonKind);
    }

    #[test]
    fn test_compare_only_shared_kinds() {
        let a = Hashes::new().with_crc(0xDEAD_BEEF).with_md5(md5_of(1));
        let b = Hashes::new().with_crc(0xDEAD_BEEF).with_sha1([7; 20]);
        assert_eq!(a.compare(&b), HashComparison::Match);

        let c = Hashes::new().with_crc(0xDEAD_BEEF).with_md5(md5_of(2));
        assert_eq!(a.compare(&c), HashComparison::Mismatch);
    }

    #[test]
    fn test_crc_complement() {
        let a = Hashes::new().with_crc(0x0F0F_0000);
        let b = Hashes::new().with_crc(0xF0F0_FFFF);
        assert!(a.is_crc_complement(&b));
        assert!(b.is_crc_complement(&a));
        assert!(!a.is_crc_complement(&a));
        assert!(!a.is_crc_complement(&Hashes::new().with_md5(md5_of(0))));
    }

    #[test]
    fn test_from_hex_infers_kind() {
        let crc = Hashes::from_hex("0xDEADBEEF").unwrap();
        assert_eq!(crc.crc(), Some(0xDEAD_BEEF));
        assert_eq!(crc.kinds(), HashKinds::CRC32);

        let md5 = Hashes::from_hex(" d41d8cd98f00b204e9800998ecf8427e\n").unwrap();
        assert!(md5.has_kind(HashKind::Md5));
        assert_eq!(
            md5.to_hex(HashKind::Md5).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );

        assert!(Hashes::from_hex("abc").is_err());
        assert!(Hashes::from_hex("zzzzzzzz").is_err());
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut a = Hashes::new().with_crc(1);
        a.merge(&Hashes::new().with_crc(2).with_md5(md5_of(3)));
        assert_eq!(a.crc(), Some(1));
        assert_eq!(a.md5(), Some(&md5_of(3)));
    }

    #[test]
    fn test_serde_hex_repr() {
        let h = Hashes::new().with_crc(0xDEAD_BEEF);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"crc":"deadbeef"}"#);
        let back: Hashes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);

        let wrong: Result<Hashes, _> = serde_json::from_str(r#"{"md5":"deadbeef"}"#);
        assert!(wrong.is_err());
    }

    #[test]
    fn test_display_lists_present_kinds() {
        let h = Hashes::new().with_crc(0xDEAD_BEEF);
        assert_eq!(h.to_string(), "crc32=deadbeef");
    }
}
