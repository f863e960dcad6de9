use serde::{Deserialize, Serialize};

/// Known provenance of a reference rom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpStatus {
    /// A good dump, digests are authoritative
    #[default]
    Ok,
    /// Known to be a corrupted but historically significant copy
    #[serde(alias = "baddump")]
    BadDump,
    /// Content unknown, cannot be verified
    #[serde(alias = "nodump")]
    NoDump,
}

impl DumpStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ok" | "good" => Some(Self::Ok),
            "baddump" | "bad_dump" => Some(Self::BadDump),
            "nodump" | "no_dump" => Some(Self::NoDump),
            _ => None,
        }
    }
}

impl std::fmt::Display for DumpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::BadDump => write!(f, "baddump"),
            Self::NoDump => write!(f, "nodump"),
        }
    }
}

/// Where a rom is expected to live relative to its game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RomLocation {
    #[default]
    InArchive,
    InParent,
    InGrandparent,
}

impl std::fmt::Display for RomLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InArchive => write!(f, "archive"),
            Self::InParent => write!(f, "parent"),
            Self::InGrandparent => write!(f, "grandparent"),
        }
    }
}

/// Outcome of comparing a found file against its reference definition.
///
/// Variants are ordered from worst to best, so `a > b` means `a` is the
/// better match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Nothing found
    Missing,
    /// Neither name nor content matches
    Unknown,
    /// Same name, file smaller than expected
    Short,
    /// Same name, file larger than expected
    Long,
    /// Same name and size, digests differ
    CrcErr,
    /// Right content under the wrong name
    NameErr,
    /// Best available copy of a known bad dump
    BestBadDump,
    /// Exact match
    Ok,
}

impl Quality {
    /// Matches that need no action
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Ok | Self::BestBadDump)
    }

    /// Matches that point at the right content in the wrong shape or place
    #[must_use]
    pub fn is_fixable(self) -> bool {
        matches!(self, Self::NameErr | Self::Long)
    }

    /// Anything better than an unrelated file
    #[must_use]
    pub fn is_found(self) -> bool {
        self > Self::Unknown
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Unknown => write!(f, "unknown"),
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
            Self::CrcErr => write!(f, "wrong checksum"),
            Self::NameErr => write!(f, "wrong name"),
            Self::BestBadDump => write!(f, "best bad dump"),
            Self::Ok => write!(f, "correct"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_order() {
        assert!(Quality::Ok > Quality::BestBadDump);
        assert!(Quality::BestBadDump > Quality::NameErr);
        assert!(Quality::CrcErr > Quality::Long);
        assert!(Quality::Short > Quality::Unknown);
        assert!(Quality::Unknown > Quality::Missing);
    }

    #[test]
    fn test_quality_classes() {
        assert!(Quality::Ok.is_correct());
        assert!(Quality::BestBadDump.is_correct());
        assert!(!Quality::NameErr.is_correct());
        assert!(Quality::NameErr.is_fixable());
        assert!(!Quality::Unknown.is_found());
        assert!(!Quality::Missing.is_found());
        assert!(Quality::Short.is_found());
    }

    #[test]
    fn test_dump_status_parse() {
        assert_eq!(DumpStatus::parse("NODUMP"), Some(DumpStatus::NoDump));
        assert_eq!(DumpStatus::parse("baddump"), Some(DumpStatus::BadDump));
        assert_eq!(DumpStatus::parse("good"), Some(DumpStatus::Ok));
        assert_eq!(DumpStatus::parse("what"), None);
    }
}
