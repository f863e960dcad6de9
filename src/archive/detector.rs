//! Header-skip adjustments applied before hashing an entry.
//!
//! Some dumps carry a copier or emulator header in front of the data the
//! catalog describes, or store the data in a different byte order. A
//! [`HeaderSkip`] decides per entry which region to hash and how to
//! reorder it.

/// Byte reordering applied to the hashed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    None,
    /// Reverse the bit order of every byte
    BitSwap,
    /// Swap the bytes of every 16-bit pair
    ByteSwap,
    /// Reverse the bytes of every 32-bit group
    WordSwap,
}

impl Transform {
    /// Bytes per transformed unit; region lengths must be a multiple of it
    #[must_use]
    pub fn unit_size(self) -> u64 {
        match self {
            Self::None | Self::BitSwap => 1,
            Self::ByteSwap => 2,
            Self::WordSwap => 4,
        }
    }

    /// Transform `buf` in place. `buf.len()` must be a multiple of
    /// [`unit_size`](Self::unit_size); a trailing partial unit is left as is.
    pub fn apply(self, buf: &mut [u8]) {
        match self {
            Self::None => {}
            Self::BitSwap => buf.iter_mut().for_each(|b| *b = b.reverse_bits()),
            Self::ByteSwap => buf.chunks_exact_mut(2).for_each(|c| c.swap(0, 1)),
            Self::WordSwap => buf.chunks_exact_mut(4).for_each(<[u8]>::reverse),
        }
    }
}

/// Region of an entry to hash.
///
/// `start` and `end` are byte offsets; negative values count back from the
/// end of the entry and an `end` of 0 means the end of the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipRule {
    pub start: i64,
    pub end: i64,
    pub transform: Transform,
}

impl SkipRule {
    /// Skip the first `bytes` bytes and hash the rest unchanged
    #[must_use]
    pub fn skip_header(bytes: u64) -> Self {
        Self {
            start: i64::try_from(bytes).unwrap_or(i64::MAX),
            end: 0,
            transform: Transform::None,
        }
    }

    /// Resolve to `(offset, length)` within an entry of `size` bytes.
    ///
    /// `None` when the region falls outside the entry or its length is not a
    /// whole number of transform units.
    #[must_use]
    pub fn resolve(&self, size: u64) -> Option<(u64, u64)> {
        let size = i64::try_from(size).ok()?;
        let start = if self.start < 0 { self.start + size } else { self.start };
        let end = match self.end {
            0 => size,
            e if e < 0 => e + size,
            e => e,
        };

        if start < 0 || start > size || end < 0 || end > size || start > end {
            return None;
        }
        let length = u64::try_from(end - start).ok()?;
        if length % self.transform.unit_size() != 0 {
            return None;
        }
        Some((u64::try_from(start).ok()?, length))
    }
}

/// Decides whether an entry needs a header-skip adjustment
pub trait HeaderSkip {
    fn adjustment(&self, name: &str, size: u64) -> Option<SkipRule>;
}

/// Strips a fixed-size header from entries whose size leaves exactly that
/// many bytes over a whole number of `block` bytes, e.g. a 512-byte copier
/// header on top of a 1 KiB-aligned dump.
#[derive(Debug, Clone, Copy)]
pub struct FixedHeaderSkip {
    pub header: u64,
    pub block: u64,
    pub transform: Transform,
}

impl FixedHeaderSkip {
    pub fn new(header: u64, block: u64) -> Self {
        Self {
            header,
            block,
            transform: Transform::None,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

impl HeaderSkip for FixedHeaderSkip {
    fn adjustment(&self, _name: &str, size: u64) -> Option<SkipRule> {
        if self.block == 0 || size <= self.header || size % self.block != self.header % self.block {
            return None;
        }
        Some(SkipRule {
            start: i64::try_from(self.header).ok()?,
            end: 0,
            transform: self.transform,
        })
    }
}
