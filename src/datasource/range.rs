//! Index intervals into a store.

/// Half-open interval `[begin, end)` of record indices.
///
/// Used to describe selections and to clamp visible spans to a subset of the
/// stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataRange {
    begin: usize,
    end: usize,
}

impl DataRange {
    /// Create a range from its bounds.
    ///
    /// A range with `end < begin` is kept as-is and reports itself invalid.
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// First index in the range.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// One past the last index in the range.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    /// Check whether the range holds no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether the bounds are ordered.
    pub fn is_valid(&self) -> bool {
        self.end >= self.begin
    }

    /// Check whether `other` lies completely inside this range.
    pub fn contains(&self, other: DataRange) -> bool {
        self.begin <= other.begin && self.end >= other.end
    }

    /// Check whether the two ranges share at least one index.
    pub fn intersects(&self, other: DataRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.begin < other.end
            && other.begin < self.end
    }

    /// Overlap of two ranges; the empty default range when they are disjoint.
    pub fn intersection(&self, other: DataRange) -> DataRange {
        let result = Self::new(self.begin.max(other.begin), self.end.min(other.end));
        if result.is_valid() {
            result
        } else {
            Self::default()
        }
    }

    /// Clamp this range into `other`.
    ///
    /// When the two do not overlap, the result collapses onto the bound of
    /// `other` that is closest to this range.
    pub fn bounded(&self, other: DataRange) -> DataRange {
        let result = self.intersection(other);
        if !result.is_empty() {
            return result;
        }
        if self.end <= other.begin {
            Self::new(other.begin, other.begin)
        } else {
            Self::new(other.end, other.end)
        }
    }

    /// Shift the bounds by signed offsets, saturating at zero.
    pub fn adjusted(&self, begin_offset: isize, end_offset: isize) -> DataRange {
        Self::new(
            self.begin.saturating_add_signed(begin_offset),
            self.end.saturating_add_signed(end_offset),
        )
    }

    /// Convert into a standard index range.
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.begin..self.end.max(self.begin)
    }
}

impl From<std::ops::Range<usize>> for DataRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
