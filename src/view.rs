//! Data ranges and sign domains.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Check whether a value lies within the inclusive bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Restricts range computations to one sign of a coordinate.
///
/// Logarithmic axes can only show one sign, so auto-scaling asks for the
/// negative or positive part of the data separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignDomain {
    /// Accept values of either sign, including zero.
    #[default]
    Both,
    /// Accept strictly negative values.
    Negative,
    /// Accept strictly positive values.
    Positive,
}

impl SignDomain {
    /// Check whether a value belongs to the domain.
    ///
    /// NaN never belongs to any domain.
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Self::Both => !value.is_nan(),
            Self::Negative => value < 0.0,
            Self::Positive => value > 0.0,
        }
    }
}
