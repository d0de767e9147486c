//! Point records stored by [`SortedPointStore`](crate::SortedPointStore).
//!
//! A record is a small, fixed-layout value ordered by a scalar sort key. The
//! sort key usually equals the key drawn on the axis, but parametric curves
//! order their points by an auxiliary parameter instead.

use crate::view::Range;

/// Contract every record type stored in a [`SortedPointStore`] fulfills.
///
/// [`SortedPointStore`]: crate::SortedPointStore
pub trait DataRecord: Copy {
    /// Whether [`sort_key`](Self::sort_key) and [`main_key`](Self::main_key)
    /// are the same quantity.
    ///
    /// When true, the stored order is also the order of the main keys, which
    /// enables binary-search shortcuts in range queries.
    const SORT_KEY_IS_MAIN_KEY: bool;

    /// Key that defines the storage order.
    fn sort_key(&self) -> f64;

    /// Build a record with only the sort key populated.
    fn from_sort_key(key: f64) -> Self;

    /// Key used for positioning the record on the key axis.
    fn main_key(&self) -> f64;

    /// Representative value of the record; NaN marks a gap.
    fn main_value(&self) -> f64;

    /// Full extent of the record on the value axis.
    fn value_range(&self) -> Range;
}

/// Records that can be built from plain key/value pairs.
pub trait KeyValueRecord: DataRecord {
    /// Build a record from a key and a value.
    fn from_key_value(key: f64, value: f64) -> Self;
}

/// A single key/value sample of a line graph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphData {
    /// Key coordinate.
    pub key: f64,
    /// Value coordinate.
    pub value: f64,
}

impl GraphData {
    /// Create a new sample.
    pub fn new(key: f64, value: f64) -> Self {
        Self { key, value }
    }
}

impl DataRecord for GraphData {
    const SORT_KEY_IS_MAIN_KEY: bool = true;

    fn sort_key(&self) -> f64 {
        self.key
    }

    fn from_sort_key(key: f64) -> Self {
        Self { key, value: 0.0 }
    }

    fn main_key(&self) -> f64 {
        self.key
    }

    fn main_value(&self) -> f64 {
        self.value
    }

    fn value_range(&self) -> Range {
        Range {
            min: self.value,
            max: self.value,
        }
    }
}

impl KeyValueRecord for GraphData {
    fn from_key_value(key: f64, value: f64) -> Self {
        Self::new(key, value)
    }
}

/// A point of a parametric curve.
///
/// Points are ordered by the curve parameter `t`; `key` may repeat or run
/// backwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveData {
    /// Curve parameter.
    pub t: f64,
    /// Key coordinate.
    pub key: f64,
    /// Value coordinate.
    pub value: f64,
}

impl CurveData {
    /// Create a new curve point.
    pub fn new(t: f64, key: f64, value: f64) -> Self {
        Self { t, key, value }
    }
}

impl DataRecord for CurveData {
    const SORT_KEY_IS_MAIN_KEY: bool = false;

    fn sort_key(&self) -> f64 {
        self.t
    }

    fn from_sort_key(t: f64) -> Self {
        Self {
            t,
            key: 0.0,
            value: 0.0,
        }
    }

    fn main_key(&self) -> f64 {
        self.key
    }

    fn main_value(&self) -> f64 {
        self.value
    }

    fn value_range(&self) -> Range {
        Range {
            min: self.value,
            max: self.value,
        }
    }
}

/// A single bar of a bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarsData {
    /// Bar position.
    pub key: f64,
    /// Bar height.
    pub value: f64,
}

impl BarsData {
    /// Create a new bar.
    pub fn new(key: f64, value: f64) -> Self {
        Self { key, value }
    }
}

impl DataRecord for BarsData {
    const SORT_KEY_IS_MAIN_KEY: bool = true;

    fn sort_key(&self) -> f64 {
        self.key
    }

    fn from_sort_key(key: f64) -> Self {
        Self { key, value: 0.0 }
    }

    fn main_key(&self) -> f64 {
        self.key
    }

    fn main_value(&self) -> f64 {
        self.value
    }

    fn value_range(&self) -> Range {
        Range {
            min: self.value,
            max: self.value,
        }
    }
}

impl KeyValueRecord for BarsData {
    fn from_key_value(key: f64, value: f64) -> Self {
        Self::new(key, value)
    }
}

/// Open/high/low/close sample for candlestick and OHLC charts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinancialData {
    /// Time key.
    pub key: f64,
    /// Opening value.
    pub open: f64,
    /// Highest value.
    pub high: f64,
    /// Lowest value.
    pub low: f64,
    /// Closing value.
    pub close: f64,
}

impl FinancialData {
    /// Create a new OHLC sample.
    pub fn new(key: f64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            key,
            open,
            high,
            low,
            close,
        }
    }
}

impl DataRecord for FinancialData {
    const SORT_KEY_IS_MAIN_KEY: bool = true;

    fn sort_key(&self) -> f64 {
        self.key
    }

    fn from_sort_key(key: f64) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    fn main_key(&self) -> f64 {
        self.key
    }

    fn main_value(&self) -> f64 {
        self.open
    }

    fn value_range(&self) -> Range {
        Range {
            min: self.low,
            max: self.high,
        }
    }
}

/// Five-number summary drawn as a box plot.
///
/// Outliers have no fixed size and are kept by the caller next to the store.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticalBoxData {
    /// Box position.
    pub key: f64,
    /// Lower whisker.
    pub minimum: f64,
    /// First quartile.
    pub lower_quartile: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub upper_quartile: f64,
    /// Upper whisker.
    pub maximum: f64,
}

impl StatisticalBoxData {
    /// Create a new box summary.
    pub fn new(
        key: f64,
        minimum: f64,
        lower_quartile: f64,
        median: f64,
        upper_quartile: f64,
        maximum: f64,
    ) -> Self {
        Self {
            key,
            minimum,
            lower_quartile,
            median,
            upper_quartile,
            maximum,
        }
    }
}

impl DataRecord for StatisticalBoxData {
    const SORT_KEY_IS_MAIN_KEY: bool = true;

    fn sort_key(&self) -> f64 {
        self.key
    }

    fn from_sort_key(key: f64) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    fn main_key(&self) -> f64 {
        self.key
    }

    fn main_value(&self) -> f64 {
        self.median
    }

    fn value_range(&self) -> Range {
        Range {
            min: self.minimum,
            max: self.maximum,
        }
    }
}
