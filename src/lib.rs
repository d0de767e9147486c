//! liveplot_data holds the sorted point storage behind plot series.
//! The store targets streaming data: cheap appends and prepends, merges of
//! out-of-order batches, and binary-searched viewport lookups.

#![forbid(unsafe_code)]

pub mod datasource;
pub mod record;
pub mod series;
pub mod view;

pub use datasource::{
    AllocationStats, DataRange, EditGuard, SortedPointStore, SqueezePolicy, SqueezeRequest,
};
pub use record::{
    BarsData, CurveData, DataRecord, FinancialData, GraphData, KeyValueRecord, StatisticalBoxData,
};
pub use series::{Series, SeriesId, SharedStore, shared_store};
pub use view::{Range, SignDomain};
