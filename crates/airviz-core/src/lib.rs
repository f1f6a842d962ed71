// File: crates/airviz-core/src/lib.rs
// Summary: Core library entry point; exports the cleaning, aggregation, selection and view-transform engine.

pub mod aggregate;
pub mod axis;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod downsample;
pub mod drilldown;
pub mod error;
pub mod geometry;
pub mod impute;
pub mod parse;
pub mod record;
pub mod scale;
pub mod select;
pub mod series;
pub mod stack;
pub mod types;
pub mod view;

pub use aggregate::{aggregate, aggregate_hourly, AggregationBucket, Granularity, Reducer};
pub use axis::{Axis, Tick, TickGranularity};
pub use chart::{BrushLineChart, MultiLineChart, StackedBarChart, ZoomableAreaChart};
pub use config::EngineConfig;
pub use dataset::{Dataset, LoadState, Session};
pub use downsample::lttb;
pub use drilldown::{drill_detail, drill_series, DrillFilter, DrillPoint};
pub use error::{AirVizError, LoadStatus, ParseError};
pub use geometry::{Frame, Layout, Primitive, Rect};
pub use impute::{clean_records, compute_channel_means, ChannelMeans};
pub use parse::{parse, ParsedTable};
pub use record::{CleanedRecord, RawRecord};
pub use select::{select, BrushEvent, BrushState, BrushStatus, Selection, SelectionRegion};
pub use series::{SelectPoint, Series, TimePoint};
pub use stack::{build_stack, Stack, StackedBucket, StackedLayer};
pub use types::{Insets, Millis};
pub use view::{pick_tick_granularity, ViewEngine, ViewState, ViewTransform, ZoomBehavior};
