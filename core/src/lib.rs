//! Detection-feed core for the object detection dashboard.
//!
//! Every tick re-reads the detection log into a [`DetectionTable`] and derives
//! the dropdown options and the bar-chart description from it. Nothing is
//! cached between ticks.

pub mod feed;
pub mod prelude;
pub mod telemetry;
pub mod views;

pub use feed::{DetectionFeed, DetectionRecord, DetectionTable};
pub use prelude::{FeedError, FeedResult, TableSource};
pub use views::{build_chart, distinct_categories, summarize, CategoryOption, ChartSpec, Summary};
