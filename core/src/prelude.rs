use std::path::PathBuf;
use std::time::Duration;

use crate::feed::DetectionTable;

/// Relative path of the detection log polled by the dashboard.
pub const DATA_FILE: &str = "detection_data.csv";

/// Header names of the detection log, in file order.
pub const COLUMNS: [&str; 3] = ["Timestamp", "Object", "Count"];

/// Filter value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "All";

/// Interval between two dashboard ticks.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(2000);

pub const DEFAULT_HOST: [u8; 4] = [0, 0, 0, 0];
pub const DEFAULT_PORT: u16 = 8050;

pub const DASHBOARD_TITLE: &str = "Object Detection Dashboard";
pub const FILTER_LABEL: &str = "Select Object Type:";

/// Errors raised while reading the detection log.
///
/// A missing file is not an error: it yields an empty table.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: missing column `{column}`", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{}:{line}: malformed row: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    #[error("{}: csv failure: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type FeedResult<T> = Result<T, FeedError>;

/// Anything able to produce a fresh detection table on demand.
pub trait TableSource: Send + Sync {
    fn load(&self) -> FeedResult<DetectionTable>;
    fn describe(&self) -> String;
}
