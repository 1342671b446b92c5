use detectcore::prelude::{FeedResult, TableSource};
use detectcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use detectcore::views::{build_chart, distinct_categories, summarize, CategoryOption, ChartSpec, Summary};
use detectcore::DetectionTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health view returned by `/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatus {
    pub source: String,
    pub metrics: MetricsSnapshot,
}

/// Application context built once at startup and shared with the HTTP layer.
///
/// Every request reloads the table from its source, so handlers never see
/// stale rows and no state is kept between ticks apart from the counters.
pub struct DashboardApp {
    source: Arc<dyn TableSource>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl DashboardApp {
    pub fn new(source: Arc<dyn TableSource>) -> Self {
        Self {
            source,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("app"),
        }
    }

    fn refresh(&self) -> FeedResult<DetectionTable> {
        match self.source.load() {
            Ok(table) => {
                self.metrics.record_refresh(table.is_empty());
                Ok(table)
            }
            Err(err) => {
                self.metrics.record_error();
                self.logger.warn(&format!("refresh failed: {}", err));
                Err(err)
            }
        }
    }

    /// Dropdown options for the current tick.
    pub fn dropdown_options(&self) -> FeedResult<Vec<CategoryOption>> {
        let table = self.refresh()?;
        Ok(distinct_categories(&table))
    }

    /// Chart for the current tick and filter selection.
    pub fn figure(&self, selected: &str) -> FeedResult<ChartSpec> {
        let table = self.refresh()?;
        Ok(build_chart(&table, selected))
    }

    pub fn summary(&self) -> FeedResult<Summary> {
        let table = self.refresh()?;
        Ok(summarize(&table))
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            source: self.source.describe(),
            metrics: self.metrics.snapshot(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use detectcore::prelude::{FeedError, ALL_CATEGORIES};
    use detectcore::DetectionRecord;

    /// In-memory source standing in for the detection log.
    pub(crate) struct FixedSource(pub Option<DetectionTable>);

    impl TableSource for FixedSource {
        fn load(&self) -> FeedResult<DetectionTable> {
            self.0.clone().ok_or_else(|| FeedError::Malformed {
                path: "fixed.csv".into(),
                line: 2,
                reason: "invalid digit found in string".into(),
            })
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    pub(crate) fn pets_app() -> DashboardApp {
        let table = vec![
            DetectionRecord::new("t1", "cat", 3),
            DetectionRecord::new("t2", "dog", 5),
            DetectionRecord::new("t1", "cat", 2),
        ]
        .into_iter()
        .collect();
        DashboardApp::new(Arc::new(FixedSource(Some(table))))
    }

    #[test]
    fn options_and_figure_follow_the_table() {
        let app = pets_app();
        let values: Vec<_> = app
            .dropdown_options()
            .unwrap()
            .into_iter()
            .map(|option| option.value)
            .collect();
        assert_eq!(values, vec!["All", "cat", "dog"]);

        let chart = app.figure("cat").unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.point_count(), 2);

        assert_eq!(app.figure(ALL_CATEGORIES).unwrap().series.len(), 2);
        assert_eq!(app.status().metrics.refreshes, 3);
    }

    #[test]
    fn empty_source_is_counted_and_renders_placeholder() {
        let app = DashboardApp::new(Arc::new(FixedSource(Some(DetectionTable::empty()))));
        assert_eq!(app.figure(ALL_CATEGORIES).unwrap().title, "No Data Available");
        assert_eq!(app.status().metrics.empty_refreshes, 1);
    }

    #[test]
    fn failing_source_propagates_and_counts_errors() {
        let app = DashboardApp::new(Arc::new(FixedSource(None)));
        assert!(app.summary().is_err());
        assert!(app.dropdown_options().is_err());
        let status = app.status();
        assert_eq!(status.metrics.errors, 2);
        assert_eq!(status.source, "fixed");
    }
}
