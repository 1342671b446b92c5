use serde::{Deserialize, Serialize};

use crate::feed::DetectionTable;
use crate::prelude::ALL_CATEGORIES;
use crate::views::categories::category_names;

pub const CHART_TITLE: &str = "Object Detection Counts";
pub const NO_DATA_TITLE: &str = "No Data Available";
pub const X_LABEL: &str = "Time";
pub const Y_LABEL: &str = "Detection Count";
pub const X_TICK_ANGLE: i32 = -45;

/// Qualitative palette cycled by series index.
pub const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

/// Declarative bar chart handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Source column bound to this axis.
    pub field: String,
    pub label: String,
    /// Tick label rotation in degrees, negative is counter-clockwise.
    pub tick_angle: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    pub points: Vec<BarPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarPoint {
    pub x: String,
    pub y: u64,
}

impl ChartSpec {
    fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            x_axis: AxisSpec {
                field: "Timestamp".into(),
                label: X_LABEL.into(),
                tick_angle: X_TICK_ANGLE,
            },
            y_axis: AxisSpec {
                field: "Count".into(),
                label: Y_LABEL.into(),
                tick_angle: 0,
            },
            series: Vec::new(),
        }
    }

    /// Renderable placeholder shown when the log has no rows.
    pub fn no_data() -> Self {
        Self::with_title(NO_DATA_TITLE)
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.points.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.points.len()).sum()
    }

    /// Distinct x values across every series, in first-seen order.
    pub fn x_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for point in self.series.iter().flat_map(|series| series.points.iter()) {
            if !categories.contains(&point.x.as_str()) {
                categories.push(point.x.as_str());
            }
        }
        categories
    }
}

/// Builds the bar chart for `selected`; `All` disables filtering and an
/// unknown value yields a chart without bars.
pub fn build_chart(table: &DetectionTable, selected: &str) -> ChartSpec {
    if table.is_empty() {
        return ChartSpec::no_data();
    }

    let filtered;
    let view = if selected == ALL_CATEGORIES {
        table
    } else {
        filtered = table.filter_object(selected);
        &filtered
    };

    let mut chart = ChartSpec::with_title(CHART_TITLE);
    chart.series = category_names(view)
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let points = view
                .iter()
                .filter(|record| record.object == name)
                .map(|record| BarPoint {
                    x: record.timestamp.clone(),
                    y: record.count,
                })
                .collect();
            BarSeries {
                color: PALETTE[index % PALETTE.len()].to_string(),
                name,
                points,
            }
        })
        .collect();
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::DetectionRecord;

    fn pets() -> DetectionTable {
        vec![
            DetectionRecord::new("t1", "cat", 3),
            DetectionRecord::new("t2", "dog", 5),
            DetectionRecord::new("t1", "cat", 2),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn empty_table_renders_no_data_chart() {
        let chart = build_chart(&DetectionTable::empty(), ALL_CATEGORIES);
        assert_eq!(chart.title, NO_DATA_TITLE);
        assert!(chart.series.is_empty());
    }

    #[test]
    fn all_produces_one_series_per_object() {
        let chart = build_chart(&pets(), ALL_CATEGORIES);
        assert_eq!(chart.title, CHART_TITLE);
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cat", "dog"]);
        assert_eq!(chart.point_count(), 3);
        assert_eq!(chart.x_categories(), vec!["t1", "t2"]);
    }

    #[test]
    fn selected_object_keeps_only_matching_rows() {
        let chart = build_chart(&pets(), "cat");
        assert_eq!(chart.series.len(), 1);
        let cat = &chart.series[0];
        assert_eq!(cat.name, "cat");
        assert_eq!(
            cat.points,
            vec![
                BarPoint {
                    x: "t1".into(),
                    y: 3
                },
                BarPoint {
                    x: "t1".into(),
                    y: 2
                },
            ]
        );
    }

    #[test]
    fn unknown_selection_has_no_bars_and_no_fallback() {
        let chart = build_chart(&pets(), "Cat");
        assert_eq!(chart.title, CHART_TITLE);
        assert!(chart.series.is_empty());
        assert!(chart.is_empty());
    }

    #[test]
    fn axes_carry_labels_and_rotation() {
        let chart = build_chart(&pets(), ALL_CATEGORIES);
        assert_eq!(chart.x_axis.field, "Timestamp");
        assert_eq!(chart.x_axis.label, "Time");
        assert_eq!(chart.x_axis.tick_angle, -45);
        assert_eq!(chart.y_axis.field, "Count");
        assert_eq!(chart.y_axis.label, "Detection Count");
    }

    #[test]
    fn palette_cycles_past_ten_series() {
        let table: DetectionTable = (0..12)
            .map(|i| DetectionRecord::new(format!("t{i}"), format!("obj{i}"), 1))
            .collect();
        let chart = build_chart(&table, ALL_CATEGORIES);
        assert_eq!(chart.series.len(), 12);
        assert_eq!(chart.series[10].color, chart.series[0].color);
        assert_ne!(chart.series[1].color, chart.series[0].color);
    }

    #[test]
    fn chart_serializes_for_the_wire() {
        let chart = build_chart(&pets(), "dog");
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["series"][0]["points"][0]["y"], 5);
        assert_eq!(json["x_axis"]["tick_angle"], -45);
    }
}
