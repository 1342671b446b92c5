pub mod categories;
pub mod chart;
pub mod summary;

pub use categories::{category_names, distinct_categories, CategoryOption};
pub use chart::{build_chart, AxisSpec, BarPoint, BarSeries, ChartSpec};
pub use summary::{summarize, CategoryTotal, Summary};
