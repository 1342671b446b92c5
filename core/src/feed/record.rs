use serde::{Deserialize, Serialize};

use crate::prelude::COLUMNS;

/// One row of the detection log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Object")]
    pub object: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

impl DetectionRecord {
    pub fn new(timestamp: impl Into<String>, object: impl Into<String>, count: u64) -> Self {
        Self {
            timestamp: timestamp.into(),
            object: object.into(),
            count,
        }
    }
}

/// Rows of the detection log for a single refresh, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionTable {
    rows: Vec<DetectionRecord>,
}

impl DetectionTable {
    /// Table with the three declared columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<DetectionRecord>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> [&'static str; 3] {
        COLUMNS
    }

    pub fn rows(&self) -> &[DetectionRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetectionRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose object label equals `object` exactly.
    pub fn filter_object(&self, object: &str) -> DetectionTable {
        let rows = self
            .rows
            .iter()
            .filter(|record| record.object == object)
            .cloned()
            .collect();
        Self { rows }
    }
}

impl FromIterator<DetectionRecord> for DetectionTable {
    fn from_iter<I: IntoIterator<Item = DetectionRecord>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}
