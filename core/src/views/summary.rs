use serde::{Deserialize, Serialize};

use crate::feed::DetectionTable;

/// Detection count aggregated for one object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub object: String,
    pub total: u64,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub totals: Vec<CategoryTotal>,
    pub grand_total: u64,
    pub rows: usize,
}

/// Sums counts per object type, keeping first-seen order.
pub fn summarize(table: &DetectionTable) -> Summary {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for record in table.iter() {
        match totals.iter_mut().find(|entry| entry.object == record.object) {
            Some(entry) => {
                entry.total = entry.total.saturating_add(record.count);
                entry.rows += 1;
            }
            None => totals.push(CategoryTotal {
                object: record.object.clone(),
                total: record.count,
                rows: 1,
            }),
        }
    }

    let grand_total = totals
        .iter()
        .fold(0u64, |acc, entry| acc.saturating_add(entry.total));
    Summary {
        totals,
        grand_total,
        rows: table.len(),
    }
}
