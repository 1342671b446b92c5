use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::feed::DetectionTable;
use crate::prelude::ALL_CATEGORIES;

/// Dropdown entry for the object-type filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryOption {
    pub label: String,
    pub value: String,
}

impl CategoryOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    /// The "no restriction" sentinel.
    pub fn all() -> Self {
        Self::new(ALL_CATEGORIES)
    }

    pub fn is_all(&self) -> bool {
        self.value == ALL_CATEGORIES
    }
}

impl Default for CategoryOption {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for CategoryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Distinct object labels in first-seen order.
pub fn category_names(table: &DetectionTable) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in table.iter() {
        if seen.insert(record.object.as_str()) {
            names.push(record.object.clone());
        }
    }
    names
}

/// Dropdown options: the `All` sentinel followed by every distinct object label.
pub fn distinct_categories(table: &DetectionTable) -> Vec<CategoryOption> {
    std::iter::once(CategoryOption::all())
        .chain(category_names(table).into_iter().map(CategoryOption::new))
        .collect()
}
