use detectcore::prelude::ALL_CATEGORIES;
use serde::{Deserialize, Serialize};

/// Query string of `/figure`.
#[derive(Debug, Clone, Deserialize)]
pub struct FigureQuery {
    #[serde(default)]
    pub object: Option<String>,
}

impl FigureQuery {
    pub fn selected(&self) -> &str {
        self.object.as_deref().unwrap_or(ALL_CATEGORIES)
    }
}

/// JSON body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_object_selects_all() {
        let query = FigureQuery { object: None };
        assert_eq!(query.selected(), "All");
    }
}
