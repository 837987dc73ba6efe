//! Query selections: what the user asked for

use serde::{Deserialize, Serialize};

/// How a grouping partitions the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupingKind {
    Dimension,
    Time,
    Geography,
}

/// A single group-by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub id: String,
    pub kind: GroupingKind,
}

impl Grouping {
    pub fn new(id: impl Into<String>, kind: GroupingKind) -> Self {
        Self { id: id.into(), kind }
    }
}

/// Fields, groupings and filters of a query tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySelections {
    /// Selected field ids, in display order
    pub fields: Vec<String>,

    /// Group-bys, in display order
    pub groupings: Vec<Grouping>,

    /// Opaque filter ids
    pub filters: Vec<String>,
}

impl QuerySelections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_grouping(mut self, id: impl Into<String>, kind: GroupingKind) -> Self {
        self.groupings.push(Grouping::new(id, kind));
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn has_grouping(&self, kind: GroupingKind) -> bool {
        self.groupings.iter().any(|grouping| grouping.kind == kind)
    }

    /// Number of groupings that are not time groupings
    pub fn non_time_grouping_count(&self) -> usize {
        self.groupings
            .iter()
            .filter(|grouping| grouping.kind != GroupingKind::Time)
            .count()
    }
}
