//! Query tabs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result_spec::QueryResultSpec;
use crate::selections::QuerySelections;
use crate::visualization::{VisualizationType, ViewType};

/// Unique identifier for a query tab
pub type QueryTabId = Uuid;

/// One tab of the query tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTabItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: QueryTabId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub query_selections: QuerySelections,

    /// Present once results have been requested for the selections
    #[serde(default)]
    pub query_result_spec: Option<QueryResultSpec>,

    /// Never set while `query_result_spec` is `None`
    #[serde(default)]
    pub visualization_type: Option<VisualizationType>,

    #[serde(default = "default_view_type")]
    pub view_type: ViewType,
}

fn default_view_type() -> ViewType {
    ViewType::Table
}

impl QueryTabItem {
    /// Create an empty tab
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            query_selections: QuerySelections::default(),
            query_result_spec: None,
            visualization_type: None,
            view_type: default_view_type(),
        }
    }

    pub fn with_query_selections(mut self, query_selections: QuerySelections) -> Self {
        self.query_selections = query_selections;
        self
    }

    pub fn with_query_result_spec(mut self, query_result_spec: QueryResultSpec) -> Self {
        self.query_result_spec = Some(query_result_spec);
        self
    }

    pub fn has_visualization(&self) -> bool {
        self.visualization_type.is_some()
    }

    /// Drop a visualization that has no result spec to render
    pub fn normalized(mut self) -> Self {
        if self.query_result_spec.is_none() {
            self.visualization_type = None;
        }
        self
    }
}
