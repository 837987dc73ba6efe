//! Query result specification: how results are presented

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::selections::QuerySelections;
use crate::visualization::{VisualizationType, ViewType};

/// Presentation settings of one view type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Visualization last selected for this view type
    pub visualization: VisualizationType,

    /// Free-form display options (table format, bar direction, ...)
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl ViewSettings {
    pub fn new(visualization: VisualizationType) -> Self {
        Self {
            visualization,
            options: Map::new(),
        }
    }
}

/// Everything needed to present a query result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryResultSpec {
    pub title: Option<String>,
    pub field_ids: Vec<String>,
    pub view_settings: BTreeMap<ViewType, ViewSettings>,
}

impl QueryResultSpec {
    /// A fresh spec for the fields of `selections`
    pub fn for_selections(selections: &QuerySelections) -> Self {
        Self {
            title: None,
            field_ids: selections.fields.clone(),
            view_settings: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn view_settings(&self, view_type: ViewType) -> Option<&ViewSettings> {
        self.view_settings.get(&view_type)
    }
}
