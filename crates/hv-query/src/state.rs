//! Query tool state

use serde::{Deserialize, Serialize};

use crate::tab::QueryTabItem;
use crate::visualization::VisualizationType;

/// Loading status of the tab list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AqtStatus {
    #[default]
    LoadingTabs,
    AqtReady,
}

/// State of the advanced query tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AqtState {
    pub tab_list: Vec<QueryTabItem>,

    /// Always a valid index into `tab_list`, or 0 when it is empty
    pub current_tab_idx: usize,

    /// Whether the visualization picker shows its explore view
    pub show_viz_picker_explore_view: bool,

    /// Visualization provisionally chosen in the picker
    pub viz_picker_locked_visualization: Option<VisualizationType>,

    pub status: AqtStatus,
}

impl Default for AqtState {
    fn default() -> Self {
        Self {
            tab_list: Vec::new(),
            current_tab_idx: 0,
            show_viz_picker_explore_view: true,
            viz_picker_locked_visualization: None,
            status: AqtStatus::LoadingTabs,
        }
    }
}

impl AqtState {
    pub fn current_tab(&self) -> Option<&QueryTabItem> {
        self.tab_list.get(self.current_tab_idx)
    }

    pub(crate) fn current_tab_mut(&mut self) -> Option<&mut QueryTabItem> {
        self.tab_list.get_mut(self.current_tab_idx)
    }
}
