//! Query tool tab state machine
//!
//! The advanced query tool keeps a list of [`QueryTabItem`]s. Each tab holds
//! the user's [`QuerySelections`], the [`QueryResultSpec`] describing how
//! results are presented, and the chosen [`VisualizationType`]. The
//! [`reducer`] keeps those consistent with each other and with the
//! visualization picker as actions arrive.

pub mod reducer;
pub mod result_spec;
pub mod selections;
pub mod state;
pub mod tab;
pub mod visualization;

// Re-exports
pub use reducer::{AqtAction, AqtError, QueryTabReducer};
pub use result_spec::{QueryResultSpec, ViewSettings};
pub use selections::{Grouping, GroupingKind, QuerySelections};
pub use state::{AqtState, AqtStatus};
pub use tab::{QueryTabId, QueryTabItem};
pub use visualization::{
    StandardVisualizations, ViewType, VisualizationCatalog, VisualizationRequirements,
    VisualizationType,
};
