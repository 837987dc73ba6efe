//! Query tab reducer
//!
//! Some transitions keep derived fields consistent by applying follow-up
//! actions to the state they just produced. Those follow-ups are plain
//! recursive calls to [`apply`]; the chain is at most three actions deep
//! (`QUERY_SELECTIONS_CHANGE` → `VISUALIZATION_TYPE_CHANGE` →
//! `QUERY_RESULT_SPEC_CHANGE`).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use hv_core::{ActionType, Reducer};

use crate::result_spec::QueryResultSpec;
use crate::selections::QuerySelections;
use crate::state::{AqtState, AqtStatus};
use crate::tab::QueryTabItem;
use crate::visualization::{StandardVisualizations, VisualizationCatalog, VisualizationType};

/// Errors raised for transitions that cannot apply to the current state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AqtError {
    #[error("cannot apply {action}: the tab list is empty")]
    NoCurrentTab { action: &'static str },

    #[error("tab index {index} is out of bounds for {len} tabs")]
    TabIndexOutOfRange { index: usize, len: usize },

    #[error(
        "cannot change visualization to {visualization}: tab {tab_idx} has no query result spec"
    )]
    MissingQueryResultSpec {
        visualization: VisualizationType,
        tab_idx: usize,
    },
}

/// Actions understood by the query tab reducer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum AqtAction {
    QuerySelectionsChange {
        query_selections: QuerySelections,
    },
    QueryResultSpecChange {
        query_result_spec: QueryResultSpec,
    },
    VisualizationTypeChange {
        visualization_type: VisualizationType,
    },
    VizPickerExploreViewToggle {
        show: bool,
    },
    VizPickerVisualizationLock {
        #[serde(default)]
        visualization_type: Option<VisualizationType>,
    },
    NewTabAdd {
        new_tab: QueryTabItem,
    },
    TabListChange {
        tab_list: Vec<QueryTabItem>,
        #[serde(default)]
        new_tab_idx: Option<usize>,
    },
    TabListLoad {
        tab_list: Vec<QueryTabItem>,
        current_tab_idx: usize,
    },
    CurrentTabChange {
        new_tab_idx: usize,
    },
    VisualizationAndSpecChange {
        visualization_type: VisualizationType,
        new_spec: QueryResultSpec,
    },
}

hv_core::impl_action_type!(AqtAction {
    QuerySelectionsChange => "QUERY_SELECTIONS_CHANGE",
    QueryResultSpecChange => "QUERY_RESULT_SPEC_CHANGE",
    VisualizationTypeChange => "VISUALIZATION_TYPE_CHANGE",
    VizPickerExploreViewToggle => "VIZ_PICKER_EXPLORE_VIEW_TOGGLE",
    VizPickerVisualizationLock => "VIZ_PICKER_VISUALIZATION_LOCK",
    NewTabAdd => "NEW_TAB_ADD",
    TabListChange => "TAB_LIST_CHANGE",
    TabListLoad => "TAB_LIST_LOAD",
    CurrentTabChange => "CURRENT_TAB_CHANGE",
    VisualizationAndSpecChange => "VISUALIZATION_AND_SPEC_CHANGE",
});

/// Query tab reducer bound to a visualization catalog
#[derive(Debug, Clone, Default)]
pub struct QueryTabReducer<C = StandardVisualizations> {
    catalog: C,
}

impl<C: VisualizationCatalog> QueryTabReducer<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

impl<C: VisualizationCatalog> Reducer for QueryTabReducer<C> {
    type State = AqtState;
    type Action = AqtAction;
    type Error = AqtError;

    fn reduce(&self, state: &AqtState, action: AqtAction) -> Result<AqtState, AqtError> {
        reduce(state, action, &self.catalog)
    }
}

/// Compute the next query tool state
///
/// The input state is never modified; on error the caller keeps it as is.
pub fn reduce(
    state: &AqtState,
    action: AqtAction,
    catalog: &dyn VisualizationCatalog,
) -> Result<AqtState, AqtError> {
    debug!(
        action = action.action_type(),
        current_tab_idx = state.current_tab_idx,
        tabs = state.tab_list.len(),
        "Reducing query tab state"
    );

    let mut next = state.clone();
    apply(&mut next, action, catalog)?;
    Ok(next)
}

fn apply(
    state: &mut AqtState,
    action: AqtAction,
    catalog: &dyn VisualizationCatalog,
) -> Result<(), AqtError> {
    let action_type = action.action_type();
    trace!(action = action_type, "Applying query tab action");

    match action {
        AqtAction::QuerySelectionsChange { query_selections } => {
            let locked = state.viz_picker_locked_visualization;
            let tab = current_tab_mut(state, action_type)?;
            tab.query_selections = query_selections;

            let cleared = tab.query_selections.fields.is_empty();
            if cleared {
                tab.query_result_spec = None;
                tab.visualization_type = None;
            }

            let has_spec = tab.query_result_spec.is_some();
            let enabled_lock = locked.filter(|visualization| {
                has_spec && catalog.is_visualization_enabled(*visualization, &tab.query_selections)
            });
            let needs_visualization = has_spec && tab.visualization_type.is_none();

            if cleared {
                state.show_viz_picker_explore_view = true;
            }

            let follow_up = enabled_lock
                .or_else(|| needs_visualization.then(|| catalog.default_visualization()));
            if let Some(visualization_type) = follow_up {
                apply(
                    state,
                    AqtAction::VisualizationTypeChange { visualization_type },
                    catalog,
                )?;
            }
        }

        AqtAction::QueryResultSpecChange { query_result_spec } => {
            current_tab_mut(state, action_type)?.query_result_spec = Some(query_result_spec);
        }

        AqtAction::VisualizationTypeChange { visualization_type } => {
            let tab_idx = state.current_tab_idx;
            let tab = current_tab_mut(state, action_type)?;
            let spec = tab.query_result_spec.as_ref().ok_or(AqtError::MissingQueryResultSpec {
                visualization: visualization_type,
                tab_idx,
            })?;

            let (new_spec, view_type) = catalog.select_visualization(spec, visualization_type);
            tab.visualization_type = Some(visualization_type);
            if tab.view_type != view_type {
                tab.view_type = view_type;
            }

            state.show_viz_picker_explore_view = false;
            state.viz_picker_locked_visualization = None;
            apply(
                state,
                AqtAction::QueryResultSpecChange {
                    query_result_spec: new_spec,
                },
                catalog,
            )?;
        }

        AqtAction::VizPickerExploreViewToggle { show } => {
            state.show_viz_picker_explore_view = show;
        }

        AqtAction::VizPickerVisualizationLock { visualization_type } => {
            state.viz_picker_locked_visualization = visualization_type;
        }

        AqtAction::NewTabAdd { new_tab } => {
            state.tab_list.push(new_tab.normalized());
            let new_tab_idx = state.tab_list.len() - 1;
            apply(state, AqtAction::CurrentTabChange { new_tab_idx }, catalog)?;
        }

        AqtAction::TabListChange {
            tab_list,
            new_tab_idx,
        } => {
            state.tab_list = normalized_tabs(tab_list);
            let last_idx = state.tab_list.len().saturating_sub(1);
            let new_tab_idx = new_tab_idx.unwrap_or_else(|| state.current_tab_idx.min(last_idx));
            apply(state, AqtAction::CurrentTabChange { new_tab_idx }, catalog)?;
        }

        AqtAction::TabListLoad {
            tab_list,
            current_tab_idx,
        } => {
            state.tab_list = normalized_tabs(tab_list);
            state.status = AqtStatus::AqtReady;
            apply(
                state,
                AqtAction::CurrentTabChange {
                    new_tab_idx: current_tab_idx,
                },
                catalog,
            )?;
        }

        AqtAction::CurrentTabChange { new_tab_idx } => {
            let len = state.tab_list.len();
            let in_bounds = if len == 0 { new_tab_idx == 0 } else { new_tab_idx < len };
            if !in_bounds {
                return Err(AqtError::TabIndexOutOfRange {
                    index: new_tab_idx,
                    len,
                });
            }

            state.current_tab_idx = new_tab_idx;
            state.show_viz_picker_explore_view = state
                .current_tab()
                .map_or(true, |tab| !tab.has_visualization());
            state.viz_picker_locked_visualization = None;
        }

        AqtAction::VisualizationAndSpecChange {
            visualization_type,
            new_spec,
        } => {
            let enabled = state.current_tab().map_or(false, |tab| {
                catalog.is_visualization_enabled(visualization_type, &tab.query_selections)
            });
            if !enabled {
                debug!(
                    visualization = %visualization_type,
                    "Visualization not enabled for current tab, ignoring"
                );
                return Ok(());
            }

            apply(state, AqtAction::VisualizationTypeChange { visualization_type }, catalog)?;
            apply(
                state,
                AqtAction::QueryResultSpecChange {
                    query_result_spec: new_spec,
                },
                catalog,
            )?;
        }
    }

    Ok(())
}

fn normalized_tabs(tab_list: Vec<QueryTabItem>) -> Vec<QueryTabItem> {
    tab_list.into_iter().map(QueryTabItem::normalized).collect()
}

fn current_tab_mut<'a>(
    state: &'a mut AqtState,
    action: &'static str,
) -> Result<&'a mut QueryTabItem, AqtError> {
    state.current_tab_mut().ok_or(AqtError::NoCurrentTab { action })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selections::GroupingKind;
    use crate::visualization::ViewType;
    use hv_core::{decode_action, ActionDecodeError, Store};
    use serde_json::json;

    fn catalog() -> StandardVisualizations {
        StandardVisualizations
    }

    fn cases() -> QuerySelections {
        QuerySelections::new().with_fields(["malaria_cases"])
    }

    fn cases_by_region() -> QuerySelections {
        cases().with_grouping("region", GroupingKind::Geography)
    }

    /// A tab with a result spec and a chosen visualization
    fn ready_tab(name: &str) -> QueryTabItem {
        QueryTabItem {
            visualization_type: Some(VisualizationType::Table),
            ..QueryTabItem::new(name)
                .with_query_selections(cases())
                .with_query_result_spec(QueryResultSpec::for_selections(&cases()))
        }
    }

    fn loaded(tabs: Vec<QueryTabItem>, current_tab_idx: usize) -> AqtState {
        reduce(
            &AqtState::default(),
            AqtAction::TabListLoad {
                tab_list: tabs,
                current_tab_idx,
            },
            &catalog(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_tab_becomes_current() {
        for n in [0, 1, 3] {
            let tabs = (0..n).map(|i| ready_tab(&format!("Tab {i}"))).collect();
            let state = loaded(tabs, 0);

            let next = reduce(
                &state,
                AqtAction::NewTabAdd {
                    new_tab: QueryTabItem::new("New"),
                },
                &catalog(),
            )
            .unwrap();
            assert_eq!(next.tab_list.len(), n + 1);
            assert_eq!(next.current_tab_idx, n);
            assert!(next.show_viz_picker_explore_view);
        }
    }

    #[test]
    fn test_tab_change_always_clears_lock() {
        let state = loaded(vec![ready_tab("A"), ready_tab("B")], 1);
        let locked = reduce(
            &state,
            AqtAction::VizPickerVisualizationLock {
                visualization_type: Some(VisualizationType::Pie),
            },
            &catalog(),
        )
        .unwrap();
        assert_eq!(locked.viz_picker_locked_visualization, Some(VisualizationType::Pie));

        for new_tab_idx in [0, 1] {
            let next =
                reduce(&locked, AqtAction::CurrentTabChange { new_tab_idx }, &catalog()).unwrap();
            assert_eq!(next.viz_picker_locked_visualization, None);
            assert_eq!(next.current_tab_idx, new_tab_idx);
            assert!(!next.show_viz_picker_explore_view);
        }
    }

    #[test]
    fn test_tab_change_out_of_bounds() {
        let state = loaded(vec![ready_tab("A")], 0);
        assert_eq!(
            reduce(&state, AqtAction::CurrentTabChange { new_tab_idx: 1 }, &catalog()),
            Err(AqtError::TabIndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_visualization_change_requires_spec() {
        let state = loaded(vec![QueryTabItem::new("Empty").with_query_selections(cases())], 0);
        let err = reduce(
            &state,
            AqtAction::VisualizationTypeChange {
                visualization_type: VisualizationType::Bar,
            },
            &catalog(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AqtError::MissingQueryResultSpec {
                visualization: VisualizationType::Bar,
                tab_idx: 0,
            }
        );
    }

    #[test]
    fn test_visualization_change_updates_view_and_clears_lock() {
        let state = loaded(vec![ready_tab("A")], 0);
        let state = reduce(
            &state,
            AqtAction::VizPickerVisualizationLock {
                visualization_type: Some(VisualizationType::Pie),
            },
            &catalog(),
        )
        .unwrap();
        let state = reduce(
            &state,
            AqtAction::VizPickerExploreViewToggle { show: true },
            &catalog(),
        )
        .unwrap();

        let next = reduce(
            &state,
            AqtAction::VisualizationTypeChange {
                visualization_type: VisualizationType::BarStacked,
            },
            &catalog(),
        )
        .unwrap();

        let tab = next.current_tab().unwrap();
        assert_eq!(tab.visualization_type, Some(VisualizationType::BarStacked));
        assert_eq!(tab.view_type, ViewType::Bar);
        let bar = tab.query_result_spec.as_ref().unwrap().view_settings(ViewType::Bar).unwrap();
        assert_eq!(bar.options["stackBars"], json!(true));
        assert!(!next.show_viz_picker_explore_view);
        assert_eq!(next.viz_picker_locked_visualization, None);
    }

    #[test]
    fn test_disabled_visualization_and_spec_change_is_noop() {
        let state = loaded(vec![ready_tab("A")], 0);
        let new_spec = QueryResultSpec::for_selections(&cases()).with_title("Map");
        let next = reduce(
            &state,
            AqtAction::VisualizationAndSpecChange {
                visualization_type: VisualizationType::Map,
                new_spec,
            },
            &catalog(),
        )
        .unwrap();
        assert_eq!(next, state);
    }

    #[test]
    fn test_enabled_visualization_and_spec_change() {
        let tab = QueryTabItem::new("A")
            .with_query_selections(cases_by_region())
            .with_query_result_spec(QueryResultSpec::for_selections(&cases_by_region()));
        let state = loaded(vec![tab], 0);
        let new_spec =
            QueryResultSpec::for_selections(&cases_by_region()).with_title("Cases by region");

        let next = reduce(
            &state,
            AqtAction::VisualizationAndSpecChange {
                visualization_type: VisualizationType::Map,
                new_spec: new_spec.clone(),
            },
            &catalog(),
        )
        .unwrap();

        let tab = next.current_tab().unwrap();
        assert_eq!(tab.visualization_type, Some(VisualizationType::Map));
        assert_eq!(tab.view_type, ViewType::Map);
        assert_eq!(tab.query_result_spec, Some(new_spec));
    }

    #[test]
    fn test_clearing_fields_clears_spec_and_visualization() {
        let state = loaded(vec![ready_tab("A")], 0);
        let next = reduce(
            &state,
            AqtAction::QuerySelectionsChange {
                query_selections: QuerySelections::new(),
            },
            &catalog(),
        )
        .unwrap();

        let tab = next.current_tab().unwrap();
        assert_eq!(tab.query_result_spec, None);
        assert_eq!(tab.visualization_type, None);
        assert!(next.show_viz_picker_explore_view);
    }

    #[test]
    fn test_selections_change_picks_default_visualization() {
        let tab = QueryTabItem::new("A")
            .with_query_result_spec(QueryResultSpec::for_selections(&cases()));
        let state = loaded(vec![tab], 0);
        assert!(state.show_viz_picker_explore_view);

        let next = reduce(
            &state,
            AqtAction::QuerySelectionsChange {
                query_selections: cases(),
            },
            &catalog(),
        )
        .unwrap();

        let tab = next.current_tab().unwrap();
        assert_eq!(tab.visualization_type, Some(VisualizationType::Table));
        assert_eq!(tab.view_type, ViewType::Table);
        assert!(!next.show_viz_picker_explore_view);
    }

    #[test]
    fn test_selections_change_applies_enabled_lock() {
        let state = loaded(vec![ready_tab("A")], 0);
        let state = reduce(
            &state,
            AqtAction::VizPickerVisualizationLock {
                visualization_type: Some(VisualizationType::Map),
            },
            &catalog(),
        )
        .unwrap();

        // Not enabled yet: no geography grouping
        let still_locked = reduce(
            &state,
            AqtAction::QuerySelectionsChange {
                query_selections: cases(),
            },
            &catalog(),
        )
        .unwrap();
        assert_eq!(still_locked.viz_picker_locked_visualization, Some(VisualizationType::Map));
        assert_eq!(
            still_locked.current_tab().unwrap().visualization_type,
            Some(VisualizationType::Table)
        );

        let next = reduce(
            &still_locked,
            AqtAction::QuerySelectionsChange {
                query_selections: cases_by_region(),
            },
            &catalog(),
        )
        .unwrap();
        let tab = next.current_tab().unwrap();
        assert_eq!(tab.visualization_type, Some(VisualizationType::Map));
        assert_eq!(tab.view_type, ViewType::Map);
        assert_eq!(next.viz_picker_locked_visualization, None);
    }

    #[test]
    fn test_tab_list_change_index_resolution() {
        let state = loaded(vec![ready_tab("A"), ready_tab("B"), ready_tab("C")], 2);

        // Clamped to the new last tab
        let next = reduce(
            &state,
            AqtAction::TabListChange {
                tab_list: vec![ready_tab("A"), QueryTabItem::new("B")],
                new_tab_idx: None,
            },
            &catalog(),
        )
        .unwrap();
        assert_eq!(next.current_tab_idx, 1);
        assert!(next.show_viz_picker_explore_view);

        // An explicit zero is honored
        let next = reduce(
            &state,
            AqtAction::TabListChange {
                tab_list: vec![ready_tab("A"), ready_tab("B"), ready_tab("C")],
                new_tab_idx: Some(0),
            },
            &catalog(),
        )
        .unwrap();
        assert_eq!(next.current_tab_idx, 0);

        // Emptied list
        let next = reduce(
            &state,
            AqtAction::TabListChange {
                tab_list: Vec::new(),
                new_tab_idx: None,
            },
            &catalog(),
        )
        .unwrap();
        assert_eq!(next.current_tab_idx, 0);
        assert!(next.current_tab().is_none());
        assert!(next.show_viz_picker_explore_view);

        assert!(matches!(
            reduce(
                &next,
                AqtAction::QueryResultSpecChange {
                    query_result_spec: QueryResultSpec::default(),
                },
                &catalog(),
            ),
            Err(AqtError::NoCurrentTab { .. })
        ));
    }

    #[test]
    fn test_tab_list_load_marks_ready() {
        let state = AqtState::default();
        assert_eq!(state.status, AqtStatus::LoadingTabs);

        let next = loaded(vec![QueryTabItem::new("A"), ready_tab("B")], 1);
        assert_eq!(next.status, AqtStatus::AqtReady);
        assert_eq!(next.current_tab_idx, 1);
        assert!(!next.show_viz_picker_explore_view);

        assert!(reduce(
            &state,
            AqtAction::TabListLoad {
                tab_list: vec![QueryTabItem::new("A")],
                current_tab_idx: 4,
            },
            &catalog(),
        )
        .is_err());
    }

    #[test]
    fn test_incoming_tabs_never_keep_visualization_without_spec() {
        let orphan: QueryTabItem =
            serde_json::from_value(json!({"name": "A", "visualizationType": "BAR"})).unwrap();

        let next = loaded(vec![orphan.clone()], 0);
        let tab = next.current_tab().unwrap();
        assert_eq!(tab.query_result_spec, None);
        assert_eq!(tab.visualization_type, None);
        assert!(next.show_viz_picker_explore_view);

        let next = reduce(
            &next,
            AqtAction::TabListChange {
                tab_list: vec![ready_tab("B"), orphan.clone()],
                new_tab_idx: Some(1),
            },
            &catalog(),
        )
        .unwrap();
        assert_eq!(next.tab_list[0].visualization_type, Some(VisualizationType::Table));
        assert_eq!(next.tab_list[1].visualization_type, None);
        assert!(next.show_viz_picker_explore_view);

        let next = reduce(&next, AqtAction::NewTabAdd { new_tab: orphan }, &catalog()).unwrap();
        assert_eq!(next.current_tab().unwrap().visualization_type, None);
        assert!(next.show_viz_picker_explore_view);
    }

    #[test]
    fn test_decode_actions() {
        let action: AqtAction = decode_action(json!({
            "type": "TAB_LIST_CHANGE",
            "tabList": [{"name": "A"}],
        }))
        .unwrap();
        assert!(matches!(action, AqtAction::TabListChange { new_tab_idx: None, .. }));

        let err =
            decode_action::<AqtAction>(json!({"type": "TAB_RENAME", "name": "x"})).unwrap_err();
        assert!(matches!(err, ActionDecodeError::UnknownType(ref name) if name == "TAB_RENAME"));
    }

    #[test]
    fn test_store_keeps_state_on_rejected_action() {
        let store = Store::new(
            QueryTabReducer::new(StandardVisualizations),
            loaded(vec![QueryTabItem::new("A")], 0),
        );
        let before = store.state();

        assert!(store
            .dispatch(AqtAction::VisualizationTypeChange {
                visualization_type: VisualizationType::Table,
            })
            .is_err());
        assert_eq!(store.state(), before);

        store
            .dispatch(AqtAction::NewTabAdd {
                new_tab: ready_tab("B"),
            })
            .unwrap();
        assert_eq!(store.state().current_tab_idx, 1);
    }
}
