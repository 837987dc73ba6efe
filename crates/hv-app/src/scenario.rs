//! Scenario replay
//!
//! A scenario is a JSON document describing a picker context and two action
//! logs. Replaying it drives both reducers through a [`Store`] and reports
//! the final states.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use hv_core::{decode_action, ActionType, Reducer, Store, StoreSubscriber};
use hv_dates::{
    compute_date_range, DateBounds, DateConfiguration, DateConfigurationReducer,
    DateConfigurationState, DateContext, DatePickerSettings, QuickOptionChoice,
};
use hv_query::{AqtAction, AqtState, QueryTabItem, QueryTabReducer, StandardVisualizations};

/// Replay input
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    /// Picker settings; defaults apply when absent
    pub date_settings: Option<DatePickerSettings>,

    /// Reference date for relative ranges; the local date when absent
    pub today: Option<NaiveDate>,

    /// Configuration the picker opens with; the default quick option when absent
    pub initial_date: Option<DateConfiguration>,

    pub date_actions: Vec<Value>,

    /// Tabs loaded before the query actions run
    pub tabs: Option<Vec<QueryTabItem>>,

    pub current_tab_idx: usize,

    pub aqt_actions: Vec<Value>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scenario")
    }
}

/// Final date picker state with its resolved range
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateReport {
    pub state: DateConfigurationState,
    pub quick_option: QuickOptionChoice,
    pub range: Option<DateBounds>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_error: Option<String>,
}

/// Replay output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub today: NaiveDate,
    pub date: DateReport,
    pub aqt: AqtState,
}

/// Logs every applied transition with the resulting state
struct StepLogger {
    reducer: &'static str,
}

impl<S: Serialize> StoreSubscriber<S> for StepLogger {
    fn on_state_change(&self, action_type: &'static str, state: &S) {
        match serde_json::to_string(state) {
            Ok(json) => info!(reducer = self.reducer, action = action_type, state = %json, "Step"),
            Err(err) => warn!(
                reducer = self.reducer,
                action = action_type,
                error = %err,
                "Failed to serialize state"
            ),
        }
    }
}

/// Run every action of `scenario`, stopping at the first rejected one
pub fn replay(
    scenario: Scenario,
    default_today: NaiveDate,
    step_log: bool,
) -> Result<ReplayReport> {
    let today = scenario.today.unwrap_or(default_today);
    let settings = scenario.date_settings.unwrap_or_default();
    let context = DateContext::new(settings, today).context("Invalid date picker settings")?;

    let initial = DateConfigurationState::initial(scenario.initial_date, context.settings())
        .context("Failed to open the date picker")?;
    let dates = Store::new(DateConfigurationReducer::new(context), initial);

    let mut initial_tabs = AqtState::default();
    if let Some(tab_list) = scenario.tabs {
        initial_tabs = hv_query::reducer::reduce(
            &initial_tabs,
            AqtAction::TabListLoad {
                tab_list,
                current_tab_idx: scenario.current_tab_idx,
            },
            &StandardVisualizations,
        )
        .context("Failed to load tabs")?;
    }
    let tabs = Store::new(QueryTabReducer::new(StandardVisualizations), initial_tabs);

    // Subscribers are held weakly by the stores
    let date_logger = Arc::new(StepLogger { reducer: "date" });
    let aqt_logger = Arc::new(StepLogger { reducer: "aqt" });
    if step_log {
        dates.add_subscriber(date_logger.clone());
        tabs.add_subscriber(aqt_logger.clone());
    }

    run_actions(&dates, "dateActions", scenario.date_actions)?;
    run_actions(&tabs, "aqtActions", scenario.aqt_actions)?;

    let state = dates.state();
    let context = dates.reducer().context();
    let (range, range_error) = match compute_date_range(&state.current_date_config, context) {
        Ok(bounds) => (Some(bounds), None),
        Err(err) => (None, Some(err.to_string())),
    };

    Ok(ReplayReport {
        today,
        date: DateReport {
            quick_option: state.quick_option_choice(context.settings()),
            state,
            range,
            range_error,
        },
        aqt: tabs.state(),
    })
}

fn run_actions<R>(store: &Store<R>, log: &str, actions: Vec<Value>) -> Result<()>
where
    R: Reducer,
    R::Action: serde::de::DeserializeOwned,
{
    for (idx, value) in actions.into_iter().enumerate() {
        let action: R::Action =
            decode_action(value).with_context(|| format!("{log}[{idx}] could not be decoded"))?;
        let action_type = action.action_type();
        store
            .dispatch(action)
            .with_context(|| format!("{log}[{idx}] ({action_type}) was rejected"))?;
    }
    Ok(())
}
