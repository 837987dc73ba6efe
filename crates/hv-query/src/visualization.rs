//! Visualization types, view types and the catalog that relates them

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::result_spec::{QueryResultSpec, ViewSettings};
use crate::selections::{GroupingKind, QuerySelections};

/// Coarse rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewType {
    Table,
    Bar,
    Time,
    Map,
    Pie,
    Heatmap,
}

/// A specific visualization; each one refines exactly one [`ViewType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualizationType {
    Table,
    TableScorecard,
    Bar,
    BarHorizontal,
    BarStacked,
    Line,
    Map,
    MapAnimated,
    Pie,
    Heatmap,
}

impl VisualizationType {
    pub const ALL: [VisualizationType; 10] = [
        VisualizationType::Table,
        VisualizationType::TableScorecard,
        VisualizationType::Bar,
        VisualizationType::BarHorizontal,
        VisualizationType::BarStacked,
        VisualizationType::Line,
        VisualizationType::Map,
        VisualizationType::MapAnimated,
        VisualizationType::Pie,
        VisualizationType::Heatmap,
    ];

    /// The view type this visualization refines
    pub fn view_type(&self) -> ViewType {
        match self {
            VisualizationType::Table | VisualizationType::TableScorecard => ViewType::Table,
            VisualizationType::Bar
            | VisualizationType::BarHorizontal
            | VisualizationType::BarStacked => ViewType::Bar,
            VisualizationType::Line => ViewType::Time,
            VisualizationType::Map | VisualizationType::MapAnimated => ViewType::Map,
            VisualizationType::Pie => ViewType::Pie,
            VisualizationType::Heatmap => ViewType::Heatmap,
        }
    }

    /// What the query selections must contain for this visualization
    pub fn requirements(&self) -> VisualizationRequirements {
        let base = VisualizationRequirements::default();
        match self {
            VisualizationType::Table
            | VisualizationType::TableScorecard
            | VisualizationType::Bar
            | VisualizationType::BarHorizontal => base,
            VisualizationType::BarStacked => VisualizationRequirements { min_fields: 2, ..base },
            VisualizationType::Line => VisualizationRequirements {
                time_grouping: true,
                ..base
            },
            VisualizationType::Map | VisualizationType::Heatmap => VisualizationRequirements {
                geography_grouping: true,
                ..base
            },
            VisualizationType::MapAnimated => VisualizationRequirements {
                geography_grouping: true,
                time_grouping: true,
                ..base
            },
            VisualizationType::Pie => VisualizationRequirements {
                max_non_time_groupings: Some(1),
                ..base
            },
        }
    }

    /// Display options applied when this visualization is selected
    fn preset_options(&self) -> Vec<(&'static str, Value)> {
        match self {
            VisualizationType::Table => vec![("tableFormat", json!("table"))],
            VisualizationType::TableScorecard => vec![("tableFormat", json!("scorecard"))],
            VisualizationType::Bar => {
                vec![("barDirection", json!("vertical")), ("stackBars", json!(false))]
            }
            VisualizationType::BarHorizontal => {
                vec![("barDirection", json!("horizontal")), ("stackBars", json!(false))]
            }
            VisualizationType::BarStacked => {
                vec![("barDirection", json!("vertical")), ("stackBars", json!(true))]
            }
            VisualizationType::Map => vec![("animated", json!(false))],
            VisualizationType::MapAnimated => vec![("animated", json!(true))],
            VisualizationType::Line | VisualizationType::Pie | VisualizationType::Heatmap => {
                Vec::new()
            }
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VisualizationType::Table => "TABLE",
            VisualizationType::TableScorecard => "TABLE_SCORECARD",
            VisualizationType::Bar => "BAR",
            VisualizationType::BarHorizontal => "BAR_HORIZONTAL",
            VisualizationType::BarStacked => "BAR_STACKED",
            VisualizationType::Line => "LINE",
            VisualizationType::Map => "MAP",
            VisualizationType::MapAnimated => "MAP_ANIMATED",
            VisualizationType::Pie => "PIE",
            VisualizationType::Heatmap => "HEATMAP",
        };
        f.write_str(name)
    }
}

/// Selection requirements of a visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualizationRequirements {
    pub min_fields: usize,
    pub time_grouping: bool,
    pub geography_grouping: bool,
    pub max_non_time_groupings: Option<usize>,
}

impl Default for VisualizationRequirements {
    fn default() -> Self {
        Self {
            min_fields: 1,
            time_grouping: false,
            geography_grouping: false,
            max_non_time_groupings: None,
        }
    }
}

impl VisualizationRequirements {
    pub fn is_satisfied_by(&self, selections: &QuerySelections) -> bool {
        selections.field_count() >= self.min_fields
            && (!self.time_grouping || selections.has_grouping(GroupingKind::Time))
            && (!self.geography_grouping || selections.has_grouping(GroupingKind::Geography))
            && self
                .max_non_time_groupings
                .map_or(true, |max| selections.non_time_grouping_count() <= max)
    }
}

/// Decides which visualizations a query supports and how selecting one
/// changes the result spec
pub trait VisualizationCatalog: Send + Sync {
    /// Whether `visualization` can render results of `selections`
    fn is_visualization_enabled(
        &self,
        visualization: VisualizationType,
        selections: &QuerySelections,
    ) -> bool;

    /// Adjust `spec` for `visualization`, returning the new spec and the view
    /// type the visualization refines
    fn select_visualization(
        &self,
        spec: &QueryResultSpec,
        visualization: VisualizationType,
    ) -> (QueryResultSpec, ViewType);

    /// Visualization picked when a tab gets a result spec but has none chosen
    fn default_visualization(&self) -> VisualizationType {
        VisualizationType::Table
    }

    /// All visualizations enabled for `selections`, in catalog order
    fn enabled_visualizations(&self, selections: &QuerySelections) -> Vec<VisualizationType> {
        VisualizationType::ALL
            .into_iter()
            .filter(|visualization| self.is_visualization_enabled(*visualization, selections))
            .collect()
    }
}

/// The built-in catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardVisualizations;

impl VisualizationCatalog for StandardVisualizations {
    fn is_visualization_enabled(
        &self,
        visualization: VisualizationType,
        selections: &QuerySelections,
    ) -> bool {
        visualization.requirements().is_satisfied_by(selections)
    }

    fn select_visualization(
        &self,
        spec: &QueryResultSpec,
        visualization: VisualizationType,
    ) -> (QueryResultSpec, ViewType) {
        let view_type = visualization.view_type();
        let mut next = spec.clone();

        let settings = next
            .view_settings
            .entry(view_type)
            .or_insert_with(|| ViewSettings::new(visualization));
        settings.visualization = visualization;
        for (key, value) in visualization.preset_options() {
            settings.options.insert(key.to_string(), value);
        }

        (next, view_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selections() -> QuerySelections {
        QuerySelections::new().with_fields(["malaria_cases"])
    }

    #[test]
    fn test_every_visualization_refines_one_view_type() {
        assert_eq!(VisualizationType::TableScorecard.view_type(), ViewType::Table);
        assert_eq!(VisualizationType::BarStacked.view_type(), ViewType::Bar);
        assert_eq!(VisualizationType::Line.view_type(), ViewType::Time);
        assert_eq!(VisualizationType::MapAnimated.view_type(), ViewType::Map);
    }

    #[test]
    fn test_enabled_visualizations() {
        let catalog = StandardVisualizations;

        assert!(catalog.enabled_visualizations(&QuerySelections::new()).is_empty());

        let plain = catalog.enabled_visualizations(&selections());
        assert!(plain.contains(&VisualizationType::Table));
        assert!(plain.contains(&VisualizationType::Pie));
        assert!(!plain.contains(&VisualizationType::BarStacked));
        assert!(!plain.contains(&VisualizationType::Line));
        assert!(!plain.contains(&VisualizationType::Map));

        let by_region_and_month = selections()
            .with_grouping("region", GroupingKind::Geography)
            .with_grouping("month", GroupingKind::Time);
        assert!(catalog.is_visualization_enabled(
            VisualizationType::MapAnimated,
            &by_region_and_month
        ));
        assert!(catalog.is_visualization_enabled(VisualizationType::Line, &by_region_and_month));
        assert!(catalog.is_visualization_enabled(VisualizationType::Pie, &by_region_and_month));

        let two_dimensions = selections()
            .with_grouping("region", GroupingKind::Geography)
            .with_grouping("sex", GroupingKind::Dimension);
        assert!(!catalog.is_visualization_enabled(VisualizationType::Pie, &two_dimensions));
    }

    #[test]
    fn test_select_visualization_only_touches_its_view_type() {
        let catalog = StandardVisualizations;
        let spec = QueryResultSpec::for_selections(&selections()).with_title("Cases");

        let (bar_spec, view_type) =
            catalog.select_visualization(&spec, VisualizationType::BarHorizontal);
        assert_eq!(view_type, ViewType::Bar);

        let (scorecard_spec, view_type) =
            catalog.select_visualization(&bar_spec, VisualizationType::TableScorecard);
        assert_eq!(view_type, ViewType::Table);
        assert_eq!(scorecard_spec.title.as_deref(), Some("Cases"));

        let table = scorecard_spec.view_settings(ViewType::Table).unwrap();
        assert_eq!(table.visualization, VisualizationType::TableScorecard);
        assert_eq!(table.options["tableFormat"], json!("scorecard"));

        let bar = scorecard_spec.view_settings(ViewType::Bar).unwrap();
        assert_eq!(bar.visualization, VisualizationType::BarHorizontal);
        assert_eq!(bar.options["barDirection"], json!("horizontal"));
    }

    #[test]
    fn test_display_matches_wire_name() {
        for visualization in VisualizationType::ALL {
            assert_eq!(
                serde_json::to_value(visualization).unwrap(),
                json!(visualization.to_string())
            );
        }
    }
}
