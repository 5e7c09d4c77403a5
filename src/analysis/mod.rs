//! Analysis layer: one explicit request per selection change.
//!
//! ```text
//!   RecordTable + Selection
//!        │
//!        ├──▶ chart::dispatch     → Chart   (backend-neutral geometry)
//!        └──▶ summary::summarize  → Summary (grouped statistics)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::classify::{ColumnDescriptor, ColumnKind};
use crate::data::model::{RecordTable, Value};

pub mod chart;
pub mod stats;
pub mod summary;

pub use chart::Chart;
pub use summary::Summary;

// ---------------------------------------------------------------------------
// Chart kinds and dashboard variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Boxplot,
    Histogram,
    ViolinPlot,
    Countplot,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Boxplot => "Boxplot",
            ChartKind::Histogram => "Histogram",
            ChartKind::ViolinPlot => "Violin Plot",
            ChartKind::Countplot => "Countplot",
        };
        f.write_str(name)
    }
}

/// The two flavours of the dashboard.
///
/// `Classic` compares numeric traits with box plots and density curves and
/// expects text labels in the class column. `Extended` also offers boolean
/// traits, violin plots and count plots, and decodes 0/1 class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Classic,
    #[default]
    Extended,
}

impl Variant {
    /// Chart kinds offered for a feature of the given kind.
    pub fn chart_kinds(self, kind: ColumnKind) -> &'static [ChartKind] {
        const CLASSIC_NUMERIC: &[ChartKind] = &[ChartKind::Boxplot, ChartKind::Histogram];
        const EXTENDED_NUMERIC: &[ChartKind] =
            &[ChartKind::Boxplot, ChartKind::Histogram, ChartKind::ViolinPlot];
        const EXTENDED_BOOLEAN: &[ChartKind] = &[ChartKind::Countplot];

        match (self, kind) {
            (Variant::Classic, ColumnKind::Numeric) => CLASSIC_NUMERIC,
            (Variant::Extended, ColumnKind::Numeric) => EXTENDED_NUMERIC,
            (Variant::Extended, ColumnKind::Boolean) => EXTENDED_BOOLEAN,
            (Variant::Classic, ColumnKind::Boolean) | (_, ColumnKind::Categorical) => &[],
        }
    }

    pub fn allows(self, kind: ColumnKind, chart: ChartKind) -> bool {
        self.chart_kinds(kind).contains(&chart)
    }

    pub fn includes_boolean(self) -> bool {
        matches!(self, Variant::Extended)
    }

    pub fn maps_labels(self) -> bool {
        matches!(self, Variant::Extended)
    }
}

// ---------------------------------------------------------------------------
// Requests and errors
// ---------------------------------------------------------------------------

/// What the user picked in the sidebar for one rendering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub feature: ColumnDescriptor,
    pub chart: ChartKind,
}

/// Everything the central panel shows for a selection.
#[derive(Debug, Clone)]
pub struct Report {
    pub chart: Chart,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("{chart} is not available for {kind} feature '{feature}'")]
    UnsupportedChart {
        feature: String,
        kind: ColumnKind,
        chart: ChartKind,
    },

    #[error("column '{0}' cannot be analysed as a feature")]
    NotSelectable(String),

    #[error("column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("feature '{0}' has no values to plot")]
    EmptyFeature(String),
}

/// Build the chart and the statistics table for one selection.
pub fn run(
    table: &RecordTable,
    selection: &Selection,
    class_column: &str,
    variant: Variant,
) -> Result<Report, AnalysisError> {
    log::debug!(
        "analysing '{}' as {} ({} rows)",
        selection.feature.name,
        selection.chart,
        table.len()
    );
    let chart = chart::dispatch(table, &selection.feature, selection.chart, class_column, variant)?;
    let summary = summary::summarize(table, &selection.feature, class_column)?;
    Ok(Report { chart, summary })
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Feature cells of all rows sharing one class label.
#[derive(Debug, Clone)]
pub struct ClassGroup<'a> {
    pub label: String,
    pub values: Vec<&'a Value>,
}

impl ClassGroup<'_> {
    /// Finite numeric values of the group, in row order.
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.as_f64()).collect()
    }

    pub fn bools(&self) -> Vec<bool> {
        self.values.iter().filter_map(|v| v.as_bool()).collect()
    }
}

/// Split a feature column by class label, in the order labels first appear.
/// Rows without a class label are skipped.
pub fn group_by_class<'a>(
    table: &'a RecordTable,
    class_column: &str,
    feature: &str,
) -> Result<Vec<ClassGroup<'a>>, AnalysisError> {
    let class_idx = table
        .column_index(class_column)
        .ok_or_else(|| AnalysisError::UnknownColumn(class_column.to_string()))?;
    let feature_idx = table
        .column_index(feature)
        .ok_or_else(|| AnalysisError::UnknownColumn(feature.to_string()))?;

    let mut groups: Vec<ClassGroup<'a>> = Vec::new();
    for row in &table.rows {
        let class = &row[class_idx];
        if class.is_null() {
            continue;
        }
        let label = class.to_string();
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.values.push(&row[feature_idx]),
            None => groups.push(ClassGroup {
                label,
                values: vec![&row[feature_idx]],
            }),
        }
    }
    Ok(groups)
}

/// Rows per class label, most frequent first (ties keep label order).
pub fn class_counts(table: &RecordTable, class_column: &str) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    if let Some(column) = table.column(class_column) {
        for value in column.filter(|v| !v.is_null()) {
            *counts.entry(value.to_string()).or_default() += 1;
        }
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::selectable_features;
    use crate::data::fixtures;
    use crate::data::labels::map_class_labels;

    #[test]
    fn variants_offer_expected_chart_kinds() {
        assert_eq!(
            Variant::Classic.chart_kinds(ColumnKind::Numeric),
            &[ChartKind::Boxplot, ChartKind::Histogram]
        );
        assert_eq!(
            Variant::Extended.chart_kinds(ColumnKind::Boolean),
            &[ChartKind::Countplot]
        );
        assert!(Variant::Classic.chart_kinds(ColumnKind::Boolean).is_empty());
        assert!(!Variant::Extended.allows(ColumnKind::Numeric, ChartKind::Countplot));
    }

    #[test]
    fn groups_follow_first_appearance() {
        let table = RecordTable::new(
            vec!["Personality".into(), "Age".into()],
            vec![
                vec![Value::Text("Introvert".into()), Value::Integer(1)],
                vec![Value::Null, Value::Integer(2)],
                vec![Value::Text("Extrovert".into()), Value::Integer(3)],
                vec![Value::Text("Introvert".into()), Value::Integer(4)],
            ],
        );
        let groups = group_by_class(&table, "Personality", "Age").unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Introvert", "Extrovert"]);
        assert_eq!(groups[0].numbers(), vec![1.0, 4.0]);
    }

    #[test]
    fn unknown_feature_is_an_error() {
        let table = fixtures::labeled_table();
        let err = group_by_class(&table, "Personality", "Height").unwrap_err();
        assert_eq!(err, AnalysisError::UnknownColumn("Height".into()));
    }

    #[test]
    fn class_counts_sorted_by_frequency() {
        let mut table = fixtures::labeled_table();
        table.rows.push(table.rows[1].clone());
        let counts = class_counts(&table, "Personality");
        assert_eq!(
            counts,
            vec![("Introvert".to_string(), 4), ("Extrovert".to_string(), 3)]
        );
    }

    #[test]
    fn every_allowed_pair_produces_a_report() {
        for variant in [Variant::Classic, Variant::Extended] {
            let table = map_class_labels(&fixtures::encoded_table(), "Personality").unwrap();
            for feature in selectable_features(&table, "Personality", variant.includes_boolean()) {
                for &chart in variant.chart_kinds(feature.kind) {
                    let selection = Selection {
                        feature: feature.clone(),
                        chart,
                    };
                    let report = run(&table, &selection, "Personality", variant);
                    assert!(report.is_ok(), "{variant:?} {chart} on {}", feature.name);
                }
            }
        }
    }
}
