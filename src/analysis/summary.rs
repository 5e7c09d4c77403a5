use std::collections::BTreeMap;

use super::stats;
use super::{group_by_class, AnalysisError, ClassGroup};
use crate::data::classify::{ColumnDescriptor, ColumnKind};
use crate::data::model::RecordTable;

/// Row names of the numeric summary, in display order.
pub const STAT_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

/// Descriptive statistics of one feature, one column per class label.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Numeric(DescribeTable),
    Boolean(ProportionTable),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeTable {
    /// Class labels, sorted.
    pub classes: Vec<String>,
    /// One entry per class, same order as `classes`.
    pub columns: Vec<Describe>,
}

/// count / mean / std / min / quartiles / max of one group. Every statistic
/// except `count` is `None` when the group has no values (and `std` also
/// when it has a single value).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Share of each boolean value within each class: `cells[value][class]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionTable {
    pub values: Vec<bool>,
    pub classes: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

impl Describe {
    pub fn from_values(xs: &[f64]) -> Self {
        let sorted = stats::sorted(xs);
        Describe {
            count: xs.len(),
            mean: stats::mean(xs),
            std: stats::sample_std(xs),
            min: sorted.first().copied(),
            q1: stats::quantile(&sorted, 0.25),
            median: stats::quantile(&sorted, 0.5),
            q3: stats::quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    /// Statistic by row index into [`STAT_NAMES`].
    pub fn stat(&self, row: usize) -> Option<f64> {
        match row {
            0 => Some(self.count as f64),
            1 => self.mean,
            2 => self.std,
            3 => self.min,
            4 => self.q1,
            5 => self.median,
            6 => self.q3,
            7 => self.max,
            _ => None,
        }
    }
}

impl Summary {
    pub fn classes(&self) -> &[String] {
        match self {
            Summary::Numeric(t) => &t.classes,
            Summary::Boolean(t) => &t.classes,
        }
    }

    pub fn row_labels(&self) -> Vec<String> {
        match self {
            Summary::Numeric(_) => STAT_NAMES.iter().map(|s| s.to_string()).collect(),
            Summary::Boolean(t) => t.values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        match self {
            Summary::Numeric(t) => t.columns.get(col)?.stat(row),
            Summary::Boolean(t) => t.cells.get(row)?.get(col).copied(),
        }
    }

    /// Cell text for the statistics grid; empty cells render as `NaN`.
    pub fn format_cell(&self, row: usize, col: usize) -> String {
        match (self, self.cell(row, col)) {
            (Summary::Numeric(_), Some(v)) if row == 0 => format!("{v:.0}"),
            (_, Some(v)) => format!("{v:.6}"),
            (_, None) => "NaN".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// Compute grouped statistics for a numeric or boolean feature.
pub fn summarize(
    table: &RecordTable,
    feature: &ColumnDescriptor,
    class_column: &str,
) -> Result<Summary, AnalysisError> {
    let mut groups = group_by_class(table, class_column, &feature.name)?;
    groups.sort_by(|a, b| a.label.cmp(&b.label));

    match feature.kind {
        ColumnKind::Numeric => Ok(Summary::Numeric(describe(&groups))),
        ColumnKind::Boolean => Ok(Summary::Boolean(proportions(&groups))),
        ColumnKind::Categorical => Err(AnalysisError::NotSelectable(feature.name.clone())),
    }
}

fn describe(groups: &[ClassGroup<'_>]) -> DescribeTable {
    DescribeTable {
        classes: groups.iter().map(|g| g.label.clone()).collect(),
        columns: groups
            .iter()
            .map(|g| Describe::from_values(&g.numbers()))
            .collect(),
    }
}

fn proportions(groups: &[ClassGroup<'_>]) -> ProportionTable {
    let per_class: Vec<BTreeMap<bool, usize>> = groups
        .iter()
        .map(|g| {
            let mut counts = BTreeMap::new();
            for b in g.bools() {
                *counts.entry(b).or_insert(0usize) += 1;
            }
            counts
        })
        .collect();

    let values: Vec<bool> = per_class
        .iter()
        .flat_map(|counts| counts.keys().copied())
        .collect::<std::collections::BTreeSet<bool>>()
        .into_iter()
        .collect();

    let cells = values
        .iter()
        .map(|value| {
            per_class
                .iter()
                .map(|counts| {
                    let total: usize = counts.values().sum();
                    match (counts.get(value), total) {
                        (Some(&n), t) if t > 0 => n as f64 / t as f64,
                        _ => 0.0,
                    }
                })
                .collect()
        })
        .collect();

    ProportionTable {
        values,
        classes: groups.iter().map(|g| g.label.clone()).collect(),
        cells,
    }
}
