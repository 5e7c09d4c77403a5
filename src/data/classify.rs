use std::fmt;

use super::model::{RecordTable, Value};

// ---------------------------------------------------------------------------
// Column kinds
// ---------------------------------------------------------------------------

/// Semantic type of a column, as far as plotting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Categorical => "categorical",
        };
        write!(f, "{name}")
    }
}

/// A column name together with its classified kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a column from its non-null cells.
///
/// * every cell an integer or float → `Numeric`
/// * every cell a bool → `Boolean`
/// * anything else, including an all-null column → `Categorical`
pub fn classify_values<'a>(values: impl Iterator<Item = &'a Value>) -> ColumnKind {
    let mut all_numeric = true;
    let mut all_bool = true;
    let mut seen = false;

    for value in values {
        match value {
            Value::Null => continue,
            Value::Integer(_) | Value::Float(_) => all_bool = false,
            Value::Bool(_) => all_numeric = false,
            Value::Text(_) => {
                all_numeric = false;
                all_bool = false;
            }
        }
        seen = true;
    }

    match (seen, all_numeric, all_bool) {
        (false, _, _) => ColumnKind::Categorical,
        (true, true, _) => ColumnKind::Numeric,
        (true, false, true) => ColumnKind::Boolean,
        _ => ColumnKind::Categorical,
    }
}

/// Describe every column of the table, in header order.
pub fn classify(table: &RecordTable) -> Vec<ColumnDescriptor> {
    table
        .column_names
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnDescriptor {
            name: name.clone(),
            kind: classify_values(table.rows.iter().map(|row| &row[idx])),
        })
        .collect()
}

/// Features a user may pick: numeric columns first, then boolean ones when
/// `include_boolean` is set. The class column is never a feature.
pub fn selectable_features(
    table: &RecordTable,
    class_column: &str,
    include_boolean: bool,
) -> Vec<ColumnDescriptor> {
    let columns: Vec<ColumnDescriptor> = classify(table)
        .into_iter()
        .filter(|c| c.name != class_column)
        .collect();

    let numeric = columns.iter().filter(|c| c.kind == ColumnKind::Numeric);
    let boolean = columns
        .iter()
        .filter(|c| include_boolean && c.kind == ColumnKind::Boolean);

    numeric.chain(boolean).cloned().collect()
}
