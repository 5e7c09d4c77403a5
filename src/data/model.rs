use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell of the record table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            // Whole floats keep one decimal so they never read as integers.
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` for statistics; only numbers qualify.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if v.is_finite() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed dataset: rows of cells laid out in header order.
///
/// Every row holds exactly `column_names.len()` cells. The table is never
/// mutated after loading; transforms such as label mapping build a new one.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    /// Ordered column names as found in the source file.
    pub column_names: Vec<String>,
    /// All rows; `rows[r][c]` is the cell of column `c`.
    pub rows: Vec<Vec<Value>>,
}

impl RecordTable {
    /// Build a table, padding short rows with `Null` and dropping surplus cells
    /// so the shared column set holds.
    pub fn new(column_names: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        let width = column_names.len();
        for row in &mut rows {
            row.resize(width, Value::Null);
        }
        RecordTable { column_names, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate over one column's cells, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Return a copy of the table with one column rewritten cell by cell.
    /// Returns `None` when the column does not exist.
    pub fn map_column<F>(&self, name: &str, mut f: F) -> Option<RecordTable>
    where
        F: FnMut(&Value) -> Value,
    {
        let idx = self.column_index(name)?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[idx] = f(&row[idx]);
                row
            })
            .collect();
        Some(RecordTable {
            column_names: self.column_names.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordTable {
        RecordTable::new(
            vec!["Personality".into(), "Age".into()],
            vec![
                vec![Value::Integer(0), Value::Integer(25)],
                vec![Value::Integer(1)],
            ],
        )
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let table = sample();
        assert_eq!(table.rows[1], vec![Value::Integer(1), Value::Null]);
    }

    #[test]
    fn column_iterates_in_row_order() {
        let table = sample();
        let ages: Vec<&Value> = table.column("Age").unwrap().collect();
        assert_eq!(ages, vec![&Value::Integer(25), &Value::Null]);
        assert!(table.column("Height").is_none());
    }

    #[test]
    fn map_column_leaves_source_untouched() {
        let table = sample();
        let mapped = table
            .map_column("Personality", |_| Value::Text("x".into()))
            .unwrap();
        assert_eq!(mapped.rows[0][0], Value::Text("x".into()));
        assert_eq!(table.rows[0][0], Value::Integer(0));
    }

    #[test]
    fn whole_floats_display_with_a_decimal() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(7.25).to_string(), "7.25");
        assert_eq!(Value::Integer(2).to_string(), "2");
    }

    #[test]
    fn non_finite_floats_are_not_numbers() {
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
    }
}
