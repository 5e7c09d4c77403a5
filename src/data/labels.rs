use std::fmt;

use super::model::{RecordTable, Value};

/// The two personality classes every comparison is made between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassLabel {
    Extrovert,
    Introvert,
}

impl ClassLabel {
    pub const ALL: [ClassLabel; 2] = [ClassLabel::Extrovert, ClassLabel::Introvert];

    /// Decode the integer class code used by the preprocessed dataset.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ClassLabel::Extrovert),
            1 => Some(ClassLabel::Introvert),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassLabel::Extrovert => "Extrovert",
            ClassLabel::Introvert => "Introvert",
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(code) => Self::from_code(*code),
            Value::Float(code) if code.fract() == 0.0 => Self::from_code(*code as i64),
            Value::Text(text) => Self::ALL.into_iter().find(|l| l.as_str() == text.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace the integer-coded class column with readable labels.
///
/// Codes outside the lookup table become `Null`. Cells that already hold a label are kept.
/// Returns `None` when the column is absent.
pub fn map_class_labels(table: &RecordTable, class_column: &str) -> Option<RecordTable> {
    let mut unmapped = 0usize;
    let mapped = table.map_column(class_column, |value| match ClassLabel::from_value(value) {
        Some(label) => Value::Text(label.as_str().to_string()),
        None => {
            if !value.is_null() {
                unmapped += 1;
            }
            Value::Null
        }
    })?;

    if unmapped > 0 {
        log::warn!("{unmapped} value(s) in '{class_column}' have no class label and were dropped");
    }
    Some(mapped)
}
