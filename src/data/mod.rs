/// Data layer: core types, loading, classification and label mapping.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordTable (+ class column check)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  labels   │  0/1 codes → Extrovert / Introvert (extended variant)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  numeric / boolean / categorical → selectable features
///   └──────────┘
/// ```

pub mod classify;
pub mod labels;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod fixtures {
    use super::model::{RecordTable, Value};

    const ROWS: [(i64, i64, bool, f64, &str); 6] = [
        (0, 25, false, 2.0, "BR"),
        (1, 40, true, 7.5, "PT"),
        (0, 31, false, 1.0, "BR"),
        (1, 22, true, 9.0, "BR"),
        (0, 28, true, 3.5, "PT"),
        (1, 35, false, 6.0, "PT"),
    ];

    fn build(class: impl Fn(i64) -> Value) -> RecordTable {
        RecordTable::new(
            vec![
                "Personality".into(),
                "Age".into(),
                "Stage_fear".into(),
                "Time_spent_Alone".into(),
                "Country".into(),
            ],
            ROWS.iter()
                .map(|&(p, age, fear, alone, country)| {
                    vec![
                        class(p),
                        Value::Integer(age),
                        Value::Bool(fear),
                        Value::Float(alone),
                        Value::Text(country.into()),
                    ]
                })
                .collect(),
        )
    }

    /// Class column stored as 0/1 codes.
    pub fn encoded_table() -> RecordTable {
        build(Value::Integer)
    }

    /// Class column already holding text labels.
    pub fn labeled_table() -> RecordTable {
        build(|p| {
            Value::Text(if p == 0 { "Extrovert" } else { "Introvert" }.into())
        })
    }
}
