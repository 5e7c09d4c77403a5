use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use thiserror::Error;

use super::model::{RecordTable, Value};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can stop a dataset from loading. Each variant halts the
/// dashboard before any feature, chart or statistic is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("required column '{0}' was not found in the dataset")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset and make sure the class column is present.
pub fn load_dataset(path: &Path, class_column: &str) -> Result<RecordTable, LoadError> {
    let table = load_file(path)?;
    if !table.has_column(class_column) {
        return Err(LoadError::MissingColumn(class_column.to_string()));
    }
    Ok(table)
}

/// Load a record table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one column per trait (the default input)
/// * `.parquet` – flat columns of ints, floats, bools or strings
pub fn load_file(path: &Path) -> Result<RecordTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Inferred storage type of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CsvColumnType {
    Integer,
    Float,
    Bool,
    Text,
}

/// CSV layout: header row with column names, one record per row.
///
/// The type of each column is inferred from all of its non-empty cells:
/// integers, then floats, then `true`/`false`, else text. Empty cells become `Null`; a boolean column with gaps is kept as text.
fn load_csv(path: &Path) -> Result<RecordTable, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        raw_rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }

    let column_types: Vec<CsvColumnType> = (0..headers.len())
        .map(|idx| {
            infer_column_type(
                raw_rows
                    .iter()
                    .map(|row| row.get(idx).map(String::as_str).unwrap_or("")),
            )
        })
        .collect();

    let rows = raw_rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&column_types)
                .map(|(cell, ty)| parse_cell(cell, *ty))
                .collect()
        })
        .collect();

    Ok(RecordTable::new(headers, rows))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> CsvColumnType {
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut has_null = false;
    let mut has_value = false;

    for cell in cells {
        if cell.is_empty() {
            has_null = true;
            continue;
        }
        has_value = true;
        all_int &= cell.parse::<i64>().is_ok();
        all_float &= cell.parse::<f64>().is_ok();
        all_bool &= parse_bool(cell).is_some();
    }

    if !has_value {
        return CsvColumnType::Text;
    }
    if all_int {
        CsvColumnType::Integer
    } else if all_float {
        CsvColumnType::Float
    } else if all_bool && !has_null {
        CsvColumnType::Bool
    } else {
        CsvColumnType::Text
    }
}

fn parse_cell(s: &str, ty: CsvColumnType) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    let parsed = match ty {
        CsvColumnType::Integer => s.parse::<i64>().ok().map(Value::Integer),
        CsvColumnType::Float => s.parse::<f64>().ok().map(Value::Float),
        CsvColumnType::Bool => parse_bool(s).map(Value::Bool),
        CsvColumnType::Text => None,
    };
    parsed.unwrap_or_else(|| Value::Text(s.to_string()))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.
///
/// Columns of any other Arrow type are read as text.
fn load_parquet(path: &Path) -> Result<RecordTable, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let columns = batch
            .columns()
            .iter()
            .map(widen_numeric)
            .collect::<Result<Vec<_>, _>>()?;

        for row in 0..batch.num_rows() {
            rows.push(
                columns
                    .iter()
                    .map(|col| extract_value(col, row))
                    .collect::<Vec<_>>(),
            );
        }
    }

    Ok(RecordTable::new(column_names, rows))
}

/// Cast every integer column to Int64 and every float column to Float64 so
/// narrow types such as Int8 class codes or UInt8 scores stay numeric.
fn widen_numeric(col: &ArrayRef) -> Result<ArrayRef, ArrowError> {
    let data_type = col.data_type();
    if data_type.is_integer() && *data_type != DataType::Int64 {
        cast(col, &DataType::Int64)
    } else if data_type.is_floating() && *data_type != DataType::Float64 {
        cast(col, &DataType::Float64)
    } else {
        Ok(col.clone())
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        other => match array_value_to_string(col, row) {
            Ok(text) => Value::Text(text),
            Err(_) => Value::Text(format!("{other:?}")),
        },
    }
}
