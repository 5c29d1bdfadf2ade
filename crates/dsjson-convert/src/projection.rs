//! Tabular projection of a dataset's records.
//!
//! Each column's dtype follows the JSON values it holds; nothing is coerced
//! beyond what JSON already carries.

use dsjson_model::{Column, ColumnType, Dataset, RECORD_SEQUENCE};
use polars::prelude::{DataFrame, DataType, IntoColumn, NamedFrom, Series};
use serde_json::Value;
use tracing::warn;

use crate::error::{ConvertError, Result};
use crate::reader::DatasetJsonReader;

/// A dataset as a frame, with the record sequence split out as its index.
#[derive(Debug, Clone)]
pub struct DatasetFrame {
    pub name: String,
    /// `ITEMGROUPDATASEQ`, one entry per record.
    pub index: Series,
    /// Every other column, in collection order.
    pub data: DataFrame,
}

impl DatasetFrame {
    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    /// Single frame with the index as its first column.
    pub fn to_indexed_frame(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.data.width() + 1);
        columns.push(self.index.clone().into_column());
        columns.extend(self.data.get_columns().iter().cloned());
        Ok(DataFrame::new(columns)?)
    }
}

impl DatasetJsonReader {
    /// Project a dataset's `itemData` into a [`DatasetFrame`].
    pub fn to_frame(&self, name: &str) -> Result<DatasetFrame> {
        let dataset = self.require_dataset(name)?;
        project(dataset, self.records(name)?)
    }
}

/// Build the frame for `dataset` from its raw records.
pub fn project(dataset: &Dataset, records: &[Vec<Value>]) -> Result<DatasetFrame> {
    let columns: Vec<&Column> = dataset.columns().collect();
    let seq_pos = columns
        .iter()
        .position(|c| c.name == RECORD_SEQUENCE)
        .ok_or_else(|| ConvertError::MissingSequence {
            dataset: dataset.name.clone(),
        })?;

    for (row, record) in records.iter().enumerate() {
        if record.len() != columns.len() {
            return Err(ConvertError::RowLength {
                dataset: dataset.name.clone(),
                row,
                expected: columns.len(),
                actual: record.len(),
            });
        }
    }

    let index = sequence_series(dataset, records, seq_pos)?;

    let mut data_columns = Vec::with_capacity(columns.len() - 1);
    for (pos, column) in columns.iter().enumerate() {
        if pos == seq_pos {
            continue;
        }
        let series = column_series(dataset, column, records, pos)?;
        data_columns.push(series.into_column());
    }

    Ok(DatasetFrame {
        name: dataset.name.clone(),
        index,
        data: DataFrame::new(data_columns)?,
    })
}

fn sequence_series(dataset: &Dataset, records: &[Vec<Value>], pos: usize) -> Result<Series> {
    let values = records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let value = &record[pos];
            value
                .as_i64()
                .or_else(|| value.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
                .ok_or_else(|| ConvertError::InvalidValue {
                    dataset: dataset.name.clone(),
                    column: RECORD_SEQUENCE.to_string(),
                    row,
                    reason: format!("record sequence must be an integer, found {value}"),
                })
        })
        .collect::<Result<Vec<i64>>>()?;
    Ok(Series::new(RECORD_SEQUENCE.into(), values))
}

/// Kinds of JSON scalars present in one column.
#[derive(Debug, Default)]
struct ValueKinds {
    strings: bool,
    integers: bool,
    floats: bool,
    booleans: bool,
}

impl ValueKinds {
    fn scan(dataset: &Dataset, column: &Column, records: &[Vec<Value>], pos: usize) -> Result<Self> {
        let mut kinds = Self::default();
        for (row, record) in records.iter().enumerate() {
            match &record[pos] {
                Value::Null => {}
                Value::String(_) => kinds.strings = true,
                Value::Bool(_) => kinds.booleans = true,
                Value::Number(n) if n.is_i64() => kinds.integers = true,
                Value::Number(_) => kinds.floats = true,
                other @ (Value::Array(_) | Value::Object(_)) => {
                    return Err(ConvertError::InvalidValue {
                        dataset: dataset.name.clone(),
                        column: column.name.clone(),
                        row,
                        reason: format!("expected a scalar, found {other}"),
                    });
                }
            }
        }
        Ok(kinds)
    }

    fn numbers(&self) -> bool {
        self.integers || self.floats
    }

    fn distinct(&self) -> usize {
        [self.strings, self.numbers(), self.booleans]
            .into_iter()
            .filter(|&present| present)
            .count()
    }
}

fn column_series(
    dataset: &Dataset,
    column: &Column,
    records: &[Vec<Value>],
    pos: usize,
) -> Result<Series> {
    let kinds = ValueKinds::scan(dataset, column, records, pos)?;
    let name = column.name.as_str();
    let cells = records.iter().map(|record| &record[pos]);

    if kinds.distinct() == 0 {
        return Ok(Series::full_null(
            name.into(),
            records.len(),
            &declared_dtype(column),
        ));
    }

    if kinds.distinct() > 1 {
        warn!(
            dataset = %dataset.name,
            column = %column.name,
            "column mixes strings, numbers or booleans; keeping it as text"
        );
        let values: Vec<Option<String>> = cells.map(value_as_text).collect();
        return Ok(Series::new(name.into(), values));
    }

    let series = if kinds.strings {
        let values: Vec<Option<String>> = cells.map(value_as_text).collect();
        Series::new(name.into(), values)
    } else if kinds.booleans {
        let values: Vec<Option<bool>> = cells.map(Value::as_bool).collect();
        Series::new(name.into(), values)
    } else if kinds.floats {
        let values: Vec<Option<f64>> = cells.map(Value::as_f64).collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<i64>> = cells.map(Value::as_i64).collect();
        Series::new(name.into(), values)
    };
    Ok(series)
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Dtype of a column with no values, from its declared type.
fn declared_dtype(column: &Column) -> DataType {
    match column.column_type() {
        ColumnType::Integer => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Boolean => DataType::Boolean,
        ColumnType::String | ColumnType::Other => DataType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(types: &[(&str, &str)]) -> Dataset {
        let columns = std::iter::once(Column::new(RECORD_SEQUENCE, RECORD_SEQUENCE, "integer"))
            .chain(types.iter().map(|(name, t)| Column::new(*name, *name, *t)));
        Dataset::new("IG.T", "T", None).with_columns(columns).unwrap()
    }

    fn rows(values: serde_json::Value) -> Vec<Vec<Value>> {
        serde_json::from_value(values).unwrap()
    }

    #[test]
    fn infers_dtypes_from_values() {
        let ds = dataset(&[("S", "string"), ("I", "integer"), ("F", "float"), ("B", "boolean")]);
        let records = rows(json!([[1, "a", 1, 1.5, true], [2, null, 2, 2, false]]));

        let frame = project(&ds, &records).unwrap();
        let dtypes: Vec<DataType> = frame.data.dtypes();
        assert_eq!(
            dtypes,
            vec![DataType::String, DataType::Int64, DataType::Float64, DataType::Boolean]
        );
        assert_eq!(frame.num_rows(), 2);
    }

    #[test]
    fn all_null_column_uses_declared_type() {
        let ds = dataset(&[("AGE", "integer"), ("WT", "double"), ("X", "date")]);
        let records = rows(json!([[1, null, null, null]]));

        let frame = project(&ds, &records).unwrap();
        assert_eq!(
            frame.data.dtypes(),
            vec![DataType::Int64, DataType::Float64, DataType::String]
        );
        assert_eq!(frame.data.column("AGE").unwrap().null_count(), 1);
    }

    #[test]
    fn mixed_column_becomes_text() {
        let ds = dataset(&[("V", "string")]);
        let records = rows(json!([[1, "a"], [2, 3], [3, true]]));

        let frame = project(&ds, &records).unwrap();
        let values: Vec<Option<&str>> = frame.data.column("V").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("a"), Some("3"), Some("true")]);
    }

    #[test]
    fn rejects_nested_values() {
        let ds = dataset(&[("V", "string")]);
        let records = rows(json!([[1, {"a": 1}]]));
        assert!(matches!(
            project(&ds, &records),
            Err(ConvertError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn rejects_short_rows() {
        let ds = dataset(&[("V", "string")]);
        let records = rows(json!([[1, "a"], [2]]));
        assert!(matches!(
            project(&ds, &records),
            Err(ConvertError::RowLength {
                row: 1,
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn requires_sequence_column() {
        let ds = Dataset::new("IG.T", "T", None)
            .with_columns([Column::new("A", "A", "string")])
            .unwrap();
        assert!(matches!(
            project(&ds, &[]),
            Err(ConvertError::MissingSequence { .. })
        ));
    }

    #[test]
    fn rejects_non_integer_sequence() {
        let ds = dataset(&[]);
        assert!(project(&ds, &rows(json!([[1.0]]))).is_ok());
        assert!(matches!(
            project(&ds, &rows(json!([["1"]]))),
            Err(ConvertError::InvalidValue { .. })
        ));
    }

    #[test]
    fn indexed_frame_leads_with_sequence() {
        let ds = dataset(&[("A", "string")]);
        let frame = project(&ds, &rows(json!([[7, "x"]]))).unwrap();
        let indexed = frame.to_indexed_frame().unwrap();
        let names: Vec<&str> = indexed.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec![RECORD_SEQUENCE, "A"]);
    }
}
