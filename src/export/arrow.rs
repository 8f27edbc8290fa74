// src/export/arrow.rs

use arrow::array::{
    ArrayRef, BooleanBuilder, Date32Builder, Float64Builder, Int64Builder, StringBuilder,
};
use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::Result;
use crate::process::{Series, Table, Value};

/// Map a series to the Arrow type of its present values.
///
/// - all `Text`          → Utf8
/// - all `Int`           → Int64
/// - `Int`/`Float` mix   → Float64
/// - all `Bool`          → Boolean
/// - all `Date`          → Date32
/// - all missing / mixed → Utf8
pub fn map_to_arrow_type(series: &Series) -> DataType {
    let mut ty: Option<DataType> = None;
    for v in series.values.iter().filter(|v| !v.is_missing()) {
        let cell = match v {
            Value::Text(_) | Value::Missing => DataType::Utf8,
            Value::Int(_) => DataType::Int64,
            Value::Float(_) => DataType::Float64,
            Value::Bool(_) => DataType::Boolean,
            Value::Date(_) => DataType::Date32,
        };
        ty = Some(match ty {
            None => cell,
            Some(prev) if prev == cell => prev,
            Some(DataType::Int64) | Some(DataType::Float64)
                if matches!(cell, DataType::Int64 | DataType::Float64) =>
            {
                DataType::Float64
            }
            Some(_) => return DataType::Utf8,
        });
    }
    ty.unwrap_or(DataType::Utf8)
}

/// Build an ArrowSchema (inside an Arc) with one nullable field per series,
/// named by its display name.
pub fn arrow_schema(table: &Table) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = table
        .columns()
        .iter()
        .map(|s| ArrowField::new(s.field.display_name(), map_to_arrow_type(s), true))
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

/// Convert the whole table into a single record batch.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let schema = arrow_schema(table);
    let columns: Vec<ArrayRef> = table
        .columns()
        .iter()
        .zip(schema.fields().iter())
        .map(|(series, field)| build_array(series, field.data_type()))
        .collect();
    Ok(RecordBatch::try_new(schema, columns)?)
}

fn build_array(series: &Series, ty: &DataType) -> ArrayRef {
    let n = series.values.len();
    match ty {
        DataType::Int64 => {
            let mut b = Int64Builder::with_capacity(n);
            for v in &series.values {
                b.append_option(match v {
                    Value::Int(i) => Some(*i),
                    _ => None,
                });
            }
            Arc::new(b.finish())
        }
        DataType::Float64 => {
            let mut b = Float64Builder::with_capacity(n);
            for v in &series.values {
                b.append_option(match v {
                    Value::Float(f) => Some(*f),
                    Value::Int(i) => Some(*i as f64),
                    _ => None,
                });
            }
            Arc::new(b.finish())
        }
        DataType::Boolean => {
            let mut b = BooleanBuilder::with_capacity(n);
            for v in &series.values {
                b.append_option(match v {
                    Value::Bool(x) => Some(*x),
                    _ => None,
                });
            }
            Arc::new(b.finish())
        }
        DataType::Date32 => {
            let mut b = Date32Builder::with_capacity(n);
            for v in &series.values {
                b.append_option(match v {
                    Value::Date(d) => Some(days_since_epoch(*d)),
                    _ => None,
                });
            }
            Arc::new(b.finish())
        }
        _ => {
            let mut b = StringBuilder::with_capacity(n, n * 16);
            for v in &series.values {
                if v.is_missing() {
                    b.append_null();
                } else {
                    b.append_value(v.to_string());
                }
            }
            Arc::new(b.finish())
        }
    }
}

fn days_since_epoch(d: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (d - epoch).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Field;
    use arrow::array::{Array, Date32Array, Float64Array, StringArray};

    #[test]
    fn infers_types_per_series() {
        let s = |values| Series::new(Field::Name, values);
        assert_eq!(map_to_arrow_type(&s(vec![Value::Int(1), Value::Missing])), DataType::Int64);
        assert_eq!(
            map_to_arrow_type(&s(vec![Value::Int(1), Value::Float(2.5)])),
            DataType::Float64
        );
        assert_eq!(
            map_to_arrow_type(&s(vec![Value::Bool(true), Value::Text("x".into())])),
            DataType::Utf8
        );
        assert_eq!(map_to_arrow_type(&s(vec![Value::Missing])), DataType::Utf8);
    }

    #[test]
    fn builds_batch_with_nulls() -> anyhow::Result<()> {
        let table = Table::new(vec![
            Series::new(Field::Name, vec![Value::Text("a".into()), Value::Missing]),
            Series::new(Field::Latitude, vec![Value::Float(43.6), Value::Missing]),
            Series::new(
                Field::InstallDate,
                vec![Value::Date(NaiveDate::from_ymd_opt(1970, 1, 11).unwrap()), Value::Missing],
            ),
        ]);
        let batch = to_record_batch(&table)?;
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).name(), "Nom");

        let names = batch.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(names.value(0), "a");
        assert!(names.is_null(1));
        let lats = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(lats.value(0), 43.6);
        let dates = batch.column(2).as_any().downcast_ref::<Date32Array>().unwrap();
        assert_eq!(dates.value(0), 10);
        assert!(dates.is_null(1));
        Ok(())
    }
}
