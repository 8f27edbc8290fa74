use tracing::info;

use super::schema::Field;
use super::table::{Series, Table, Value};
use crate::error::{PipelineError, Result};

/// Merge `adr_num` and `adr_voie` into a single `address` column.
///
/// A missing house number becomes an empty string, so the address starts with
/// a space. Everything from the first comma on is discarded. A missing street
/// gives a missing address.
pub fn frame_data(table: Table) -> Result<Table> {
    let numbers = required(&table, Field::AddressNumber)?;
    let streets = required(&table, Field::AddressStreet)?;

    let addresses: Vec<Value> = numbers
        .values
        .iter()
        .zip(streets.values.iter())
        .map(|(num, street)| merge_address(num, street))
        .collect();

    let table = table
        .drop_column(Field::AddressNumber)
        .drop_column(Field::AddressStreet)
        .push(Series::new(Field::Address, addresses))
        .drop_duplicates();
    info!(rows = table.num_rows(), "framed");
    Ok(table)
}

fn required(table: &Table, field: Field) -> Result<&Series> {
    table
        .series(field)
        .ok_or_else(|| PipelineError::missing_column(field.display_name()))
}

pub fn merge_address(number: &Value, street: &Value) -> Value {
    if street.is_missing() {
        return Value::Missing;
    }
    let combined = format!("{} {}", number, street);
    let head = combined.split(',').next().unwrap_or_default();
    Value::Text(head.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn merges_and_truncates_at_comma() -> anyhow::Result<()> {
        let table = Table::new(vec![
            Series::new(Field::Name, vec![text("a"), text("b"), text("c")]),
            Series::new(Field::AddressNumber, vec![Value::Missing, text("12"), text("3")]),
            Series::new(
                Field::AddressStreet,
                vec![
                    text("Rue de la Paix, 5e arrondissement"),
                    text("avenue foch"),
                    Value::Missing,
                ],
            ),
        ]);
        let table = frame_data(table)?;

        assert_eq!(table.fields(), vec![Field::Name, Field::Address]);
        assert_eq!(
            table.series(Field::Address).unwrap().values,
            vec![text(" Rue de la Paix"), text("12 avenue foch"), Value::Missing]
        );
        Ok(())
    }

    #[test]
    fn missing_component_is_schema_error() {
        let table = Table::new(vec![Series::new(Field::AddressNumber, vec![text("1")])]);
        match frame_data(table) {
            Err(PipelineError::Schema { column }) => assert_eq!(column, "adr_voie"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn rows_equal_after_truncation_collapse() -> anyhow::Result<()> {
        let table = Table::new(vec![
            Series::new(Field::AddressNumber, vec![text("1"), text("1")]),
            Series::new(Field::AddressStreet, vec![text("rue a, nord"), text("rue a, sud")]),
        ]);
        assert_eq!(frame_data(table)?.num_rows(), 1);
        Ok(())
    }
}
