use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, info};

use super::schema::{Field, Kind, SOURCE_FIELDS};
use super::table::{Series, Table, Value};
use super::utils::{clean_str, parse_float, parse_int};
use crate::error::{PipelineError, Result};

/// Read the registry CSV at `path` into a typed table.
///
/// Only the allow-listed source columns are read, other columns are ignored.
/// Series carry their renamed display names. Dates stay raw text here; the
/// sanitizer decides what to do with unparseable values.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_formatted_data<P: AsRef<Path>>(path: P) -> Result<Table> {
    let file = File::open(&path)?;
    read_table(file)
}

/// Same as [`load_formatted_data`] over any reader.
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // 1) Resolve the allow-list against the header row
    let headers = rdr.headers()?.clone();
    let mut layout: Vec<(Field, usize)> = Vec::with_capacity(SOURCE_FIELDS.len());
    for &field in SOURCE_FIELDS {
        let idx = headers
            .iter()
            .position(|h| clean_str(h).trim_start_matches('\u{feff}') == field.source_name())
            .ok_or_else(|| PipelineError::missing_column(field.source_name()))?;
        layout.push((field, idx));
    }
    debug!(
        ignored = headers.len().saturating_sub(layout.len()),
        "resolved source columns"
    );

    // 2) Type each cell by its field kind
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); layout.len()];
    for record in rdr.records() {
        let record = record?;
        for (col, &(field, idx)) in columns.iter_mut().zip(layout.iter()) {
            col.push(type_cell(field.kind(), record.get(idx).unwrap_or("")));
        }
    }

    let table = Table::new(
        layout
            .iter()
            .zip(columns)
            .map(|(&(field, _), values)| Series::new(field, values))
            .collect(),
    );
    info!(rows = table.num_rows(), columns = table.num_columns(), "loaded registry");
    Ok(table)
}

fn type_cell(kind: Kind, raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Missing;
    }
    let parsed = match kind {
        Kind::Text => None,
        Kind::Integer => parse_int(raw).map(Value::Int),
        Kind::Float => parse_float(raw).map(Value::Float),
        Kind::Flag => match clean_str(raw).to_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
    };
    parsed.unwrap_or_else(|| Value::Text(raw.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const HEADER: &str = "gid,nom,acc,acc_etg,acc_lib,adr_num,adr_voie,appartenan,date_insta,dermnt,disp_compl,disp_h,disp_j,dtpr_bat,dtpr_lcad,dtpr_lcped,lat_coor1,lc_ped,long_coor1,num_serie,ref,tel1";

    pub(crate) fn write_csv(rows: &[&str]) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "{}", HEADER)?;
        for row in rows {
            writeln!(tmp, "{}", row)?;
        }
        tmp.flush()?;
        Ok(tmp)
    }

    #[test]
    fn loads_allow_list_with_display_names() -> Result<()> {
        let tmp = write_csv(&[
            "1,Mairie,intérieur,0,true,12,Rue de la Paix,Ville,2019-01-02,2022-05-06,,8h-18h,lundi,2025-01-01,,,43.61,false,3.87,ab12,M. X,04 67 00 00 00",
        ])?;
        let table = load_formatted_data(tmp.path())?;

        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.num_columns(), SOURCE_FIELDS.len());
        // gid is not allow-listed
        assert_eq!(table.fields(), SOURCE_FIELDS.to_vec());
        assert_eq!(table.series(Field::Floor).unwrap().values, vec![Value::Int(0)]);
        assert_eq!(table.series(Field::FreeAccess).unwrap().values, vec![Value::Bool(true)]);
        assert_eq!(table.series(Field::Latitude).unwrap().values, vec![Value::Float(43.61)]);
        assert_eq!(
            table.series(Field::InstallDate).unwrap().values,
            vec![Value::Text("2019-01-02".into())]
        );
        assert_eq!(table.series(Field::OccasionalClosure).unwrap().values, vec![Value::Missing]);
        Ok(())
    }

    #[test]
    fn unparseable_numbers_stay_text() -> Result<()> {
        let tmp = write_csv(&[
            "1,A,ext,rdc,oui,,Rue,V,,,,,,,,,nord,non,x,s,r,t",
        ])?;
        let table = load_formatted_data(tmp.path())?;
        assert_eq!(table.series(Field::Floor).unwrap().values, vec![Value::Text("rdc".into())]);
        assert_eq!(table.series(Field::Latitude).unwrap().values, vec![Value::Text("nord".into())]);
        assert_eq!(table.series(Field::FreeAccess).unwrap().values, vec![Value::Text("oui".into())]);
        assert_eq!(table.series(Field::AddressNumber).unwrap().values, vec![Value::Missing]);
        Ok(())
    }

    #[test]
    fn missing_column_is_schema_error() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "nom,acc")?;
        writeln!(tmp, "A,int")?;
        tmp.flush()?;
        match load_formatted_data(tmp.path()) {
            Err(PipelineError::Schema { column }) => assert_eq!(column, "acc_etg"),
            other => panic!("expected schema error, got {:?}", other),
        }
        Ok(())
    }
}
