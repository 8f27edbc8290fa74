// src/process/sanitize.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::date_parser::parse_date;
use super::schema::{Field, DATE_FIELDS, FLAG_FIELDS};
use super::table::{Series, Table, Value};
use super::utils::{digits_only, parse_float, parse_int, parse_yes_no};
use crate::config::SanitizeConfig;

/// Closure notes that are really a maintenance schedule.
static MAINTENANCE_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(maintenance|entretien)").expect("maintenance pattern should parse"));

/// A hyphen with whitespace on at least one side; `saint-jean` does not match.
static HYPHEN_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-\s*|\s*-\s+").expect("hyphen pattern should parse"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").expect("word pattern should parse"));

const WEEKDAYS: &[[&str; 2]] = &[
    ["lundi", "monday"],
    ["mardi", "tuesday"],
    ["mercredi", "wednesday"],
    ["jeudi", "thursday"],
    ["vendredi", "friday"],
    ["samedi", "saturday"],
    ["dimanche", "sunday"],
];

/// Bring every column of `table` to its canonical representation.
///
/// Never fails: malformed cells become [`Value::Missing`]. The only rows
/// removed are duplicates and rows whose last maintenance is a sentinel
/// such as `tous les ans`.
#[tracing::instrument(level = "info", skip_all, fields(rows = table.num_rows()))]
pub fn sanitize_data(table: Table, cfg: &SanitizeConfig) -> Table {
    let rows_in = table.num_rows();

    let table = table.drop_duplicates();
    let table = fill_missing(table);
    let table = table.map_all(blank_placeholders);
    let table = table.map_all(lowercase_text);
    let table = table.map_series(Field::OccasionalClosure, clear_maintenance_notes);
    let table = drop_maintenance_sentinels(table, &cfg.maintenance_sentinels);
    let table = DATE_FIELDS
        .iter()
        .fold(table, |t, &field| t.map_series(field, parse_dates));
    let table = table.map_series(Field::Floor, |s| {
        label_ground_floor(s, &cfg.ground_floor_label)
    });
    let table = table.map_series(Field::Name, normalize_name_separator);
    let table = FLAG_FIELDS
        .iter()
        .fold(table, |t, &field| t.map_series(field, tri_state));
    let table = coordinates(table, cfg.longitude_from_latitude);
    let table = table.map_series(Field::Phone, |s| normalize_phones(s, cfg.phone_digits));
    let table = table.map_series(Field::AvailableDays, |s| {
        label_all_days(s, &cfg.all_days_label)
    });
    let table = table.map_series(Field::SerialNumber, uppercase_text);
    let table = table.drop_duplicates();

    info!(rows_in, rows_out = table.num_rows(), "sanitized");
    table
}

/// Boolean columns get `false` for missing cells; other columns keep the missing marker.
///
/// The yes/no flag columns are tri-state and keep their missing cells. On a
/// freshly loaded registry those flags are the only boolean columns, so this
/// pass only changes tables that carry other boolean-typed columns.
pub fn fill_missing(table: Table) -> Table {
    table.map_all(|s| {
        if s.is_boolean() && !FLAG_FIELDS.contains(&s.field) {
            s.map(|v| if v.is_missing() { Value::Bool(false) } else { v })
        } else {
            s
        }
    })
}

/// `"-"` and whitespace-only cells become missing.
pub fn blank_placeholders(series: Series) -> Series {
    series.map(|v| match v {
        Value::Text(t) if t.trim() == "-" || t.trim().is_empty() => Value::Missing,
        v => v,
    })
}

pub fn lowercase_text(series: Series) -> Series {
    series.map(|v| match v {
        Value::Text(t) => Value::Text(t.to_lowercase()),
        v => v,
    })
}

pub fn uppercase_text(series: Series) -> Series {
    series.map(|v| match v {
        Value::Text(t) => Value::Text(t.to_uppercase()),
        v => v,
    })
}

pub fn clear_maintenance_notes(series: Series) -> Series {
    series.map(|v| match v {
        Value::Text(t) if MAINTENANCE_NOTE.is_match(&t.to_lowercase()) => Value::Missing,
        v => v,
    })
}

/// Remove rows whose last-maintenance cell is one of `sentinels`.
pub fn drop_maintenance_sentinels(table: Table, sentinels: &[String]) -> Table {
    if !table.contains(Field::LastMaintenance) {
        return table;
    }
    let sentinels: HashSet<String> = sentinels.iter().map(|s| s.trim().to_lowercase()).collect();
    let keep: Vec<bool> = table
        .series(Field::LastMaintenance)
        .map(|series| {
            series
                .values
                .iter()
                .map(|v| match v {
                    Value::Text(t) => !sentinels.contains(&t.trim().to_lowercase()),
                    _ => true,
                })
                .collect()
        })
        .unwrap_or_default();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        warn!(dropped, "dropping rows with a non-date last maintenance");
    }
    table.retain_rows(&keep)
}

/// Parse free-text dates; unparseable cells become missing.
pub fn parse_dates(series: Series) -> Series {
    let field = series.field;
    let mut rejected = 0usize;
    let out = series.map(|v| match v {
        Value::Text(t) => match parse_date(&t) {
            Some(d) => Value::Date(d),
            None => {
                rejected += 1;
                Value::Missing
            }
        },
        Value::Date(d) => Value::Date(d),
        Value::Missing => Value::Missing,
        _ => {
            rejected += 1;
            Value::Missing
        }
    });
    if rejected > 0 {
        debug!(column = field.display_name(), rejected, "unparseable dates cleared");
    }
    out
}

/// Floor `0` becomes `label`; every other floor is kept as text.
pub fn label_ground_floor(series: Series, label: &str) -> Series {
    series.map(|v| match v {
        Value::Int(0) => Value::Text(label.to_string()),
        Value::Int(n) => Value::Text(n.to_string()),
        Value::Text(t) if parse_int(&t) == Some(0) || same_label(&t, label) => {
            Value::Text(label.to_string())
        }
        v => v,
    })
}

/// A label that went through the lowercase pass still counts as the label.
fn same_label(text: &str, label: &str) -> bool {
    text.trim().to_lowercase() == label.trim().to_lowercase()
}

pub fn normalize_name_separator(series: Series) -> Series {
    series.map(|v| match v {
        Value::Text(t) => Value::Text(HYPHEN_SEPARATOR.replace_all(&t, " - ").into_owned()),
        v => v,
    })
}

/// Yes/no tokens to booleans; anything unrecognised is unknown.
pub fn tri_state(series: Series) -> Series {
    series.map(|v| match v {
        Value::Bool(b) => Value::Bool(b),
        Value::Text(t) => parse_yes_no(&t).map_or(Value::Missing, Value::Bool),
        Value::Int(0) => Value::Bool(false),
        Value::Int(1) => Value::Bool(true),
        _ => Value::Missing,
    })
}

pub fn to_float(series: Series) -> Series {
    series.map(|v| match v {
        Value::Float(f) => Value::Float(f),
        Value::Int(i) => Value::Float(i as f64),
        Value::Text(t) => parse_float(&t).map_or(Value::Missing, Value::Float),
        _ => Value::Missing,
    })
}

/// Coerce both coordinates to floats.
///
/// With `longitude_from_latitude`, longitude is overwritten by latitude, as
/// in the historical export.
pub fn coordinates(table: Table, longitude_from_latitude: bool) -> Table {
    let table = table
        .map_series(Field::Latitude, to_float)
        .map_series(Field::Longitude, to_float);
    if !longitude_from_latitude {
        return table;
    }
    let latitudes = table.series(Field::Latitude).map(|s| s.values.clone());
    match latitudes {
        Some(latitudes) => table.map_series(Field::Longitude, |s| Series::new(s.field, latitudes)),
        None => table,
    }
}

/// Normalize a phone number to its national form, `None` if it has the wrong length.
pub fn normalize_phone(raw: &str, digits: usize) -> Option<String> {
    let all = digits_only(raw);
    let national = if all.len() > digits {
        match all.strip_prefix("0033").or_else(|| all.strip_prefix("33")) {
            Some(rest) if rest.starts_with('0') => rest.to_string(),
            Some(rest) => format!("0{}", rest),
            None => all,
        }
    } else {
        all
    };
    (national.len() == digits).then_some(national)
}

pub fn normalize_phones(series: Series, digits: usize) -> Series {
    series.map(|v| {
        let raw = match &v {
            Value::Text(t) => t.clone(),
            Value::Int(i) => i.to_string(),
            _ => return Value::Missing,
        };
        normalize_phone(&raw, digits).map_or(Value::Missing, Value::Text)
    })
}

/// True when `raw` lists each of the seven weekdays and nothing else.
pub fn names_every_day(raw: &str) -> bool {
    let mut seen = [false; 7];
    for word in WORD.find_iter(raw) {
        let word = word.as_str().to_lowercase();
        match WEEKDAYS.iter().position(|names| names.contains(&word.as_str())) {
            Some(idx) => seen[idx] = true,
            None if word == "et" || word == "and" => {}
            None => return false,
        }
    }
    seen.iter().all(|s| *s)
}

pub fn label_all_days(series: Series, label: &str) -> Series {
    series.map(|v| match v {
        Value::Text(t) if names_every_day(&t) || same_label(&t, label) => {
            Value::Text(label.to_string())
        }
        v => v,
    })
}
