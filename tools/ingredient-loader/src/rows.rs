//! Two-column `name,measurement_unit` input.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Trim};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRow {
    pub name: String,
    pub measurement_unit: String,
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

/// Parse every non-blank record. Quoted fields may contain commas and `""`
/// escapes. Line numbers in errors are 1-based.
pub fn parse_rows(input: &str) -> Result<Vec<IngredientRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed csv")?;
        // Whitespace-only lines.
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = line_of(&record);
        let (Some(name), Some(unit), None) = (record.get(0), record.get(1), record.get(2)) else {
            bail!("line {line}: expected `name,measurement_unit`");
        };
        if name.is_empty() || unit.is_empty() {
            bail!("line {line}: empty name or measurement unit");
        }
        rows.push(IngredientRow {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        });
    }
    Ok(rows)
}
