// src/dataset/xlsx.rs

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::Timelike;
use std::path::Path;
use tracing::{debug, info};

use super::{from_rows, AddressTable, SchemaVariant};
use crate::error::{LookupError, Result};

/// Read the variant's sheet of the workbook at `path` into a table.
///
/// The first row of the sheet is the header. Any failure to open the file or
/// to find the sheet/address column is reported as `DatasetUnavailable`.
pub fn load(path: impl AsRef<Path>, variant: &SchemaVariant) -> Result<AddressTable> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e| LookupError::dataset_unavailable(path, e))?;

    if !workbook.sheet_names().iter().any(|s| s == &variant.sheet) {
        return Err(LookupError::dataset_unavailable(
            path,
            format!("sheet '{}' not found", variant.sheet),
        ));
    }
    let range = workbook
        .worksheet_range(&variant.sheet)
        .map_err(|e| LookupError::dataset_unavailable(path, e))?;

    // calamine trims leading empty columns; pad them back so positions
    // line up with the sheet's column letters
    let pad = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let mut rows = range.rows().map(|cells| {
        std::iter::repeat(String::new())
            .take(pad)
            .chain(cells.iter().map(cell_text))
            .collect::<Vec<String>>()
    });

    let header = rows.next().ok_or_else(|| {
        LookupError::dataset_unavailable(path, format!("sheet '{}' is empty", variant.sheet))
    })?;
    debug!(path = %path.display(), ?header, "read header");

    let table = from_rows(header, rows, variant).map_err(|e| match e {
        LookupError::DatasetUnavailable { reason, .. } => {
            LookupError::dataset_unavailable(path, reason)
        }
        other => other,
    })?;

    info!(path = %path.display(), rows = table.len(), "dataset loaded");
    Ok(table)
}

/// Render one cell the way it is shown to users.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if ts.num_seconds_from_midnight() == 0 => ts.format("%Y-%m-%d").to_string(),
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => float_text(dt.as_f64()),
        },
        Data::Error(e) => e.to_string(),
    }
}

/// Integral floats lose the fractional part, so IDs stored as numbers
/// print as `120`, not `120.0`.
fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
