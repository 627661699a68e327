// src/dataset/mod.rs

pub mod schema;
pub mod xlsx;

pub use schema::{FieldSpec, SchemaVariant};
pub use xlsx::{cell_text, load};

use std::collections::HashSet;

use crate::error::{LookupError, Result};

/// One row of the nodes file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    /// Canonical (upper-cased) address, the match key.
    pub address: String,
    /// Every cell of the row in column order, address column included.
    pub fields: Vec<String>,
}

impl AddressRecord {
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

/// The dataset as loaded from one sheet, rows in file order.
#[derive(Debug, Clone, Default)]
pub struct AddressTable {
    pub header: Vec<String>,
    pub address_index: usize,
    pub records: Vec<AddressRecord>,
}

impl AddressTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressRecord> {
        self.records.iter()
    }
}

/// The canonical form addresses are stored and compared in.
pub fn canonicalize(s: &str) -> String {
    s.to_uppercase()
}

/// Build a table from an already-rendered header and data rows.
///
/// Fails when the header lacks the variant's address column or has it at a
/// different position than the template prints it. Rows whose cells are all
/// empty are dropped.
pub fn from_rows<I>(header: Vec<String>, rows: I, variant: &SchemaVariant) -> Result<AddressTable>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let address_index = header
        .iter()
        .position(|h| h == &variant.address_column)
        .ok_or_else(|| {
            LookupError::dataset_unavailable(
                &variant.sheet,
                format!("column '{}' not found in header", variant.address_column),
            )
        })?;

    let expected = variant.address_position();
    if address_index != expected {
        return Err(LookupError::dataset_unavailable(
            &variant.sheet,
            format!(
                "column '{}' expected at position {}, found at {}",
                variant.address_column, expected, address_index
            ),
        ));
    }

    let mut rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    normalize_addresses(&mut rows, address_index);

    let records = rows
        .into_iter()
        .map(|fields| AddressRecord {
            address: fields.get(address_index).cloned().unwrap_or_default(),
            fields,
        })
        .collect();

    Ok(AddressTable {
        header,
        address_index,
        records,
    })
}

/// Replace-by-value: every cell equal to some address value, in any column,
/// becomes that value upper-cased.
fn normalize_addresses(rows: &mut [Vec<String>], address_index: usize) {
    let addresses: HashSet<String> = rows
        .iter()
        .filter_map(|row| row.get(address_index))
        .filter(|a| !a.is_empty())
        .cloned()
        .collect();

    for cell in rows.iter_mut().flat_map(|row| row.iter_mut()) {
        if addresses.contains(cell.as_str()) {
            *cell = canonicalize(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&["Адрес", "Принадлежность", "Тип", "Район", "Допуск", "Размещение", "Контакты", "Примечания"])
    }

    #[test]
    fn test_addresses_are_canonical_after_load() {
        let rows = vec![
            row(&["ул. Мира 1", "ГТС", "ОРШ", "Центр", "свободный", "подвал", "Иванов", ""]),
            row(&["пр. Ленина 5", "ЖЭК", "ШКАФ", "Север", "по заявке", "чердак", "", "ключ у вахты"]),
        ];
        let table = from_rows(header(), rows, &SchemaVariant::legacy()).unwrap();

        assert_eq!(table.len(), 2);
        for r in table.iter() {
            assert_eq!(r.address, canonicalize(&r.address));
            assert_eq!(r.field(0), Some(r.address.as_str()));
        }
        assert_eq!(table.records[0].address, "УЛ. МИРА 1");
        assert_eq!(table.records[1].field(1), Some("ЖЭК"));
    }

    #[test]
    fn test_replace_by_value_covers_every_column() {
        let rows = vec![
            row(&["ул. Мира 1", "ГТС", "ОРШ", "Центр", "", "", "", "см. ул. Мира 1"]),
            row(&["ул. Мира 1", "ГТС", "ШКАФ", "Центр", "", "", "", "ул. Мира 1"]),
        ];
        let table = from_rows(header(), rows, &SchemaVariant::legacy()).unwrap();

        assert_eq!(table.records[0].address, table.records[1].address);
        // exact value in a non-address column is normalized too
        assert_eq!(table.records[1].field(7), Some("УЛ. МИРА 1"));
        // a cell merely containing the value is not
        assert_eq!(table.records[0].field(7), Some("см. ул. Мира 1"));
    }

    #[test]
    fn test_no_other_normalization() {
        let rows = vec![row(&["  ул. Ёлкина ", "", "", "", "", "", "", ""])];
        let table = from_rows(header(), rows, &SchemaVariant::legacy()).unwrap();
        assert_eq!(table.records[0].address, "  УЛ. ЁЛКИНА ");
    }

    #[test]
    fn test_missing_address_column() {
        let err = from_rows(row(&["Улица", "Тип"]), Vec::new(), &SchemaVariant::legacy()).unwrap_err();
        assert!(matches!(err, LookupError::DatasetUnavailable { .. }));
    }

    #[test]
    fn test_blank_rows_dropped_order_kept() {
        let rows = vec![
            row(&["в", "", "", "", "", "", "", ""]),
            row(&["", "", "", "", "", "", "", ""]),
            row(&["а", "", "", "", "", "", "", ""]),
            row(&["б", "", "", "", "", "", "", ""]),
        ];
        let table = from_rows(header(), rows, &SchemaVariant::legacy()).unwrap();
        let addresses: Vec<_> = table.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["В", "А", "Б"]);
    }

    #[test]
    fn test_address_column_found_by_name() {
        let hdr = row(&["АДРЕС", "ID"]);
        let rows = vec![row(&["пер. Тихий", "17"])];
        let mut variant = SchemaVariant::current();
        variant.fields.truncate(2);
        let table = from_rows(hdr, rows, &variant).unwrap();
        assert_eq!(table.address_index, 0);
        assert_eq!(table.records[0].address, "ПЕР. ТИХИЙ");
    }

    #[test]
    fn test_reordered_header_is_rejected() {
        let hdr = row(&["ID узла", "АДРЕС", "Принадлежность", "Тип", "Допуск", "Список", "Размещение", "Контакты", "Примечания"]);
        let rows = vec![row(&["17", "пер. Тихий", "", "", "", "", "", "", ""])];
        match from_rows(hdr, rows, &SchemaVariant::current()) {
            Err(LookupError::DatasetUnavailable { reason, .. }) => {
                assert!(reason.contains("'АДРЕС' expected at position 0"));
            }
            other => panic!("expected DatasetUnavailable, got {:?}", other),
        }
    }
}
