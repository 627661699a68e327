pub mod format;
pub mod matcher;

pub use format::format_record;
pub use matcher::matches;

use crate::dataset::{AddressTable, SchemaVariant};
use crate::error::Result;

/// Match `query` and format every hit, in table order. An empty vector means
/// nothing matched; a record that cannot be printed keeps its slot as an
/// `Err` so the caller can report it and still send the rest.
pub fn answer_query(table: &AddressTable, variant: &SchemaVariant, query: &str) -> Vec<Result<String>> {
    matches(table, query)
        .into_iter()
        .map(|record| format_record(record, variant))
        .collect()
}
