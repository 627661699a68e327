use crate::dataset::{canonicalize, AddressRecord, AddressTable};

/// All records whose canonical address contains `query`, in table order.
///
/// The query is canonicalized here too, so passing it upper-cased or not
/// gives the same result. Plain substring containment: no tokenizing and no
/// word boundaries, "ЛЕНИНА" also hits "ЛЕНИНАБАД".
pub fn matches<'a>(table: &'a AddressTable, query: &str) -> Vec<&'a AddressRecord> {
    let needle = canonicalize(query);
    table
        .iter()
        .filter(|r| !r.address.is_empty() && r.address.contains(&needle))
        .collect()
}
