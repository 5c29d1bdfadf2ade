//! Identifier construction shared by readers and writers.

/// Name (and OID) of the 1-based record sequence column.
pub const RECORD_SEQUENCE: &str = "ITEMGROUPDATASEQ";

/// Label emitted for the synthesized record sequence column.
pub const RECORD_ID_LABEL: &str = "Record identifier";

/// Join a prefix and a name with a dot, skipping an empty prefix.
///
/// Used for both item group keys (`IG.DM`) and item OIDs (`IT.USUBJID`).
///
/// ```
/// use dsjson_model::join_prefixed;
///
/// assert_eq!(join_prefixed("", "DM"), "DM");
/// assert_eq!(join_prefixed("IG", "DM"), "IG.DM");
/// ```
pub fn join_prefixed(prefix: &str, name: &str) -> String {
    [prefix, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}
