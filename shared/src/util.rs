/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Strip the `mesa-` prefix from a table id, yielding the bare map key.
///
/// Ticket rows store `"mesa-32"`; the table map and the counts endpoint
/// key on `"32"`. Ids without the prefix pass through unchanged.
pub fn table_map_key(table_id: &str) -> &str {
    table_id.strip_prefix("mesa-").unwrap_or(table_id)
}

/// Normalize a table id to the prefixed storage form (`"32"` → `"mesa-32"`).
///
/// The no-table marker `"sin-mesa"` is preserved as-is.
pub fn table_storage_id(table_id: &str) -> String {
    if table_id == "sin-mesa" || table_id.starts_with("mesa-") {
        table_id.to_string()
    } else {
        format!("mesa-{table_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_map_key() {
        assert_eq!(table_map_key("mesa-32"), "32");
        assert_eq!(table_map_key("32"), "32");
        assert_eq!(table_map_key("sin-mesa"), "sin-mesa");
    }

    #[test]
    fn test_table_storage_id() {
        assert_eq!(table_storage_id("32"), "mesa-32");
        assert_eq!(table_storage_id("mesa-32"), "mesa-32");
        assert_eq!(table_storage_id("sin-mesa"), "sin-mesa");
    }
}
