use toml::{Table, Value};

/// Deep-merge `overlay` into `base` in place.
/// If both sides have a Table for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn merge_into(base: &mut Table, overlay: Table) {
    for (key, overlay_val) in overlay {
        match overlay_val {
            Value::Table(overlay_tbl) if base.get(&key).is_some_and(Value::is_table) => {
                if let Some(Value::Table(base_tbl)) = base.get_mut(&key) {
                    merge_into(base_tbl, overlay_tbl);
                }
            }
            overlay_val => {
                base.insert(key, overlay_val);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(toml_str: &str) -> Table {
        toml_str.parse::<Table>().unwrap()
    }

    fn merged(mut base: Table, overlay: Table) -> Table {
        merge_into(&mut base, overlay);
        base
    }

    #[test]
    fn disjoint_keys_merge() {
        let m = merged(table(r#"name = "Alice""#), table("number = 2"));
        assert_eq!(m["name"].as_str().unwrap(), "Alice");
        assert_eq!(m["number"].as_integer().unwrap(), 2);
    }

    #[test]
    fn same_scalar_key_overlay_wins() {
        let m = merged(table("number = 1"), table("number = 2"));
        assert_eq!(m["number"].as_integer().unwrap(), 2);
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let m = merged(table("numbers = [1, 2, 3]"), table("numbers = [4]"));
        assert_eq!(m["numbers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn nested_tables_recurse() {
        let base = table(
            r#"
            [foo]
            numbers = [1, 2]
            name = "keep"
            "#,
        );
        let overlay = table(
            r#"
            [foo]
            numbers = [3]
            "#,
        );
        let m = merged(base, overlay);
        let foo = m["foo"].as_table().unwrap();
        assert_eq!(foo["name"].as_str().unwrap(), "keep");
        assert_eq!(foo["numbers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn overlay_scalar_replaces_table() {
        let m = merged(table("[foo]\nx = 1\n"), table(r#"foo = "flat""#));
        assert_eq!(m["foo"].as_str().unwrap(), "flat");
    }

    #[test]
    fn empty_overlay_keeps_base() {
        let base = table("number = 8080");
        assert_eq!(merged(base.clone(), Table::new()), base);
    }
}
