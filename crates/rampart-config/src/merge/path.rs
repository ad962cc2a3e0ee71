/// Navigate into a nested `toml::Value` by dotted path segments.
#[cfg(test)]
pub(crate) fn get_nested<'a>(val: &'a toml::Value, path: &[&str]) -> Option<&'a toml::Value> {
    let mut current = val;
    for segment in path {
        current = current.as_table()?.get(*segment)?;
    }
    Some(current)
}

/// Set a value at a nested path, creating intermediate tables as needed.
///
/// Returns `false` if an intermediate segment exists but is not a table.
pub(crate) fn set_nested(val: &mut toml::Value, path: &[&str], new_val: toml::Value) -> bool {
    let Some((leaf, parents)) = path.split_last() else {
        return false;
    };

    let mut current = val;
    for segment in parents {
        let Some(table) = current.as_table_mut() else {
            return false;
        };
        current = table
            .entry((*segment).to_owned())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    }

    match current.as_table_mut() {
        Some(table) => {
            table.insert((*leaf).to_owned(), new_val);
            true
        },
        None => false,
    }
}
