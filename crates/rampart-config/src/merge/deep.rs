use super::{ConfigLayer, FieldSources};

/// Merge one layer's `overlay` into `base` and attribute what it set.
///
/// Tables merge key by key. Any other value, arrays included, replaces
/// whatever the lower layers had at that path. Every leaf the overlay
/// writes is recorded in `sources` under its dotted path; `prefix` is the
/// dotted path of `base` itself (empty at the root).
pub fn merge_layer(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(lower), toml::Value::Table(upper)) => {
            for (key, value) in upper {
                let path = dotted(prefix, key);
                match lower.get_mut(key) {
                    Some(existing) => merge_layer(existing, value, &path, layer, sources),
                    None => {
                        record_leaves(value, &path, layer, sources);
                        lower.insert(key.clone(), value.clone());
                    },
                }
            }
        },
        (slot, value) => {
            *slot = value.clone();
            record_leaves(value, prefix, layer, sources);
        },
    }
}

/// Attribute every leaf below `val` to `layer`.
pub(crate) fn record_leaves(
    val: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    match val {
        toml::Value::Table(table) => {
            for (key, child) in table {
                record_leaves(child, &dotted(prefix, key), layer, sources);
            }
        },
        _ => {
            sources.insert(prefix.to_owned(), layer.clone());
        },
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
