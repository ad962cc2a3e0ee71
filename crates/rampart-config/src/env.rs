//! Environment variable fallbacks.
//!
//! `RAMPART_*` variables only fill fields that no config file has set: a
//! value still carrying its built-in default, or a field missing entirely.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::merge::{ConfigLayer, FieldSources, set_nested};

/// Prefix shared by every variable this crate reads.
pub const ENV_PREFIX: &str = "RAMPART_";

/// Variable name and the dotted field it backs.
pub const ENV_FALLBACKS: &[(&str, &str)] = &[
    ("RAMPART_BACKUP_SCOPE_SYMLINKS", "backup.scope_symlinks"),
    ("RAMPART_RESTORE_SCOPE_SYMLINKS", "restore.scope_symlinks"),
    ("RAMPART_LOG_LEVEL", "logging.level"),
];

/// Snapshot every `RAMPART_*` variable from the process environment.
///
/// Variables whose value is not valid unicode are skipped.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

/// Fill unset fields of `merged` from `env_vars`.
///
/// Empty values are ignored. Returns the number of fields filled.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied: usize = 0;

    for (var, field) in ENV_FALLBACKS {
        let Some(value) = env_vars.get(*var).filter(|v| !v.is_empty()) else {
            continue;
        };
        if sources
            .get(*field)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            debug!(var, field, "config file value takes precedence over environment");
            continue;
        }

        let segments: Vec<&str> = field.split('.').collect();
        if set_nested(merged, &segments, toml::Value::String(value.clone())) {
            sources.insert((*field).to_owned(), ConfigLayer::Environment);
            applied = applied.saturating_add(1);
        } else {
            warn!(var, field, "cannot apply environment fallback; parent is not a table");
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{get_nested, record_leaves};

    fn defaults() -> (toml::Value, FieldSources) {
        let val: toml::Value = toml::from_str(
            r#"
            [backup]
            one_file_system = false
            [logging]
            level = "info"
        "#,
        )
        .unwrap();
        let mut sources = FieldSources::new();
        record_leaves(&val, "", &ConfigLayer::Defaults, &mut sources);
        (val, sources)
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_fallbacks_fill_missing_and_default_fields() {
        let (mut val, mut sources) = defaults();
        let vars = env(&[
            ("RAMPART_BACKUP_SCOPE_SYMLINKS", "/srv/data"),
            ("RAMPART_LOG_LEVEL", "debug"),
        ]);

        assert_eq!(apply_env_fallbacks(&mut val, &mut sources, &vars), 2);
        assert_eq!(
            get_nested(&val, &["backup", "scope_symlinks"]).and_then(toml::Value::as_str),
            Some("/srv/data")
        );
        assert_eq!(
            get_nested(&val, &["logging", "level"]).and_then(toml::Value::as_str),
            Some("debug")
        );
        assert_eq!(sources.get("logging.level"), Some(&ConfigLayer::Environment));
    }

    #[test]
    fn test_file_values_win_over_environment() {
        let (mut val, mut sources) = defaults();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);
        let vars = env(&[("RAMPART_LOG_LEVEL", "trace")]);

        assert_eq!(apply_env_fallbacks(&mut val, &mut sources, &vars), 0);
        assert_eq!(
            get_nested(&val, &["logging", "level"]).and_then(toml::Value::as_str),
            Some("info")
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let (mut val, mut sources) = defaults();
        let vars = env(&[("RAMPART_RESTORE_SCOPE_SYMLINKS", "")]);

        assert_eq!(apply_env_fallbacks(&mut val, &mut sources, &vars), 0);
        assert!(get_nested(&val, &["restore"]).is_none());
    }
}
