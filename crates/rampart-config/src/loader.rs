//! Layer discovery and the load pipeline.
//!
//! Layers, lowest first: the embedded defaults, `/etc/rampart/config.toml`,
//! the user file, then an explicit file. The merged tree then receives the
//! `RAMPART_*` fallbacks, is deserialized into [`Config`] and validated.
//! The system and user files are optional; an explicit file is not.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, merge_layer, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

const DEFAULTS_TOML: &str = include_str!("defaults.toml");

const SYSTEM_CONFIG_PATH: &str = "/etc/rampart/config.toml";

/// Largest config file accepted, in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

struct LayerPaths<'a> {
    system: &'a Path,
    user: &'a Path,
    explicit: Option<&'a Path>,
}

/// Load the layered configuration.
///
/// `config_file` must exist when given. `rampart_home_override` replaces
/// `~/.rampart` as the directory holding the user layer.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a file is unreadable or malformed, the
/// explicit file is missing, or the merged configuration is invalid.
pub fn load(
    config_file: Option<&Path>,
    rampart_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let home = match rampart_home_override {
        Some(home) => home.to_path_buf(),
        None => home_directory()?.join(".rampart"),
    };

    load_layers(
        &LayerPaths {
            system: Path::new(SYSTEM_CONFIG_PATH),
            user: &home.join("config.toml"),
            explicit: config_file,
        },
        &collect_env_vars(),
    )
}

fn load_layers(
    paths: &LayerPaths<'_>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged = parse("<embedded defaults>", DEFAULTS_TOML)?;
    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    let optional = [
        (paths.system, ConfigLayer::System),
        (paths.user, ConfigLayer::User),
    ];
    let explicit = paths
        .explicit
        .map(|path| (path, ConfigLayer::File(path.to_path_buf())));

    for (path, layer) in optional.into_iter().chain(explicit) {
        let overlay = match read_layer(path)? {
            Some(overlay) => overlay,
            None if matches!(layer, ConfigLayer::File(_)) => return Err(not_found(path)),
            None => continue,
        };
        merge_layer(&mut merged, &overlay, "", &layer, &mut field_sources);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), layer = %layer, "loaded config layer");
    }

    let applied = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if applied > 0 {
        debug!(count = applied, "applied environment fallbacks");
    }

    let config = deserialize("<merged config>", merged)?;
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load and validate a single file, ignoring every other layer.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is missing, unreadable, malformed
/// or invalid.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let value = read_layer(path)?.ok_or_else(|| not_found(path))?;
    let config = deserialize(&path.display().to_string(), value)?;
    validate::validate(&config)?;
    Ok(config)
}

/// Read one layer file. A missing file is `Ok(None)`.
fn read_layer(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let read_err = |source| ConfigError::ReadError {
        path: path.display().to_string(),
        source,
    };

    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file");
            return Ok(None);
        },
        Err(e) => return Err(read_err(e)),
    };

    // one byte past the cap is enough to tell an oversized file apart
    let mut content = String::new();
    file.take(MAX_CONFIG_FILE_SIZE.saturating_add(1))
        .read_to_string(&mut content)
        .map_err(read_err)?;
    if u64::try_from(content.len()).unwrap_or(u64::MAX) > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!("config file exceeds {MAX_CONFIG_FILE_SIZE} bytes"),
        });
    }

    parse(&path.display().to_string(), &content).map(Some)
}

fn parse(origin: &str, content: &str) -> ConfigResult<toml::Value> {
    toml::from_str(content).map_err(|source| ConfigError::ParseError {
        path: origin.to_owned(),
        source,
    })
}

fn deserialize(origin: &str, value: toml::Value) -> ConfigResult<Config> {
    value
        .try_into()
        .map_err(|source| ConfigError::ParseError {
            path: origin.to_owned(),
            source,
        })
}

fn not_found(path: &Path) -> ConfigError {
    ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }
}

fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}
