use std::fmt::Write as _;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};
use crate::types::Config;

/// A loaded configuration together with where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The effective configuration.
    pub config: Config,
    /// Layer that set each dotted field.
    pub field_sources: FieldSources,
    /// Files that were read, in load order.
    pub loaded_files: Vec<String>,
}

/// Output format for [`ResolvedConfig::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowFormat {
    /// TOML with a trailing comment block listing field sources.
    #[default]
    Toml,
    /// Pretty-printed JSON of the configuration only.
    Json,
}

impl ResolvedConfig {
    /// Layer that set `field` (dotted path, e.g. `"backup.scope_symlinks"`).
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<&ConfigLayer> {
        self.field_sources.get(field)
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RenderError`] if serialization fails.
    pub fn render(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Json => serde_json::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::RenderError(e.to_string())),
            ShowFormat::Toml => {
                let mut out = toml::to_string_pretty(&self.config)
                    .map_err(|e| ConfigError::RenderError(e.to_string()))?;

                let mut fields: Vec<_> = self.field_sources.iter().collect();
                fields.sort_by(|a, b| a.0.cmp(b.0));
                out.push_str("\n# Sources:\n");
                for (field, layer) in fields {
                    let _ = writeln!(out, "#   {field} = {layer}");
                }
                Ok(out)
            },
        }
    }
}
