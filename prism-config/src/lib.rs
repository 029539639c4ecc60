//! Shared configuration loader for the prism playground.
//!
//! `defaults/prism.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files
//! and CLI overrides on top of those defaults via [`Loader`] before
//! deserializing into [`PrismConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/prism.default.toml");

/// Top-level configuration consumed by prism applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PrismConfig {
    pub format: FormatOptions,
    pub engine: EngineConfig,
}

/// Immutable snapshot of the knobs handed to the formatting engine.
///
/// Equality is structural: the preview controller treats any field change as
/// an invalidation of every cached view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Maximum rendered line width.
    pub max_line_length: usize,
    /// Spaces per indentation level.
    pub indent_size: usize,
    /// Collapse runs of markup spaces into one.
    pub collapse_markup_spaces: bool,
    /// Sort the items of import lists.
    pub reorder_import_items: bool,
    /// Re-wrap prose to the line width.
    pub wrap_text: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            max_line_length: 80,
            indent_size: 2,
            collapse_markup_spaces: false,
            reorder_import_items: false,
            wrap_text: false,
        }
    }
}

impl FormatOptions {
    /// Width knobs must be positive for the engine contract to hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_length == 0 {
            return Err(ConfigError::Message(
                "format.max_line_length must be positive".to_string(),
            ));
        }
        if self.indent_size == 0 {
            return Err(ConfigError::Message(
                "format.indent_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// External formatter process used by the playground binary.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Executable to invoke; empty means "not configured".
    pub command: String,
    /// Fixed arguments placed before the generated ones.
    pub args: Vec<String>,
}

impl EngineConfig {
    /// Whether an engine command has been supplied.
    pub fn is_configured(&self) -> bool {
        !self.command.is_empty()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the configuration.
    pub fn build(self) -> Result<PrismConfig, ConfigError> {
        let config: PrismConfig = self.builder.build()?.try_deserialize()?;
        config.format.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PrismConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.format, FormatOptions::default());
        assert!(!config.engine.is_configured());
        assert!(config.engine.args.is_empty());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("format.indent_size", 4)
            .expect("override to apply")
            .set_override("engine.command", "fmt-engine")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.format.indent_size, 4);
        assert!(config.engine.is_configured());
    }

    #[test]
    fn rejects_zero_width_knobs() {
        let result = Loader::new()
            .set_override("format.max_line_length", 0)
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn structural_equality_detects_any_field_change() {
        let base = FormatOptions::default();
        let mut changed = base.clone();
        changed.wrap_text = true;
        assert_ne!(base, changed);
        assert_eq!(base, FormatOptions::default());
    }
}
