//! Shared configuration loader for iitech.
//!
//! `defaults/iitech.default.toml` is embedded into the binary so the documented defaults and
//! runtime behavior stay in sync. The CLI layers a user file and flag overrides on top via
//! [`Loader`] before deserializing into [`IitechConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use iitech_engine::RenderOptions;
use iitech_template::TemplateLayout;
use serde::Deserialize;
use std::path::Path;
use url::Url;

const DEFAULT_TOML: &str = include_str!("../defaults/iitech.default.toml");

/// Top-level configuration consumed by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct IitechConfig {
    pub render: RenderConfig,
    pub template: TemplateLayout,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Empty disables resolution of relative sources.
    pub server_root: String,
}

impl RenderConfig {
    pub fn render_options(&self) -> Result<RenderOptions, url::ParseError> {
        let root = self.server_root.trim();
        if root.is_empty() {
            return Ok(RenderOptions::default());
        }
        Ok(RenderOptions::with_server_root(Url::parse(root)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub level: String,
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

    /// Apply a single key/value override, e.g. `render.server_root` from a flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<IitechConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<IitechConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.template, TemplateLayout::default());
        assert_eq!(config.logging.level, "warn");
        let options = config.render.render_options().expect("default root to parse");
        assert_eq!(
            options.resolve("images/a.jpg"),
            "https://ismailiinsight.org/images/a.jpg"
        );
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("render.server_root", "https://example.org/news/")
            .expect("override to apply")
            .set_override("template.article", "story")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.template.article, "story");
        assert_eq!(config.template.title, "article-title");
        let options = config.render.render_options().unwrap();
        assert_eq!(options.resolve("a.pdf"), "https://example.org/news/a.pdf");
    }

    #[test]
    fn empty_server_root_disables_resolution() {
        let config = Loader::new()
            .set_override("render.server_root", "")
            .unwrap()
            .build()
            .unwrap();
        let options = config.render.render_options().unwrap();
        assert_eq!(options.resolve("images/a.jpg"), "images/a.jpg");
    }

    #[test]
    fn invalid_server_root_is_reported() {
        let config = Loader::new()
            .set_override("render.server_root", "not a url")
            .unwrap()
            .build()
            .unwrap();
        assert!(config.render.render_options().is_err());
    }

    #[test]
    fn user_file_is_layered_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();
        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.template, TemplateLayout::default());
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/definitely/not/here.toml").build();
        assert!(result.is_err());
    }
}
