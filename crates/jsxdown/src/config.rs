//! Configuration file loading (jsxdown.toml).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use jsxdown_component::BuildOptions;
use jsxdown_markdown::RenderOptions;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub markdown: MarkdownSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct BuildSettings {
    #[serde(default = "default_framework_import")]
    pub framework_import: String,
    #[serde(default = "default_root_element")]
    pub root_element: String,
    /// Extension of components written by directory builds
    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct MarkdownSettings {
    #[serde(default = "default_true")]
    pub highlight: bool,
    pub fallback_language: Option<String>,
    /// Makes generated component identifiers reproducible
    pub seed: Option<u64>,
}

fn default_framework_import() -> String {
    BuildOptions::default().framework_import
}
fn default_root_element() -> String {
    BuildOptions::default().root_element
}
fn default_extension() -> String {
    "js".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            framework_import: default_framework_import(),
            root_element: default_root_element(),
            extension: default_extension(),
        }
    }
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            highlight: true,
            fallback_language: None,
            seed: None,
        }
    }
}

impl ConfigFile {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            framework_import: self.build.framework_import.clone(),
            root_element: self.build.root_element.clone(),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            highlight: self.markdown.highlight,
            fallback_language: self.markdown.fallback_language.clone(),
            seed: self.markdown.seed,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
