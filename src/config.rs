//! Bootstrap configuration (`bootstrap.toml`).
//!
//! The file is optional. Every field defaults to sprove's own layout, so a
//! checkout with no config bootstraps exactly as the project expects.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the optional config file in the bootstrap root.
pub const CONFIG_FILE: &str = "bootstrap.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ProjectConfig {
    /// Project name; also the artifact name and the prefix of the bootstrap define.
    pub name: String,
    /// Source root, relative to the bootstrap root.
    pub source_dir: String,
    pub source_suffix: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "sprove".to_string(),
            source_dir: "Source/sprove".to_string(),
            source_suffix: ".cs".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Reserved define marking a bootstrap build, e.g. `SPROVE_BOOTSTRAP`.
    pub fn bootstrap_define(&self) -> String {
        format!("{}_BOOTSTRAP", self.name.to_uppercase().replace('-', "_"))
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    Exe,
    Library,
}

impl TargetKind {
    pub fn extension(&self) -> &'static str {
        match self {
            TargetKind::Exe => ".exe",
            TargetKind::Library => ".dll",
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct BuildConfig {
    /// Extra defines, passed after the reserved bootstrap define.
    pub defines: Vec<String>,
    pub references: Vec<String>,
    pub target: TargetKind,
    pub warning_level: Option<u8>,
    pub warnings_as_errors: bool,
    pub debug_info: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ToolchainConfig {
    /// Compiler looked up on the executable search path (Unix).
    pub search_command: String,
    /// Runtime launcher needed to run binaries built by `search_command`.
    pub launch_wrapper: String,
    /// Vendored installation locator (Windows), relative to the bootstrap root.
    pub locator: String,
    /// Minimum installation version accepted from the locator.
    pub min_version: String,
    /// Human readable product matching `min_version`, used in error messages.
    pub min_product: String,
    /// Directory under the installation path that holds the compiler.
    pub compiler_dir: String,
    pub compiler_suffix: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            search_command: "mcs".to_string(),
            launch_wrapper: "mono".to_string(),
            locator: "Source/Vendor/vswhere/vswhere.exe".to_string(),
            min_version: "15.0".to_string(),
            min_product: "Visual Studio 2017".to_string(),
            compiler_dir: "MSBuild".to_string(),
            compiler_suffix: "csc.exe".to_string(),
        }
    }
}

impl BootstrapConfig {
    /// Parse and validate a config document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: BootstrapConfig =
            toml::from_str(contents).context("Failed to parse bootstrap config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            bail!("[project] name must not be empty");
        }
        if self.project.source_suffix.is_empty() {
            bail!("[project] source_suffix must not be empty");
        }
        if let Some(level) = self.build.warning_level
            && level > 4
        {
            bail!("[build] warning_level must be between 0 and 4, got {}", level);
        }
        Ok(())
    }
}

/// Load `path` if it exists, otherwise fall back to the built-in defaults.
pub fn load_config(path: &Path) -> Result<BootstrapConfig> {
    if !path.exists() {
        return Ok(BootstrapConfig::default());
    }
    load_config_file(path)
}

/// Load a config file the user named explicitly. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<BootstrapConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    BootstrapConfig::from_toml(&contents).with_context(|| format!("Invalid {}", path.display()))
}
