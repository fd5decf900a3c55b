//! Windows toolchain discovery using the vendored vswhere locator
//!
//! Not gated on `cfg(windows)`: the strategy only talks to the filesystem and
//! the [`ProcessRunner`] port, so it is exercised on every host.

use super::types::{CompilerKind, ToolchainDescriptor, ToolchainError};
use super::{ToolchainResolver, first_line};
use crate::config::ToolchainConfig;
use crate::process::ProcessRunner;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolves `csc.exe` inside the newest Visual Studio installation reported by vswhere.
pub struct LocatorResolver<'a> {
    locator: PathBuf,
    min_version: String,
    min_product: String,
    compiler_dir: String,
    compiler_suffix: String,
    project: String,
    runner: &'a dyn ProcessRunner,
}

impl<'a> LocatorResolver<'a> {
    pub fn new(
        config: &ToolchainConfig,
        project: &str,
        root: &Path,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            locator: root.join(&config.locator),
            min_version: config.min_version.clone(),
            min_product: config.min_product.clone(),
            compiler_dir: config.compiler_dir.clone(),
            compiler_suffix: config.compiler_suffix.clone(),
            project: project.to_string(),
            runner,
        }
    }

    /// Arguments asking vswhere for the install path of the latest matching product.
    pub fn locator_args(&self) -> Vec<String> {
        [
            "-legacy",
            "-latest",
            "-utf8",
            "-nologo",
            "-version",
            self.min_version.as_str(),
            "-property",
            "installationPath",
            "-format",
            "value",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn not_found(&self) -> ToolchainError {
        ToolchainError::NotFound(format!(
            "At least {product} is required in order to bootstrap {project}! \
             Please install at least {product} before attempting to build again!",
            product = self.min_product,
            project = self.project
        ))
    }

    /// Query vswhere for the installation path. `None` when nothing matched.
    fn installation_path(&self) -> Result<Option<PathBuf>, ToolchainError> {
        if !self.locator.is_file() {
            return Err(ToolchainError::NotFound(format!(
                "vswhere.exe not found at {}",
                self.locator.display()
            )));
        }

        let output = self.runner.run(&self.locator, &self.locator_args())?;

        // vswhere exits 0 even when nothing matched; a failure exit means bad arguments
        if !output.success() {
            return Err(ToolchainError::Locator(format!(
                "{} exited with code {}: {}",
                self.locator.display(),
                output.exit_code,
                output.stderr.trim()
            )));
        }

        Ok(first_line(&output.stdout).map(PathBuf::from))
    }
}

impl ToolchainResolver for LocatorResolver<'_> {
    fn resolve(&self) -> Result<ToolchainDescriptor, ToolchainError> {
        let install_path = self.installation_path()?.ok_or_else(|| self.not_found())?;

        let csc = find_compiler(
            &install_path.join(&self.compiler_dir),
            &self.compiler_suffix,
        )
        .ok_or_else(|| self.not_found())?;

        Ok(ToolchainDescriptor::native(CompilerKind::Csc, csc))
    }
}

/// First file under `dir` (name-sorted walk) whose file name ends with `suffix`.
pub fn find_compiler(dir: &Path, suffix: &str) -> Option<PathBuf> {
    let suffix = suffix.to_lowercase();
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .find(|e| {
            e.file_name()
                .to_string_lossy()
                .to_lowercase()
                .ends_with(&suffix)
        })
        .map(|e| e.into_path())
}
