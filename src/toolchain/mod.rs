//! Toolchain discovery
//!
//! Two strategies locate a C# compiler: on Unix the compiler is looked up on
//! the executable search path and its output runs under the mono launcher;
//! on Windows the vendored vswhere locator finds the newest Visual Studio
//! installation and the compiler is searched for inside it. The strategy is
//! picked once at startup via [`resolver_for`] and handed to the bootstrap
//! as a [`ToolchainResolver`].

pub mod types;
pub mod windows;

pub use types::{CompilerKind, Platform, ToolchainDescriptor, ToolchainError};
pub use windows::LocatorResolver;

use crate::config::{BootstrapConfig, ToolchainConfig};
use crate::process::ProcessRunner;
use std::path::{Path, PathBuf};

/// Locates a usable compiler for one host platform.
pub trait ToolchainResolver {
    fn resolve(&self) -> Result<ToolchainDescriptor, ToolchainError>;
}

/// Build the resolver for `platform`, with relative paths anchored at `root`.
pub fn resolver_for<'a>(
    platform: Platform,
    config: &BootstrapConfig,
    root: &Path,
    runner: &'a dyn ProcessRunner,
) -> Box<dyn ToolchainResolver + 'a> {
    match platform {
        Platform::Unix => Box::new(SearchPathResolver::new(
            &config.toolchain,
            &config.project.name,
            runner,
        )),
        Platform::Windows => Box::new(LocatorResolver::new(
            &config.toolchain,
            &config.project.name,
            root,
            runner,
        )),
    }
}

/// Finds the compiler through the system's executable search (`which`).
pub struct SearchPathResolver<'a> {
    command: String,
    launch_wrapper: String,
    project: String,
    runner: &'a dyn ProcessRunner,
}

impl<'a> SearchPathResolver<'a> {
    pub fn new(config: &ToolchainConfig, project: &str, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            command: config.search_command.clone(),
            launch_wrapper: config.launch_wrapper.clone(),
            project: project.to_string(),
            runner,
        }
    }

    fn not_found(&self) -> ToolchainError {
        ToolchainError::NotFound(format!(
            "{cmd} is needed in order to bootstrap {project}! \
             Please install {cmd} before attempting to build again!",
            cmd = self.command,
            project = self.project
        ))
    }
}

impl ToolchainResolver for SearchPathResolver<'_> {
    fn resolve(&self) -> Result<ToolchainDescriptor, ToolchainError> {
        // no working `which` means we cannot find the compiler either
        let output = self
            .runner
            .run(Path::new("which"), std::slice::from_ref(&self.command))
            .map_err(|_| self.not_found())?;

        if !output.success() {
            return Err(self.not_found());
        }

        let path = first_line(&output.stdout)
            .map(PathBuf::from)
            .ok_or_else(|| self.not_found())?;

        // `which` can report stale entries; never hand out a path we cannot run
        if !is_executable(&path) {
            return Err(self.not_found());
        }

        let compiler_kind = if self.command.to_lowercase().starts_with("csc") {
            CompilerKind::Csc
        } else {
            CompilerKind::Mcs
        };

        Ok(ToolchainDescriptor::wrapped(
            compiler_kind,
            path,
            &self.launch_wrapper,
        ))
    }
}

/// First non-empty line of a process output, without line terminators.
pub(crate) fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

/// Whether `path` is a regular file the current user may execute.
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
