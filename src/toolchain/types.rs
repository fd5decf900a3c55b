use std::path::{Path, PathBuf};

/// Host platform family, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Native toolchain found through the vendored installation locator.
    Windows,
    /// Compiler found on the executable search path; binaries need a launcher.
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Supported C# compilers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerKind {
    /// Mono C# compiler (mcs)
    Mcs,
    /// Roslyn compiler shipped with Visual Studio / MSBuild (csc.exe)
    Csc,
}

impl CompilerKind {
    /// Argument asking the compiler for its version banner.
    pub fn version_flag(&self) -> &'static str {
        match self {
            CompilerKind::Mcs => "--version",
            CompilerKind::Csc => "-version",
        }
    }
}

/// A located compiler and how to run what it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    pub compiler_kind: CompilerKind,

    /// Absolute path to the compiler executable
    pub executable_path: PathBuf,

    /// Launcher needed to execute produced binaries (e.g. `mono`), if any
    pub launch_wrapper: Option<String>,
}

impl ToolchainDescriptor {
    pub fn native(compiler_kind: CompilerKind, executable_path: PathBuf) -> Self {
        Self {
            compiler_kind,
            executable_path,
            launch_wrapper: None,
        }
    }

    pub fn wrapped(compiler_kind: CompilerKind, executable_path: PathBuf, wrapper: &str) -> Self {
        Self {
            compiler_kind,
            executable_path,
            launch_wrapper: Some(wrapper.to_string()),
        }
    }

    pub fn needs_launch_wrapper(&self) -> bool {
        self.launch_wrapper.is_some()
    }

    /// Program and arguments that start `artifact` on this toolchain's platform.
    pub fn launch_command(&self, artifact: &Path) -> (PathBuf, Vec<String>) {
        match &self.launch_wrapper {
            Some(wrapper) => (
                PathBuf::from(wrapper),
                vec![artifact.to_string_lossy().to_string()],
            ),
            None => (artifact.to_path_buf(), Vec::new()),
        }
    }
}

/// Error type for toolchain operations
#[derive(Debug)]
pub enum ToolchainError {
    /// No usable compiler; carries the install instruction shown to the user
    NotFound(String),
    /// The installation locator could not be run
    Locator(String),
    /// IO error
    Io(std::io::Error),
}

impl std::fmt::Display for ToolchainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolchainError::NotFound(msg) => write!(f, "Toolchain not found: {}", msg),
            ToolchainError::Locator(msg) => write!(f, "Toolchain locator failed: {}", msg),
            ToolchainError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ToolchainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolchainError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ToolchainError {
    fn from(e: std::io::Error) -> Self {
        ToolchainError::Io(e)
    }
}
