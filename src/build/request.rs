use crate::config::{BootstrapConfig, TargetKind};
use std::path::{Path, PathBuf};

/// Everything the compiler needs for one compile. Built completely up front,
/// then handed to [`super::CompilationInvoker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationRequest {
    /// Output path without extension; the extension comes from `target`.
    pub output_name: String,
    pub target: TargetKind,
    pub defines: Vec<String>,
    pub references: Vec<String>,
    pub warning_level: Option<u8>,
    pub warnings_as_errors: bool,
    pub debug_info: bool,
    pub input_files: Vec<PathBuf>,
}

impl CompilationRequest {
    pub fn new(output_name: impl Into<String>, input_files: Vec<PathBuf>) -> Self {
        Self {
            output_name: output_name.into(),
            target: TargetKind::Exe,
            defines: Vec::new(),
            references: Vec::new(),
            warning_level: None,
            warnings_as_errors: false,
            debug_info: false,
            input_files,
        }
    }

    /// The bootstrap compile of the project: reserved define first, then the configured options.
    pub fn bootstrap(config: &BootstrapConfig, root: &Path, input_files: Vec<PathBuf>) -> Self {
        let output = root.join(&config.project.name);
        let reserved = config.project.bootstrap_define();
        let mut defines = vec![reserved.clone()];
        defines.extend(
            config
                .build
                .defines
                .iter()
                .filter(|d| **d != reserved)
                .cloned(),
        );

        Self {
            output_name: output.to_string_lossy().to_string(),
            target: config.build.target,
            defines,
            references: config.build.references.clone(),
            warning_level: config.build.warning_level,
            warnings_as_errors: config.build.warnings_as_errors,
            debug_info: config.build.debug_info,
            input_files,
        }
    }

    pub fn with_defines(mut self, defines: Vec<String>) -> Self {
        self.defines = defines;
        self
    }

    pub fn with_references(mut self, references: Vec<String>) -> Self {
        self.references = references;
        self
    }

    /// File the compiler writes, e.g. `sprove.exe`.
    pub fn artifact_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.output_name, self.target.extension()))
    }
}
