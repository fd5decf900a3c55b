use super::clean::remove_artifact;
use super::invoke::{CompilationInvoker, command_line};
use super::request::CompilationRequest;
use super::sources::collect_sources;
use crate::config::BootstrapConfig;
use crate::process::{ProcessRunner, display_command};
use crate::toolchain::{ToolchainError, ToolchainResolver};
use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Stage a [`BootstrapOutcome::Failure`] came from. Resolve and cleanup
/// failures are fatal and surface as [`BootstrapError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Launch,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Compile => "compile",
            Stage::Launch => "launch",
        };
        f.write_str(name)
    }
}

/// Terminal status of a run. The process exits with [`BootstrapOutcome::exit_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Success(i32),
    Failure { stage: Stage, exit_code: i32 },
}

impl BootstrapOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapOutcome::Success(code) => *code,
            BootstrapOutcome::Failure { exit_code, .. } => *exit_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BootstrapOutcome::Success(_))
    }
}

/// Fatal errors: the run stops without producing an outcome.
#[derive(Debug)]
pub enum BootstrapError {
    /// No usable compiler
    Toolchain(ToolchainError),
    /// The compiler could not be started
    Compiler(io::Error),
    /// The artifact could not be removed; a stale one would poison the next run
    Cleanup { path: PathBuf, source: io::Error },
    /// Writing status output failed
    Io(io::Error),
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::Toolchain(e) => write!(f, "{}", e),
            BootstrapError::Compiler(e) => write!(f, "Failed to execute compiler: {}", e),
            BootstrapError::Cleanup { path, source } => {
                write!(f, "Failed to remove {}: {}", path.display(), source)
            }
            BootstrapError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BootstrapError::Toolchain(e) => Some(e),
            BootstrapError::Compiler(e) | BootstrapError::Io(e) => Some(e),
            BootstrapError::Cleanup { source, .. } => Some(source),
        }
    }
}

impl From<ToolchainError> for BootstrapError {
    fn from(e: ToolchainError) -> Self {
        BootstrapError::Toolchain(e)
    }
}

impl From<io::Error> for BootstrapError {
    fn from(e: io::Error) -> Self {
        BootstrapError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Print every command line before running it
    pub verbose: bool,
    /// Resolve and print the compile command, nothing else
    pub dry_run: bool,
}

/// Resolve → collect → compile → launch → clean up.
pub struct Bootstrap<'a> {
    config: &'a BootstrapConfig,
    root: PathBuf,
    resolver: &'a dyn ToolchainResolver,
    runner: &'a dyn ProcessRunner,
    options: BootstrapOptions,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        config: &'a BootstrapConfig,
        root: &Path,
        resolver: &'a dyn ToolchainResolver,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            config,
            root: root.to_path_buf(),
            resolver,
            runner,
            options: BootstrapOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BootstrapOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(
        &self,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<BootstrapOutcome, BootstrapError> {
        let start_time = Instant::now();
        let project = &self.config.project;

        // 1. Resolve
        let toolchain = self.resolver.resolve()?;
        writeln!(
            out,
            "   {} Detected toolchain: {}",
            "🔧".cyan(),
            toolchain.executable_path.display()
        )?;

        // 2. Collect
        let source_root = self.root.join(&project.source_dir);
        let sources = collect_sources(&source_root, &project.source_suffix);
        if sources.is_empty() {
            writeln!(
                err,
                "{} No {} files found under {}",
                "!".yellow(),
                project.source_suffix,
                source_root.display()
            )?;
        } else if self.options.verbose {
            writeln!(
                out,
                "   {} {} source files under {}",
                "📄".cyan(),
                sources.len(),
                source_root.display()
            )?;
        }

        // 3. Compile
        let request = CompilationRequest::bootstrap(self.config, &self.root, sources);
        let artifact = request.artifact_path();
        let (program, launch_args) = toolchain.launch_command(&artifact);

        if self.options.dry_run {
            writeln!(out, "{}", command_line(&toolchain, &request))?;
            writeln!(out, "{}", display_command(&program, &launch_args))?;
            return Ok(BootstrapOutcome::Success(0));
        }

        writeln!(out, "   {} Compiling {}...", "⚙".cyan(), project.name)?;
        let result = CompilationInvoker::new(self.runner)
            .verbose(self.options.verbose)
            .invoke(&toolchain, &request, out, err)
            .map_err(BootstrapError::Compiler)?;

        if !result.success() {
            let _ = writeln!(err, "{} Failed to bootstrap {}", "x".red(), project.name);
            return Ok(BootstrapOutcome::Failure {
                stage: Stage::Compile,
                exit_code: 1,
            });
        }

        // From here on the artifact exists: status output is best-effort so
        // nothing can skip the cleanup below.

        // 4. Launch
        let _ = writeln!(out, "{} Running {}...\n", "▶".green(), artifact.display());
        if self.options.verbose {
            let _ = writeln!(out, "   {} {}", "$".dimmed(), display_command(&program, &launch_args));
        }
        let _ = out.flush();

        let exit_code = match self.runner.launch(&program, &launch_args) {
            Ok(code) => code,
            Err(e) => {
                let _ = writeln!(
                    err,
                    "{} Failed to launch {}: {}",
                    "x".red(),
                    program.display(),
                    e
                );
                1
            }
        };

        // 5. Cleanup, whatever the launched binary did
        remove_artifact(&artifact).map_err(|source| BootstrapError::Cleanup {
            path: artifact.clone(),
            source,
        })?;

        if exit_code == 0 {
            let _ = writeln!(
                out,
                "{} Bootstrap finished in {:.2?}",
                "✓".green(),
                start_time.elapsed()
            );
            Ok(BootstrapOutcome::Success(0))
        } else {
            let _ = writeln!(
                err,
                "{} {} exited with code {}",
                "x".red(),
                project.name,
                exit_code
            );
            Ok(BootstrapOutcome::Failure {
                stage: Stage::Launch,
                exit_code,
            })
        }
    }
}
