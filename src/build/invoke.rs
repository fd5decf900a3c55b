use super::request::CompilationRequest;
use crate::config::TargetKind;
use crate::process::{ProcessOutput, ProcessRunner, display_command};
use crate::toolchain::ToolchainDescriptor;
use colored::*;
use std::io::{self, Write};

/// Outcome of one compiler run.
pub type CompilationResult = ProcessOutput;

/// Compiler arguments for `request`, program excluded.
pub fn compiler_args(request: &CompilationRequest) -> Vec<String> {
    let mut args = Vec::with_capacity(request.input_files.len() + 6);
    args.push(format!("-out:{}", request.artifact_path().display()));

    if request.target == TargetKind::Library {
        args.push("-target:library".to_string());
    }

    // Empty lists drop the flag entirely; `-define:` with no value is an error for csc
    if !request.defines.is_empty() {
        args.push(format!("-define:{}", request.defines.join(",")));
    }
    if !request.references.is_empty() {
        args.push(format!("-reference:{}", request.references.join(",")));
    }

    if let Some(level) = request.warning_level {
        args.push(format!("-warn:{}", level));
    }
    if request.warnings_as_errors {
        args.push("-warnaserror+".to_string());
    }
    if request.debug_info {
        args.push("-debug+".to_string());
    }

    args.extend(
        request
            .input_files
            .iter()
            .map(|p| p.to_string_lossy().to_string()),
    );
    args
}

/// Full command line (program first) for display and dry runs.
pub fn command_line(descriptor: &ToolchainDescriptor, request: &CompilationRequest) -> String {
    display_command(&descriptor.executable_path, &compiler_args(request))
}

/// Runs the compiler and forwards everything it prints.
pub struct CompilationInvoker<'a> {
    runner: &'a dyn ProcessRunner,
    verbose: bool,
}

impl<'a> CompilationInvoker<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self {
            runner,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Compile `request`. A non-zero exit is returned, not raised; the compiler's
    /// version banner is appended to the diagnostics in that case. Only a failure
    /// to start the compiler is an error.
    pub fn invoke(
        &self,
        descriptor: &ToolchainDescriptor,
        request: &CompilationRequest,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<CompilationResult> {
        let args = compiler_args(request);
        if self.verbose {
            writeln!(
                out,
                "   {} {}",
                "$".dimmed(),
                display_command(&descriptor.executable_path, &args)
            )?;
        }

        let result = self.runner.run(&descriptor.executable_path, &args)?;
        // the compiler may already have written its output; a closed stream must not hide that
        let _ = forward(&result, out, err);

        if !result.success() {
            let _ = writeln!(
                err,
                "{} Compilation failed with exit code {}. Compiler version:",
                "x".red(),
                result.exit_code
            );
            let version_args = vec![descriptor.compiler_kind.version_flag().to_string()];
            // only the banner matters here, not whether the query itself succeeded
            if let Ok(banner) = self.runner.run(&descriptor.executable_path, &version_args) {
                let _ = forward(&banner, out, err);
            }
        }

        Ok(result)
    }
}

fn forward(output: &ProcessOutput, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
    write_block(out, &output.stdout)?;
    write_block(err, &output.stderr)
}

fn write_block(w: &mut dyn Write, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    w.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    w.flush()
}
