//! # sprove bootstrap entry point
//!
//! Compiles sprove from its own sources with whatever C# toolchain the host
//! provides, runs the result and exits with its exit code.
//!
//! ## Exit codes
//!
//! - `0` - compiled, and the bootstrapped sprove succeeded
//! - `1` - compilation failed, or a fatal error (no toolchain, cleanup failure)
//! - anything else - passed through from the bootstrapped sprove

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io;
use std::path::PathBuf;

use sprove_bootstrap::build::{Bootstrap, BootstrapOptions};
use sprove_bootstrap::config::{self, CONFIG_FILE};
use sprove_bootstrap::process::SystemRunner;
use sprove_bootstrap::toolchain::{self, Platform};

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

// vswhere and csc are asked for UTF-8; make the console render it
#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "bootstrap")]
#[command(about = "Build sprove from source and hand over to it", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Checkout to bootstrap; every relative path and child process is anchored here
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Config file; must exist when given [default: <root>/bootstrap.toml, optional]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print every command before running it
    #[arg(short, long)]
    verbose: bool,
    /// Show the compile command without compiling or running anything
    #[arg(long)]
    dry_run: bool,
}

fn run(cli: &Cli) -> Result<i32> {
    let root = match &cli.root {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    // absolute, not canonical: `\\?\` paths confuse csc on Windows
    let root = std::path::absolute(&root)
        .with_context(|| format!("Failed to resolve {}", root.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Bootstrap root {} is not a directory", root.display());
    }

    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&root.join(CONFIG_FILE))?,
    };

    let runner = SystemRunner::in_dir(&root);
    let resolver = toolchain::resolver_for(Platform::current(), &config, &root, &runner);

    let outcome = Bootstrap::new(&config, &root, resolver.as_ref(), &runner)
        .with_options(BootstrapOptions {
            verbose: cli.verbose,
            dry_run: cli.dry_run,
        })
        .run(&mut io::stdout(), &mut io::stderr())?;

    Ok(outcome.exit_code())
}

fn main() {
    enable_windows_utf8_console();

    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "x".red(), e);
            1
        }
    };

    std::process::exit(code);
}
