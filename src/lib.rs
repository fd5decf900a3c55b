//! # sprove-bootstrap - Self-hosting bootstrapper for sprove
//!
//! sprove builds itself. This crate is the small first stage that makes that
//! possible: it finds a C# compiler, compiles sprove's own sources with the
//! `SPROVE_BOOTSTRAP` define, runs the resulting binary (which performs the
//! real build) and deletes the intermediate executable afterwards.
//!
//! ## Quick Start
//!
//! ```bash
//! # From the sprove checkout
//! bootstrap
//!
//! # Show the compiler command without running anything
//! bootstrap --dry-run
//! ```
//!
//! ## Module Organization
//!
//! - [`toolchain`] - Compiler discovery (mcs on the search path, csc via vswhere)
//! - [`build`] - Source collection, compiler invocation and the bootstrap sequence
//! - [`config`] - Optional `bootstrap.toml` overrides
//! - [`process`] - Child process port used by every stage

/// Bootstrap sequence: collect, compile, launch, clean up.
pub mod build;

/// Configuration file parsing (`bootstrap.toml`).
pub mod config;

/// Child process execution.
pub mod process;

/// Toolchain detection.
pub mod toolchain;
