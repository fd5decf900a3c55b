mod clean;
mod core;
mod invoke;
mod request;
mod sources;

pub use clean::remove_artifact;
pub use core::{Bootstrap, BootstrapError, BootstrapOptions, BootstrapOutcome, Stage};
pub use invoke::{CompilationInvoker, CompilationResult, command_line, compiler_args};
pub use request::CompilationRequest;
pub use sources::collect_sources;
