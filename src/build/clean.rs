//! Artifact cleanup.
//!
//! The bootstrap binary is only a stepping stone: once it has run, the real
//! build has produced the final tool and the next bootstrap recompiles from
//! scratch anyway, so the artifact is always removed.

use std::fs;
use std::io;
use std::path::Path;

/// Delete the compiled bootstrap artifact. A missing artifact is an error as well;
/// the caller treats any failure as fatal.
pub fn remove_artifact(artifact: &Path) -> io::Result<()> {
    fs::remove_file(artifact)
}
