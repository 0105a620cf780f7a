//! Filesystem port for manifest I/O.

use std::path::Path;

use crate::error::PortError;

/// Reads and writes manifests.
///
/// Abstracting the filesystem lets a whole run be exercised in memory.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Overwrites a file with `contents`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;
}
