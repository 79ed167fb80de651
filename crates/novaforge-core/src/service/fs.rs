//! FileSystem trait for abstracting file I/O.
//!
//! Defined in novaforge-core so services can read and write project bundles
//! without depending on any specific filesystem implementation. The
//! `LocalFileSystem` adapter lives in novaforge-infra.

use std::future::Future;
use std::io;
use std::path::Path;

/// Abstraction over filesystem operations.
///
/// Lets the service layer work against the real disk in production and an
/// in-memory tree in tests.
pub trait FileSystem: Send + Sync {
    /// Write string content to a file, creating parent directories as needed.
    ///
    /// Implementations must not leave a partially written file behind: a
    /// reader sees either the old content or the new content.
    fn write_file(
        &self,
        path: &Path,
        content: &str,
    ) -> impl Future<Output = Result<(), io::Error>> + Send;

    /// Read a file's content as a string.
    fn read_file(&self, path: &Path) -> impl Future<Output = Result<String, io::Error>> + Send;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> impl Future<Output = Result<(), io::Error>> + Send;

    /// Check whether a path exists.
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Check whether a path exists and is a directory.
    fn is_dir(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Names of the immediate subdirectories of `path`, in no particular order.
    fn list_dirs(&self, path: &Path) -> impl Future<Output = Result<Vec<String>, io::Error>> + Send;

    /// Remove everything inside `path`, keeping the directory itself.
    fn clear_dir(&self, path: &Path) -> impl Future<Output = Result<(), io::Error>> + Send;

    /// Recursively copy the contents of `src` into `dst`.
    fn copy_dir_contents(
        &self,
        src: &Path,
        dst: &Path,
    ) -> impl Future<Output = Result<(), io::Error>> + Send;
}
