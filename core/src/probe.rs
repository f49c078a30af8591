//! File-existence checks used to validate path-valued flags.

use std::collections::HashSet;
use std::path::Path;

/// Answers whether a path exists.
///
/// The parser never touches the filesystem directly; every path check goes
/// through this trait so tests can substitute a fixed set of known paths.
/// Any `Fn(&str) -> bool` closure is a probe.
pub trait FileProbe {
    /// Returns `true` if `path` names an existing file.
    fn file_exists(&self, path: &str) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileProbe for RealFileSystem {
    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }
}

/// Probe that knows a fixed set of paths.
///
/// # Examples
///
/// ```
/// use wperf_args_core::{FileProbe, KnownFiles};
///
/// let files = KnownFiles::new(["C:\\Program\\sample.exe"]);
/// assert!(files.file_exists("C:\\Program\\sample.exe"));
/// assert!(!files.file_exists("C:\\Program\\other.exe"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KnownFiles {
    paths: HashSet<String>,
}

impl KnownFiles {
    /// Creates a probe that accepts exactly `paths`.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileProbe for KnownFiles {
    fn file_exists(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

impl<F> FileProbe for F
where
    F: Fn(&str) -> bool,
{
    fn file_exists(&self, path: &str) -> bool {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.exe");
        std::fs::write(&path, b"MZ").unwrap();

        let probe = RealFileSystem;
        assert!(probe.file_exists(path.to_str().unwrap()));
        assert!(!probe.file_exists(dir.path().join("missing.exe").to_str().unwrap()));
    }

    #[test]
    fn test_closure_probe() {
        let probe = |path: &str| path.ends_with(".pdb");
        assert!(probe.file_exists("a.pdb"));
        assert!(!probe.file_exists("a.exe"));
    }
}
