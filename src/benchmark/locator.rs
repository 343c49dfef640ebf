//! Executable resolution
//!
//! The runner only asks "where is `gzip`?". [`PathLocator`] answers from the
//! executable search path; tests substitute a mock or a locator over a
//! directory of fake tools.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_PATHEXT;

/// Resolves a command name to an executable
#[cfg_attr(test, mockall::automock)]
pub trait ToolLocator: Send + Sync {
    /// Full path of the executable for `command`, if one is installed
    fn locate(&self, command: &str) -> Option<PathBuf>;
}

/// Boolean view of a [`ToolLocator`]
pub trait ToolLocatorExt {
    fn is_available(&self, command: &str) -> bool;
}

impl<T: ToolLocator + ?Sized> ToolLocatorExt for T {
    fn is_available(&self, command: &str) -> bool {
        self.locate(command).is_some()
    }
}

/// Searches an ordered list of directories, like the shell does with `PATH`
#[derive(Debug, Clone)]
pub struct PathLocator {
    dirs: Vec<PathBuf>,
    suffixes: Vec<String>,
}

impl PathLocator {
    /// Search the given directories only
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            suffixes: platform_suffixes(env::var_os("PATHEXT")),
        }
    }

    /// Search the directories listed in the `PATH` environment variable
    pub fn from_env() -> Self {
        let dirs = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self::new(dirs)
    }

    fn candidates<'a>(&'a self, dir: &'a Path, command: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        std::iter::once(dir.join(command)).chain(
            self.suffixes
                .iter()
                .map(move |suffix| dir.join(format!("{}{}", command, suffix))),
        )
    }
}

impl ToolLocator for PathLocator {
    fn locate(&self, command: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| self.candidates(dir, command))
            .find(|candidate| is_executable(candidate))
    }
}

/// Extra file name suffixes that make a file executable on this platform
fn platform_suffixes(pathext: Option<OsString>) -> Vec<String> {
    if !cfg!(windows) {
        return Vec::new();
    }
    let raw = pathext
        .and_then(|v| v.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PATHEXT.to_string());
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
        .collect()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
