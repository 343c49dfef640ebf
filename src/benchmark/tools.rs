//! Compression tool table
//!
//! Every tool-specific detail (command name, level range, flags, output
//! extension) lives in [`ToolSpec`], looked up through [`ToolId::spec`]. The
//! invocation step and the artifact lookup both go through this table.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{file_extensions, tools};

/// Supported compression tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    Gzip,
    Bzip2,
    Xz,
    Zstd,
    Lz4,
}

/// Static description of how to drive one tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    /// Executable name looked up on the search path
    pub command: &'static str,
    /// Extension (without the dot) appended to the input file name
    pub extension: &'static str,
    pub min_level: u32,
    pub max_level: u32,
    /// Flags placed before the level flag
    pub flags: &'static [&'static str],
}

const GZIP: ToolSpec = ToolSpec {
    command: tools::GZIP,
    extension: file_extensions::GZIP,
    min_level: 1,
    max_level: 9,
    flags: &["-k"],
};

const BZIP2: ToolSpec = ToolSpec {
    command: tools::BZIP2,
    extension: file_extensions::BZIP2,
    min_level: 1,
    max_level: 9,
    flags: &["-k"],
};

const XZ: ToolSpec = ToolSpec {
    command: tools::XZ,
    extension: file_extensions::XZ,
    min_level: 0,
    max_level: 9,
    flags: &["-k"],
};

// Levels above 19 need --ultra
const ZSTD: ToolSpec = ToolSpec {
    command: tools::ZSTD,
    extension: file_extensions::ZSTD,
    min_level: 1,
    max_level: 19,
    flags: &["-k", "-q"],
};

// -m makes lz4 derive the output name even when stdout is not a terminal
const LZ4: ToolSpec = ToolSpec {
    command: tools::LZ4,
    extension: file_extensions::LZ4,
    min_level: 1,
    max_level: 12,
    flags: &["-k", "-m"],
};

impl ToolId {
    /// All tools, in default benchmark order
    pub const ALL: [ToolId; 5] = [
        ToolId::Gzip,
        ToolId::Bzip2,
        ToolId::Xz,
        ToolId::Zstd,
        ToolId::Lz4,
    ];

    pub fn spec(&self) -> &'static ToolSpec {
        match self {
            Self::Gzip => &GZIP,
            Self::Bzip2 => &BZIP2,
            Self::Xz => &XZ,
            Self::Zstd => &ZSTD,
            Self::Lz4 => &LZ4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.spec().command
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a tool identifier is not one of the supported tools
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolId {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == normalized)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

impl ToolSpec {
    /// Clamp a requested level into this tool's accepted range
    pub fn clamp_level(&self, requested: i64) -> u32 {
        requested.clamp(self.min_level as i64, self.max_level as i64) as u32
    }

    /// Argument list for compressing `file` at an already clamped `level`
    pub fn args(&self, level: u32, file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.flags.iter().map(|f| OsString::from(*f)).collect();
        args.push(format!("-{}", level).into());
        args.push(file.as_os_str().to_owned());
        args
    }

    /// Where the tool writes its output for `file`
    pub fn output_path(&self, file: &Path) -> PathBuf {
        let mut name = file.as_os_str().to_owned();
        name.push(".");
        name.push(self.extension);
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_ids() {
        assert_eq!("gzip".parse::<ToolId>().unwrap(), ToolId::Gzip);
        assert_eq!(" Zstd ".parse::<ToolId>().unwrap(), ToolId::Zstd);
        assert_eq!(
            "brotli".parse::<ToolId>().unwrap_err(),
            UnknownTool("brotli".to_string())
        );
    }

    #[test]
    fn test_extensions_are_distinct() {
        let mut exts: Vec<_> = ToolId::ALL.iter().map(|t| t.spec().extension).collect();
        exts.sort();
        exts.dedup();
        assert_eq!(exts, vec!["bz2", "gz", "lz4", "xz", "zst"]);
    }

    #[test]
    fn test_clamp_level() {
        assert_eq!(ToolId::Bzip2.spec().clamp_level(12), 9);
        assert_eq!(ToolId::Gzip.spec().clamp_level(0), 1);
        assert_eq!(ToolId::Gzip.spec().clamp_level(-4), 1);
        assert_eq!(ToolId::Xz.spec().clamp_level(0), 0);
        assert_eq!(ToolId::Zstd.spec().clamp_level(22), 19);
        assert_eq!(ToolId::Lz4.spec().clamp_level(i64::MAX), 12);
        assert_eq!(ToolId::Gzip.spec().clamp_level(6), 6);
    }

    #[test]
    fn test_args() {
        let file = Path::new("/tmp/job/data.txt");
        let args = ToolId::Bzip2.spec().args(9, file);
        assert_eq!(
            args,
            vec![
                OsString::from("-k"),
                OsString::from("-9"),
                OsString::from("/tmp/job/data.txt"),
            ]
        );

        let args = ToolId::Lz4.spec().args(3, file);
        assert_eq!(args[1], OsString::from("-m"));
        assert_eq!(args[2], OsString::from("-3"));
    }

    #[test]
    fn test_output_path_appends_extension() {
        let file = Path::new("/tmp/job/archive.tar");
        assert_eq!(
            ToolId::Zstd.spec().output_path(file),
            PathBuf::from("/tmp/job/archive.tar.zst")
        );
        assert_eq!(
            ToolId::Gzip.spec().output_path(Path::new("noext")),
            PathBuf::from("noext.gz")
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ToolId::Bzip2).unwrap(), "\"bzip2\"");
        let parsed: ToolId = serde_json::from_str("\"lz4\"").unwrap();
        assert_eq!(parsed, ToolId::Lz4);
    }
}
