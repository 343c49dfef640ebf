//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// RUNNER DEFAULTS
// =============================================================================

/// Default directory (relative to the working directory) for CSV run logs
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Default per-tool timeout in seconds (0 disables the timeout)
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;

/// Default compression level when the caller does not pick one
pub const DEFAULT_LEVEL: i64 = 6;

/// Prefix of the per-job scratch directory
pub const TEMP_DIR_PREFIX: &str = "compbench-";

/// Scratch subdirectory holding the copy of the input
pub const SCRATCH_INPUT_DIR: &str = "input";

/// Scratch subdirectory holding produced artifacts until promotion
pub const SCRATCH_ARTIFACTS_DIR: &str = "artifacts";

/// Default log filter
pub const DEFAULT_RUST_LOG: &str = "info";

// =============================================================================
// CSV LOG
// =============================================================================

/// Prefix of every CSV log file name (`run_<millis>.csv`)
pub const CSV_FILE_PREFIX: &str = "run_";

/// Extension of CSV log files
pub const CSV_FILE_EXTENSION: &str = "csv";

/// Header row of the CSV log
pub const CSV_HEADER: [&str; 7] = [
    "tool",
    "level",
    "src_bytes",
    "dst_bytes",
    "ratio_saved",
    "elapsed_ms",
    "status",
];

/// How many disambiguating suffixes are tried before giving up on a log name
pub const MAX_CSV_NAME_ATTEMPTS: u32 = 1000;

// =============================================================================
// ROW STATUSES
// =============================================================================

/// Status strings written into the `status` column
pub mod statuses {
    pub const OK: &str = "ok";
    pub const ERROR: &str = "error";
    pub const SKIPPED: &str = "skipped";
}

// =============================================================================
// SUPPORTED TOOLS
// =============================================================================

/// Tool identifiers accepted in a job request
pub mod tools {
    pub const GZIP: &str = "gzip";
    pub const BZIP2: &str = "bzip2";
    pub const XZ: &str = "xz";
    pub const ZSTD: &str = "zstd";
    pub const LZ4: &str = "lz4";
}

/// Output file extensions for each tool
pub mod file_extensions {
    pub const GZIP: &str = "gz";
    pub const BZIP2: &str = "bz2";
    pub const XZ: &str = "xz";
    pub const ZSTD: &str = "zst";
    pub const LZ4: &str = "lz4";
}

// =============================================================================
// EXECUTABLE RESOLUTION
// =============================================================================

/// Suffixes tried on Windows when `PATHEXT` is not set
pub const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";
