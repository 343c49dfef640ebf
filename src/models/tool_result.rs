//! Per-tool result rows

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::benchmark::tools::ToolId;
use crate::constants::statuses;

/// Why a tool was not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The tool's executable is not on the search path
    NotInstalled,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInstalled => "not_installed",
        }
    }
}

/// Whether a produced artifact made it into the output directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// Still only inside the scratch directory
    Pending,
    /// Copied into the output directory
    Promoted { path: PathBuf },
    /// The copy failed; the compression result itself is still valid
    NotPromoted { message: String },
}

/// Outcome of benchmarking one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all_fields = "camelCase")]
pub enum ToolResult {
    #[serde(rename = "skipped")]
    Skipped { tool: ToolId, reason: SkipReason },

    #[serde(rename = "error")]
    Failed {
        tool: ToolId,
        level: Option<u32>,
        exit_code: Option<i32>,
        elapsed_ns: Option<u64>,
        message: String,
    },

    #[serde(rename = "ok")]
    Succeeded {
        tool: ToolId,
        level: u32,
        src_size: u64,
        dst_size: u64,
        /// Fraction of the source saved, `1 - dst/src`
        ratio: f64,
        elapsed_ns: u64,
        /// Where the tool wrote its output (inside the scratch directory)
        out_path: PathBuf,
        artifact: ArtifactStatus,
    },
}

impl ToolResult {
    /// Create a skipped result for a tool that is not installed
    pub fn not_installed(tool: ToolId) -> Self {
        Self::Skipped {
            tool,
            reason: SkipReason::NotInstalled,
        }
    }

    /// Create a failed result
    pub fn failed(tool: ToolId, level: Option<u32>, message: impl Into<String>) -> Self {
        Self::Failed {
            tool,
            level,
            exit_code: None,
            elapsed_ns: None,
            message: message.into(),
        }
    }

    pub fn tool(&self) -> ToolId {
        match self {
            Self::Skipped { tool, .. } | Self::Failed { tool, .. } | Self::Succeeded { tool, .. } => {
                *tool
            }
        }
    }

    /// Status string as written to the CSV log
    pub fn status(&self) -> &'static str {
        match self {
            Self::Skipped { .. } => statuses::SKIPPED,
            Self::Failed { .. } => statuses::ERROR,
            Self::Succeeded { .. } => statuses::OK,
        }
    }

    pub fn level(&self) -> Option<u32> {
        match self {
            Self::Skipped { .. } => None,
            Self::Failed { level, .. } => *level,
            Self::Succeeded { level, .. } => Some(*level),
        }
    }

    pub fn elapsed_ns(&self) -> Option<u64> {
        match self {
            Self::Skipped { .. } => None,
            Self::Failed { elapsed_ns, .. } => *elapsed_ns,
            Self::Succeeded { elapsed_ns, .. } => Some(*elapsed_ns),
        }
    }

    /// Elapsed wall clock time in milliseconds
    pub fn elapsed_ms(&self) -> Option<f64> {
        self.elapsed_ns().map(ns_to_ms)
    }

    /// Only meaningful for succeeded rows
    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::Succeeded { ratio, .. } => Some(*ratio),
            _ => None,
        }
    }

    pub fn sizes(&self) -> Option<(u64, u64)> {
        match self {
            Self::Succeeded {
                src_size, dst_size, ..
            } => Some((*src_size, *dst_size)),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Path of the promoted artifact, if the copy succeeded
    pub fn artifact_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Succeeded {
                artifact: ArtifactStatus::Promoted { path },
                ..
            } => Some(path),
            _ => None,
        }
    }
}

/// Fraction of the source saved by compression. Zero for an empty source.
pub fn compute_ratio(src_size: u64, dst_size: u64) -> f64 {
    if src_size == 0 {
        return 0.0;
    }
    1.0 - (dst_size as f64 / src_size as f64)
}

pub fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / 1_000_000.0
}
