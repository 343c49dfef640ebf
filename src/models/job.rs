//! Job request and job result models

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::benchmark::tools::ToolId;

use super::ToolResult;

/// A single benchmark job as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// File to compress. Never modified.
    pub input_path: PathBuf,
    /// Directory receiving the compressed artifacts (created if absent)
    pub output_dir: PathBuf,
    /// Tool identifiers in run order; unknown ones are dropped, duplicates kept
    pub tools: Vec<String>,
    /// Requested level, clamped per tool
    pub level: i64,
}

impl JobRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        tools: &[&str],
        level: i64,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            tools: tools.iter().map(|t| t.to_string()).collect(),
            level,
        }
    }

    /// Recognized tools in request order
    pub fn recognized_tools(&self) -> Vec<ToolId> {
        self.tools
            .iter()
            .filter_map(|raw| match raw.parse::<ToolId>() {
                Ok(tool) => Some(tool),
                Err(_) => {
                    tracing::debug!(tool = %raw, "Ignoring unknown tool identifier");
                    None
                }
            })
            .collect()
    }
}

/// Everything a job produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    /// One row per recognized tool, in request order
    pub rows: Vec<ToolResult>,
    /// CSV log written for this job
    pub csv_path: PathBuf,
}

impl JobResult {
    pub fn succeeded(&self) -> impl Iterator<Item = &ToolResult> {
        self.rows.iter().filter(|r| r.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_tools_filters_and_keeps_order() {
        let request = JobRequest::new(
            "in.txt",
            "out",
            &["xz", "brotli", "GZIP", "xz", "", "lz4"],
            6,
        );
        assert_eq!(
            request.recognized_tools(),
            vec![ToolId::Xz, ToolId::Gzip, ToolId::Xz, ToolId::Lz4]
        );
    }

    #[test]
    fn test_request_accepts_camel_case_json() {
        let json = r#"{
            "inputPath": "/data/GameAsset.txt",
            "outputDir": "/data/out",
            "tools": ["gzip", "zstd"],
            "level": 9
        }"#;
        let request: JobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.input_path, PathBuf::from("/data/GameAsset.txt"));
        assert_eq!(request.tools, vec!["gzip", "zstd"]);
        assert_eq!(request.level, 9);
    }

    #[test]
    fn test_result_serializes_csv_path_in_camel_case() {
        let result = JobResult {
            rows: vec![ToolResult::not_installed(ToolId::Bzip2)],
            csv_path: PathBuf::from("logs/run_1.csv"),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["csvPath"], "logs/run_1.csv");
        assert_eq!(json["rows"].as_array().unwrap().len(), 1);
        assert_eq!(result.succeeded().count(), 0);
    }
}
