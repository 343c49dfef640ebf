//! CSV run logs
//!
//! One file per job, `run_<epoch millis>.csv`, never overwriting an existing
//! log. Absent values are written as empty cells.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{
    constants::{CSV_FILE_EXTENSION, CSV_FILE_PREFIX, CSV_HEADER, MAX_CSV_NAME_ATTEMPTS},
    error::{AppError, AppResult, IoResultExt},
    models::ToolResult,
};

/// Write `rows` to a fresh log file in `logs_dir` and return its path
pub async fn write_csv_log(logs_dir: &Path, rows: &[ToolResult]) -> AppResult<PathBuf> {
    let logs_dir = logs_dir.to_path_buf();
    let records: Vec<[String; 7]> = rows.iter().map(format_row).collect();

    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&logs_dir)
            .io_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

        let (path, file) = create_log_file(&logs_dir, Utc::now().timestamp_millis())?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADER)?;
        for record in &records {
            writer.write_record(record)?;
        }
        writer
            .flush()
            .io_context(|| format!("Failed to flush {}", path.display()))?;

        tracing::debug!(path = %path.display(), rows = records.len(), "Wrote CSV log");
        Ok::<_, AppError>(path)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV writer task failed: {}", e)))?
}

/// Create `run_<millis>.csv`, or `run_<millis>_<n>.csv` when that name is taken
fn create_log_file(logs_dir: &Path, millis: i64) -> AppResult<(PathBuf, File)> {
    for attempt in 0..MAX_CSV_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{}{}.{}", CSV_FILE_PREFIX, millis, CSV_FILE_EXTENSION)
        } else {
            format!("{}{}_{}.{}", CSV_FILE_PREFIX, millis, attempt, CSV_FILE_EXTENSION)
        };
        let path = logs_dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(AppError::io(
                    format!("Failed to create {}", path.display()),
                    e,
                ));
            }
        }
    }

    Err(AppError::io(
        format!("No free log file name in {}", logs_dir.display()),
        ErrorKind::AlreadyExists.into(),
    ))
}

/// CSV cells for one row, in header order
pub fn format_row(row: &ToolResult) -> [String; 7] {
    let (src, dst) = match row.sizes() {
        Some((src, dst)) => (src.to_string(), dst.to_string()),
        None => (String::new(), String::new()),
    };

    [
        row.tool().to_string(),
        row.level().map(|l| l.to_string()).unwrap_or_default(),
        src,
        dst,
        format_finite(row.ratio(), 4),
        format_finite(row.elapsed_ms(), 3),
        row.status().to_string(),
    ]
}

/// Fixed decimals, or an empty cell for absent and non-finite values
fn format_finite(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::tools::ToolId;
    use crate::models::ArtifactStatus;

    fn succeeded() -> ToolResult {
        ToolResult::Succeeded {
            tool: ToolId::Gzip,
            level: 6,
            src_size: 1000,
            dst_size: 333,
            ratio: 0.667,
            elapsed_ns: 12_345_678,
            out_path: PathBuf::from("/tmp/x/data.txt.gz"),
            artifact: ArtifactStatus::Pending,
        }
    }

    #[test]
    fn test_format_succeeded_row() {
        assert_eq!(
            format_row(&succeeded()),
            ["gzip", "6", "1000", "333", "0.6670", "12.346", "ok"].map(String::from)
        );
    }

    #[test]
    fn test_format_skipped_row_has_empty_cells() {
        assert_eq!(
            format_row(&ToolResult::not_installed(ToolId::Zstd)),
            ["zstd", "", "", "", "", "", "skipped"].map(String::from)
        );
    }

    #[test]
    fn test_format_failed_row() {
        let row = ToolResult::Failed {
            tool: ToolId::Bzip2,
            level: Some(9),
            exit_code: Some(2),
            elapsed_ns: Some(500_000),
            message: "Process exited with code 2".to_string(),
        };
        assert_eq!(
            format_row(&row),
            ["bzip2", "9", "", "", "", "0.500", "error"].map(String::from)
        );
    }

    #[test]
    fn test_non_finite_values_render_empty() {
        assert_eq!(format_finite(Some(f64::NAN), 4), "");
        assert_eq!(format_finite(Some(f64::INFINITY), 3), "");
        assert_eq!(format_finite(None, 3), "");
        assert_eq!(format_finite(Some(0.0), 4), "0.0000");
    }

    #[test]
    fn test_create_log_file_disambiguates() {
        let dir = tempfile::tempdir().unwrap();
        let (first, _) = create_log_file(dir.path(), 1_700_000_000_000).unwrap();
        let (second, _) = create_log_file(dir.path(), 1_700_000_000_000).unwrap();
        assert_eq!(first.file_name().unwrap(), "run_1700000000000.csv");
        assert_eq!(second.file_name().unwrap(), "run_1700000000000_1.csv");
    }

    #[tokio::test]
    async fn test_write_csv_log() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let rows = vec![succeeded(), ToolResult::not_installed(ToolId::Lz4)];

        let path = write_csv_log(&logs, &rows).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();

        assert_eq!(
            lines,
            vec![
                "tool,level,src_bytes,dst_bytes,ratio_saved,elapsed_ms,status",
                "gzip,6,1000,333,0.6670,12.346,ok",
                "lz4,,,,,,skipped",
            ]
        );
        assert!(!content.contains("null"));
        assert!(!content.contains("NaN"));
    }

    #[tokio::test]
    async fn test_repeated_logs_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![ToolResult::not_installed(ToolId::Xz)];

        let first = write_csv_log(dir.path(), &rows).await.unwrap();
        let first_content = std::fs::read_to_string(&first).unwrap();
        let second = write_csv_log(dir.path(), &[]).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), first_content);
        assert_eq!(
            std::fs::read_to_string(&second).unwrap().lines().count(),
            1
        );
    }
}
