//! Benchmark runner - Orchestrates a single compression benchmark job
//!
//! A job copies the input into a private scratch directory, runs every
//! requested tool against that copy one after another, promotes the produced
//! artifacts into the output directory and writes a CSV log. A tool that is
//! missing, crashes, times out or leaves no output only affects its own row.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::fs;
use tokio::process::Command;
use tokio::time::timeout;

use crate::{
    config::{CONFIG, RunnerConfig},
    constants::{SCRATCH_ARTIFACTS_DIR, SCRATCH_INPUT_DIR, TEMP_DIR_PREFIX},
    error::{AppError, AppResult, IoResultExt},
    models::{ArtifactStatus, JobRequest, JobResult, ToolResult, compute_ratio},
};

use super::{
    locator::{PathLocator, ToolLocator},
    report,
    tools::ToolId,
};

/// Run a job with the global configuration, resolving tools from `PATH`
pub async fn run_benchmark_job(request: &JobRequest) -> AppResult<JobResult> {
    BenchmarkRunner::new(CONFIG.runner.clone(), PathLocator::from_env())
        .run_job(request)
        .await
}

/// Benchmark runner. Holds no state between jobs.
pub struct BenchmarkRunner<L: ToolLocator> {
    config: RunnerConfig,
    locator: L,
}

/// Scratch directory owned by one job
struct Workspace {
    dir: TempDir,
    /// Where the input lives inside the scratch directory
    input: PathBuf,
}

impl<L: ToolLocator> BenchmarkRunner<L> {
    /// Create a new benchmark runner
    pub fn new(config: RunnerConfig, locator: L) -> Self {
        Self { config, locator }
    }

    /// Run every recognized tool of `request` and log the results
    #[tracing::instrument(skip_all, fields(input = %request.input_path.display()))]
    pub async fn run_job(&self, request: &JobRequest) -> AppResult<JobResult> {
        let file_name = request
            .input_path
            .file_name()
            .ok_or_else(|| AppError::InputNotFound(request.input_path.clone()))?;

        match fs::metadata(&request.input_path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(AppError::InputNotFound(request.input_path.clone())),
        }

        fs::create_dir_all(&request.output_dir)
            .await
            .io_context(|| {
                format!(
                    "Failed to create output directory {}",
                    request.output_dir.display()
                )
            })?;

        let tools = request.recognized_tools();
        tracing::info!(
            tools = tools.len(),
            requested = request.tools.len(),
            level = request.level,
            "Starting benchmark job"
        );

        let workspace = self.create_workspace(&request.input_path, file_name).await?;

        let mut rows = Vec::with_capacity(tools.len());
        for (slot, tool) in tools.into_iter().enumerate() {
            let row = self
                .run_tool(tool, request.level, &request.input_path, &workspace, slot)
                .await;
            rows.push(row);
        }

        promote_artifacts(&mut rows, &request.output_dir).await;

        let csv_path = report::write_csv_log(&self.config.logs_dir, &rows).await?;
        tracing::info!(csv = %csv_path.display(), rows = rows.len(), "Benchmark job finished");

        self.release_workspace(workspace);

        Ok(JobResult { rows, csv_path })
    }

    /// Create the scratch directory and copy the input into it
    async fn create_workspace(&self, input: &Path, file_name: &OsStr) -> AppResult<Workspace> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_DIR_PREFIX);
        let dir = match &self.config.temp_root {
            Some(root) => {
                fs::create_dir_all(root)
                    .await
                    .io_context(|| format!("Failed to create temp root {}", root.display()))?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .io_context(|| "Failed to create scratch directory")?;

        // Input and artifacts live in sibling subdirectories so no input name
        // can shadow the artifact stash
        let input_dir = dir.path().join(SCRATCH_INPUT_DIR);
        fs::create_dir(&input_dir)
            .await
            .io_context(|| format!("Failed to create {}", input_dir.display()))?;

        let work_input = input_dir.join(file_name);
        fs::copy(input, &work_input).await.io_context(|| {
            format!(
                "Failed to copy {} into {}",
                input.display(),
                dir.path().display()
            )
        })?;

        tracing::debug!(
            scratch = %dir.path().display(),
            "Copied input into scratch directory"
        );

        Ok(Workspace {
            dir,
            input: work_input,
        })
    }

    fn release_workspace(&self, workspace: Workspace) {
        if self.config.keep_temp {
            let path = workspace.dir.keep();
            tracing::info!(scratch = %path.display(), "Keeping scratch directory");
        } else if let Err(e) = workspace.dir.close() {
            tracing::warn!("Failed to remove scratch directory: {}", e);
        }
    }

    /// Benchmark a single tool. Never fails; problems end up in the row.
    async fn run_tool(
        &self,
        tool: ToolId,
        requested_level: i64,
        original: &Path,
        workspace: &Workspace,
        slot: usize,
    ) -> ToolResult {
        let spec = tool.spec();
        let source = workspace.input.as_path();
        let expected_output = spec.output_path(source);

        if let Err(e) = prepare_source(original, source, &expected_output).await {
            tracing::error!(tool = %tool, "Failed to prepare scratch copy: {}", e);
            return ToolResult::failed(tool, None, e.to_string());
        }

        let Some(executable) = self.locator.locate(spec.command) else {
            tracing::info!(tool = %tool, "Tool not installed, skipping");
            return ToolResult::not_installed(tool);
        };

        let level = spec.clamp_level(requested_level);
        if level as i64 != requested_level {
            tracing::debug!(tool = %tool, requested_level, level, "Clamped compression level");
        }

        let src_size = match fs::metadata(source).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                return ToolResult::failed(
                    tool,
                    Some(level),
                    format!("Failed to stat {}: {}", source.display(), e),
                );
            }
        };

        let mut command = Command::new(&executable);
        command
            .args(spec.args(level, source))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = source.parent() {
            command.current_dir(dir);
        }

        tracing::debug!(tool = %tool, executable = %executable.display(), level, "Spawning tool");

        let start = Instant::now();
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(tool = %tool, "Failed to spawn: {}", e);
                return ToolResult::failed(
                    tool,
                    Some(level),
                    format!("Failed to spawn {}: {}", executable.display(), e),
                );
            }
        };

        let waited = match self.config.tool_timeout {
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(result) => result,
                Err(_) => {
                    let elapsed_ns = nanos(start.elapsed());
                    if let Err(e) = child.kill().await {
                        tracing::warn!(tool = %tool, "Failed to kill timed out tool: {}", e);
                    }
                    tracing::warn!(tool = %tool, limit_ms = limit.as_millis() as u64, "Tool timed out");
                    return ToolResult::Failed {
                        tool,
                        level: Some(level),
                        exit_code: None,
                        elapsed_ns: Some(elapsed_ns),
                        message: format!("timed out after {} ms", limit.as_millis()),
                    };
                }
            },
            None => child.wait().await,
        };
        let elapsed_ns = nanos(start.elapsed());

        let status = match waited {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(tool = %tool, "Failed to wait for tool: {}", e);
                return ToolResult::failed(
                    tool,
                    Some(level),
                    format!("Failed to wait for {}: {}", tool, e),
                );
            }
        };

        if !status.success() {
            let message = describe_failure(&status);
            tracing::warn!(tool = %tool, exit_code = ?status.code(), "{}", message);
            return ToolResult::Failed {
                tool,
                level: Some(level),
                exit_code: status.code(),
                elapsed_ns: Some(elapsed_ns),
                message,
            };
        }

        // A zero exit does not guarantee the output landed where we expect it
        let dst_size = match fs::metadata(&expected_output).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                let message = format!("No output at {}: {}", expected_output.display(), e);
                tracing::warn!(tool = %tool, "{}", message);
                return ToolResult::Failed {
                    tool,
                    level: Some(level),
                    exit_code: status.code(),
                    elapsed_ns: Some(elapsed_ns),
                    message,
                };
            }
        };

        let out_path = match stash_output(&expected_output, workspace.dir.path(), slot).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(tool = %tool, "{}", e);
                return ToolResult::Failed {
                    tool,
                    level: Some(level),
                    exit_code: status.code(),
                    elapsed_ns: Some(elapsed_ns),
                    message: e.to_string(),
                };
            }
        };

        let ratio = compute_ratio(src_size, dst_size);
        tracing::info!(
            tool = %tool,
            level,
            src_size,
            dst_size,
            ratio,
            elapsed_ms = elapsed_ns as f64 / 1_000_000.0,
            "Tool finished"
        );

        ToolResult::Succeeded {
            tool,
            level,
            src_size,
            dst_size,
            ratio,
            elapsed_ns,
            out_path,
            artifact: ArtifactStatus::Pending,
        }
    }
}

/// Clean-slate precondition before each tool: no stale output, and the
/// scratch copy of the input still present (restored from the original if a
/// previous tool removed it).
async fn prepare_source(original: &Path, source: &Path, expected_output: &Path) -> AppResult<()> {
    match fs::remove_file(expected_output).await {
        Ok(()) => tracing::debug!(path = %expected_output.display(), "Removed stale output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(AppError::io(
                format!("Failed to remove stale output {}", expected_output.display()),
                e,
            ));
        }
    }

    if fs::metadata(source).await.is_err() {
        tracing::warn!(path = %source.display(), "Scratch copy missing, restoring it");
        fs::copy(original, source)
            .await
            .io_context(|| format!("Failed to restore scratch copy {}", source.display()))?;
    }

    Ok(())
}

/// Move a produced artifact out of the way so later tools cannot clobber it
/// before promotion. The file name is preserved.
async fn stash_output(output: &Path, scratch: &Path, slot: usize) -> AppResult<PathBuf> {
    let file_name = output
        .file_name()
        .ok_or_else(|| AppError::InvalidInput(format!("No file name in {}", output.display())))?;
    let dir = scratch.join(SCRATCH_ARTIFACTS_DIR).join(slot.to_string());
    fs::create_dir_all(&dir)
        .await
        .io_context(|| format!("Failed to create {}", dir.display()))?;
    let stashed = dir.join(file_name);
    fs::rename(output, &stashed)
        .await
        .io_context(|| format!("Failed to move {}", output.display()))?;
    Ok(stashed)
}

/// Copy every successful artifact into the output directory. A failed copy
/// is recorded on the row and does not change its status.
async fn promote_artifacts(rows: &mut [ToolResult], output_dir: &Path) {
    for row in rows.iter_mut() {
        let ToolResult::Succeeded {
            tool,
            out_path,
            artifact,
            ..
        } = row
        else {
            continue;
        };

        let Some(file_name) = out_path.file_name() else {
            *artifact = ArtifactStatus::NotPromoted {
                message: format!("No file name in {}", out_path.display()),
            };
            continue;
        };
        let dest = output_dir.join(file_name);

        *artifact = match fs::copy(&*out_path, &dest).await {
            Ok(_) => {
                tracing::debug!(tool = %tool, dest = %dest.display(), "Promoted artifact");
                ArtifactStatus::Promoted { path: dest }
            }
            Err(e) => {
                tracing::warn!(tool = %tool, dest = %dest.display(), "Failed to promote artifact: {}", e);
                ArtifactStatus::NotPromoted {
                    message: format!("Failed to copy to {}: {}", dest.display(), e),
                }
            }
        };
    }
}

fn describe_failure(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("Process exited with code {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Killed by signal {}", signal);
        }
    }

    "Process terminated abnormally".to_string()
}

fn nanos(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
