//! CompBench - Compression Tool Benchmarking
//!
//! Runs external compression tools (gzip, bzip2, xz, zstd, lz4) against a
//! file, measures wall clock time and size reduction for each one, and logs
//! the results to CSV.
//!
//! # Architecture
//!
//! - **Models**: job requests and result rows exchanged with callers
//! - **Benchmark**: tool table, executable lookup, job runner, CSV log
//! - **Utils**: formatting helpers for human-readable output
//!
//! Each job is independent: it receives a complete [`JobRequest`] and returns
//! a complete [`JobResult`]. Only the CSV log and the promoted artifacts
//! outlive the call.

pub mod benchmark;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use benchmark::{BenchmarkRunner, run_benchmark_job};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{JobRequest, JobResult, ToolResult};
