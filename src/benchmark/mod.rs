//! Benchmark execution engine
//!
//! - `tools`: the tool table (command, levels, flags, output extension)
//! - `locator`: executable lookup on the search path
//! - `runner`: runs one job against a scratch copy of the input
//! - `report`: CSV run logs
//! - `metrics`: totals across several jobs

pub mod locator;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod tools;

pub use locator::{PathLocator, ToolLocator, ToolLocatorExt};
pub use metrics::{ToolTotals, calculate_tool_totals};
pub use runner::{BenchmarkRunner, run_benchmark_job};
pub use tools::{ToolId, ToolSpec};
