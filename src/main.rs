//! CompBench - Command line entry point
//!
//! A thin caller around the benchmark runner: builds job requests from the
//! command line, runs them one after another and prints the results.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use compbench::{
    benchmark::{
        BenchmarkRunner, PathLocator, ToolId, ToolLocator, ToolTotals, calculate_tool_totals,
    },
    config::{CONFIG, RunnerConfig, timeout_from_secs},
    models::{ArtifactStatus, JobRequest, JobResult, ToolResult},
    utils::{format_bytes, format_elapsed_ms},
};

#[derive(Parser)]
#[command(name = "compbench")]
#[command(about = "Benchmark external compression tools against a file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress one or more files with each selected tool
    Run(RunArgs),
    /// List known tools and whether they are installed
    Tools,
}

#[derive(Args)]
struct RunArgs {
    /// Input files (one job per file)
    #[arg(short, long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Directory receiving the compressed files
    #[arg(short, long)]
    output: PathBuf,

    /// Tools to run, in order (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_values = ["gzip", "bzip2", "xz", "zstd", "lz4"])]
    tools: Vec<String>,

    /// Compression level, clamped to each tool's range
    #[arg(short, long, allow_negative_numbers = true)]
    level: Option<i64>,

    /// Per-tool timeout in seconds (0 disables it)
    #[arg(long, env = "COMPBENCH_TOOL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Directory for CSV logs
    #[arg(long, env = "COMPBENCH_LOGS_DIR")]
    logs_dir: Option<PathBuf>,

    /// Keep the scratch directory of each job
    #[arg(long)]
    keep_temp: bool,

    /// Print each job result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn runner_config(&self) -> RunnerConfig {
        let mut config = CONFIG.runner.clone();
        if let Some(secs) = self.timeout_secs {
            config.tool_timeout = timeout_from_secs(secs);
        }
        if let Some(dir) = &self.logs_dir {
            config.logs_dir = dir.clone();
        }
        config.keep_temp |= self.keep_temp;
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.log.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Tools => {
            list_tools(&PathLocator::from_env());
            Ok(())
        }
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.runner_config();
    let level = args.level.unwrap_or(config.default_level);
    let runner = BenchmarkRunner::new(config, PathLocator::from_env());

    let mut results = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let request = JobRequest {
            input_path: input.clone(),
            output_dir: args.output.clone(),
            tools: args.tools.clone(),
            level,
        };

        let result = match runner.run_job(&request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(code = e.error_code(), "{}", e);
                eprintln!("{}: {}", input.display(), e);
                continue;
            }
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_job(input, &result);
        }
        results.push(result);
    }

    if !args.json && !results.is_empty() {
        print_summary(&calculate_tool_totals(&results));
    }

    if results.len() < args.inputs.len() {
        anyhow::bail!(
            "{} of {} inputs could not be benchmarked",
            args.inputs.len() - results.len(),
            args.inputs.len()
        );
    }

    Ok(())
}

fn print_job(input: &std::path::Path, result: &JobResult) {
    println!();
    println!("{}", input.display());
    println!("{}", "-".repeat(70));
    for row in &result.rows {
        println!("{}", describe_row(row));
    }
    println!("Log: {}", result.csv_path.display());
}

fn describe_row(row: &ToolResult) -> String {
    match row {
        ToolResult::Succeeded {
            tool,
            level,
            dst_size,
            ratio,
            elapsed_ns,
            artifact,
            ..
        } => {
            let mut line = format!(
                "{:>6} -{:<2} {:>12} ({:5.1}% saved) [{}]",
                tool.as_str(),
                level,
                format_bytes(*dst_size),
                ratio * 100.0,
                format_elapsed_ms(*elapsed_ns as f64 / 1_000_000.0),
            );
            if let ArtifactStatus::NotPromoted { message } = artifact {
                line.push_str(&format!(" artifact missing: {}", message));
            }
            line
        }
        ToolResult::Failed { tool, message, .. } => {
            format!("{:>6}: error: {}", tool.as_str(), message)
        }
        ToolResult::Skipped { tool, reason } => {
            format!("{:>6}: skipped ({})", tool.as_str(), reason.as_str())
        }
    }
}

fn print_summary(totals: &[ToolTotals]) {
    println!();
    println!("{}", "=".repeat(70));
    println!("SUMMARY");
    println!("{}", "=".repeat(70));
    for total in totals {
        if total.is_unavailable() {
            println!("{:>6}: not available", total.tool.as_str());
        } else {
            println!(
                "{:>6}: {:5.1}% saved over {} run(s), {} -> {}, {} total",
                total.tool.as_str(),
                total.ratio() * 100.0,
                total.runs,
                format_bytes(total.total_src_bytes),
                format_bytes(total.total_dst_bytes),
                format_elapsed_ms(total.total_elapsed_ms),
            );
        }
    }
}

fn list_tools(locator: &impl ToolLocator) {
    for tool in ToolId::ALL {
        let spec = tool.spec();
        let location = locator
            .locate(spec.command)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not installed".to_string());
        println!(
            "{:>6}  levels {}-{:<2}  .{:<3}  {}",
            tool.as_str(),
            spec.min_level,
            spec.max_level,
            spec.extension,
            location
        );
    }
}
