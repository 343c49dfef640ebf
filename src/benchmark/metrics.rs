//! Aggregation across jobs

use std::collections::HashMap;

use crate::models::{JobResult, compute_ratio, ns_to_ms};

use super::tools::ToolId;

/// Totals for one tool over every successful run
#[derive(Debug, Clone, PartialEq)]
pub struct ToolTotals {
    pub tool: ToolId,
    pub runs: u32,
    pub total_src_bytes: u64,
    pub total_dst_bytes: u64,
    pub total_elapsed_ms: f64,
}

impl ToolTotals {
    fn empty(tool: ToolId) -> Self {
        Self {
            tool,
            runs: 0,
            total_src_bytes: 0,
            total_dst_bytes: 0,
            total_elapsed_ms: 0.0,
        }
    }

    /// No successful run at all
    pub fn is_unavailable(&self) -> bool {
        self.runs == 0
    }

    /// Fraction saved over all inputs combined
    pub fn ratio(&self) -> f64 {
        compute_ratio(self.total_src_bytes, self.total_dst_bytes)
    }
}

/// Per-tool totals, one entry per known tool in benchmark order
pub fn calculate_tool_totals(results: &[JobResult]) -> Vec<ToolTotals> {
    let mut totals: HashMap<ToolId, ToolTotals> = HashMap::new();

    for row in results.iter().flat_map(|r| r.succeeded()) {
        let Some((src, dst)) = row.sizes() else {
            continue;
        };
        let entry = totals
            .entry(row.tool())
            .or_insert_with(|| ToolTotals::empty(row.tool()));
        entry.runs += 1;
        entry.total_src_bytes += src;
        entry.total_dst_bytes += dst;
        entry.total_elapsed_ms += row.elapsed_ns().map(ns_to_ms).unwrap_or(0.0);
    }

    ToolId::ALL
        .into_iter()
        .map(|tool| totals.remove(&tool).unwrap_or_else(|| ToolTotals::empty(tool)))
        .collect()
}
