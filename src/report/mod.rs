use serde::Serialize;

use crate::model::RankingConfig;
use crate::pipeline::stage1_motif_ranks::LookupDiagnostics;

pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub triplets: String,
    pub rankings: String,
    pub motifs: String,
    pub regions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Counts {
    pub n_triplets: usize,
    pub n_tfs: usize,
    pub n_regions: usize,
    pub n_genes: usize,
    pub n_matrix_regions: usize,
    pub n_matrix_tfs: usize,
    pub n_missing_tf_region: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NamedStats {
    pub min: f64,
    pub p10: f64,
    pub median: f64,
    pub p90: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopTriplet {
    pub triplet_rank: u32,
    pub tf: String,
    pub region: String,
    pub gene: String,
    pub combined_rank_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: String,
    pub tool_version: String,
    pub config: RankingConfig,
    pub inputs: InputSummary,
    pub counts: Counts,
    pub combined_rank_ratio: NamedStats,
    pub lookup: LookupDiagnostics,
    pub top_triplets: Vec<TopTriplet>,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

pub fn p10(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.10)
}

pub fn p90(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.90)
}

pub fn named_stats(values: &[f64]) -> NamedStats {
    NamedStats {
        min: quantile_indexed(values, 0.0),
        p10: p10(values),
        median: median(values),
        p90: p90(values),
        max: quantile_indexed(values, 1.0),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
