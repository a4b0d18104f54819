use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::{RankedTriplet, RankingConfig, TfRegionMatrix};
use crate::pipeline::stage1_motif_ranks::LookupDiagnostics;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{Counts, InputSummary, SummaryData, TopTriplet, named_stats};

pub const RANKED_TSV: &str = "triplets_ranked.tsv";
pub const SUMMARY_JSON: &str = "summary.json";
pub const REPORT_TXT: &str = "report.txt";

const TOP_TRIPLETS: usize = 10;

const DERIVED_COLUMNS: [&str; 6] = [
    "TF_to_region",
    "TF_to_region_rank",
    "TF_to_gene_rank",
    "region_to_gene_rank",
    "combined_rank_ratio",
    "triplet_rank",
];

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub columns: &'a [String],
    pub rows: &'a [Vec<String>],
    pub ranked: &'a [RankedTriplet],
    pub matrix: &'a TfRegionMatrix,
    pub diagnostics: &'a LookupDiagnostics,
    pub n_missing_tf_region: usize,
    pub config: &'a RankingConfig,
    pub inputs: InputSummary,
    pub tool_name: String,
    pub tool_version: String,
}

pub fn write_reports(input: &Stage5Input<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    write_ranked_tsv(input, &out_dir.join(RANKED_TSV))?;

    let summary = build_summary(input);
    let json = render_summary_json(&summary)?;
    write_text(&out_dir.join(SUMMARY_JSON), &json)?;

    let report = render_report_text(&summary);
    write_text(&out_dir.join(REPORT_TXT), &report)?;

    Ok(())
}

fn write_ranked_tsv(input: &Stage5Input<'_>, path: &Path) -> std::io::Result<()> {
    if input.rows.len() != input.ranked.len() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "{} input rows but {} ranked triplets",
                input.rows.len(),
                input.ranked.len()
            ),
        ));
    }
    let mut w = BufWriter::new(File::create(path)?);

    let mut header: Vec<&str> = input.columns.iter().map(String::as_str).collect();
    header.extend(DERIVED_COLUMNS);
    writeln!(w, "{}", header.join("\t"))?;

    for (row, t) in input.rows.iter().zip(input.ranked) {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.join("\t"),
            t.tf_to_region,
            t.tf_to_region_rank,
            t.tf_to_gene_rank,
            t.region_to_gene_rank,
            t.combined_rank_ratio,
            t.triplet_rank
        )?;
    }
    w.flush()
}

pub fn build_summary(input: &Stage5Input<'_>) -> SummaryData {
    let ranked = input.ranked;
    let counts = Counts {
        n_triplets: ranked.len(),
        n_tfs: count_distinct(ranked.iter().map(|t| t.record.tf.as_str())),
        n_regions: count_distinct(ranked.iter().map(|t| t.record.region.as_str())),
        n_genes: count_distinct(ranked.iter().map(|t| t.record.gene.as_str())),
        n_matrix_regions: input.matrix.n_regions(),
        n_matrix_tfs: input.matrix.n_tfs(),
        n_missing_tf_region: input.n_missing_tf_region,
    };

    let combined: Vec<f64> = ranked.iter().map(|t| t.combined_rank_ratio).collect();

    let mut by_rank: Vec<&RankedTriplet> = ranked.iter().collect();
    by_rank.sort_by_key(|t| t.triplet_rank);
    let top_triplets = by_rank
        .into_iter()
        .take(TOP_TRIPLETS)
        .map(|t| TopTriplet {
            triplet_rank: t.triplet_rank,
            tf: t.record.tf.clone(),
            region: t.record.region.clone(),
            gene: t.record.gene.clone(),
            combined_rank_ratio: t.combined_rank_ratio,
        })
        .collect();

    SummaryData {
        tool: input.tool_name.clone(),
        tool_version: input.tool_version.clone(),
        config: input.config.clone(),
        inputs: input.inputs.clone(),
        counts,
        combined_rank_ratio: named_stats(&combined),
        lookup: input.diagnostics.clone(),
        top_triplets,
    }
}

fn count_distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<HashSet<_>>().len()
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(text.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
