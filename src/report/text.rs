use crate::report::{SummaryData, format_f64_6};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("TF-Region-Gene Triplet Ranking Report\n");
    out.push_str("=====================================\n\n");

    out.push_str("1. Inputs\n");
    out.push_str(&format!("Triplets: {}\n", data.counts.n_triplets));
    out.push_str(&format!(
        "Distinct TFs / regions / genes: {} / {} / {}\n",
        data.counts.n_tfs, data.counts.n_regions, data.counts.n_genes
    ));
    out.push_str(&format!(
        "Motif-rank matrix: {} regions x {} TFs\n\n",
        data.counts.n_matrix_regions, data.counts.n_matrix_tfs
    ));

    out.push_str("2. Ranking\n");
    out.push_str(&format!("Tie-break seed: {}\n", data.config.seed));
    out.push_str(&format!(
        "Missing TF-to-region policy: {}\n",
        data.config.missing_tf_region.label()
    ));
    let stats = &data.combined_rank_ratio;
    out.push_str(&format!(
        "Combined rank ratio: min={} p10={} median={} p90={} max={}\n\n",
        format_f64_6(stats.min),
        format_f64_6(stats.p10),
        format_f64_6(stats.median),
        format_f64_6(stats.p90),
        format_f64_6(stats.max)
    ));

    out.push_str("3. Top triplets\n");
    for t in &data.top_triplets {
        out.push_str(&format!(
            "{:>4}  {}  {}  {}  {}\n",
            t.triplet_rank,
            t.tf,
            t.region,
            t.gene,
            format_f64_6(t.combined_rank_ratio)
        ));
    }
    out.push('\n');

    out.push_str("4. Coverage caveats\n");
    out.push_str(&coverage_statement(data));
    out.push('\n');

    out
}

fn coverage_statement(data: &SummaryData) -> String {
    let lookup = &data.lookup;
    if lookup.is_clean() && data.counts.n_missing_tf_region == 0 {
        return "All motifs, regions and TF-region pairs were resolved.\n".to_string();
    }
    let mut out = String::new();
    if data.counts.n_missing_tf_region > 0 {
        out.push_str(&format!(
            "Triplets without a TF-to-region motif rank: {} (scored as {})\n",
            data.counts.n_missing_tf_region,
            data.config.missing_tf_region.label()
        ));
    }
    if lookup.n_missing_motifs() > 0 {
        out.push_str(&format!(
            "Motifs absent from the ranking database: {}\n",
            lookup.n_missing_motifs()
        ));
    }
    if !lookup.tfs_without_valid_motifs.is_empty() {
        out.push_str(&format!(
            "TFs without any ranked motif: {}\n",
            lookup.tfs_without_valid_motifs.join(", ")
        ));
    }
    if !lookup.regions_without_overlap.is_empty() {
        out.push_str(&format!(
            "Regions overlapping no database region: {}\n",
            lookup.regions_without_overlap.len()
        ));
    }
    if !lookup.invalid_region_names.is_empty() {
        out.push_str(&format!(
            "Unparseable region names: {}\n",
            lookup.invalid_region_names.len()
        ));
    }
    if !lookup.invalid_db_region_names.is_empty() {
        out.push_str(&format!(
            "Unparseable ranking database regions: {}\n",
            lookup.invalid_db_region_names.len()
        ));
    }
    out
}
