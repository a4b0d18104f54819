use super::*;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::model::TripletRecord;
use crate::pipeline::stage4_triplets::run_stage4;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!(
        "kira_tripletrank_stage5_{}_{}",
        std::process::id(),
        id
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

struct Fixture {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    ranked: Vec<RankedTriplet>,
    matrix: TfRegionMatrix,
    diagnostics: LookupDiagnostics,
    config: RankingConfig,
}

fn fixture() -> Fixture {
    let columns: Vec<String> = ["TF", "Region", "Gene", "importance_TF2G", "importance_R2G"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let data = [
        ("SOX2", "chr1:0-50", "PAX6", 0.9, 0.2),
        ("SOX2", "chr1:100-150", "NES", 0.1, 0.8),
        ("PAX6", "chr1:200-250", "NES", 0.5, 0.5),
    ];
    let mut matrix = TfRegionMatrix::new(
        data.iter().map(|d| d.1.to_string()).collect(),
        vec!["SOX2".to_string()],
    );
    matrix.update_min(0, 0, 3.0);
    matrix.update_min(1, 0, 10.0);

    let records: Vec<TripletRecord> = data
        .iter()
        .map(|d| TripletRecord::new(d.0, d.1, d.2, d.3, d.4))
        .collect();
    let rows = data
        .iter()
        .map(|d| {
            vec![
                d.0.to_string(),
                d.1.to_string(),
                d.2.to_string(),
                d.3.to_string(),
                d.4.to_string(),
            ]
        })
        .collect();
    let config = RankingConfig::default_v1();
    let out = run_stage4(&records, &matrix, &config, &mut StdRng::seed_from_u64(2)).unwrap();
    let mut diagnostics = LookupDiagnostics::default();
    diagnostics
        .missing_motifs
        .insert("PAX6".to_string(), vec!["m9".to_string()]);

    Fixture {
        columns,
        rows,
        ranked: out.ranked,
        matrix,
        diagnostics,
        config,
    }
}

fn stage5_input(f: &Fixture) -> Stage5Input<'_> {
    Stage5Input {
        columns: &f.columns,
        rows: &f.rows,
        ranked: &f.ranked,
        matrix: &f.matrix,
        diagnostics: &f.diagnostics,
        n_missing_tf_region: 1,
        config: &f.config,
        inputs: InputSummary {
            triplets: "triplets.tsv".to_string(),
            rankings: "db.tsv".to_string(),
            motifs: "motifs.tsv".to_string(),
            regions: None,
        },
        tool_name: "kira-tripletrank".to_string(),
        tool_version: "0.0.0-test".to_string(),
    }
}

#[test]
fn test_write_reports_outputs() {
    let f = fixture();
    let dir = make_temp_dir();
    write_reports(&stage5_input(&f), &dir).unwrap();

    let tsv = fs::read_to_string(dir.join(RANKED_TSV)).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 4);
    let header: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(header.len(), 5 + DERIVED_COLUMNS.len());
    assert_eq!(header[0], "TF");
    assert_eq!(*header.last().unwrap(), "triplet_rank");

    let mut ranks = Vec::new();
    for (line, t) in lines[1..].iter().zip(&f.ranked) {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[2], t.record.gene);
        ranks.push(fields.last().unwrap().parse::<u32>().unwrap());
    }
    ranks.sort_unstable();
    assert_eq!(ranks, vec![0, 1, 2]);
    // PAX6 has no motif rank and defaults to 0 under the zero policy
    assert!(lines[3].contains("\t0\t0\t"));

    let json = fs::read_to_string(dir.join(SUMMARY_JSON)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tool"], "kira-tripletrank");
    assert_eq!(value["counts"]["n_triplets"], 3);
    assert_eq!(value["counts"]["n_tfs"], 2);
    assert_eq!(value["counts"]["n_genes"], 2);
    assert_eq!(value["counts"]["n_missing_tf_region"], 1);
    assert_eq!(value["config"]["missing_tf_region"], "zero");
    assert_eq!(value["lookup"]["missing_motifs"]["PAX6"][0], "m9");
    assert_eq!(value["top_triplets"].as_array().unwrap().len(), 3);
    assert_eq!(value["top_triplets"][0]["triplet_rank"], 0);

    let report = fs::read_to_string(dir.join(REPORT_TXT)).unwrap();
    assert!(report.contains("Top triplets"));
    assert!(report.contains("Motifs absent from the ranking database: 1"));
}

#[test]
fn test_row_count_mismatch_is_an_error() {
    let f = fixture();
    let dir = make_temp_dir();
    let mut input = stage5_input(&f);
    input.rows = &f.rows[..2];
    assert!(write_reports(&input, &dir).is_err());
}

#[test]
fn test_summary_top_triplets_sorted() {
    let f = fixture();
    let summary = build_summary(&stage5_input(&f));
    let ranks: Vec<u32> = summary.top_triplets.iter().map(|t| t.triplet_rank).collect();
    assert_eq!(ranks, vec![0, 1, 2]);
    assert!(summary.combined_rank_ratio.min <= summary.combined_rank_ratio.max);
    assert_eq!(summary.counts.n_matrix_regions, 3);
}
