use super::*;

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_new_matrix_is_all_worst() {
    let m = TfRegionMatrix::new(names(&["chr1:0-10", "chr1:20-30"]), names(&["SOX2", "PAX6"]));
    assert_eq!(m.n_regions(), 2);
    assert_eq!(m.n_tfs(), 2);
    assert_eq!(m.get("chr1:20-30", "PAX6"), Some(f64::INFINITY));
    assert_eq!(m.get("chr2:0-10", "PAX6"), None);
    assert_eq!(m.get("chr1:0-10", "FOXA1"), None);
}

#[test]
fn test_update_min_keeps_best() {
    let mut m = TfRegionMatrix::new(names(&["r1"]), names(&["TF1"]));
    m.update_min(0, 0, 12.0);
    m.update_min(0, 0, 40.0);
    assert_eq!(m.get("r1", "TF1"), Some(12.0));
    m.update_min(0, 0, 3.0);
    assert_eq!(m.get("r1", "TF1"), Some(3.0));
}

#[test]
fn test_duplicate_names_keep_first() {
    let mut m = TfRegionMatrix::new(names(&["r1", "r2", "r1"]), names(&["TF1"]));
    assert_eq!(m.n_regions(), 2);
    m.update_min(1, 0, 5.0);
    assert_eq!(m.get("r2", "TF1"), Some(5.0));
    assert_eq!(m.get("r1", "TF1"), Some(f64::INFINITY));
}
