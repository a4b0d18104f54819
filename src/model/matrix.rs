use std::collections::HashMap;

/// Dense region x TF matrix of best motif ranks. `+inf` marks a TF without
/// any valid motif for the region.
#[derive(Debug, Clone, PartialEq)]
pub struct TfRegionMatrix {
    regions: Vec<String>,
    tfs: Vec<String>,
    region_index: HashMap<String, usize>,
    tf_index: HashMap<String, usize>,
    values: Vec<f64>,
}

impl TfRegionMatrix {
    /// Builds a matrix filled with `+inf`. Duplicate names keep their first
    /// position.
    pub fn new(regions: Vec<String>, tfs: Vec<String>) -> Self {
        let regions = dedup_keep_first(regions);
        let tfs = dedup_keep_first(tfs);
        let region_index = index_of(&regions);
        let tf_index = index_of(&tfs);
        let values = vec![f64::INFINITY; regions.len() * tfs.len()];
        Self {
            regions,
            tfs,
            region_index,
            tf_index,
            values,
        }
    }

    pub fn n_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn n_tfs(&self) -> usize {
        self.tfs.len()
    }

    pub fn get(&self, region: &str, tf: &str) -> Option<f64> {
        let row = *self.region_index.get(region)?;
        let col = *self.tf_index.get(tf)?;
        Some(self.values[row * self.tfs.len() + col])
    }

    /// Lowers the cell to `value` if it is better (smaller) than the stored one.
    pub fn update_min(&mut self, row: usize, col: usize, value: f64) {
        let idx = row * self.tfs.len() + col;
        if value < self.values[idx] {
            self.values[idx] = value;
        }
    }
}

fn dedup_keep_first(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(names.len());
    names
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

fn index_of(names: &[String]) -> HashMap<String, usize> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.clone(), i))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/matrix.rs"]
mod tests;
