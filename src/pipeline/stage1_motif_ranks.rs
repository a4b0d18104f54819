use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::input::InputError;
use crate::input::motifs::MotifGroups;
use crate::input::rankdb::RankingDatabase;
use crate::input::regions::{GenomicRegion, RegionIndex, parse_region_name};
use crate::model::TfRegionMatrix;

/// Source of per-region, per-TF best motif ranks.
pub trait MotifRankLookup {
    fn lookup(&self, regions: &[String], motif_groups: &MotifGroups)
    -> Result<Stage1Output, InputError>;
}

#[derive(Debug)]
pub struct Stage1Output {
    pub matrix: TfRegionMatrix,
    pub diagnostics: LookupDiagnostics,
}

/// Entries that could not be resolved. None of them is fatal; affected
/// motifs are dropped from their TF group and affected regions are left out
/// of the matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupDiagnostics {
    pub missing_motifs: BTreeMap<String, Vec<String>>,
    pub tfs_without_valid_motifs: Vec<String>,
    pub invalid_region_names: Vec<String>,
    pub invalid_db_region_names: Vec<String>,
    pub regions_without_overlap: Vec<String>,
}

impl LookupDiagnostics {
    pub fn n_missing_motifs(&self) -> usize {
        self.missing_motifs.values().map(Vec::len).sum()
    }

    pub fn n_affected(&self) -> usize {
        self.n_missing_motifs()
            + self.tfs_without_valid_motifs.len()
            + self.invalid_region_names.len()
            + self.invalid_db_region_names.len()
            + self.regions_without_overlap.len()
    }

    pub fn is_clean(&self) -> bool {
        self.n_affected() == 0
    }

    pub fn log(&self) {
        if self.is_clean() {
            return;
        }
        for (tf, motifs) in &self.missing_motifs {
            debug!("TF {tf}: motifs not in ranking database: {}", motifs.join(","));
        }
        if !self.missing_motifs.is_empty() {
            warn!(
                "{} motifs across {} TFs are absent from the ranking database and were skipped",
                self.n_missing_motifs(),
                self.missing_motifs.len()
            );
        }
        if !self.tfs_without_valid_motifs.is_empty() {
            warn!(
                "{} TFs have no motif in the ranking database; their TF-to-region ranks are +inf: {}",
                self.tfs_without_valid_motifs.len(),
                preview(&self.tfs_without_valid_motifs)
            );
        }
        if !self.invalid_region_names.is_empty() {
            warn!(
                "{} target regions have unparseable names and were skipped: {}",
                self.invalid_region_names.len(),
                preview(&self.invalid_region_names)
            );
        }
        if !self.invalid_db_region_names.is_empty() {
            warn!(
                "{} ranking database regions have unparseable names and were ignored: {}",
                self.invalid_db_region_names.len(),
                preview(&self.invalid_db_region_names)
            );
        }
        if !self.regions_without_overlap.is_empty() {
            warn!(
                "{} target regions overlap no ranking database region: {}",
                self.regions_without_overlap.len(),
                preview(&self.regions_without_overlap)
            );
        }
    }
}

fn preview(names: &[String]) -> String {
    const SHOWN: usize = 5;
    if names.len() <= SHOWN {
        names.join(", ")
    } else {
        format!("{}, ... (+{})", names[..SHOWN].join(", "), names.len() - SHOWN)
    }
}

impl MotifRankLookup for RankingDatabase {
    fn lookup(
        &self,
        regions: &[String],
        motif_groups: &MotifGroups,
    ) -> Result<Stage1Output, InputError> {
        let mut diagnostics = LookupDiagnostics::default();

        // index position -> database region id, unparseable columns skipped
        let mut db_ids = Vec::with_capacity(self.regions().len());
        let mut db_coords: Vec<GenomicRegion> = Vec::with_capacity(self.regions().len());
        for (db_id, name) in self.regions().iter().enumerate() {
            match parse_region_name(name) {
                Ok(coord) => {
                    db_ids.push(db_id);
                    db_coords.push(coord);
                }
                Err(_) => diagnostics.invalid_db_region_names.push(name.clone()),
            }
        }
        let db_index = RegionIndex::build(&db_coords);
        let min_fraction = self.min_overlap_fraction();

        // db region -> target regions overlapping it (one-to-many)
        let mut targets_by_db: Vec<Vec<usize>> = vec![Vec::new(); self.regions().len()];
        let mut covered: Vec<String> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for name in regions {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let coord = match parse_region_name(name) {
                Ok(c) => c,
                Err(_) => {
                    diagnostics.invalid_region_names.push(name.clone());
                    continue;
                }
            };
            let hits: Vec<usize> = db_index
                .overlapping(&coord)
                .into_iter()
                .filter(|&pos| coord.covers_fraction(&db_coords[pos], min_fraction))
                .map(|pos| db_ids[pos])
                .collect();
            if hits.is_empty() {
                diagnostics.regions_without_overlap.push(name.clone());
                continue;
            }
            let row = covered.len();
            covered.push(name.clone());
            for db_id in hits {
                targets_by_db[db_id].push(row);
            }
        }

        let mut tf_names = Vec::with_capacity(motif_groups.len());
        let mut motif_ids: Vec<Vec<usize>> = Vec::with_capacity(motif_groups.len());
        for (tf, motifs) in motif_groups {
            let mut valid = Vec::with_capacity(motifs.len());
            for motif in motifs {
                let motif = motif.trim();
                if motif.is_empty() {
                    continue;
                }
                match self.motif_id(motif) {
                    Some(id) => valid.push(id),
                    None => diagnostics
                        .missing_motifs
                        .entry(tf.clone())
                        .or_default()
                        .push(motif.to_string()),
                }
            }
            if valid.is_empty() {
                diagnostics.tfs_without_valid_motifs.push(tf.clone());
            }
            tf_names.push(tf.clone());
            motif_ids.push(valid);
        }

        let mut matrix = TfRegionMatrix::new(covered, tf_names);
        for (db_id, targets) in targets_by_db.iter().enumerate() {
            if targets.is_empty() {
                continue;
            }
            for (col, ids) in motif_ids.iter().enumerate() {
                let best = self.best_rank(ids, db_id);
                for &row in targets {
                    matrix.update_min(row, col, best);
                }
            }
        }

        info!(
            "motif ranks resolved for {} regions x {} TFs ({} database regions, {} motifs)",
            matrix.n_regions(),
            matrix.n_tfs(),
            self.regions().len(),
            self.motifs().len()
        );

        Ok(Stage1Output {
            matrix,
            diagnostics,
        })
    }
}

pub fn run_stage1(
    lookup: &dyn MotifRankLookup,
    regions: &[String],
    motif_groups: &MotifGroups,
) -> Result<Stage1Output, InputError> {
    let out = lookup.lookup(regions, motif_groups)?;
    out.diagnostics.log();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_motif_ranks.rs"]
mod tests;
