use rand::Rng;
use tracing::{info, warn};

use crate::model::{RankedTriplet, RankingConfig, TfRegionMatrix, TripletRecord};
use crate::pipeline::RankError;
use crate::pipeline::stage2_rank::{
    rank_ascending_with_ties, rank_ratios, rank_with_ties, validate_scores,
};
use crate::pipeline::stage3_order_stats::combine_columns;

/// Per-score ranks and the aggregated result for N triplets, all in input
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletRanks {
    pub tf_to_region_rank: Vec<u32>,
    pub tf_to_gene_rank: Vec<u32>,
    pub region_to_gene_rank: Vec<u32>,
    pub combined: Vec<f64>,
    pub triplet_rank: Vec<u32>,
}

#[derive(Debug)]
pub struct Stage4Output {
    pub ranked: Vec<RankedTriplet>,
    pub n_missing_tf_region: usize,
}

/// Rejects infinities in an importance vector, and `-inf` in the motif-rank
/// vector where only `+inf` ("no valid motif") is meaningful.
fn check_infinities(label: &str, scores: &[f64], allow_pos_inf: bool) -> Result<(), RankError> {
    let bad = scores
        .iter()
        .position(|&v| v.is_infinite() && !(allow_pos_inf && v > 0.0));
    match bad {
        Some(idx) => Err(RankError::InvalidInput(format!(
            "{label} contains {} at index {idx}",
            scores[idx]
        ))),
        None => Ok(()),
    }
}

/// Ranks three parallel score vectors and aggregates them into one ordinal
/// rank per triplet.
///
/// `tf_to_region` is lower-is-better (motif ranks), the other two are
/// higher-is-better importances. The generator is consumed in a fixed order
/// (TF-to-region, TF-to-gene, region-to-gene, aggregate) so one seed
/// reproduces the whole ranking.
pub fn rank_triplet_scores<R: Rng + ?Sized>(
    tf_to_region: &[f64],
    tf_to_gene: &[f64],
    region_to_gene: &[f64],
    parallel: bool,
    rng: &mut R,
) -> Result<TripletRanks, RankError> {
    validate_scores("TF-to-region scores", tf_to_region)?;
    validate_scores("TF-to-gene scores", tf_to_gene)?;
    validate_scores("region-to-gene scores", region_to_gene)?;
    check_infinities("TF-to-region scores", tf_to_region, true)?;
    check_infinities("TF-to-gene scores", tf_to_gene, false)?;
    check_infinities("region-to-gene scores", region_to_gene, false)?;
    let n = tf_to_region.len();
    if tf_to_gene.len() != n || region_to_gene.len() != n {
        return Err(RankError::InvalidInput(format!(
            "score vectors differ in length: TF-to-region {}, TF-to-gene {}, region-to-gene {}",
            n,
            tf_to_gene.len(),
            region_to_gene.len()
        )));
    }

    let tf_to_region_rank = rank_ascending_with_ties(tf_to_region, rng)?;
    let tf_to_gene_rank = rank_with_ties(tf_to_gene, rng)?;
    let region_to_gene_rank = rank_with_ties(region_to_gene, rng)?;

    let tf_to_region_ratio = rank_ratios(&tf_to_region_rank);
    let tf_to_gene_ratio = rank_ratios(&tf_to_gene_rank);
    let region_to_gene_ratio = rank_ratios(&region_to_gene_rank);

    let combined = combine_columns(
        &[
            tf_to_gene_ratio.as_slice(),
            region_to_gene_ratio.as_slice(),
            tf_to_region_ratio.as_slice(),
        ],
        n,
        parallel,
    )?;
    let triplet_rank = rank_ascending_with_ties(&combined, rng)?;

    Ok(TripletRanks {
        tf_to_region_rank,
        tf_to_gene_rank,
        region_to_gene_rank,
        combined,
        triplet_rank,
    })
}

/// Resolves each record's TF-to-region score from `matrix`, falling back to
/// the configured policy for absent pairs. Returns the scores and a per-record
/// "was missing" mask.
pub fn resolve_tf_to_region(
    records: &[TripletRecord],
    matrix: &TfRegionMatrix,
    config: &RankingConfig,
) -> (Vec<f64>, Vec<bool>) {
    let fallback = config.missing_tf_region.default_score();
    records
        .iter()
        .map(|r| match matrix.get(&r.region, &r.tf) {
            Some(v) => (v, false),
            None => (fallback, true),
        })
        .unzip()
}

pub fn run_stage4<R: Rng + ?Sized>(
    records: &[TripletRecord],
    matrix: &TfRegionMatrix,
    config: &RankingConfig,
    rng: &mut R,
) -> Result<Stage4Output, RankError> {
    if records.is_empty() {
        return Err(RankError::InvalidInput("no triplets to rank".to_string()));
    }

    let (tf_to_region, missing) = resolve_tf_to_region(records, matrix, config);
    let n_missing_tf_region = missing.iter().filter(|&&m| m).count();
    if n_missing_tf_region > 0 {
        warn!(
            "{} of {} triplets have no TF-to-region motif rank; scored as {} ({})",
            n_missing_tf_region,
            records.len(),
            config.missing_tf_region.default_score(),
            config.missing_tf_region.label()
        );
    }

    let tf_to_gene: Vec<f64> = records.iter().map(|r| r.tf_to_gene).collect();
    let region_to_gene: Vec<f64> = records.iter().map(|r| r.region_to_gene).collect();

    let ranks = rank_triplet_scores(
        &tf_to_region,
        &tf_to_gene,
        &region_to_gene,
        config.parallel,
        rng,
    )?;

    let ranked = records
        .iter()
        .enumerate()
        .map(|(i, record)| RankedTriplet {
            record: record.clone(),
            tf_to_region: tf_to_region[i],
            tf_to_region_missing: missing[i],
            tf_to_region_rank: ranks.tf_to_region_rank[i],
            tf_to_gene_rank: ranks.tf_to_gene_rank[i],
            region_to_gene_rank: ranks.region_to_gene_rank[i],
            combined_rank_ratio: ranks.combined[i],
            triplet_rank: ranks.triplet_rank[i],
        })
        .collect::<Vec<_>>();

    info!("ranked {} triplets", ranked.len());

    Ok(Stage4Output {
        ranked,
        n_missing_tf_region,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_triplets.rs"]
mod tests;
