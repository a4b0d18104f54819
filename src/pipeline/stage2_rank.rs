use std::cmp::Ordering;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::pipeline::RankError;

/// Rejects empty vectors and NaN. Infinities are allowed here: `+inf` is the
/// "no score" sentinel and turns into `-inf` once a lower-is-better vector
/// has been negated. Callers holding raw scores reject the other infinities.
pub fn validate_scores(label: &str, scores: &[f64]) -> Result<(), RankError> {
    if scores.is_empty() {
        return Err(RankError::InvalidInput(format!("{label} is empty")));
    }
    if scores.len() > u32::MAX as usize {
        return Err(RankError::InvalidInput(format!(
            "{label} has {} entries, more than can be ranked",
            scores.len()
        )));
    }
    if let Some(idx) = scores.iter().position(|v| v.is_nan()) {
        return Err(RankError::InvalidInput(format!(
            "{label} contains NaN at index {idx}"
        )));
    }
    Ok(())
}

/// Ranks `scores` in descending order (rank 0 = highest score).
///
/// Indices are first shuffled with `rng` and then stable-sorted by score, so
/// tied scores receive their ranks in uniformly random order while distinct
/// scores always rank the same way regardless of the generator state.
pub fn rank_with_ties<R: Rng + ?Sized>(scores: &[f64], rng: &mut R) -> Result<Vec<u32>, RankError> {
    validate_scores("score vector", scores)?;

    let n = scores.len();
    let mut order: Vec<u32> = (0..n as u32).collect();
    order.shuffle(rng);
    order.sort_by(|&a, &b| {
        scores[b as usize]
            .partial_cmp(&scores[a as usize])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0u32; n];
    for (rank, &idx) in order.iter().enumerate() {
        ranks[idx as usize] = rank as u32;
    }
    Ok(ranks)
}

/// Ranks `scores` so that the smallest value gets rank 0.
pub fn rank_ascending_with_ties<R: Rng + ?Sized>(
    scores: &[f64],
    rng: &mut R,
) -> Result<Vec<u32>, RankError> {
    let negated: Vec<f64> = scores.iter().map(|v| -v).collect();
    rank_with_ties(&negated, rng)
}

/// `(rank + 1) / N`, in `(0, 1]`.
pub fn rank_ratios(ranks: &[u32]) -> Vec<f64> {
    let n = ranks.len() as f64;
    ranks.iter().map(|&r| (r as f64 + 1.0) / n).collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_rank.rs"]
mod tests;
