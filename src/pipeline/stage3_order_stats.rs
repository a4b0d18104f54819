use std::cmp::Ordering;

use rayon::prelude::*;

use crate::pipeline::RankError;

/// Largest number of ratios combined without touching the heap.
const MAX_STACK_RATIOS: usize = 16;

/// Combines the rank ratios of one entity into a single rank ratio with the
/// order-statistics recurrence of Stuart et al. (2003) and Aerts et al. (2006): the
/// probability that k independent uniform rankings would all be at least as
/// good as the observed ones. Smaller is stronger joint evidence.
///
/// `ratios` is sorted in place. An empty slice means no evidence and yields 1.0.
pub fn combine_rank_ratios(ratios: &mut [f64]) -> f64 {
    let k = ratios.len();
    if k == 0 {
        return 1.0;
    }
    ratios.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    if k <= MAX_STACK_RATIOS {
        let mut w = [0.0f64; MAX_STACK_RATIOS + 1];
        order_statistics(ratios, &mut w[..=k])
    } else {
        let mut w = vec![0.0f64; k + 1];
        order_statistics(ratios, &mut w)
    }
}

// `w` must be zeroed and hold k + 1 slots.
fn order_statistics(sorted: &[f64], w: &mut [f64]) -> f64 {
    let k = sorted.len();
    w[0] = 1.0;
    w[1] = sorted[k - 1];
    for m in 2..=k {
        let r = sorted[k - m];
        let mut f = -1.0f64;
        for j in 0..m {
            f = -(f * (m - j) as f64 * r) / (j as f64 + 1.0);
            w[m] += w[m - j - 1] * f;
        }
    }
    w[k]
}

/// Combines, for every entity `i`, the values `columns[c][i]` across all
/// columns. Each column holds one rank-ratio vector of length `n_entities`.
pub fn combine_columns(
    columns: &[&[f64]],
    n_entities: usize,
    parallel: bool,
) -> Result<Vec<f64>, RankError> {
    for (c, col) in columns.iter().enumerate() {
        if col.len() != n_entities {
            return Err(RankError::InvalidInput(format!(
                "rank-ratio column {} has length {}, expected {}",
                c,
                col.len(),
                n_entities
            )));
        }
    }

    let combine_one = |i: usize| {
        if columns.len() <= MAX_STACK_RATIOS {
            let mut buf = [0.0f64; MAX_STACK_RATIOS];
            for (c, col) in columns.iter().enumerate() {
                buf[c] = col[i];
            }
            combine_rank_ratios(&mut buf[..columns.len()])
        } else {
            let mut buf: Vec<f64> = columns.iter().map(|col| col[i]).collect();
            combine_rank_ratios(&mut buf)
        }
    };

    let combined: Vec<f64> = if parallel {
        (0..n_entities).into_par_iter().map(combine_one).collect()
    } else {
        (0..n_entities).map(combine_one).collect()
    };
    Ok(combined)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_order_stats.rs"]
mod tests;
