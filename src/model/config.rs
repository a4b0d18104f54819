use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Score assigned to a triplet whose (region, TF) pair is absent from the
/// motif-rank matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingScorePolicy {
    /// Raw rank 0: the pair ranks as the best possible TF-to-region hit.
    Zero,
    /// `+inf`: the pair ranks behind every scored pair.
    Worst,
}

impl MissingScorePolicy {
    pub fn default_score(self) -> f64 {
        match self {
            MissingScorePolicy::Zero => 0.0,
            MissingScorePolicy::Worst => f64::INFINITY,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MissingScorePolicy::Zero => "zero",
            MissingScorePolicy::Worst => "worst",
        }
    }
}

/// Share of either region a target/database overlap must exceed.
pub const DEFAULT_MIN_OVERLAP_FRACTION: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    pub seed: u64,
    pub missing_tf_region: MissingScorePolicy,
    pub min_overlap_fraction: f64,
    pub parallel: bool,
    /// Worker threads for the combination step; 0 keeps the rayon default.
    pub threads: usize,
}

impl RankingConfig {
    pub fn default_v1() -> Self {
        Self {
            seed: 123,
            missing_tf_region: MissingScorePolicy::Zero,
            min_overlap_fraction: DEFAULT_MIN_OVERLAP_FRACTION,
            parallel: true,
            threads: 0,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.min_overlap_fraction) {
            return Err(format!(
                "min_overlap_fraction must be in [0, 1), got {}",
                self.min_overlap_fraction
            ));
        }
        Ok(())
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/config.rs"]
mod tests;
