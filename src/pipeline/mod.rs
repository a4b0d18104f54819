use thiserror::Error;

pub mod stage1_motif_ranks;
pub mod stage2_rank;
pub mod stage3_order_stats;
pub mod stage4_triplets;
pub mod stage5_report;

#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
