pub mod config;
pub mod matrix;
pub mod triplet;

pub use config::{DEFAULT_MIN_OVERLAP_FRACTION, MissingScorePolicy, RankingConfig};
pub use matrix::TfRegionMatrix;
pub use triplet::{RankedTriplet, TripletRecord};
