/// One candidate regulatory link as read from the triplet table.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletRecord {
    pub tf: String,
    pub region: String,
    pub gene: String,
    pub tf_to_gene: f64,
    pub region_to_gene: f64,
}

impl TripletRecord {
    pub fn new(
        tf: impl Into<String>,
        region: impl Into<String>,
        gene: impl Into<String>,
        tf_to_gene: f64,
        region_to_gene: f64,
    ) -> Self {
        Self {
            tf: tf.into(),
            region: region.into(),
            gene: gene.into(),
            tf_to_gene,
            region_to_gene,
        }
    }
}

/// A triplet together with every score derived while ranking it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTriplet {
    pub record: TripletRecord,
    pub tf_to_region: f64,
    pub tf_to_region_missing: bool,
    pub tf_to_region_rank: u32,
    pub tf_to_gene_rank: u32,
    pub region_to_gene_rank: u32,
    pub combined_rank_ratio: f64,
    pub triplet_rank: u32,
}
