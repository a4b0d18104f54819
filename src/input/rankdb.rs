use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::input::{InputError, open_maybe_gz, parse_f64, read_header};
use crate::model::DEFAULT_MIN_OVERLAP_FRACTION;

/// Motif ranking database: for every motif, the rank (0 = best) of each
/// database region.
#[derive(Debug, Clone)]
pub struct RankingDatabase {
    motifs: Vec<String>,
    motif_index: HashMap<String, usize>,
    regions: Vec<String>,
    // motif-major, motifs.len() x regions.len()
    ranks: Vec<f64>,
    min_overlap_fraction: f64,
}

impl RankingDatabase {
    pub fn from_parts(
        motifs: Vec<String>,
        regions: Vec<String>,
        ranks: Vec<f64>,
    ) -> Result<Self, InputError> {
        if ranks.len() != motifs.len() * regions.len() {
            return Err(InputError::InvalidInput(format!(
                "ranking database has {} values for {} motifs x {} regions",
                ranks.len(),
                motifs.len(),
                regions.len()
            )));
        }
        if let Some(pos) = ranks.iter().position(|v| v.is_nan()) {
            return Err(InputError::InvalidInput(format!(
                "ranking database contains NaN (motif {}, region {})",
                motifs[pos / regions.len()],
                regions[pos % regions.len()]
            )));
        }
        let mut motif_index = HashMap::with_capacity(motifs.len());
        for (i, m) in motifs.iter().enumerate() {
            if motif_index.insert(m.clone(), i).is_some() {
                return Err(InputError::InvalidInput(format!(
                    "duplicate motif {m} in ranking database"
                )));
            }
        }
        Ok(Self {
            motifs,
            motif_index,
            regions,
            ranks,
            min_overlap_fraction: DEFAULT_MIN_OVERLAP_FRACTION,
        })
    }

    /// Minimum overlap share used when mapping target regions onto the
    /// database regions.
    pub fn with_min_overlap_fraction(mut self, fraction: f64) -> Self {
        self.min_overlap_fraction = fraction;
        self
    }

    pub fn min_overlap_fraction(&self) -> f64 {
        self.min_overlap_fraction
    }

    pub fn motifs(&self) -> &[String] {
        &self.motifs
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn motif_id(&self, motif: &str) -> Option<usize> {
        self.motif_index.get(motif).copied()
    }

    pub fn rank(&self, motif_id: usize, region_id: usize) -> f64 {
        self.ranks[motif_id * self.regions.len() + region_id]
    }

    /// Best (minimum) rank of `region_id` across `motif_ids`; `+inf` when the
    /// list is empty.
    pub fn best_rank(&self, motif_ids: &[usize], region_id: usize) -> f64 {
        motif_ids
            .iter()
            .map(|&m| self.rank(m, region_id))
            .fold(f64::INFINITY, f64::min)
    }
}

pub fn load_ranking_db(path: &Path) -> Result<RankingDatabase, InputError> {
    let mut reader = open_maybe_gz(path)?;
    read_ranking_db(reader.as_mut())
}

pub fn read_ranking_db(reader: &mut dyn BufRead) -> Result<RankingDatabase, InputError> {
    let mut buf = String::new();
    let (header, mut line_no) = read_header(reader, &mut buf, "ranking database")?;
    if header.len() < 2 {
        return Err(InputError::Parse(
            "ranking database header has no region columns".to_string(),
        ));
    }
    let regions: Vec<String> = header[1..].to_vec();
    let n_regions = regions.len();

    let mut motifs = Vec::new();
    let mut ranks = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let motif = fields.next().unwrap_or("").trim();
        if motif.is_empty() {
            return Err(InputError::Parse(format!(
                "ranking database line {line_no} has an empty motif name"
            )));
        }
        let before = ranks.len();
        for raw in fields {
            ranks.push(parse_f64(raw, "rank", line_no)?);
        }
        if ranks.len() - before != n_regions {
            return Err(InputError::Parse(format!(
                "ranking database line {} has {} ranks, expected {}",
                line_no,
                ranks.len() - before,
                n_regions
            )));
        }
        motifs.push(motif.to_string());
    }

    if motifs.is_empty() {
        return Err(InputError::InvalidInput(
            "ranking database has no motifs".to_string(),
        ));
    }
    RankingDatabase::from_parts(motifs, regions, ranks)
}
