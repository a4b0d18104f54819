use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::input::{InputError, open_maybe_gz};

/// Half-open genomic interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicRegion {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicRegion {
    pub fn width(&self) -> u64 {
        self.end - self.start
    }

    /// Number of bases shared with `other`; 0 on different chromosomes.
    pub fn overlap_len(&self, other: &GenomicRegion) -> u64 {
        if self.chrom != other.chrom {
            return 0;
        }
        self.end.min(other.end).saturating_sub(self.start.max(other.start))
    }

    pub fn overlaps(&self, other: &GenomicRegion) -> bool {
        self.overlap_len(other) > 0
    }

    /// True when the shared bases cover more than `min_fraction` of either
    /// region. A fraction of 0 accepts any overlap.
    pub fn covers_fraction(&self, other: &GenomicRegion, min_fraction: f64) -> bool {
        let shared = self.overlap_len(other);
        if shared == 0 {
            return false;
        }
        let shared = shared as f64;
        shared / self.width() as f64 > min_fraction || shared / other.width() as f64 > min_fraction
    }
}

/// Parses `chrom:start-end`. `chrom-start-end` is accepted as well; the
/// coordinates are always taken from the last two separators so chromosome
/// names containing `-` or `:` survive.
pub fn parse_region_name(name: &str) -> Result<GenomicRegion, InputError> {
    let trimmed = name.trim();
    let invalid = || InputError::Parse(format!("invalid region name '{trimmed}'"));

    let (rest, end_raw) = trimmed.rsplit_once('-').ok_or_else(invalid)?;
    let (chrom, start_raw) = match rest.rsplit_once(':') {
        Some(split) => split,
        None => rest.rsplit_once('-').ok_or_else(invalid)?,
    };
    if chrom.is_empty() {
        return Err(invalid());
    }
    let start: u64 = start_raw.parse().map_err(|_| invalid())?;
    let end: u64 = end_raw.parse().map_err(|_| invalid())?;
    if end <= start {
        return Err(InputError::Parse(format!(
            "region '{trimmed}' has end <= start"
        )));
    }
    Ok(GenomicRegion {
        chrom: chrom.to_string(),
        start,
        end,
    })
}

/// One region name per line; blank lines and `#` comments are skipped.
pub fn load_region_list(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut regions = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        let line = buf.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let name = line.split('\t').next().unwrap_or(line).trim();
        regions.push(name.to_string());
    }
    if regions.is_empty() {
        return Err(InputError::InvalidInput(format!(
            "region list {} is empty",
            path.display()
        )));
    }
    Ok(regions)
}

#[derive(Debug, Clone)]
struct ChromIntervals {
    // (start, id) sorted by start
    intervals: Vec<(u64, usize)>,
    max_len: u64,
}

/// Per-chromosome interval index answering overlap queries.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    regions: Vec<GenomicRegion>,
    by_chrom: HashMap<String, ChromIntervals>,
}

impl RegionIndex {
    pub fn build(regions: &[GenomicRegion]) -> Self {
        let mut by_chrom: HashMap<String, ChromIntervals> = HashMap::new();
        for (id, r) in regions.iter().enumerate() {
            let entry = by_chrom
                .entry(r.chrom.clone())
                .or_insert_with(|| ChromIntervals {
                    intervals: Vec::new(),
                    max_len: 0,
                });
            entry.intervals.push((r.start, id));
            entry.max_len = entry.max_len.max(r.width());
        }
        for chrom in by_chrom.values_mut() {
            chrom.intervals.sort_unstable();
        }
        Self {
            regions: regions.to_vec(),
            by_chrom,
        }
    }

    /// Ids of all indexed regions overlapping `query`, in ascending start order.
    pub fn overlapping(&self, query: &GenomicRegion) -> Vec<usize> {
        let Some(chrom) = self.by_chrom.get(&query.chrom) else {
            return Vec::new();
        };
        let lower = query.start.saturating_sub(chrom.max_len);
        let first = chrom.intervals.partition_point(|&(s, _)| s < lower);
        chrom.intervals[first..]
            .iter()
            .take_while(|&&(s, _)| s < query.end)
            .map(|&(_, id)| id)
            .filter(|&id| self.regions[id].overlaps(query))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/regions.rs"]
mod tests;
