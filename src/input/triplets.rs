use std::io::BufRead;
use std::path::Path;

use crate::input::{InputError, open_maybe_gz, parse_f64, read_header};
use crate::model::TripletRecord;

pub const COL_TF: &str = "TF";
pub const COL_REGION: &str = "Region";
pub const COL_GENE: &str = "Gene";
pub const COL_TF2G: &str = "importance_TF2G";
pub const COL_R2G: &str = "importance_R2G";

/// Triplet table as read from disk. `rows` keeps every input column verbatim
/// so the ranked output can reproduce it.
#[derive(Debug, Clone)]
pub struct TripletTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub records: Vec<TripletRecord>,
}

impl TripletTable {
    /// Distinct region names in order of first appearance.
    pub fn regions(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.region.as_str()))
            .map(|r| r.region.clone())
            .collect()
    }
}

struct ColumnLayout {
    tf: usize,
    region: usize,
    gene: usize,
    tf2g: usize,
    r2g: usize,
}

fn locate_columns(columns: &[String]) -> Result<ColumnLayout, InputError> {
    let find = |name: &str| {
        columns.iter().position(|c| c == name).ok_or_else(|| {
            InputError::InvalidInput(format!("triplet table is missing column '{name}'"))
        })
    };
    Ok(ColumnLayout {
        tf: find(COL_TF)?,
        region: find(COL_REGION)?,
        gene: find(COL_GENE)?,
        tf2g: find(COL_TF2G)?,
        r2g: find(COL_R2G)?,
    })
}

pub fn load_triplets(path: &Path) -> Result<TripletTable, InputError> {
    let mut reader = open_maybe_gz(path)?;
    read_triplets(reader.as_mut())
}

pub fn read_triplets(reader: &mut dyn BufRead) -> Result<TripletTable, InputError> {
    let mut buf = String::new();
    let (columns, mut line_no) = read_header(reader, &mut buf, "triplet table")?;
    let layout = locate_columns(&columns)?;

    let mut rows = Vec::new();
    let mut records = Vec::new();
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
        let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
        if fields.len() != columns.len() {
            return Err(InputError::Parse(format!(
                "triplet line {} has {} columns, header has {}",
                line_no,
                fields.len(),
                columns.len()
            )));
        }
        for (idx, name) in [(layout.tf, COL_TF), (layout.region, COL_REGION), (layout.gene, COL_GENE)]
        {
            if fields[idx].trim().is_empty() {
                return Err(InputError::InvalidInput(format!(
                    "empty {name} at line {line_no}"
                )));
            }
        }
        // only the parsed columns are trimmed; `rows` stays verbatim
        let record = TripletRecord::new(
            fields[layout.tf].trim(),
            fields[layout.region].trim(),
            fields[layout.gene].trim(),
            parse_f64(&fields[layout.tf2g], COL_TF2G, line_no)?,
            parse_f64(&fields[layout.r2g], COL_R2G, line_no)?,
        );
        records.push(record);
        rows.push(fields);
    }

    if records.is_empty() {
        return Err(InputError::InvalidInput(
            "triplet table has no rows".to_string(),
        ));
    }

    Ok(TripletTable {
        columns,
        rows,
        records,
    })
}
