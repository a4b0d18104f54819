use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use tracing::warn;

use crate::input::{InputError, open_maybe_gz};

/// TF name -> names of the motifs annotated to it.
pub type MotifGroups = BTreeMap<String, Vec<String>>;

/// Reads `TF<TAB>motif1,motif2,...` lines. A leading header whose first
/// column is `TF` is skipped.
pub fn load_motif_groups(path: &Path) -> Result<MotifGroups, InputError> {
    let mut reader = open_maybe_gz(path)?;
    read_motif_groups(reader.as_mut())
}

pub fn read_motif_groups(reader: &mut dyn BufRead) -> Result<MotifGroups, InputError> {
    let mut buf = String::new();
    let mut groups = MotifGroups::new();
    let mut line_no = 0usize;
    let mut first_content = true;

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
        let mut cols = line.splitn(2, '\t');
        let tf = cols.next().unwrap_or("").trim();
        let motifs_raw = cols.next().unwrap_or("").trim();
        if first_content {
            first_content = false;
            if tf.eq_ignore_ascii_case("tf") {
                continue;
            }
        }
        if tf.is_empty() {
            return Err(InputError::Parse(format!(
                "motif group line {line_no} has an empty TF name"
            )));
        }
        let motifs = split_motif_list(motifs_raw);
        match groups.get_mut(tf) {
            Some(existing) => {
                warn!("duplicate TF {tf} in motif groups (line {line_no}); merging motif lists");
                for m in motifs {
                    if !existing.contains(&m) {
                        existing.push(m);
                    }
                }
            }
            None => {
                groups.insert(tf.to_string(), motifs);
            }
        }
    }

    if groups.is_empty() {
        return Err(InputError::InvalidInput(
            "motif group table has no TFs".to_string(),
        ));
    }
    Ok(groups)
}

/// Splits a comma-separated motif list, dropping blank entries.
pub fn split_motif_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
