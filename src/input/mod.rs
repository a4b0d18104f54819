use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use thiserror::Error;

pub mod motifs;
pub mod rankdb;
pub mod regions;
pub mod triplets;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Opens a plain or gzip-compressed text file. Plain files are memory mapped.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        // SAFETY: the map is read-only and dropped with the reader.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Box::new(Cursor::new(mmap)))
    }
}

/// Reads the first non-empty line and splits it into trimmed tab-separated
/// column names.
pub(crate) fn read_header(
    reader: &mut dyn BufRead,
    buf: &mut String,
    what: &str,
) -> Result<(Vec<String>, usize), InputError> {
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = reader.read_line(buf)?;
        if read == 0 {
            return Err(InputError::Parse(format!("{what} is empty")));
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        let cols = line.split('\t').map(|s| s.trim().to_string()).collect();
        return Ok((cols, line_no));
    }
}

pub(crate) fn parse_f64(raw: &str, what: &str, line_no: usize) -> Result<f64, InputError> {
    raw.trim().parse::<f64>().map_err(|_| {
        InputError::Parse(format!(
            "invalid {what} '{}' at line {}",
            raw.trim(),
            line_no
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
