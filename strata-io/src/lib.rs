//! strata-io: expression-matrix loading for the strata toolkit.
//!
//! Expression sources arrive as delimited text in probe-by-sample layout:
//! the header row lists sample accessions, and every following row is a
//! probe identifier plus one intensity per sample. Loading transposes the
//! data into the sample-by-probe orientation the rest of the toolkit works
//! with, with the header accessions as the `subject_id` column.

use std::path::Path;

use ndarray::Array2;
use strata_core::{ExpressionMatrix, Result, StrataError};

/// Detect delimiter (tab, comma, space) in a file.
pub fn detect_delimiter<P: AsRef<Path>>(path: P) -> Result<u8> {
    let mut rdr = std::io::BufReader::new(std::fs::File::open(&path)?);
    let mut first_line = String::new();
    std::io::BufRead::read_line(&mut rdr, &mut first_line)?;
    if first_line.contains('\t') {
        Ok(b'\t')
    } else if first_line.contains(',') {
        Ok(b',')
    } else {
        Ok(b' ')
    }
}

fn parse_err(path: &Path, message: impl Into<String>) -> StrataError {
    StrataError::Parse {
        path: path.display().to_string(),
        message: message.into(),
    }
}

/// An empty cell or an NA marker counts as missing; anything else must be
/// a number.
fn parse_intensity(raw: &str) -> Option<f64> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") || raw.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

/// Load a probe-by-sample expression file into an [`ExpressionMatrix`].
///
/// The header row holds one accession per sample; each data row holds a
/// probe id followed by exactly one intensity per sample. Exactly the one
/// header row is consumed, so the resulting `subject_ids` count equals the
/// header field count and every data row becomes a probe column.
pub fn load_expression_matrix<P: AsRef<Path>>(path: P) -> Result<ExpressionMatrix> {
    let path = path.as_ref();
    let delim = detect_delimiter(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| parse_err(path, e.to_string()))?;

    let mut records = rdr.records();
    let header = match records.next() {
        Some(rec) => rec.map_err(|e| parse_err(path, e.to_string()))?,
        None => return Err(parse_err(path, "file is empty")),
    };
    let subject_ids: Vec<String> = header.iter().map(|s| s.to_string()).collect();
    let n_samples = subject_ids.len();

    let mut probe_ids = Vec::new();
    let mut probe_rows: Vec<Vec<f64>> = Vec::new();
    let mut missing_cells = 0usize;

    for (idx, rec) in records.enumerate() {
        let rec = rec.map_err(|e| parse_err(path, e.to_string()))?;
        let line = idx + 2;
        if rec.len() != n_samples + 1 {
            return Err(parse_err(
                path,
                format!(
                    "row {} has {} fields, expected {}",
                    line,
                    rec.len(),
                    n_samples + 1
                ),
            ));
        }
        probe_ids.push(rec.get(0).unwrap_or("").to_string());

        let mut row = Vec::with_capacity(n_samples);
        for j in 1..rec.len() {
            let raw = rec.get(j).unwrap_or("");
            let val = parse_intensity(raw).ok_or_else(|| {
                parse_err(
                    path,
                    format!("row {}, field {}: cannot parse intensity '{}'", line, j + 1, raw),
                )
            })?;
            if val.is_nan() {
                missing_cells += 1;
            }
            row.push(val);
        }
        probe_rows.push(row);
    }

    if probe_ids.is_empty() {
        return Err(parse_err(path, "no probe rows after the header"));
    }
    if missing_cells > 0 {
        log::warn!(
            "{} missing intensity cells in {}",
            missing_cells,
            path.display()
        );
    }

    // Transpose: file rows are probes, matrix rows are samples.
    let n_probes = probe_ids.len();
    let mut intensities = Array2::<f64>::zeros((n_samples, n_probes));
    for (i, row) in probe_rows.iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            intensities[(j, i)] = val;
        }
    }

    ExpressionMatrix::new(subject_ids, probe_ids, intensities)
}
