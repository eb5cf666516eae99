//! strata-core: shared data structures for the strata toolkit.
//!
//! Two table types flow through every strata operation: [`CohortTable`]
//! holds clinical sample metadata (named numeric and factor columns), and
//! [`ExpressionMatrix`] holds microarray intensities (samples × probes).
//! Both are built once and read downstream; transformations return new
//! values instead of mutating their inputs.

use std::collections::{HashMap, HashSet};

use ndarray::Array2;
use thiserror::Error;

pub type SampleId = String;
pub type ProbeId = String;

pub type Result<T> = std::result::Result<T, StrataError>;

/// Error kinds for strata operations.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Source file is malformed or unreadable.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// A required column is absent from the table.
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    /// A required column exists but holds the wrong kind of data.
    #[error("column '{column}' is not {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// A column's length does not match the rest of the table.
    #[error("column '{column}' has {got} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },

    /// An identifier that must be unique appeared twice.
    #[error("duplicate {what} '{id}'")]
    Duplicate { what: &'static str, id: String },

    /// Too few usable observations for a sample variance.
    #[error("probe '{probe}' has {observations} usable observations; sample variance needs at least 2")]
    Dimension { probe: ProbeId, observations: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Replace every `.` in a column-name-like string with `_`.
pub fn period_to_underscore(name: &str) -> String {
    name.replace('.', "_")
}

/// A single named column of a [`CohortTable`]: numeric (NaN = missing) or
/// categorical.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Factor(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(vals) => vals.len(),
            Column::Factor(vals) => vals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Clinical annotation table: one row per sample, named columns kept in
/// insertion order. All columns have the same length, enforced when a
/// column is added.
#[derive(Clone, Debug, Default)]
pub struct CohortTable {
    names: Vec<String>,
    columns: HashMap<String, Column>,
    n_rows: usize,
}

impl CohortTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Add a column under a fresh name. The first column fixes the row
    /// count for the whole table.
    pub fn push(&mut self, name: &str, column: Column) -> Result<()> {
        if self.columns.contains_key(name) {
            return Err(StrataError::Duplicate {
                what: "column",
                id: name.to_string(),
            });
        }
        if !self.names.is_empty() && column.len() != self.n_rows {
            return Err(StrataError::ColumnLength {
                column: name.to_string(),
                expected: self.n_rows,
                got: column.len(),
            });
        }
        self.n_rows = column.len();
        self.names.push(name.to_string());
        self.columns.insert(name.to_string(), column);
        Ok(())
    }

    pub fn push_numeric(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        self.push(name, Column::Numeric(values))
    }

    pub fn push_factor(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        self.push(name, Column::Factor(values))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.get(name).ok_or_else(|| StrataError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Typed accessor for a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(vals) => Ok(vals),
            Column::Factor(_) => Err(StrataError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    /// Typed accessor for a factor column.
    pub fn factor(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Factor(vals) => Ok(vals),
            Column::Numeric(_) => Err(StrataError::ColumnType {
                column: name.to_string(),
                expected: "a factor",
            }),
        }
    }

    /// Distinct values of a factor column, in first-appearance order.
    pub fn factor_levels(&self, name: &str) -> Result<Vec<String>> {
        let vals = self.factor(name)?;
        let mut seen = HashSet::new();
        let mut levels = Vec::new();
        for v in vals {
            if seen.insert(v.as_str()) {
                levels.push(v.clone());
            }
        }
        Ok(levels)
    }
}

/// Expression intensity matrix: samples × probes. Missing intensities are
/// NaN. Loaded once and read-only downstream.
#[derive(Clone, Debug)]
pub struct ExpressionMatrix {
    pub subject_ids: Vec<SampleId>,
    pub probe_ids: Vec<ProbeId>,
    /// shape: (n_samples, n_probes)
    pub intensities: Array2<f64>,
}

impl ExpressionMatrix {
    /// Build a matrix, checking that the identifier lists match the matrix
    /// dimensions and that subject ids are unique. Duplicate probe ids are
    /// tolerated but logged, since they indicate a malformed source.
    pub fn new(
        subject_ids: Vec<SampleId>,
        probe_ids: Vec<ProbeId>,
        intensities: Array2<f64>,
    ) -> Result<Self> {
        let (n_samples, n_probes) = intensities.dim();
        if subject_ids.len() != n_samples {
            return Err(StrataError::ColumnLength {
                column: "subject_id".to_string(),
                expected: n_samples,
                got: subject_ids.len(),
            });
        }
        if probe_ids.len() != n_probes {
            return Err(StrataError::ColumnLength {
                column: "probe".to_string(),
                expected: n_probes,
                got: probe_ids.len(),
            });
        }

        let mut seen = HashSet::new();
        for id in &subject_ids {
            if !seen.insert(id.as_str()) {
                return Err(StrataError::Duplicate {
                    what: "subject_id",
                    id: id.clone(),
                });
            }
        }

        let mut seen_probes = HashSet::new();
        for id in &probe_ids {
            if !seen_probes.insert(id.as_str()) {
                log::warn!("duplicate probe id '{}' in expression matrix", id);
            }
        }

        Ok(Self {
            subject_ids,
            probe_ids,
            intensities,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.subject_ids.len()
    }

    pub fn n_probes(&self) -> usize {
        self.probe_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn period_to_underscore_replaces_every_dot() {
        assert_eq!(period_to_underscore("foo.bar"), "foo_bar");
        assert_eq!(period_to_underscore("a.b.c"), "a_b_c");
        assert_eq!(period_to_underscore("..x."), "__x_");
    }

    #[test]
    fn period_to_underscore_leaves_plain_strings_alone() {
        assert_eq!(period_to_underscore("geo_accession"), "geo_accession");
        assert_eq!(period_to_underscore(""), "");
    }

    #[test]
    fn cohort_table_preserves_column_order() {
        let mut t = CohortTable::new();
        t.push_factor("Sex", vec!["F".into(), "M".into()]).unwrap();
        t.push_numeric("Age", vec![61.0, 47.0]).unwrap();
        assert_eq!(t.column_names(), &["Sex".to_string(), "Age".to_string()]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.numeric("Age").unwrap(), &[61.0, 47.0]);
    }

    #[test]
    fn cohort_table_rejects_ragged_columns() {
        let mut t = CohortTable::new();
        t.push_numeric("Age", vec![61.0, 47.0]).unwrap();
        let err = t.push_factor("Sex", vec!["F".into()]).unwrap_err();
        assert!(matches!(err, StrataError::ColumnLength { .. }));
    }

    #[test]
    fn cohort_table_rejects_duplicate_names() {
        let mut t = CohortTable::new();
        t.push_numeric("Age", vec![61.0]).unwrap();
        let err = t.push_numeric("Age", vec![47.0]).unwrap_err();
        assert!(matches!(err, StrataError::Duplicate { .. }));
    }

    #[test]
    fn missing_and_mistyped_columns_are_distinct_errors() {
        let mut t = CohortTable::new();
        t.push_factor("Sex", vec!["F".into()]).unwrap();
        assert!(matches!(
            t.numeric("Age").unwrap_err(),
            StrataError::MissingColumn { .. }
        ));
        assert!(matches!(
            t.numeric("Sex").unwrap_err(),
            StrataError::ColumnType { .. }
        ));
    }

    #[test]
    fn factor_levels_are_distinct_in_first_appearance_order() {
        let mut t = CohortTable::new();
        t.push_factor(
            "Stage",
            vec!["II".into(), "I".into(), "II".into(), "IV".into()],
        )
        .unwrap();
        assert_eq!(t.factor_levels("Stage").unwrap(), vec!["II", "I", "IV"]);
    }

    #[test]
    fn expression_matrix_checks_dimensions() {
        let err = ExpressionMatrix::new(
            vec!["GSM1".into()],
            vec!["p1".into(), "p2".into()],
            array![[1.0, 2.0], [3.0, 4.0]],
        )
        .unwrap_err();
        assert!(matches!(err, StrataError::ColumnLength { .. }));
    }

    #[test]
    fn expression_matrix_rejects_duplicate_subjects() {
        let err = ExpressionMatrix::new(
            vec!["GSM1".into(), "GSM1".into()],
            vec!["p1".into()],
            array![[1.0], [2.0]],
        )
        .unwrap_err();
        assert!(matches!(err, StrataError::Duplicate { .. }));
    }
}
