//! strata-expr: per-probe expression statistics.

use ndarray::Axis;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use strata_core::{ExpressionMatrix, ProbeId, Result, StrataError};

/// Summary statistics for one probe. Field order is the presentation
/// order: mean and variance come before the probe identifier.
#[derive(Clone, Debug)]
pub struct ProbeSummaryRow {
    pub mean_exp: f64,
    pub variance: f64,
    pub probe: ProbeId,
}

/// Per-probe mean and sample variance (denominator n − 1) across all
/// samples, ignoring missing (NaN) intensities. One row per probe, in
/// probe order. Probes are independent, so the computation fans out
/// across them; the interface stays synchronous.
pub fn summarize_expression(expr: &ExpressionMatrix) -> Result<Vec<ProbeSummaryRow>> {
    (0..expr.n_probes())
        .into_par_iter()
        .map(|i| {
            let column = expr.intensities.index_axis(Axis(1), i);
            let usable: Vec<f64> = column.iter().copied().filter(|v| v.is_finite()).collect();
            if usable.len() < 2 {
                return Err(StrataError::Dimension {
                    probe: expr.probe_ids[i].clone(),
                    observations: usable.len(),
                });
            }
            Ok(ProbeSummaryRow {
                mean_exp: usable.iter().mean(),
                variance: usable.iter().variance(),
                probe: expr.probe_ids[i].clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use strata_core::ExpressionMatrix;

    const TOLERANCE: f64 = 1e-12;

    fn matrix(subjects: &[&str], probes: &[&str], intensities: ndarray::Array2<f64>) -> ExpressionMatrix {
        ExpressionMatrix::new(
            subjects.iter().map(|s| s.to_string()).collect(),
            probes.iter().map(|s| s.to_string()).collect(),
            intensities,
        )
        .unwrap()
    }

    #[test]
    fn single_probe_mean_and_sample_variance() {
        // intensities 2, 4, 6: mean 4, sample variance (4 + 0 + 4) / 2 = 4
        let expr = matrix(&["GSM1", "GSM2", "GSM3"], &["p1"], array![[2.0], [4.0], [6.0]]);
        let summary = summarize_expression(&expr).unwrap();
        assert_eq!(summary.len(), 1);
        assert_relative_eq!(summary[0].mean_exp, 4.0, epsilon = TOLERANCE);
        assert_relative_eq!(summary[0].variance, 4.0, epsilon = TOLERANCE);
        assert_eq!(summary[0].probe, "p1");
    }

    #[test]
    fn rows_come_back_in_probe_order() {
        let expr = matrix(
            &["GSM1", "GSM2"],
            &["p1", "p2", "p3"],
            array![[1.0, 10.0, 100.0], [3.0, 30.0, 300.0]],
        );
        let summary = summarize_expression(&expr).unwrap();
        let probes: Vec<&str> = summary.iter().map(|r| r.probe.as_str()).collect();
        assert_eq!(probes, vec!["p1", "p2", "p3"]);
        assert_relative_eq!(summary[1].mean_exp, 20.0, epsilon = TOLERANCE);
    }

    #[test]
    fn missing_intensities_are_ignored() {
        let expr = matrix(
            &["GSM1", "GSM2", "GSM3"],
            &["p1"],
            array![[2.0], [f64::NAN], [6.0]],
        );
        let summary = summarize_expression(&expr).unwrap();
        assert_relative_eq!(summary[0].mean_exp, 4.0, epsilon = TOLERANCE);
        // two usable values: variance ((2-4)^2 + (6-4)^2) / 1 = 8
        assert_relative_eq!(summary[0].variance, 8.0, epsilon = TOLERANCE);
    }

    #[test]
    fn a_probe_with_one_usable_value_fails() {
        let expr = matrix(
            &["GSM1", "GSM2"],
            &["p1", "p2"],
            array![[1.0, 5.0], [2.0, f64::NAN]],
        );
        let err = summarize_expression(&expr).unwrap_err();
        match err {
            StrataError::Dimension { probe, observations } => {
                assert_eq!(probe, "p2");
                assert_eq!(observations, 1);
            }
            other => panic!("expected dimension error, got {:?}", other),
        }
    }
}
