//! Cohort summaries: group means and contingency counts.

use std::collections::HashMap;

use statrs::statistics::Statistics;
use strata_core::{CohortTable, Result};

/// Mean age within one stage group.
#[derive(Clone, Debug, PartialEq)]
pub struct StageAgeRow {
    pub stage: String,
    pub mean_age: f64,
}

/// Count of samples for one (stage, subtype) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossTabRow {
    pub stage: String,
    pub subtype: String,
    pub n: usize,
}

/// Mean over the finite values of a selection. Missing (NaN) entries are
/// excluded; an empty selection yields NaN, deliberately not an error.
fn finite_mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    values.filter(|v| v.is_finite()).mean()
}

/// Mean age over the samples whose sex code equals `sex` exactly
/// (case-sensitive). A sex value that matches no rows yields NaN.
pub fn mean_age_by_sex(data: &CohortTable, sex: &str) -> Result<f64> {
    let sexes = data.factor("Sex")?;
    let ages = data.numeric("Age")?;
    Ok(finite_mean(
        sexes
            .iter()
            .zip(ages.iter())
            .filter(|(s, _)| s.as_str() == sex)
            .map(|(_, &age)| age),
    ))
}

/// Mean age per observed stage, one row per stage level in
/// first-appearance order. Row order carries no meaning; compare by key.
pub fn age_by_stage(data: &CohortTable) -> Result<Vec<StageAgeRow>> {
    let stages = data.factor("Stage")?;
    let ages = data.numeric("Age")?;

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for (stage, &age) in stages.iter().zip(ages.iter()) {
        groups
            .entry(stage.as_str())
            .or_insert_with(|| {
                order.push(stage.as_str());
                Vec::new()
            })
            .push(age);
    }

    Ok(order
        .into_iter()
        .map(|stage| StageAgeRow {
            stage: stage.to_string(),
            mean_age: finite_mean(groups[stage].iter().copied()),
        })
        .collect())
}

/// Count samples per observed (stage, subtype) pair, in first-appearance
/// order. Only observed pairs appear; use [`expand_cross_tab`] for the
/// dense form with explicit zeros.
pub fn subtype_stage_cross_tab(data: &CohortTable) -> Result<Vec<CrossTabRow>> {
    let stages = data.factor("Stage")?;
    let subtypes = data.factor("Subtype")?;

    let mut order: Vec<(String, String)> = Vec::new();
    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for (stage, subtype) in stages.iter().zip(subtypes.iter()) {
        let key = (stage.clone(), subtype.clone());
        match counts.get_mut(&key) {
            Some(n) => *n += 1,
            None => {
                counts.insert(key.clone(), 1);
                order.push(key);
            }
        }
    }

    Ok(order
        .into_iter()
        .map(|key| {
            let n = counts[&key];
            let (stage, subtype) = key;
            CrossTabRow { stage, subtype, n }
        })
        .collect())
}

/// Expand an observed cross-tab over the full stage × subtype grid,
/// filling pairs absent from `observed` with a zero count. Output is
/// stage-major over the given level orders.
pub fn expand_cross_tab(
    observed: &[CrossTabRow],
    stage_levels: &[String],
    subtype_levels: &[String],
) -> Vec<CrossTabRow> {
    let counts: HashMap<(&str, &str), usize> = observed
        .iter()
        .map(|row| ((row.stage.as_str(), row.subtype.as_str()), row.n))
        .collect();

    let mut out = Vec::with_capacity(stage_levels.len() * subtype_levels.len());
    for stage in stage_levels {
        for subtype in subtype_levels {
            let n = counts
                .get(&(stage.as_str(), subtype.as_str()))
                .copied()
                .unwrap_or(0);
            out.push(CrossTabRow {
                stage: stage.clone(),
                subtype: subtype.clone(),
                n,
            });
        }
    }
    out
}
