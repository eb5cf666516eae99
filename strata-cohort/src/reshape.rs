//! Column renaming, projection, and stage derivation for cohort tables.

use strata_core::{CohortTable, Column, Result};

/// The canonical analysis columns, as (canonical name, raw source name).
/// Age, subtype, and batch carry awkward names in the raw annotation; the
/// rest keep theirs.
const SELECTED: &[(&str, &str)] = &[
    ("Sex", "Sex"),
    ("Age", "Age_at_diagnosis"),
    ("TNM_Stage", "TNM_Stage"),
    ("Tumor_Location", "Tumor_Location"),
    ("geo_accession", "geo_accession"),
    ("KRAS_Mutation", "KRAS_Mutation"),
    ("Subtype", "SixSubtypesClassification"),
    ("Batch", "normalizationcombatbatch"),
];

/// Rename the awkward raw fields to canonical names and project the table
/// down to the eight analysis columns. Values are copied untouched; the
/// input table is not modified. Fails if any required source column is
/// absent.
pub fn rename_and_select(raw: &CohortTable) -> Result<CohortTable> {
    let mut out = CohortTable::new();
    for &(canonical, source) in SELECTED {
        let column = raw.column(source)?.clone();
        out.push(canonical, column)?;
    }
    Ok(out)
}

/// Derive the categorical `Stage` column from the raw TNM code:
/// `"stage " + code`. Works whether the raw code column is stored as a
/// factor or as numbers. Returns a new table with `Stage` appended and
/// every other column unchanged.
pub fn stage_as_factor(data: &CohortTable) -> Result<CohortTable> {
    let stages: Vec<String> = match data.column("TNM_Stage")? {
        Column::Factor(vals) => vals.iter().map(|v| format!("stage {}", v)).collect(),
        Column::Numeric(vals) => vals.iter().map(|v| format!("stage {}", v)).collect(),
    };
    let mut out = data.clone();
    out.push_factor("Stage", stages)?;
    Ok(out)
}
