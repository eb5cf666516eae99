//! strata-cohort: clinical-metadata reshaping and cohort summaries.
//!
//! The raw annotation table of a microarray study carries far more fields
//! than an analysis needs, under inconsistent names. This crate reshapes
//! that table to a canonical eight-column form, derives the categorical
//! `Stage` field from the raw TNM code, and computes the cohort summaries:
//! mean age by sex, mean age per stage, and the stage × subtype
//! contingency table (with dense expansion).

pub mod reshape;
pub mod summary;

pub use reshape::{rename_and_select, stage_as_factor};
pub use summary::{
    age_by_stage, expand_cross_tab, mean_age_by_sex, subtype_stage_cross_tab, CrossTabRow,
    StageAgeRow,
};
