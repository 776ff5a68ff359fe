//! Follow-up scheduling and workload-distribution engine for
//! call-campaign spreadsheets.
//!
//! One run merges uploaded sheets with provenance tagging, maps each
//! call outcome (`RESULT`) to a follow-up offset, computes the concrete
//! follow-up date, splits rows into follow-up / no-follow-up, routes the
//! follow-up rows to a pool of agents (pure round-robin for a master
//! batch, affinity-preserving round-robin for merged historical
//! batches) and assembles the named output sheets. Workbook (xlsx)
//! reading and writing stays with an external collaborator; tables are
//! all-string polars DataFrames.

mod allocate;
mod classify;
mod date;
mod engine;
mod error;
mod merge;
mod offset;
mod report;
mod rules;
pub mod schema;

pub use allocate::{assign_round_robin, assign_with_affinity};
pub use classify::{annotate, count_missing_reference, split};
pub use date::{follow_up_date, parse_date_soft};
pub use engine::{
    load_sheet_csv, read_csv_as_strings, FollowUpEngine, RunConfig, Sheet, Workbook,
};
pub use error::FollowUpError;
pub use merge::{is_master_file, merge_sheets, tag_provenance};
pub use offset::{normalize_outcome, offset_for, FollowUpOffset, OUTCOME_OFFSETS};
pub use report::{
    assemble_affinity, assemble_master, day_bucket, with_provenance_last, SheetNamer,
};
pub use rules::{filter_valid_phone, filter_values, Condition, Operator, Rule, RuleSet};
