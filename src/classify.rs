use chrono::NaiveDate;
use polars::prelude::*;

use crate::date::{follow_up_date, parse_date_soft};
use crate::error::FollowUpError;
use crate::offset::{normalize_outcome, offset_for};
use crate::schema::cols;

pub(crate) fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), FollowUpError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(FollowUpError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Read a column as nullable strings regardless of its current dtype.
fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, FollowUpError> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    let ca = casted.str()?;
    Ok(ca.into_iter().map(|v| v.map(|s| s.to_string())).collect())
}

/// Annotate a merged table with the derived follow-up columns.
///
/// Normalizes `RESULT` in place, coerces `TGL` to an ISO date string
/// (null when unparseable; the run's upload date when the column is
/// missing entirely), and adds `FollowUp(Hari)` and `Tanggal FollowUp`.
///
/// A missing `RESULT` column is fatal for the run.
pub fn annotate(mut df: DataFrame, upload_date: NaiveDate) -> Result<DataFrame, FollowUpError> {
    require_columns(&df, &[cols::RESULT])?;
    let height = df.height();

    let normalized: Vec<Option<String>> = string_values(&df, cols::RESULT)?
        .into_iter()
        .map(|v| v.map(|s| normalize_outcome(&s)))
        .collect();

    let offsets: Vec<_> = normalized
        .iter()
        .map(|v| v.as_deref().and_then(offset_for))
        .collect();

    let references: Vec<Option<NaiveDate>> = if df.schema().contains(cols::TGL) {
        string_values(&df, cols::TGL)?
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_date_soft))
            .collect()
    } else {
        vec![Some(upload_date); height]
    };

    let day_labels: Vec<Option<&str>> = offsets.iter().map(|o| o.map(|o| o.label())).collect();
    let reference_strs: Vec<Option<String>> = references
        .iter()
        .map(|d| d.map(|d| d.to_string()))
        .collect();
    let followup_dates: Vec<Option<String>> = references
        .iter()
        .zip(&offsets)
        .map(|(reference, offset)| follow_up_date(*reference, *offset).map(|d| d.to_string()))
        .collect();

    df.with_column(Column::new(cols::RESULT.into(), normalized))?;
    df.with_column(Column::new(cols::TGL.into(), reference_strs))?;
    df.with_column(Column::new(cols::FOLLOWUP_DAYS.into(), day_labels))?;
    df.with_column(Column::new(cols::FOLLOWUP_DATE.into(), followup_dates))?;
    Ok(df)
}

/// Stable split into (follow-up rows, no-follow-up rows) on the
/// null-ness of `FollowUp(Hari)`. Conserves the total row count.
pub fn split(df: &DataFrame) -> Result<(DataFrame, DataFrame), FollowUpError> {
    let follow_up = df
        .clone()
        .lazy()
        .filter(col(cols::FOLLOWUP_DAYS).is_not_null())
        .collect()?;
    let no_follow_up = df
        .clone()
        .lazy()
        .filter(col(cols::FOLLOWUP_DAYS).is_null())
        .collect()?;
    Ok((follow_up, no_follow_up))
}

/// Rows that are follow-up eligible but have no computed date
/// (unparseable reference date). Surfaced as a run-level warning.
pub fn count_missing_reference(df: &DataFrame) -> Result<usize, FollowUpError> {
    let eligible = df
        .column(cols::FOLLOWUP_DAYS)?
        .as_materialized_series()
        .is_not_null();
    let dateless = df
        .column(cols::FOLLOWUP_DATE)?
        .as_materialized_series()
        .is_null();
    Ok((eligible & dateless).sum().unwrap_or(0) as usize)
}
