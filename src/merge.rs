use chrono::NaiveDate;
use polars::functions::concat_df_diagonal;
use polars::prelude::*;

use crate::error::FollowUpError;
use crate::schema::{cols, values};

/// Master/new-batch workbooks are recognized by a filename substring,
/// case-insensitively.
pub fn is_master_file(file_name: &str, marker: &str) -> bool {
    file_name.to_lowercase().contains(&marker.to_lowercase())
}

/// Attach provenance to a historical sheet: `TELE_LAMA` = sheet name,
/// `Tanggal Upload` = the run's processing date. Overwrites any column
/// of the same name; nothing downstream touches these again (except the
/// allocator's `TELE_LAMA` fallback on the master path).
pub fn tag_provenance(
    df: &DataFrame,
    sheet_name: &str,
    upload_date: NaiveDate,
) -> Result<DataFrame, FollowUpError> {
    let tagged = df
        .clone()
        .lazy()
        .with_columns([
            lit(sheet_name).alias(cols::TELE_LAMA),
            lit(upload_date.to_string()).alias(cols::UPLOAD_DATE),
        ])
        .collect()?;
    Ok(tagged)
}

/// Stamp the run's processing date on a master table without touching
/// `TELE_LAMA`.
pub fn tag_upload_date(df: &DataFrame, upload_date: NaiveDate) -> Result<DataFrame, FollowUpError> {
    let tagged = df
        .clone()
        .lazy()
        .with_columns([lit(upload_date.to_string()).alias(cols::UPLOAD_DATE)])
        .collect()?;
    Ok(tagged)
}

/// A master table without a `TELE_LAMA` column gets the `N/A` sentinel;
/// an existing column is kept as-is.
pub fn ensure_tele_lama(df: DataFrame) -> Result<DataFrame, FollowUpError> {
    if df.schema().contains(cols::TELE_LAMA) {
        return Ok(df);
    }
    let df = df
        .lazy()
        .with_columns([lit(values::NOT_ASSIGNED).alias(cols::TELE_LAMA)])
        .collect()?;
    Ok(df)
}

/// Vertically merge tagged sheets, taking the union of their columns
/// (missing cells become null). Input order is preserved.
pub fn merge_sheets(parts: &[DataFrame]) -> Result<DataFrame, FollowUpError> {
    if parts.is_empty() {
        return Err(FollowUpError::NoInput(
            "no historical sheets to merge".to_string(),
        ));
    }
    Ok(concat_df_diagonal(parts)?)
}
