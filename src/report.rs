use std::collections::HashSet;

use polars::prelude::*;

use crate::engine::Sheet;
use crate::error::FollowUpError;
use crate::schema::{cols, sheets, values};

/// Hands out unique output sheet names. First claim wins; later
/// collisions get a ` (2)`, ` (3)`, … suffix. Pass-through input sheets
/// are claimed first, so input names always beat derived/agent sheets.
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
        }
    }

    pub fn claim(&mut self, desired: &str) -> String {
        if self.used.insert(desired.to_string()) {
            return desired.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{desired} ({n})");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl Default for SheetNamer {
    fn default() -> Self {
        Self::new()
    }
}

/// Move the provenance columns (`TELE_LAMA`, `TELE_BARU`) to the end,
/// keeping every other column in place.
pub fn with_provenance_last(df: &DataFrame) -> Result<DataFrame, FollowUpError> {
    let provenance = [cols::TELE_LAMA, cols::TELE_BARU];
    let mut order: Vec<String> = df
        .get_column_names_str()
        .iter()
        .filter(|c| !provenance.contains(&c.as_ref()))
        .map(|c| c.to_string())
        .collect();
    for p in provenance {
        if df.schema().contains(p) {
            order.push(p.to_string());
        }
    }
    Ok(df.select(order)?)
}

/// Rows whose `FollowUp(Hari)` equals the given bucket label.
pub fn day_bucket(df: &DataFrame, label: &str) -> Result<DataFrame, FollowUpError> {
    let bucket = df
        .clone()
        .lazy()
        .filter(col(cols::FOLLOWUP_DAYS).eq(lit(label)))
        .collect()?;
    Ok(bucket)
}

/// Rows routed to one agent.
pub fn agent_rows(df: &DataFrame, agent: &str) -> Result<DataFrame, FollowUpError> {
    let rows = df
        .clone()
        .lazy()
        .filter(col(cols::TELE_BARU).eq(lit(agent)))
        .collect()?;
    Ok(rows)
}

/// No-follow-up rows never reach the allocator; their `TELE_BARU` is null.
fn with_null_tele_baru(df: &DataFrame) -> Result<DataFrame, FollowUpError> {
    let df = df
        .clone()
        .lazy()
        .with_columns([lit(NULL).cast(DataType::String).alias(cols::TELE_BARU)])
        .collect()?;
    Ok(df)
}

fn push_day_buckets(
    out: &mut Vec<Sheet>,
    namer: &mut SheetNamer,
    fu: &DataFrame,
) -> Result<(), FollowUpError> {
    let buckets = [
        (sheets::DUE_TOMORROW, "1"),
        (sheets::DUE_IN_2_DAYS, "2"),
        (sheets::DUE_IN_3_DAYS, "3"),
        (sheets::DUE_NEXT_MONTH, values::NEXT_MONTH),
    ];
    for (name, label) in buckets {
        out.push(Sheet {
            name: namer.claim(name),
            data: day_bucket(fu, label)?,
        });
    }
    Ok(())
}

// The master path writes a sheet for every agent in the pool; the
// affinity path omits agents that ended up with no rows.
fn push_agent_sheets(
    out: &mut Vec<Sheet>,
    namer: &mut SheetNamer,
    fu: &DataFrame,
    pool: &[String],
    skip_empty: bool,
) -> Result<(), FollowUpError> {
    for agent in pool {
        let rows = agent_rows(fu, agent)?;
        if rows.height() > 0 || !skip_empty {
            out.push(Sheet {
                name: namer.claim(agent),
                data: rows,
            });
        }
    }
    Ok(())
}

fn push_no_followup(
    out: &mut Vec<Sheet>,
    namer: &mut SheetNamer,
    no_follow_up: &DataFrame,
) -> Result<(), FollowUpError> {
    if no_follow_up.height() > 0 {
        out.push(Sheet {
            name: namer.claim(sheets::NO_FOLLOWUP),
            data: with_null_tele_baru(no_follow_up)?,
        });
    }
    Ok(())
}

/// Assemble the output groups for the historical/affinity path:
/// `FU Lanjutan` (allocated rows sorted by `TELE_BARU`, provenance
/// columns last), the four day buckets, non-empty agent sheets, and
/// `Tidak Bisa FU` when non-empty. Pure projection over the already
/// computed rows; nothing is recomputed here.
pub fn assemble_affinity(
    namer: &mut SheetNamer,
    follow_up: &DataFrame,
    no_follow_up: &DataFrame,
    pool: &[String],
) -> Result<Vec<Sheet>, FollowUpError> {
    let fu = follow_up.sort(
        [cols::TELE_BARU],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;
    let fu = with_provenance_last(&fu)?;

    let mut out = Vec::new();
    out.push(Sheet {
        name: namer.claim(sheets::AGGREGATE),
        data: fu.clone(),
    });
    push_day_buckets(&mut out, namer, &fu)?;
    push_agent_sheets(&mut out, namer, &fu, pool, true)?;
    push_no_followup(&mut out, namer, no_follow_up)?;
    Ok(out)
}

/// Assemble the output groups for the master-batch path:
/// `Data_Terproses_Baru` (allocated ∪ no-follow-up rows, sorted by
/// `TELE_BARU` then `TELE_LAMA` with nulls last), one sheet per agent
/// in the pool, the four day buckets, and `Tidak Bisa FU` when
/// non-empty.
pub fn assemble_master(
    namer: &mut SheetNamer,
    follow_up: &DataFrame,
    no_follow_up: &DataFrame,
    pool: &[String],
) -> Result<Vec<Sheet>, FollowUpError> {
    let tidak = with_null_tele_baru(no_follow_up)?;
    let processed = crate::merge::merge_sheets(&[follow_up.clone(), tidak])?;
    let processed = processed.sort(
        [cols::TELE_BARU, cols::TELE_LAMA],
        SortMultipleOptions::default()
            .with_maintain_order(true)
            .with_nulls_last(true),
    )?;
    let processed = with_provenance_last(&processed)?;

    let mut out = Vec::new();
    out.push(Sheet {
        name: namer.claim(sheets::MASTER_PROCESSED),
        data: processed,
    });
    push_agent_sheets(&mut out, namer, follow_up, pool, false)?;
    push_day_buckets(&mut out, namer, follow_up)?;
    push_no_followup(&mut out, namer, no_follow_up)?;
    Ok(out)
}
