use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info, warn};
use polars::prelude::*;
use serde::Deserialize;

use crate::error::FollowUpError;
use crate::report::SheetNamer;
use crate::schema::DEFAULT_MASTER_MARKER;
use crate::{allocate, classify, merge, report};

/// One named table, as read from (or written to) a workbook.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub data: DataFrame,
}

/// An ordered set of sheets plus the filename it was uploaded under.
/// The filename decides master-batch vs. historical routing.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub file_name: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            sheets: Vec::new(),
        }
    }

    pub fn push_sheet(&mut self, name: impl Into<String>, data: DataFrame) {
        self.sheets.push(Sheet {
            name: name.into(),
            data,
        });
    }
}

/// Run-scoped configuration. Nothing here persists between runs, and
/// the processing date is passed in explicitly rather than read from
/// ambient clock state inside the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Processing date stamped on every merged row (`Tanggal Upload`)
    /// and used as the reference when `TGL` is missing.
    pub upload_date: NaiveDate,
    /// Target agent pool, in operator-supplied order.
    pub agents: Vec<String>,
    /// Filename substring that marks a master/new-batch workbook.
    pub master_marker: String,
    /// The historical path sorts the pool alphabetically before
    /// allocating; the master path never does. This mirrors the source
    /// workflow and is kept switchable until product clarifies it.
    pub sort_agents_on_affinity_path: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            upload_date: chrono::Local::now().date_naive(),
            agents: Vec::new(),
            master_marker: DEFAULT_MASTER_MARKER.to_string(),
            sort_agents_on_affinity_path: true,
        }
    }
}

/// Drives one full run: merge → classify → allocate → group.
///
/// The run is linear and synchronous; a fatal error (missing `RESULT`,
/// no eligible input) aborts before any output sheet is assembled.
pub struct FollowUpEngine {
    cfg: RunConfig,
}

impl FollowUpEngine {
    pub fn new(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    /// Process the uploaded workbooks into the output workbook.
    ///
    /// Output sheet order: every input sheet verbatim, then the derived
    /// groups (aggregate sheet, day buckets, agent sheets, unresolved).
    pub fn process(&self, workbooks: &[Workbook]) -> Result<Workbook, FollowUpError> {
        if workbooks.is_empty() {
            return Err(FollowUpError::NoInput("no files to process".to_string()));
        }

        let master = workbooks
            .iter()
            .find(|wb| merge::is_master_file(&wb.file_name, &self.cfg.master_marker));

        info!(
            "processing {} workbook(s), {} agent(s), {} path",
            workbooks.len(),
            self.cfg.agents.len(),
            if master.is_some() { "master" } else { "affinity" }
        );

        // Pass-through sheets claim their names first, so input names
        // always beat derived/agent sheets on collision.
        let mut namer = SheetNamer::new();
        let mut sheets = Vec::new();
        for wb in workbooks {
            for sheet in &wb.sheets {
                sheets.push(Sheet {
                    name: namer.claim(&sheet.name),
                    data: sheet.data.clone(),
                });
            }
        }

        // Derived sheets are fully computed before anything is handed
        // to the writer, so a fatal error leaves no partial output.
        let derived = match master {
            Some(master_wb) => self.run_master(master_wb, &mut namer)?,
            None => self.run_affinity(workbooks, &mut namer)?,
        };
        sheets.extend(derived);

        Ok(Workbook {
            file_name: "FU_Output_Final.xlsx".to_string(),
            sheets,
        })
    }

    /// Master-batch path: the first sheet of the master workbook is the
    /// whole batch; allocation is pure round-robin in operator order.
    fn run_master(
        &self,
        master_wb: &Workbook,
        namer: &mut SheetNamer,
    ) -> Result<Vec<Sheet>, FollowUpError> {
        let master_sheet = master_wb.sheets.first().ok_or_else(|| {
            FollowUpError::InvalidData(format!(
                "master workbook '{}' has no sheets",
                master_wb.file_name
            ))
        })?;

        let df = merge::tag_upload_date(&master_sheet.data, self.cfg.upload_date)?;
        let df = classify::annotate(df, self.cfg.upload_date)?;
        let df = merge::ensure_tele_lama(df)?;
        self.warn_missing_reference(&df)?;

        let (follow_up, no_follow_up) = classify::split(&df)?;
        debug!(
            "master batch: {} follow-up, {} unresolved",
            follow_up.height(),
            no_follow_up.height()
        );
        let follow_up = allocate::assign_round_robin(follow_up, &self.cfg.agents)?;

        report::assemble_master(namer, &follow_up, &no_follow_up, &self.cfg.agents)
    }

    /// Historical path: every sheet of every workbook is tagged with its
    /// provenance and merged; allocation preserves agent affinity.
    fn run_affinity(
        &self,
        workbooks: &[Workbook],
        namer: &mut SheetNamer,
    ) -> Result<Vec<Sheet>, FollowUpError> {
        let mut parts = Vec::new();
        for wb in workbooks {
            for sheet in &wb.sheets {
                parts.push(merge::tag_provenance(
                    &sheet.data,
                    &sheet.name,
                    self.cfg.upload_date,
                )?);
            }
        }

        let df = merge::merge_sheets(&parts)?;
        let df = classify::annotate(df, self.cfg.upload_date)?;
        self.warn_missing_reference(&df)?;

        let (follow_up, no_follow_up) = classify::split(&df)?;
        debug!(
            "historical batch: {} follow-up, {} unresolved",
            follow_up.height(),
            no_follow_up.height()
        );

        let mut pool = self.cfg.agents.clone();
        if self.cfg.sort_agents_on_affinity_path {
            pool.sort();
        }
        let follow_up = allocate::assign_with_affinity(follow_up, &pool)?;

        report::assemble_affinity(namer, &follow_up, &no_follow_up, &pool)
    }

    fn warn_missing_reference(&self, df: &DataFrame) -> Result<(), FollowUpError> {
        let missing = classify::count_missing_reference(df)?;
        if missing > 0 {
            warn!(
                "{missing} follow-up-eligible row(s) have an unparseable reference date; \
                 they stay eligible with an absent follow-up date"
            );
        }
        Ok(())
    }
}

/// Read a CSV sheet with every column as a nullable string, column
/// names trimmed. Stands in for the external workbook reader.
pub fn read_csv_as_strings(path: impl AsRef<Path>) -> Result<DataFrame, FollowUpError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;
    Ok(df)
}

/// Load one CSV file as a named sheet.
pub fn load_sheet_csv(name: &str, path: impl AsRef<Path>) -> Result<Sheet, FollowUpError> {
    Ok(Sheet {
        name: name.to_string(),
        data: read_csv_as_strings(path)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: RunConfig = serde_json::from_str(
            r#"{"upload_date": "2024-03-10", "agents": ["Sari", "Dewi"]}"#,
        )
        .unwrap();
        assert_eq!(cfg.upload_date.to_string(), "2024-03-10");
        assert_eq!(cfg.agents, ["Sari", "Dewi"]);
        assert_eq!(cfg.master_marker, "_baru");
        assert!(cfg.sort_agents_on_affinity_path);
    }

    #[test]
    fn no_workbooks_is_no_input() {
        let engine = FollowUpEngine::new(RunConfig::default());
        assert!(matches!(
            engine.process(&[]),
            Err(FollowUpError::NoInput(_))
        ));
    }
}
