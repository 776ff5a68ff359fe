/// Column-name, sheet-name and sentinel constants for tele-followup.
/// Single source of truth for everything the pipeline reads or writes.

// ── Row columns ─────────────────────────────────────────────────────────────
pub mod cols {
    /// Categorical call outcome, normalized in place during classification.
    pub const RESULT: &str = "RESULT";
    /// Reference/call date the follow-up offset is applied to.
    pub const TGL: &str = "TGL";
    /// Derived follow-up offset label: "1", "2", "3", "Next Month" or null.
    pub const FOLLOWUP_DAYS: &str = "FollowUp(Hari)";
    /// Derived concrete follow-up date (ISO string) or null.
    pub const FOLLOWUP_DATE: &str = "Tanggal FollowUp";
    /// Originating agent (= source sheet name), tagged at merge time.
    pub const TELE_LAMA: &str = "TELE_LAMA";
    /// Newly assigned agent, written by the allocator.
    pub const TELE_BARU: &str = "TELE_BARU";
    /// Processing date of the run, constant for all rows.
    pub const UPLOAD_DATE: &str = "Tanggal Upload";

    pub const MOBPHONE: &str = "CUST_MOBPHONE";
    pub const MOBPHONE_2: &str = "CUST_MOBPHONE_2";
}

// ── Output sheet names ──────────────────────────────────────────────────────
pub mod sheets {
    /// Aggregate follow-up sheet on the historical/affinity path.
    pub const AGGREGATE: &str = "FU Lanjutan";
    /// Aggregate processed sheet on the master-batch path.
    pub const MASTER_PROCESSED: &str = "Data_Terproses_Baru";

    pub const DUE_TOMORROW: &str = "FU Besok";
    pub const DUE_IN_2_DAYS: &str = "FU Lusa";
    pub const DUE_IN_3_DAYS: &str = "FU 3 Hari";
    pub const DUE_NEXT_MONTH: &str = "FU Next Month";

    /// Rows whose outcome has no follow-up.
    pub const NO_FOLLOWUP: &str = "Tidak Bisa FU";
}

// ── Cell values ─────────────────────────────────────────────────────────────
pub mod values {
    /// Offset label for the calendar-month increment.
    pub const NEXT_MONTH: &str = "Next Month";
    /// Sentinel for "no agent" (empty pool, or missing TELE_LAMA).
    pub const NOT_ASSIGNED: &str = "N/A";
}

/// Default filename substring marking a master/new-batch workbook.
pub const DEFAULT_MASTER_MARKER: &str = "_baru";
