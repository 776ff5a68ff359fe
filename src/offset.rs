use crate::schema::values;

/// Follow-up waiting period derived from a call outcome.
///
/// `None` at the lookup level means the outcome is terminal or unrecognized
/// and the row gets no follow-up at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpOffset {
    /// Wait this many calendar days.
    Days(u8),
    /// Re-contact in the next calendar month (month-arithmetic, not +30d).
    NextMonth,
}

impl FollowUpOffset {
    /// Label written into the `FollowUp(Hari)` column.
    pub fn label(&self) -> &'static str {
        match self {
            FollowUpOffset::Days(1) => "1",
            FollowUpOffset::Days(2) => "2",
            FollowUpOffset::Days(3) => "3",
            // The outcome table only produces 1-3 day offsets.
            FollowUpOffset::Days(_) => unreachable!("offset table only holds 1-3 day offsets"),
            FollowUpOffset::NextMonth => values::NEXT_MONTH,
        }
    }
}

/// Fixed outcome → offset table. Keys are normalized (title-case) labels.
pub const OUTCOME_OFFSETS: [(&str, Option<FollowUpOffset>); 11] = [
    ("Tanya Pasangan", Some(FollowUpOffset::Days(1))),
    ("Tanya-Tanya", Some(FollowUpOffset::Days(1))),
    ("Belum Minat", Some(FollowUpOffset::Days(3))),
    ("Angsuran Masih Panjang", Some(FollowUpOffset::NextMonth)),
    ("Plafond Rendah", Some(FollowUpOffset::Days(2))),
    ("Tidak Aktif", Some(FollowUpOffset::NextMonth)),
    ("Tidak Terdaftar", None),
    ("Tidak Diangkat", Some(FollowUpOffset::Days(1))),
    ("Dialihkan/Sibuk", Some(FollowUpOffset::NextMonth)),
    ("Janji Telpon Ulang", Some(FollowUpOffset::Days(1))),
    ("Bunga Tinggi", Some(FollowUpOffset::Days(2))),
];

/// Normalize a raw outcome label: trim, then title-case every
/// alphabetic run (any non-alphabetic character is a word boundary,
/// so "dialihkan/sibuk" → "Dialihkan/Sibuk").
pub fn normalize_outcome(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Look up the offset for a normalized outcome label.
/// Unknown labels yield `None` (no follow-up).
pub fn offset_for(outcome: &str) -> Option<FollowUpOffset> {
    OUTCOME_OFFSETS
        .iter()
        .find(|(label, _)| *label == outcome)
        .and_then(|(_, offset)| *offset)
}
