use std::cmp::Ordering;
use std::collections::HashMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::require_columns;
use crate::error::FollowUpError;
use crate::schema::cols;

/// Comparison operator of one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
    Contains,
}

/// One column/operator/value(s) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

/// AND-combined conditions plus the label to emit on a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub conditions: Vec<Condition>,
    pub label: String,
}

/// Ordered rules evaluated first-match-wins, with a mandatory default.
/// Plain data (loadable from JSON) interpreted by `apply` — never
/// generated or executed source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    pub default_label: String,
}

/// `Gt/Ge/Lt/Le` compare numerically when both sides parse as f64,
/// lexicographically otherwise.
fn compare(cell: &str, value: &str) -> Ordering {
    match (cell.trim().parse::<f64>(), value.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => cell.cmp(value),
    }
}

impl Condition {
    /// A null cell only satisfies the negated operators.
    fn matches(&self, cell: Option<&str>) -> bool {
        match self.operator {
            Operator::Eq | Operator::In => {
                cell.is_some_and(|c| self.values.iter().any(|v| v == c))
            }
            Operator::Ne | Operator::NotIn => match cell {
                Some(c) => self.values.iter().all(|v| v != c),
                None => true,
            },
            Operator::Gt => self.ordered(cell, |o| o == Ordering::Greater),
            Operator::Ge => self.ordered(cell, |o| o != Ordering::Less),
            Operator::Lt => self.ordered(cell, |o| o == Ordering::Less),
            Operator::Le => self.ordered(cell, |o| o != Ordering::Greater),
            Operator::Contains => cell.is_some_and(|c| {
                let lower = c.to_lowercase();
                self.values.iter().any(|v| lower.contains(&v.to_lowercase()))
            }),
        }
    }

    fn ordered(&self, cell: Option<&str>, accept: impl Fn(Ordering) -> bool) -> bool {
        match (cell, self.values.first()) {
            (Some(c), Some(v)) => accept(compare(c, v)),
            _ => false,
        }
    }
}

impl RuleSet {
    pub fn from_json(json: &str) -> Result<Self, FollowUpError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a label column named `target` to the table. Every
    /// referenced column must exist; a missing one is fatal.
    pub fn apply(&self, df: &DataFrame, target: &str) -> Result<DataFrame, FollowUpError> {
        let referenced: Vec<&str> = self
            .rules
            .iter()
            .flat_map(|r| r.conditions.iter().map(|c| c.column.as_str()))
            .collect();
        require_columns(df, &referenced)?;

        // Cast every referenced column to strings once, up front.
        let mut casted: HashMap<&str, Column> = HashMap::new();
        for name in referenced {
            if !casted.contains_key(name) {
                casted.insert(name, df.column(name)?.cast(&DataType::String)?);
            }
        }

        let mut labels: Vec<&str> = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let label = self
                .rules
                .iter()
                .find(|rule| {
                    rule.conditions.iter().all(|cond| {
                        let cell = casted[cond.column.as_str()]
                            .str()
                            .ok()
                            .and_then(|ca| ca.get(i));
                        cond.matches(cell)
                    })
                })
                .map(|rule| rule.label.as_str())
                .unwrap_or(self.default_label.as_str());
            labels.push(label);
        }

        let mut out = df.clone();
        out.with_column(Column::new(target.into(), labels))?;
        Ok(out)
    }
}

/// Keep (or, with `exclude`, drop) rows whose column value is in `values`.
/// Null cells never match, so they are dropped on include and kept on
/// exclude, as in the source tool.
pub fn filter_values(
    df: &DataFrame,
    column: &str,
    values: &[String],
    exclude: bool,
) -> Result<DataFrame, FollowUpError> {
    require_columns(df, &[column])?;
    let casted = df.column(column)?.cast(&DataType::String)?;
    let ca = casted.str()?;
    let mask: BooleanChunked = ca
        .into_iter()
        .map(|cell| {
            let hit = cell.is_some_and(|c| values.iter().any(|v| v == c));
            Some(hit != exclude)
        })
        .collect();
    Ok(df.filter(&mask)?)
}

/// Keep rows with a usable mobile number: at least one of the two phone
/// columns starts with "08".
pub fn filter_valid_phone(df: &DataFrame) -> Result<DataFrame, FollowUpError> {
    require_columns(df, &[cols::MOBPHONE, cols::MOBPHONE_2])?;
    let hp1 = df.column(cols::MOBPHONE)?.cast(&DataType::String)?;
    let hp2 = df.column(cols::MOBPHONE_2)?.cast(&DataType::String)?;
    let hp1 = hp1.str()?;
    let hp2 = hp2.str()?;

    let starts = |v: Option<&str>| v.is_some_and(|s| s.trim().starts_with("08"));
    let mask: BooleanChunked = (0..df.height())
        .map(|i| Some(starts(hp1.get(i)) || starts(hp2.get(i))))
        .collect();
    Ok(df.filter(&mask)?)
}
