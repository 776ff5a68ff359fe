use polars::prelude::*;

use crate::error::FollowUpError;
use crate::schema::{cols, values};

/// Strategy A: pure round-robin. Agents are cycled in pool order, one
/// per row in row order, so counts differ by at most 1 across agents.
///
/// An empty pool writes the `N/A` sentinel for every row.
pub fn assign_round_robin(
    mut df: DataFrame,
    pool: &[String],
) -> Result<DataFrame, FollowUpError> {
    let height = df.height();
    let labels: Vec<String> = if pool.is_empty() {
        vec![values::NOT_ASSIGNED.to_string(); height]
    } else {
        (0..height).map(|i| pool[i % pool.len()].clone()).collect()
    };
    df.with_column(Column::new(cols::TELE_BARU.into(), labels))?;
    Ok(df)
}

/// Strategy B: affinity-preserving round-robin. For each agent in pool
/// order, first claim every still-unassigned row whose `TELE_LAMA`
/// matches that agent exactly; remaining rows are then filled by cyclic
/// round-robin in their original relative order.
///
/// Affinity outranks balance, so final counts may be uneven.
pub fn assign_with_affinity(
    mut df: DataFrame,
    pool: &[String],
) -> Result<DataFrame, FollowUpError> {
    let height = df.height();
    if pool.is_empty() {
        let labels = vec![values::NOT_ASSIGNED.to_string(); height];
        df.with_column(Column::new(cols::TELE_BARU.into(), labels))?;
        return Ok(df);
    }

    let mut assigned: Vec<Option<String>> = vec![None; height];

    if df.schema().contains(cols::TELE_LAMA) {
        let previous = df.column(cols::TELE_LAMA)?.cast(&DataType::String)?;
        let previous = previous.str()?;
        for agent in pool {
            for i in 0..height {
                if assigned[i].is_none() && previous.get(i) == Some(agent.as_str()) {
                    assigned[i] = Some(agent.clone());
                }
            }
        }
    }

    let mut cursor = pool.iter().cycle();
    for slot in assigned.iter_mut() {
        if slot.is_none() {
            *slot = cursor.next().cloned();
        }
    }

    // every slot is filled: direct matches first, then the cycle
    let labels: Vec<String> = assigned
        .into_iter()
        .map(|v| v.unwrap_or_else(|| values::NOT_ASSIGNED.to_string()))
        .collect();
    df.with_column(Column::new(cols::TELE_BARU.into(), labels))?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn assignments(df: &DataFrame) -> Vec<String> {
        df.column(cols::TELE_BARU)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect()
    }

    #[test]
    fn round_robin_balances_counts() {
        let df = df!("RESULT" => ["r"; 7]).unwrap();
        let df = assign_round_robin(df, &pool(&["A", "B", "C"])).unwrap();
        let got = assignments(&df);
        assert_eq!(got, ["A", "B", "C", "A", "B", "C", "A"]);
        let count = |a: &str| got.iter().filter(|v| *v == a).count();
        assert_eq!((count("A"), count("B"), count("C")), (3, 2, 2));
    }

    #[test]
    fn empty_pool_yields_sentinel() {
        let df = df!("RESULT" => ["r"; 5]).unwrap();
        let df = assign_round_robin(df, &[]).unwrap();
        assert_eq!(assignments(&df), vec!["N/A"; 5]);

        let df = df!("RESULT" => ["r"; 5], "TELE_LAMA" => ["A"; 5]).unwrap();
        let df = assign_with_affinity(df, &[]).unwrap();
        assert_eq!(assignments(&df), vec!["N/A"; 5]);
    }

    #[test]
    fn affinity_keeps_rows_with_their_agent() {
        let df = df!(
            "RESULT" => ["r"; 5],
            "TELE_LAMA" => ["B", "X", "A", "B", "Y"],
        )
        .unwrap();
        let df = assign_with_affinity(df, &pool(&["A", "B"])).unwrap();
        // direct matches stay put; leftovers (X, Y) fill round-robin A, B
        assert_eq!(assignments(&df), ["B", "A", "A", "B", "B"]);
    }

    #[test]
    fn affinity_assigns_everyone_with_nonempty_pool() {
        let df = df!(
            "RESULT" => ["r"; 4],
            "TELE_LAMA" => [None::<&str>, Some("Z"), None, Some("A")],
        )
        .unwrap();
        let df = assign_with_affinity(df, &pool(&["A", "B"])).unwrap();
        let got = assignments(&df);
        assert!(got.iter().all(|v| v == "A" || v == "B"));
        assert_eq!(got[3], "A");
    }

    #[test]
    fn affinity_without_tele_lama_column_is_pure_round_robin() {
        let df = df!("RESULT" => ["r"; 4]).unwrap();
        let df = assign_with_affinity(df, &pool(&["A", "B"])).unwrap();
        assert_eq!(assignments(&df), ["A", "B", "A", "B"]);
    }
}
