use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::*;
use crate::ranking::{rank_by_median, RankedColumnSet};

/// The rows of a score table that share one value of the grouping column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Partition {
    /// The grouping value. Respondents who skipped the grouping question
    /// share the empty key.
    pub key: String,
    /// Positions of the rows in the full table, in table order.
    pub rows: Vec<usize>,
    pub scores: ScoreTable,
}

impl Partition {
    /// Ranks the columns using only the rows of this partition.
    ///
    /// A partition without any present score still ranks: every median is
    /// absent and the columns keep their input order.
    pub fn ranked(&self) -> RankedColumnSet<'_> {
        rank_by_median(&self.scores)
    }
}

/// Splits a score table by the value of a grouping column.
///
/// `keys` holds the grouping cell of every row. Partitions are sorted by key
/// (byte order), so the empty key comes first when present.
pub fn partition_by(
    scores: &ScoreTable,
    keys: &[&RawCell],
) -> Result<Vec<Partition>, ReportErrors> {
    if keys.len() != scores.num_rows {
        return Err(ReportErrors::RowCountMismatch {
            expected: scores.num_rows,
            found: keys.len(),
        });
    }
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, cell) in keys.iter().enumerate() {
        groups.entry(cell.key()).or_insert_with(Vec::new).push(idx);
    }

    let res: Vec<Partition> = groups
        .into_iter()
        .map(|(key, rows)| {
            debug!("partition_by: {:?}: {} rows", key, rows.len());
            let scores = scores.select_rows(&rows);
            Partition { key, rows, scores }
        })
        .collect();
    info!(
        "partition_by: {} rows split into {} partitions",
        scores.num_rows,
        res.len()
    );
    Ok(res)
}
