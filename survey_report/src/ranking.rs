use log::{debug, info};
use std::cmp::Ordering;

use crate::config::*;

/// A column together with the median of its present scores.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedColumn<'a> {
    pub column: &'a ScoreColumn,
    /// None if the column has no present score.
    pub median: Option<f64>,
}

/// A view of a score table with its columns sorted by descending median.
///
/// The medians are computed once when the view is built. The columns are
/// borrowed from the table, not copied.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedColumnSet<'a> {
    columns: Vec<RankedColumn<'a>>,
}

impl<'a> RankedColumnSet<'a> {
    pub fn columns(&self) -> &[RankedColumn<'a>] {
        &self.columns
    }

    pub fn labels(&self) -> Vec<&'a str> {
        self.columns.iter().map(|rc| rc.column.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The median of a set of scores, or None if it is empty.
pub fn median<I: IntoIterator<Item = u8>>(values: I) -> Option<f64> {
    let mut sorted: Vec<u8> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    }
}

// Columns without a median are lower than any column with one.
fn compare_medians(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Orders the columns of a table by descending median.
///
/// The sort is stable: columns with the same median keep their relative
/// order. Columns with no present score come last.
pub fn rank_by_median(table: &ScoreTable) -> RankedColumnSet<'_> {
    rank_columns(&table.columns)
}

/// Same as [`rank_by_median`], for columns that are not held in a table.
pub fn rank_columns(columns: &[ScoreColumn]) -> RankedColumnSet<'_> {
    let mut columns: Vec<RankedColumn> = columns
        .iter()
        .map(|column| {
            let m = median(column.present());
            debug!("rank_by_median: {:?}: median {:?}", column.label, m);
            RankedColumn { column, median: m }
        })
        .collect();
    columns.sort_by(|a, b| compare_medians(b.median, a.median));
    let res = RankedColumnSet { columns };
    info!("rank_by_median: order: {:?}", res.labels());
    res
}

/// The statistics needed to draw one box of a boxplot.
#[derive(PartialEq, Debug, Clone)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// The smallest score within 1.5 IQR below the first quartile.
    pub whisker_low: f64,
    /// The largest score within 1.5 IQR above the third quartile.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

// Linear interpolation between the closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl BoxStats {
    pub fn from_column(column: &ScoreColumn) -> Option<BoxStats> {
        let mut sorted: Vec<f64> = column.present().map(|x| x as f64).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;
        let whisker_low = sorted.iter().cloned().find(|x| *x >= low_fence).unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .cloned()
            .rev()
            .find(|x| *x <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .cloned()
            .filter(|x| *x < low_fence || *x > high_fence)
            .collect();
        Some(BoxStats {
            q1,
            median: quantile(&sorted, 0.5),
            q3,
            whisker_low,
            whisker_high,
            outliers,
            count: sorted.len(),
        })
    }
}
