// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of one cell of a survey export, before any coding.
///
/// Exports written as CSV only ever produce `Text` and `Empty`. Spreadsheet
/// exports may also carry numeric cells.
#[derive(PartialEq, Debug, Clone)]
pub enum RawCell {
    Text(String),
    Number(f64),
    /// A missing answer.
    Empty,
}

impl RawCell {
    /// The value of this cell when used as a grouping or category key.
    /// Empty cells map to the empty string.
    pub fn key(&self) -> String {
        match self {
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) => n.to_string(),
            RawCell::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(s.to_string())
        }
    }
}

/// A survey export: one row per respondent, one column per question.
///
/// Invariant: every row holds exactly one cell per column, and column names
/// are unique. Use the [`crate::builder::Builder`] to construct one.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<RawCell>>,
}

impl SurveyTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<RawCell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All the cells of one column, in row order.
    pub fn column_cells(&self, name: &str) -> Result<Vec<&RawCell>, ReportErrors> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| ReportErrors::UnknownColumn {
                column: name.to_string(),
            })?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

/// The numeric value of one answer after coding.
///
/// Absent scores are excluded from every statistic; they are never
/// treated as zero.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CodedScore {
    Score(u8),
    Absent,
}

impl CodedScore {
    pub fn value(&self) -> Option<u8> {
        match self {
            CodedScore::Score(x) => Some(*x),
            CodedScore::Absent => None,
        }
    }
}

/// One coded question.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoreColumn {
    pub label: String,
    pub scores: Vec<CodedScore>,
}

impl ScoreColumn {
    /// The values that were successfully coded, in row order.
    pub fn present(&self) -> impl Iterator<Item = u8> + '_ {
        self.scores.iter().filter_map(|s| s.value())
    }
}

/// A set of coded questions that all share the same rows.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoreTable {
    pub columns: Vec<ScoreColumn>,
    pub num_rows: usize,
}

impl ScoreTable {
    /// Keeps only the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> ScoreTable {
        let columns = self
            .columns
            .iter()
            .map(|c| ScoreColumn {
                label: c.label.clone(),
                scores: rows.iter().map(|&r| c.scores[r]).collect(),
            })
            .collect();
        ScoreTable {
            columns,
            num_rows: rows.len(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }
}

// ********* Configuration **********

/// How the questions of a survey are used in the report.
///
/// All the names are canonical labels, i.e. names after renaming.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportSettings {
    pub title: String,
    pub date: Option<String>,
    /// Size of the surveyed population, shown next to the number of answers.
    pub expected_respondents: Option<u32>,
    /// Likert questions, coded from their leading digit and ranked together.
    pub score_columns: Vec<String>,
    /// Questions analyzed on their own page, coded as whole numbers.
    pub metric_columns: Vec<String>,
    /// Questions shown as a pie chart of their answers.
    pub category_columns: Vec<String>,
    /// If set, the scores get ranked again for every value of this column.
    pub group_by: Option<String>,
    pub explanatory_text: String,
    /// Maximum width (in characters) of a line of explanatory text.
    pub explanatory_width: usize,
    /// Maximum width (in characters) of a line of an axis label.
    pub label_width: usize,
}

impl ReportSettings {
    pub const DEFAULT_EXPLANATORY_WIDTH: usize = 60;
    pub const DEFAULT_LABEL_WIDTH: usize = 11;

    /// Every column the pipeline reads after renaming.
    pub fn required_columns(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        res.extend(self.score_columns.iter().cloned());
        res.extend(self.metric_columns.iter().cloned());
        res.extend(self.category_columns.iter().cloned());
        res.extend(self.group_by.iter().cloned());
        res
    }
}

/// The text of the explanatory page when none is configured.
pub const BOXPLOT_EXPLANATION: &str = "How to read a boxplot:\n\nThe box: The box covers the range where most of the answers lie. Its lower edge is the value below which 25% of the answers fall. Its upper edge is the value below which 75% of the answers fall. Half of all the scores lie between these two edges.\n\nThe orange line: This is the median. The median splits the answers in two halves. Half of the scores are below this value and half are above it.\n\nThe whiskers: The lines leaving the box show how far the answers spread. They reach the furthest answers that are not outliers. Outliers are scores far away from all the others.\n\nThe points beyond the whiskers: Single points outside of the whiskers are outliers. They are scores much higher or much lower than most of the other answers.";

/// Errors that prevent the report from being assembled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportErrors {
    /// A column required downstream is missing after renaming.
    SchemaMismatch { column: String },
    /// The same question or label appears twice in a column mapping.
    DuplicateMapping { value: String },
    /// Two columns of a table share the same name.
    DuplicateColumn { column: String },
    /// A row holds more cells than the header.
    RowTooLong {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// Two sets of values that should describe the same rows differ in size.
    RowCountMismatch { expected: usize, found: usize },
    UnknownColumn { column: String },
    EmptyTable,
}

impl Error for ReportErrors {}

impl Display for ReportErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportErrors::SchemaMismatch { column } => {
                write!(f, "required column {:?} is missing after renaming", column)
            }
            ReportErrors::DuplicateMapping { value } => {
                write!(f, "{:?} appears more than once in the column mapping", value)
            }
            ReportErrors::DuplicateColumn { column } => {
                write!(f, "column {:?} appears more than once", column)
            }
            ReportErrors::RowTooLong { row, len, expected } => write!(
                f,
                "row {} has {} cells but the header only has {}",
                row, len, expected
            ),
            ReportErrors::RowCountMismatch { expected, found } => {
                write!(f, "expected {} rows but found {}", expected, found)
            }
            ReportErrors::UnknownColumn { column } => write!(f, "unknown column {:?}", column),
            ReportErrors::EmptyTable => write!(f, "the table has no columns"),
        }
    }
}
