pub use crate::config::*;

use std::collections::HashSet;

/// A builder for survey tables.
///
/// Readers feed it one row at a time. Short rows are padded with empty cells.
///
/// ```
/// pub use survey_report::builder::Builder;
/// # use survey_report::ReportErrors;
///
/// let mut builder = Builder::new(&["Team".to_string(), "Skill Utilization".to_string()])?;
///
/// builder.add_text_row(&["Backend", "4 - Well"])?;
/// builder.add_text_row(&["Frontend"])?;
///
/// let table = builder.build();
/// assert_eq!(table.num_rows(), 2);
/// # Ok::<(), ReportErrors>(())
/// ```
pub struct Builder {
    pub(crate) _columns: Vec<String>,
    pub(crate) _rows: Vec<Vec<RawCell>>,
}

impl Builder {
    pub fn new(header: &[String]) -> Result<Builder, ReportErrors> {
        if header.is_empty() {
            return Err(ReportErrors::EmptyTable);
        }
        let mut seen: HashSet<&String> = HashSet::new();
        for name in header {
            if !seen.insert(name) {
                return Err(ReportErrors::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }
        Ok(Builder {
            _columns: header.to_vec(),
            _rows: Vec::new(),
        })
    }

    /// Adds the answers of one respondent, in header order.
    pub fn add_row(&mut self, mut cells: Vec<RawCell>) -> Result<(), ReportErrors> {
        let expected = self._columns.len();
        if cells.len() > expected {
            return Err(ReportErrors::RowTooLong {
                row: self._rows.len() + 1,
                len: cells.len(),
                expected,
            });
        }
        cells.resize(expected, RawCell::Empty);
        self._rows.push(cells);
        Ok(())
    }

    /// Adds a row of text answers. Empty strings are missing answers.
    pub fn add_text_row(&mut self, cells: &[&str]) -> Result<(), ReportErrors> {
        self.add_row(cells.iter().map(|s| RawCell::from(*s)).collect())
    }

    pub fn build(self) -> SurveyTable {
        SurveyTable {
            columns: self._columns,
            rows: self._rows,
        }
    }
}
