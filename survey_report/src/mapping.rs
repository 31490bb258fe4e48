use log::{debug, info};
use std::collections::{HashMap, HashSet};

use crate::config::*;

/// A one-to-one association between raw question texts and canonical labels.
///
/// Built once from the configuration and never changed afterwards.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnMapping {
    entries: Vec<(String, String)>,
    by_raw: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl ColumnMapping {
    /// Pairs are `(raw question, canonical label)`. Fails if a question or a
    /// label appears twice.
    pub fn new(pairs: &[(String, String)]) -> Result<ColumnMapping, ReportErrors> {
        let mut by_raw: HashMap<String, usize> = HashMap::new();
        let mut by_label: HashMap<String, usize> = HashMap::new();
        for (idx, (raw, label)) in pairs.iter().enumerate() {
            if by_raw.insert(raw.clone(), idx).is_some() {
                return Err(ReportErrors::DuplicateMapping { value: raw.clone() });
            }
            if by_label.insert(label.clone(), idx).is_some() {
                return Err(ReportErrors::DuplicateMapping {
                    value: label.clone(),
                });
            }
        }
        Ok(ColumnMapping {
            entries: pairs.to_vec(),
            by_raw,
            by_label,
        })
    }

    pub fn label_for(&self, raw: &str) -> Option<&str> {
        self.by_raw.get(raw).map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn raw_for(&self, label: &str) -> Option<&str> {
        self.by_label.get(label).map(|&idx| self.entries[idx].0.as_str())
    }

    /// The canonical name of a column. Unmapped columns keep their name.
    pub fn rename<'a>(&'a self, raw: &'a str) -> &'a str {
        self.label_for(raw).unwrap_or(raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renames the columns of a table and checks that all the `required`
/// columns are present afterwards.
pub fn rename_table(
    table: SurveyTable,
    mapping: &ColumnMapping,
    required: &[String],
) -> Result<SurveyTable, ReportErrors> {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| mapping.rename(c).to_string())
        .collect();

    let mut seen: HashSet<&String> = HashSet::new();
    for c in columns.iter() {
        if !seen.insert(c) {
            return Err(ReportErrors::DuplicateColumn { column: c.clone() });
        }
    }
    for r in required {
        if !seen.contains(r) {
            return Err(ReportErrors::SchemaMismatch { column: r.clone() });
        }
    }

    let num_renamed = table
        .columns
        .iter()
        .filter(|c| mapping.label_for(c).is_some())
        .count();
    info!(
        "rename_table: renamed {} of {} columns",
        num_renamed,
        columns.len()
    );
    debug!("rename_table: columns: {:?}", columns);
    Ok(SurveyTable {
        columns,
        rows: table.rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn pairs(xs: &[(&str, &str)]) -> Vec<(String, String)> {
        xs.iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    fn table(header: &[&str]) -> SurveyTable {
        let h: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        let mut b = Builder::new(&h).unwrap();
        b.add_text_row(&header.iter().map(|_| "1").collect::<Vec<_>>())
            .unwrap();
        b.build()
    }

    #[test]
    fn lookup_both_ways() {
        let m = ColumnMapping::new(&pairs(&[("Which team are you on?", "Team")])).unwrap();
        assert_eq!(m.label_for("Which team are you on?"), Some("Team"));
        assert_eq!(m.raw_for("Team"), Some("Which team are you on?"));
        assert_eq!(m.rename("Timestamp"), "Timestamp");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn mapping_must_be_one_to_one() {
        let err = ColumnMapping::new(&pairs(&[("q1", "A"), ("q2", "A")])).unwrap_err();
        assert_eq!(
            err,
            ReportErrors::DuplicateMapping {
                value: "A".to_string()
            }
        );
        let err = ColumnMapping::new(&pairs(&[("q1", "A"), ("q1", "B")])).unwrap_err();
        assert_eq!(
            err,
            ReportErrors::DuplicateMapping {
                value: "q1".to_string()
            }
        );
    }

    #[test]
    fn unmapped_columns_pass_through() {
        let m = ColumnMapping::new(&pairs(&[("q1", "A")])).unwrap();
        let t = rename_table(table(&["Timestamp", "q1"]), &m, &["A".to_string()]).unwrap();
        assert_eq!(t.columns(), &["Timestamp".to_string(), "A".to_string()]);
        assert_eq!(t.num_rows(), 1);
    }

    #[test]
    fn missing_required_column_is_named() {
        let m = ColumnMapping::new(&pairs(&[("q1", "A"), ("q2", "B")])).unwrap();
        let err = rename_table(
            table(&["q1"]),
            &m,
            &["A".to_string(), "B".to_string()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReportErrors::SchemaMismatch {
                column: "B".to_string()
            }
        );
    }

    #[test]
    fn renaming_onto_an_existing_column_fails() {
        let m = ColumnMapping::new(&pairs(&[("q1", "Team")])).unwrap();
        let err = rename_table(table(&["q1", "Team"]), &m, &[]).unwrap_err();
        assert_eq!(
            err,
            ReportErrors::DuplicateColumn {
                column: "Team".to_string()
            }
        );
    }
}
