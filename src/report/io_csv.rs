// Primitives for reading CSV exports.

use std::fs::File;

use crate::report::{
    io_common::{header_name, simplify_file_name, unique_headers},
    *,
};
use survey_report::builder::Builder;

pub fn read_csv_survey(path: &Path) -> RpResult<SurveyTable> {
    let mut rdr = get_reader(path)?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1usize })?
        .iter()
        .enumerate()
        .map(|(idx, s)| header_name(idx, s))
        .collect();
    let header = unique_headers(header);
    debug!("read_csv_survey: header: {:?}", header);

    let mut builder = Builder::new(&header).context(PipelineSnafu {})?;
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is on the first line
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<RawCell> = line.iter().map(RawCell::from).collect();
        builder.add_row(cells).context(PipelineSnafu {})?;
    }
    let table = builder.build();
    info!(
        "read_csv_survey: {}: {} respondents",
        simplify_file_name(path),
        table.num_rows()
    );
    Ok(table)
}

// Short rows are padded later on, so the reader must accept ragged lines.
fn get_reader(path: &Path) -> RpResult<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu {
            path: path.display().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("export.csv");
        fs::write(&p, contents).unwrap();
        (dir, p)
    }

    #[test]
    fn reads_quoted_cells_and_pads_short_rows() {
        let (_dir, p) = write_csv(
            "Timestamp,\"Do you work primarily remotely or on-site?\",Score\n\
             2023/09/04,\"Remote, mostly\",4 - Well\n\
             2023/09/05,On-site\n",
        );
        let t = read_csv_survey(&p).unwrap();
        assert_eq!(
            t.columns(),
            &[
                "Timestamp".to_string(),
                "Do you work primarily remotely or on-site?".to_string(),
                "Score".to_string()
            ]
        );
        assert_eq!(t.num_rows(), 2);
        assert_eq!(
            t.rows()[0][1],
            RawCell::Text("Remote, mostly".to_string())
        );
        assert_eq!(t.rows()[1][2], RawCell::Empty);
    }

    #[test]
    fn strips_byte_order_mark() {
        let (_dir, p) = write_csv("\u{feff}Team,Score\nWeb,3\n");
        let t = read_csv_survey(&p).unwrap();
        assert_eq!(t.column_index("Team"), Some(0));
    }

    #[test]
    fn long_rows_are_rejected() {
        let (_dir, p) = write_csv("Team,Score\nWeb,3\nData,4,extra\n");
        assert!(matches!(
            read_csv_survey(&p),
            Err(ReportError::Pipeline {
                source: ReportErrors::RowTooLong { row: 2, .. }
            })
        ));
    }

    #[test]
    fn repeated_unused_header_is_kept_apart() {
        let (_dir, p) = write_csv("Team,Comments,Comments,Score\nWeb,fine,none,4 - Well\n");
        let t = read_csv_survey(&p).unwrap();
        assert_eq!(
            t.columns(),
            &[
                "Team".to_string(),
                "Comments".to_string(),
                "Comments.1".to_string(),
                "Score".to_string()
            ]
        );
        assert_eq!(t.rows()[0][2], RawCell::Text("none".to_string()));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_csv_survey(&dir.path().join("nope.csv")),
            Err(ReportError::OpeningCsv { .. })
        ));
    }
}
