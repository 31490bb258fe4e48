use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::report::{
    io_common::{header_name, simplify_file_name, unique_headers},
    *,
};
use survey_report::builder::Builder;

pub fn read_xlsx_survey(path: &Path, worksheet_name: Option<&str>) -> RpResult<SurveyTable> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyExcelSnafu {
        path: path.display().to_string(),
    })?;
    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, c)| header_name(idx, &cell_to_raw(c).key()))
        .collect();
    let header = unique_headers(header);
    debug!("read_xlsx_survey: header: {:?}", header);

    let mut builder = Builder::new(&header).context(PipelineSnafu {})?;
    for row in iter {
        let cells: Vec<RawCell> = row.iter().map(cell_to_raw).collect();
        builder.add_row(cells).context(PipelineSnafu {})?;
    }
    let table = builder.build();
    info!(
        "read_xlsx_survey: {}: {} respondents",
        simplify_file_name(path),
        table.num_rows()
    );
    Ok(table)
}

// Only text and numbers carry answers.
fn cell_to_raw(cell: &DataType) -> RawCell {
    match cell {
        DataType::String(s) => RawCell::from(s.as_str()),
        DataType::Float(f) => RawCell::Number(*f),
        DataType::Int(i) => RawCell::Number(*i as f64),
        DataType::Bool(b) => RawCell::Text(b.to_string()),
        DataType::Empty => RawCell::Empty,
        x => {
            debug!("cell_to_raw: ignoring cell {:?}", x);
            RawCell::Empty
        }
    }
}

fn get_range(path: &Path, worksheet_name: Option<&str>) -> RpResult<Range<DataType>> {
    let path_s = path.display().to_string();
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path_s.clone(),
    })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(EmptyExcelSnafu {
                path: path_s.clone(),
            })?
            .context(OpeningExcelSnafu { path: path_s })?,
        None => {
            let worksheets = workbook.worksheets();
            match worksheets.as_slice() {
                [(_, wrange)] => wrange.clone(),
                [] => return EmptyExcelSnafu { path: path_s }.fail(),
                _ => {
                    let names: Vec<&String> = worksheets.iter().map(|(n, _)| n).collect();
                    whatever!(
                        "{} has several worksheets {:?}, one must be chosen",
                        path_s,
                        names
                    )
                }
            }
        }
    };
    Ok(wrange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_raw(&DataType::String("".to_string())), RawCell::Empty);
        assert_eq!(
            cell_to_raw(&DataType::String("4 - Well".to_string())),
            RawCell::Text("4 - Well".to_string())
        );
        assert_eq!(cell_to_raw(&DataType::Int(7)), RawCell::Number(7.0));
        assert_eq!(cell_to_raw(&DataType::Float(2.5)), RawCell::Number(2.5));
        assert_eq!(cell_to_raw(&DataType::Empty), RawCell::Empty);
    }

    #[test]
    fn not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("export.xlsx");
        fs::write(&p, "Team,Score\n").unwrap();
        assert!(matches!(
            read_xlsx_survey(&p, None),
            Err(ReportError::OpeningExcel { .. })
        ));
    }
}
