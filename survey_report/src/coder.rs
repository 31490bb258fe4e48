use log::debug;

use crate::config::*;

/// How the raw answers of a question are turned into scores.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Coding {
    /// Likert answers exported as `"<digit> <caption>"`, e.g. `"4 - Very well"`.
    /// Only the leading character is read.
    LeadingDigit,
    /// The whole cell is a number, e.g. a 0-10 recommendation score.
    WholeNumber,
}

/// Codes a Likert answer from its leading character.
///
/// Anything that is not text starting with an ASCII digit is absent: empty
/// cells, numeric cells and free text alike. A `"10 - ..."` answer codes as 1.
pub fn code_response(cell: &RawCell) -> CodedScore {
    match cell {
        RawCell::Text(s) => match s.chars().next().and_then(|c| c.to_digit(10)) {
            Some(d) => CodedScore::Score(d as u8),
            None => CodedScore::Absent,
        },
        RawCell::Number(_) | RawCell::Empty => CodedScore::Absent,
    }
}

/// Codes a cell holding a whole number between 0 and 255.
pub fn code_metric(cell: &RawCell) -> CodedScore {
    match cell {
        RawCell::Text(s) => match s.trim().parse::<u8>() {
            Ok(x) => CodedScore::Score(x),
            Err(_) => CodedScore::Absent,
        },
        RawCell::Number(n) if n.fract() == 0.0 && (0.0..=255.0).contains(n) => {
            CodedScore::Score(*n as u8)
        }
        RawCell::Number(_) | RawCell::Empty => CodedScore::Absent,
    }
}

/// Codes the given columns of a table, in the given order.
pub fn code_columns(
    table: &SurveyTable,
    labels: &[String],
    coding: Coding,
) -> Result<ScoreTable, ReportErrors> {
    let code: fn(&RawCell) -> CodedScore = match coding {
        Coding::LeadingDigit => code_response,
        Coding::WholeNumber => code_metric,
    };
    let mut columns: Vec<ScoreColumn> = Vec::new();
    for label in labels {
        let cells = table.column_cells(label)?;
        let scores: Vec<CodedScore> = cells.iter().map(|c| code(c)).collect();
        let num_absent = scores.iter().filter(|s| **s == CodedScore::Absent).count();
        debug!(
            "code_columns: {:?} coded with {:?}: {} present, {} absent",
            label,
            coding,
            scores.len() - num_absent,
            num_absent
        );
        columns.push(ScoreColumn {
            label: label.clone(),
            scores,
        });
    }
    Ok(ScoreTable {
        columns,
        num_rows: table.num_rows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn leading_digit_is_the_score() {
        for d in 0..10u8 {
            let cell = text(&format!("{} - some caption", d));
            assert_eq!(code_response(&cell), CodedScore::Score(d));
        }
        assert_eq!(code_response(&text("5")), CodedScore::Score(5));
        assert_eq!(code_response(&text("10 - Extremely")), CodedScore::Score(1));
    }

    #[test]
    fn uncodable_cells_are_absent() {
        assert_eq!(code_response(&RawCell::Empty), CodedScore::Absent);
        assert_eq!(code_response(&text("")), CodedScore::Absent);
        assert_eq!(code_response(&RawCell::Number(4.0)), CodedScore::Absent);
        assert_eq!(code_response(&text("Very well")), CodedScore::Absent);
        assert_eq!(code_response(&text(" 4 - leading space")), CodedScore::Absent);
    }

    #[test]
    fn metrics_use_the_whole_cell() {
        assert_eq!(code_metric(&text("10")), CodedScore::Score(10));
        assert_eq!(code_metric(&text(" 7 ")), CodedScore::Score(7));
        assert_eq!(code_metric(&RawCell::Number(9.0)), CodedScore::Score(9));
        assert_eq!(code_metric(&RawCell::Number(9.5)), CodedScore::Absent);
        assert_eq!(code_metric(&text("7 - likely")), CodedScore::Absent);
        assert_eq!(code_metric(&RawCell::Empty), CodedScore::Absent);
    }

    #[test]
    fn code_columns_keeps_requested_order() {
        let mut b = Builder::new(&["a".to_string(), "b".to_string()]).unwrap();
        b.add_text_row(&["1 x", "2 y"]).unwrap();
        b.add_text_row(&["", "3 z"]).unwrap();
        let t = b.build();
        let st = code_columns(&t, &["b".to_string(), "a".to_string()], Coding::LeadingDigit)
            .unwrap();
        assert_eq!(st.labels(), vec!["b", "a"]);
        assert_eq!(st.num_rows, 2);
        assert_eq!(
            st.columns[1].scores,
            vec![CodedScore::Score(1), CodedScore::Absent]
        );
    }

    #[test]
    fn code_columns_unknown_column() {
        let t = Builder::new(&["a".to_string()]).unwrap().build();
        let err = code_columns(&t, &["zz".to_string()], Coding::LeadingDigit).unwrap_err();
        assert_eq!(
            err,
            ReportErrors::UnknownColumn {
                column: "zz".to_string()
            }
        );
    }
}
