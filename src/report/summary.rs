use serde_json::json;
use serde_json::Value as JSValue;

use crate::report::*;

fn box_stats_to_json(b: &Option<BoxStats>) -> JSValue {
    match b {
        Some(b) => json!({
            "q1": b.q1,
            "q3": b.q3,
            "whiskerLow": b.whisker_low,
            "whiskerHigh": b.whisker_high,
            "outliers": b.outliers,
        }),
        None => JSValue::Null,
    }
}

fn page_to_json(idx: usize, page: &Page) -> JSValue {
    let mut js = json!({"page": idx + 1, "kind": page.kind()});
    let details = match page {
        Page::Cover { text } => json!({ "text": text }),
        Page::PieChart { title, slices } => {
            let l: Vec<JSValue> = slices
                .iter()
                .map(|s| {
                    json!({
                        "label": s.label,
                        "count": s.count.to_string(),
                        "percent": format!("{:.1}%", s.percent),
                    })
                })
                .collect();
            json!({ "title": title, "slices": l })
        }
        Page::Explanatory { text } => {
            let lines: Vec<&str> = text.display_lines().collect();
            json!({ "lines": lines })
        }
        Page::Distribution { title, columns } => {
            let l: Vec<JSValue> = columns
                .columns()
                .iter()
                .map(|rc| {
                    json!({
                        "label": rc.column.label,
                        "answers": rc.column.present().count().to_string(),
                        "median": rc.median,
                        "box": box_stats_to_json(&BoxStats::from_column(rc.column)),
                    })
                })
                .collect();
            json!({ "title": title, "columns": l })
        }
    };
    if let (Some(m), JSValue::Object(d)) = (js.as_object_mut(), details) {
        m.extend(d);
    }
    js
}

/// The content of a report in JSON, page by page.
pub fn build_summary_js(settings: &ReportSettings, respondents: usize, report: &Report) -> JSValue {
    let pages: Vec<JSValue> = report
        .pages
        .iter()
        .enumerate()
        .map(|(idx, p)| page_to_json(idx, p))
        .collect();
    json!({
        "config": {
            "title": settings.title,
            "date": settings.date,
            "respondents": respondents.to_string(),
            "expectedRespondents": settings.expected_respondents.map(|x| x.to_string()),
        },
        "pages": pages
    })
}

pub fn summary_string(settings: &ReportSettings, respondents: usize, report: &Report) -> RpResult<String> {
    let js = build_summary_js(settings, respondents, report);
    serde_json::to_string_pretty(&js).context(ParsingJsonSnafu {})
}

/// Writes the JSON summary of a report to a file or to the standard output.
pub struct SummaryRenderer {
    path: String,
    settings: ReportSettings,
    respondents: usize,
}

impl SummaryRenderer {
    /// `path` may be `stdout`.
    pub fn new(path: String, settings: ReportSettings, respondents: usize) -> SummaryRenderer {
        SummaryRenderer {
            path,
            settings,
            respondents,
        }
    }
}

impl ReportRenderer for SummaryRenderer {
    fn render(&self, report: &Report) -> RpResult<()> {
        let pretty = summary_string(&self.settings, self.respondents, report)?;
        if self.path == "stdout" {
            println!("{}", pretty);
        } else {
            fs::write(&self.path, pretty).context(WritingSummarySnafu {
                path: self.path.clone(),
            })?;
            info!("render: wrote summary to {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_numbered_and_typed() {
        let report = Report {
            pages: vec![
                Page::Cover {
                    text: "Survey\nn = 3".to_string(),
                },
                Page::PieChart {
                    title: "Team".to_string(),
                    slices: vec![
                        PieSlice {
                            label: "Web".to_string(),
                            count: 2,
                            percent: 200.0 / 3.0,
                        },
                        PieSlice {
                            label: "Data".to_string(),
                            count: 1,
                            percent: 100.0 / 3.0,
                        },
                    ],
                },
            ],
        };
        let settings = ReportSettings {
            title: "Survey".to_string(),
            date: None,
            expected_respondents: Some(10),
            score_columns: vec![],
            metric_columns: vec![],
            category_columns: vec!["Team".to_string()],
            group_by: None,
            explanatory_text: String::new(),
            explanatory_width: ReportSettings::DEFAULT_EXPLANATORY_WIDTH,
            label_width: ReportSettings::DEFAULT_LABEL_WIDTH,
        };
        let js = build_summary_js(&settings, 3, &report);
        assert_eq!(js["config"]["respondents"], json!("3"));
        assert_eq!(js["config"]["expectedRespondents"], json!("10"));
        assert_eq!(js["config"]["date"], JSValue::Null);
        assert_eq!(js["pages"][0], json!({"page": 1, "kind": "cover", "text": "Survey\nn = 3"}));
        assert_eq!(js["pages"][1]["kind"], json!("pie"));
        assert_eq!(js["pages"][1]["slices"][0]["percent"], json!("66.7%"));
        assert_eq!(js["pages"][1]["slices"][1]["percent"], json!("33.3%"));
        assert_eq!(js["pages"][1]["slices"][1]["count"], json!("1"));
    }

    #[test]
    fn empty_column_has_no_box() {
        assert_eq!(box_stats_to_json(&None), JSValue::Null);
        let c = ScoreColumn {
            label: "a".to_string(),
            scores: vec![CodedScore::Score(2), CodedScore::Absent, CodedScore::Score(4)],
        };
        let js = box_stats_to_json(&BoxStats::from_column(&c));
        assert_eq!(js["q1"], json!(2.5));
        assert_eq!(js["whiskerHigh"], json!(4.0));
        assert_eq!(js["outliers"], json!([]));
    }
}
