use log::{debug, info};
use std::collections::HashMap;

use crate::aggregate::Partition;
use crate::config::*;
use crate::ranking::{rank_by_median, rank_columns, RankedColumnSet};
use crate::wrap::{wrap_sentences, WrappedText};

// ******** Output data structures *********

/// One slice of a pie chart.
#[derive(PartialEq, Debug, Clone)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    /// Share of all the answers, between 0 and 100.
    pub percent: f64,
}

/// One page of the report.
#[derive(PartialEq, Debug, Clone)]
pub enum Page<'a> {
    Cover {
        text: String,
    },
    PieChart {
        title: String,
        slices: Vec<PieSlice>,
    },
    Explanatory {
        text: WrappedText,
    },
    Distribution {
        title: String,
        columns: RankedColumnSet<'a>,
    },
}

impl<'a> Page<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Page::Cover { .. } => "cover",
            Page::PieChart { .. } => "pie",
            Page::Explanatory { .. } => "explanatory",
            Page::Distribution { .. } => "distribution",
        }
    }
}

/// The pages of a report, in document order.
#[derive(PartialEq, Debug, Clone)]
pub struct Report<'a> {
    pub pages: Vec<Page<'a>>,
}

// ******** Page instructions *********

/// One instruction of a report layout. Most instructions produce one page.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PageSpec {
    Cover,
    /// A pie chart of the answers to a category question.
    Breakdown { column: String },
    Explanatory,
    /// All the score questions, ranked by median.
    RankedScores { title: String },
    /// A metric question on its own.
    Metric { column: String },
    /// One ranked page per partition of the grouping column.
    Partitions { column: String },
}

/// The structure of a report, as an ordered list of page instructions.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportLayout {
    steps: Vec<PageSpec>,
}

impl ReportLayout {
    pub fn new(steps: Vec<PageSpec>) -> ReportLayout {
        ReportLayout { steps }
    }

    /// The standard report: cover, one pie per category question, the
    /// explanation, the ranked scores, one page per metric and finally the
    /// partitions if a grouping column is set.
    pub fn standard(settings: &ReportSettings) -> ReportLayout {
        let mut steps: Vec<PageSpec> = vec![PageSpec::Cover];
        for column in settings.category_columns.iter() {
            steps.push(PageSpec::Breakdown {
                column: column.clone(),
            });
        }
        steps.push(PageSpec::Explanatory);
        steps.push(PageSpec::RankedScores {
            title: "Boxplots for numeric answers (sorted by median)".to_string(),
        });
        for column in settings.metric_columns.iter() {
            steps.push(PageSpec::Metric {
                column: column.clone(),
            });
        }
        if let Some(column) = settings.group_by.as_ref() {
            steps.push(PageSpec::Partitions {
                column: column.clone(),
            });
        }
        ReportLayout { steps }
    }

    pub fn steps(&self) -> &[PageSpec] {
        &self.steps
    }
}

/// Everything the composer reads from. Nothing in here is modified.
pub struct ComposerInputs<'a> {
    pub settings: &'a ReportSettings,
    pub table: &'a SurveyTable,
    pub scores: &'a ScoreTable,
    pub metrics: &'a ScoreTable,
    pub partitions: &'a [Partition],
}

/// The text of the first page.
pub fn cover_text(settings: &ReportSettings, num_respondents: usize) -> String {
    let mut lines: Vec<String> = vec![settings.title.clone()];
    if let Some(date) = settings.date.as_ref() {
        lines.push(date.clone());
    }
    match settings.expected_respondents {
        Some(expected) => lines.push(format!("n = {} of ~{}", num_respondents, expected)),
        None => lines.push(format!("n = {}", num_respondents)),
    }
    lines.join("\n")
}

/// Counts the distinct answers of a column, most frequent first.
///
/// Ties keep the order in which the answers first appear. Missing answers
/// are not counted.
pub fn value_counts(cells: &[&RawCell]) -> Vec<PieSlice> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for cell in cells.iter().filter(|c| !c.is_empty()) {
        let key = cell.key();
        match positions.get(&key) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let total: u64 = counts.iter().map(|(_, c)| *c).sum();
    counts
        .into_iter()
        .map(|(label, count)| PieSlice {
            label,
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect()
}

/// Caption of the group of respondents who skipped the grouping question.
pub const NO_ANSWER_CAPTION: &str = "(no answer)";

fn partition_title(column: &str, key: &str) -> String {
    if key.is_empty() {
        format!("Boxplots for {} {}", column, NO_ANSWER_CAPTION)
    } else {
        format!("Boxplots for {} {}", column, key)
    }
}

fn find_column<'a>(
    scores: &'a ScoreTable,
    label: &str,
) -> Result<&'a ScoreColumn, ReportErrors> {
    scores
        .columns
        .iter()
        .find(|c| c.label == label)
        .ok_or_else(|| ReportErrors::UnknownColumn {
            column: label.to_string(),
        })
}

/// Builds the pages of a report by following the instructions of a layout.
///
/// No layout computation happens here: the composer only decides what goes
/// on each page and in which order.
pub fn compose<'a>(
    layout: &ReportLayout,
    inputs: &ComposerInputs<'a>,
) -> Result<Report<'a>, ReportErrors> {
    let mut pages: Vec<Page<'a>> = Vec::new();
    for step in layout.steps() {
        debug!("compose: page {}: {:?}", pages.len() + 1, step);
        match step {
            PageSpec::Cover => pages.push(Page::Cover {
                text: cover_text(inputs.settings, inputs.table.num_rows()),
            }),
            PageSpec::Breakdown { column } => {
                let cells = inputs.table.column_cells(column)?;
                pages.push(Page::PieChart {
                    title: column.clone(),
                    slices: value_counts(&cells),
                });
            }
            PageSpec::Explanatory => pages.push(Page::Explanatory {
                text: wrap_sentences(
                    &inputs.settings.explanatory_text,
                    inputs.settings.explanatory_width,
                ),
            }),
            PageSpec::RankedScores { title } => pages.push(Page::Distribution {
                title: title.clone(),
                columns: rank_by_median(inputs.scores),
            }),
            PageSpec::Metric { column } => {
                let metric = find_column(inputs.metrics, column)?;
                let single = std::slice::from_ref(metric);
                pages.push(Page::Distribution {
                    title: format!("Boxplot for {}", column),
                    columns: rank_columns(single),
                });
            }
            PageSpec::Partitions { column } => {
                for partition in inputs.partitions {
                    pages.push(Page::Distribution {
                        title: partition_title(column, &partition.key),
                        columns: partition.ranked(),
                    });
                }
            }
        }
    }
    info!("compose: {} pages", pages.len());
    Ok(Report { pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::partition_by;
    use crate::builder::Builder;
    use crate::coder::{code_columns, Coding};

    fn settings() -> ReportSettings {
        ReportSettings {
            title: "Tech satisfaction survey".to_string(),
            date: Some("September 2023".to_string()),
            expected_respondents: Some(39),
            score_columns: vec!["Teamwork".to_string(), "Tools".to_string()],
            metric_columns: vec!["NPS".to_string()],
            category_columns: vec!["Team".to_string(), "Location".to_string()],
            group_by: None,
            explanatory_text: "About boxplots. They show spread.".to_string(),
            explanatory_width: 60,
            label_width: 11,
        }
    }

    fn table() -> SurveyTable {
        let header: Vec<String> = ["Team", "Location", "Teamwork", "Tools", "NPS"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut b = Builder::new(&header).unwrap();
        b.add_text_row(&["Web", "Remote", "4 - Good", "2 - Poor", "9"])
            .unwrap();
        b.add_text_row(&["Data", "Remote", "5 - Great", "", "7"])
            .unwrap();
        b.add_text_row(&["Web", "On-site", "", "3 - Fair", "10"])
            .unwrap();
        b.build()
    }

    #[test]
    fn standard_layout_order() {
        let mut s = settings();
        let l = ReportLayout::standard(&s);
        assert_eq!(
            l.steps(),
            &[
                PageSpec::Cover,
                PageSpec::Breakdown {
                    column: "Team".to_string()
                },
                PageSpec::Breakdown {
                    column: "Location".to_string()
                },
                PageSpec::Explanatory,
                PageSpec::RankedScores {
                    title: "Boxplots for numeric answers (sorted by median)".to_string()
                },
                PageSpec::Metric {
                    column: "NPS".to_string()
                },
            ]
        );
        s.group_by = Some("Team".to_string());
        let l = ReportLayout::standard(&s);
        assert_eq!(
            l.steps().last(),
            Some(&PageSpec::Partitions {
                column: "Team".to_string()
            })
        );
    }

    #[test]
    fn cover_mentions_respondents() {
        let mut s = settings();
        assert_eq!(
            cover_text(&s, 12),
            "Tech satisfaction survey\nSeptember 2023\nn = 12 of ~39"
        );
        s.date = None;
        s.expected_respondents = None;
        assert_eq!(cover_text(&s, 3), "Tech satisfaction survey\nn = 3");
    }

    #[test]
    fn pie_percentages() {
        let mut cells: Vec<RawCell> = Vec::new();
        cells.push(RawCell::from("C"));
        for _ in 0..3 {
            cells.push(RawCell::from("B"));
        }
        for _ in 0..6 {
            cells.push(RawCell::from("A"));
        }
        cells.push(RawCell::Empty);
        let refs: Vec<&RawCell> = cells.iter().collect();
        let slices = value_counts(&refs);
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        let counts: Vec<u64> = slices.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![6, 3, 1]);
        let total: f64 = slices.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((slices[0].percent - 60.0).abs() < 1e-9);
    }

    #[test]
    fn pie_ties_keep_first_appearance() {
        let cells: Vec<RawCell> = ["y", "x", "x", "y"].iter().map(|s| RawCell::from(*s)).collect();
        let refs: Vec<&RawCell> = cells.iter().collect();
        let labels: Vec<String> = value_counts(&refs).into_iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["y", "x"]);
    }

    #[test]
    fn composes_pages_in_layout_order() {
        let s = settings();
        let t = table();
        let scores = code_columns(&t, &s.score_columns, Coding::LeadingDigit).unwrap();
        let metrics = code_columns(&t, &s.metric_columns, Coding::WholeNumber).unwrap();
        let inputs = ComposerInputs {
            settings: &s,
            table: &t,
            scores: &scores,
            metrics: &metrics,
            partitions: &[],
        };
        let report = compose(&ReportLayout::standard(&s), &inputs).unwrap();
        let kinds: Vec<&str> = report.pages.iter().map(|p| p.kind()).collect();
        assert_eq!(
            kinds,
            vec!["cover", "pie", "pie", "explanatory", "distribution", "distribution"]
        );
        match &report.pages[1] {
            Page::PieChart { title, slices } => {
                assert_eq!(title, "Team");
                assert_eq!(slices[0].label, "Web");
                assert_eq!(slices[0].count, 2);
            }
            p => panic!("unexpected page {:?}", p),
        }
        match &report.pages[4] {
            Page::Distribution { columns, .. } => {
                assert_eq!(columns.labels(), vec!["Teamwork", "Tools"]);
                assert_eq!(columns.columns()[0].median, Some(4.5));
            }
            p => panic!("unexpected page {:?}", p),
        }
        match &report.pages[5] {
            Page::Distribution { title, columns } => {
                assert_eq!(title, "Boxplot for NPS");
                assert_eq!(columns.columns()[0].median, Some(9.0));
            }
            p => panic!("unexpected page {:?}", p),
        }
    }

    #[test]
    fn partitions_expand_to_one_page_each() {
        let mut s = settings();
        s.group_by = Some("Team".to_string());
        let t = table();
        let scores = code_columns(&t, &s.score_columns, Coding::LeadingDigit).unwrap();
        let metrics = code_columns(&t, &s.metric_columns, Coding::WholeNumber).unwrap();
        let keys = t.column_cells("Team").unwrap();
        let partitions = partition_by(&scores, &keys).unwrap();
        let inputs = ComposerInputs {
            settings: &s,
            table: &t,
            scores: &scores,
            metrics: &metrics,
            partitions: &partitions,
        };
        let report = compose(&ReportLayout::standard(&s), &inputs).unwrap();
        assert_eq!(report.pages.len(), 8);
        let titles: Vec<String> = report.pages[6..]
            .iter()
            .map(|p| match p {
                Page::Distribution { title, .. } => title.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(titles, vec!["Boxplots for Team Data", "Boxplots for Team Web"]);
    }

    #[test]
    fn skipped_grouping_answer_has_a_caption() {
        assert_eq!(partition_title("Team", "Web"), "Boxplots for Team Web");
        assert_eq!(partition_title("Team", ""), "Boxplots for Team (no answer)");
    }

    #[test]
    fn unknown_breakdown_column() {
        let s = settings();
        let t = table();
        let empty = ScoreTable {
            columns: vec![],
            num_rows: 3,
        };
        let inputs = ComposerInputs {
            settings: &s,
            table: &t,
            scores: &empty,
            metrics: &empty,
            partitions: &[],
        };
        let layout = ReportLayout::new(vec![PageSpec::Breakdown {
            column: "Nope".to_string(),
        }]);
        assert_eq!(
            compose(&layout, &inputs),
            Err(ReportErrors::UnknownColumn {
                column: "Nope".to_string()
            })
        );
    }
}
