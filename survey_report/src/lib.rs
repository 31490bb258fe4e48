mod config;
pub mod aggregate;
pub mod builder;
pub mod coder;
pub mod composer;
pub mod manual;
pub mod mapping;
pub mod ranking;
pub mod wrap;

use log::info;

pub use crate::aggregate::{partition_by, Partition};
pub use crate::coder::{code_columns, code_metric, code_response, Coding};
pub use crate::composer::{compose, ComposerInputs, Page, PageSpec, PieSlice, Report, ReportLayout};
pub use crate::config::*;
pub use crate::mapping::{rename_table, ColumnMapping};
pub use crate::ranking::{median, rank_by_median, BoxStats, RankedColumn, RankedColumnSet};
pub use crate::wrap::{wrap_sentences, wrap_words, WrappedText};

/// A survey after renaming, coding and partitioning.
///
/// It owns all the data that the pages of a report borrow from.
#[derive(PartialEq, Debug, Clone)]
pub struct PreparedSurvey {
    settings: ReportSettings,
    table: SurveyTable,
    scores: ScoreTable,
    metrics: ScoreTable,
    partitions: Vec<Partition>,
}

impl PreparedSurvey {
    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn table(&self) -> &SurveyTable {
        &self.table
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn metrics(&self) -> &ScoreTable {
        &self.metrics
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Composes the standard report.
    pub fn compose(&self) -> Result<Report<'_>, ReportErrors> {
        self.compose_with(&ReportLayout::standard(&self.settings))
    }

    pub fn compose_with(&self, layout: &ReportLayout) -> Result<Report<'_>, ReportErrors> {
        let inputs = ComposerInputs {
            settings: &self.settings,
            table: &self.table,
            scores: &self.scores,
            metrics: &self.metrics,
            partitions: &self.partitions,
        };
        compose(layout, &inputs)
    }
}

/// Runs the data preparation steps on a raw survey export.
///
/// Arguments:
/// * `raw` the table as exported, with the question texts as headers
/// * `mapping` the association between question texts and labels
/// * `settings` how each labelled question is used in the report
///
/// Fails if one of the columns named in the settings is missing after
/// renaming. Answers that cannot be coded do not fail: they are absent.
pub fn prepare_survey(
    raw: SurveyTable,
    mapping: &ColumnMapping,
    settings: &ReportSettings,
) -> Result<PreparedSurvey, ReportErrors> {
    info!(
        "prepare_survey: processing {} rows, {} columns",
        raw.num_rows(),
        raw.columns().len()
    );
    let table = rename_table(raw, mapping, &settings.required_columns())?;
    let scores = code_columns(&table, &settings.score_columns, Coding::LeadingDigit)?;
    let metrics = code_columns(&table, &settings.metric_columns, Coding::WholeNumber)?;
    let partitions = match settings.group_by.as_ref() {
        Some(group) => {
            let keys = table.column_cells(group)?;
            partition_by(&scores, &keys)?
        }
        None => Vec::new(),
    };
    Ok(PreparedSurvey {
        settings: settings.clone(),
        table,
        scores,
        metrics,
        partitions,
    })
}
