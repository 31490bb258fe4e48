use crate::report::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

/// The configuration used when none is given on the command line.
const DEFAULT_CONFIG: &str = include_str!("../../config/tech_survey.json");

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportTitle")]
    pub report_title: String,
    #[serde(rename = "surveyDate")]
    pub survey_date: Option<String>,
    #[serde(rename = "expectedRespondents")]
    pub expected_respondents: Option<u32>,
    #[serde(rename = "outputPath")]
    pub output_path: String,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    pub provider: String,
    #[serde(rename = "inputDirectory")]
    pub input_directory: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum QuestionKind {
    Score,
    Metric,
    Category,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestion {
    /// The question as written in the header of the export.
    pub question: String,
    pub label: String,
    #[serde(rename = "kind")]
    pub _kind: String,
}

impl SurveyQuestion {
    pub fn kind(&self) -> RpResult<QuestionKind> {
        match self._kind.as_str() {
            "score" => Ok(QuestionKind::Score),
            "metric" => Ok(QuestionKind::Metric),
            "category" => Ok(QuestionKind::Category),
            _ => whatever!(
                "unknown kind {:?} for question {:?}",
                self._kind,
                self.label
            ),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSettings")]
    pub input_settings: InputSettings,
    pub questions: Vec<SurveyQuestion>,
    #[serde(rename = "groupBy")]
    pub group_by: Option<String>,
    #[serde(rename = "explanatoryText")]
    pub explanatory_text: Option<String>,
}

impl SurveyConfig {
    pub fn column_mapping(&self) -> RpResult<ColumnMapping> {
        let pairs: Vec<(String, String)> = self
            .questions
            .iter()
            .map(|q| (q.question.clone(), q.label.clone()))
            .collect();
        ColumnMapping::new(&pairs).context(PipelineSnafu {})
    }

    pub fn report_settings(&self) -> RpResult<ReportSettings> {
        let mut score_columns: Vec<String> = Vec::new();
        let mut metric_columns: Vec<String> = Vec::new();
        let mut category_columns: Vec<String> = Vec::new();
        for q in self.questions.iter() {
            let dest = match q.kind()? {
                QuestionKind::Score => &mut score_columns,
                QuestionKind::Metric => &mut metric_columns,
                QuestionKind::Category => &mut category_columns,
            };
            dest.push(q.label.clone());
        }
        let os = &self.output_settings;
        Ok(ReportSettings {
            title: os.report_title.clone(),
            date: os.survey_date.clone(),
            expected_respondents: os.expected_respondents,
            score_columns,
            metric_columns,
            category_columns,
            group_by: self.group_by.clone(),
            explanatory_text: self
                .explanatory_text
                .clone()
                .unwrap_or_else(|| BOXPLOT_EXPLANATION.to_string()),
            explanatory_width: ReportSettings::DEFAULT_EXPLANATORY_WIDTH,
            label_width: ReportSettings::DEFAULT_LABEL_WIDTH,
        })
    }
}

pub fn read_config(path: &str) -> RpResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn default_config() -> RpResult<SurveyConfig> {
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> RpResult<SurveyConfig> {
    let config: SurveyConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    debug!("parse_config: {:?}", config);
    Ok(config)
}

/// Reads a reference summary, to be compared with a computed one.
pub fn read_summary(path: &str) -> RpResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
