/*!

This is the long-form manual for `survey_report` and `surveyrpt`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, as exported by Google Forms or Microsoft Forms
* `xlsx` Excel spreadsheets, as exported by the same tools

In both cases the first row holds the text of each question and every
following row holds the answers of one respondent:

```text
Timestamp,Which team are you on?,How well do you feel your skills and expertise are being used in your current project?
2023/09/04 10:12:01,Backend,4 - Well
2023/09/04 10:15:43,Frontend,
```

When no input file is given, `surveyrpt` picks the most recently modified file
with the right extension in the input directory.

## Coding of the answers

Likert questions (`"kind": "score"`) are expected to be exported as
`"<digit> <caption>"`, for example `4 - Well`. Only the first character is read.
Anything else (an empty cell, a number in a spreadsheet, a caption without a
leading digit) is treated as a missing answer: it is not counted as zero, it is
simply left out of every statistic.

Metric questions (`"kind": "metric"`) hold a whole number, for example a
0-10 recommendation score. The whole cell is read.

Category questions (`"kind": "category"`) are not coded. Their answers are
counted and shown as a pie chart.

## Report structure

The report always has the same structure:
1. a cover page with the title, the date and the number of respondents
2. one pie chart per category question, in the order of the configuration
3. a page explaining how to read a boxplot
4. the boxplots of all the score questions, sorted by descending median
5. one boxplot page per metric question
6. if `groupBy` is set, one page of sorted boxplots per value of that column

Questions with the same median keep the order of the configuration. A question
without any answer sorts last. Groups are sorted alphabetically, and
respondents who skipped the grouping question form a group of their own.

## Configuration

`surveyrpt` ships with a configuration for a tech satisfaction survey. Other
surveys are described with a JSON file passed with `--config`:

```json
{
  "outputSettings": {
    "reportTitle": "Tech satisfaction survey",
    "surveyDate": "September 2023",
    "expectedRespondents": 39,
    "outputPath": "Survey_Report.pdf",
    "summaryPath": "Survey_Report.json"
  },
  "inputSettings": {
    "provider": "csv",
    "inputDirectory": "DataInput"
  },
  "questions": [
    {
      "question": "Which team are you on?",
      "label": "Team",
      "kind": "category"
    },
    {
      "question": "How well do you feel your skills and expertise are being used in your current project?",
      "label": "Skill Utilization",
      "kind": "score"
    }
  ],
  "groupBy": "Team"
}
```

Options for `outputSettings`:
 - `reportTitle` (string): first line of the cover page.
 - `surveyDate` (string, optional): second line of the cover page.
 - `expectedRespondents` (number, optional): the size of the surveyed population.
 - `outputPath` (string): where the PDF report is written.
 - `summaryPath` (string, optional): where the JSON summary is written, or `stdout`.

Options for `inputSettings`:
 - `provider` (`csv` or `xlsx`).
 - `inputDirectory` (string): where to look for the newest export. Relative
   paths are resolved from the directory of the configuration file.
 - `excelWorksheetName` (string, optional): for Excel-based inputs, the name of
   the worksheet. Required if the workbook has more than one worksheet.

Other options:
 - `questions` (array): every question used by the report. The question text
   must match the header of the export exactly. Labels must be unique.
 - `groupBy` (string, optional): the label of a question to group by.
 - `explanatoryText` (string, optional): replaces the boxplot explanation.

 */
