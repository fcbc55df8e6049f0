/*!

This is the long-form manual for `matching_report` and `matchrep`.

## Inputs

A report is built from four tables:
* the responses to the matching forms
* the process definition (PDEF) workbook, with the questions and their answers
* the codings workbook, with the sub-questions and answer scales the PDEF does not spell out
* optionally, a workbook with the names of the programmes

### Responses

An export of the forms, in Excel (`.xlsx`) or CSV format, with one row per form and per step:

| IO_AANVR_ID | STUDENTNUMMER | OPLEIDING | FACULTEIT | PROCESSTAP       | SYSTEEM_ANTWOORD_CODE | GESLOTEN_ANTWOORD_CODE | OPEN_ANTWOORD_STUDENT |
|-------------|---------------|-----------|-----------|------------------|-----------------------|------------------------|-----------------------|
| 1201        | s1234567      | BIOL      | BETA      | O_DATUM_MATCHING |                       | APRIL                  |                       |
| 1201        | s1234567      | BIOL      | BETA      | U_UREN_ZELF      |                       |                        | 12                    |

Headers are matched without regard to case. `OOA_ID` is accepted instead of `IO_AANVR_ID`.
The answer of a row is the first non-empty cell of `SYSTEEM_ANTWOORD_CODE`,
`GESLOTEN_ANTWOORD_CODE` and `OPEN_ANTWOORD_STUDENT`. A single `ANTWOORD` column works too.
When the `FACULTEIT` column is missing, the faculty is derived from the programme code.

CSV files may use `,` or `;` as the separator.

Multi-select questions store all the selected codes in one answer, separated by `|`.

### Process definition

The questions are read from the worksheet `ps` (or the first worksheet), with the columns
`PROCESSTAP`, `TEKST_NL`, `TEKST_EN` and optionally `SYSTEEMLIJST_IO`.
The answers are read from the worksheet `antw`, with the columns `PROCESSTAP`, `ANTWOORD_CODE`,
`ANTWOORD_NL` and `ANTWOORD_EN`. The order of the answers in this worksheet is the order
used in the charts.

Texts without an English translation are shown in Dutch.

### Codings

The first worksheet, with the columns `CODE`, `PS` (the question the entry belongs to),
`TYPE` (`Q` for a sub-question, `A` for an answer) and the texts `NL` and `EN`.

### Programmes

The first worksheet, with the columns `OPLEIDING`, `NAAM_NL` and `NAAM_EN`. Without this file,
the report uses the programme code as its name.

## Selection

A form is in the report when its matching date (the answer to any `O_DATUM_*` step) is one of
the requested dates and its programme is one of the requested programmes. When no form
matches, no report is produced and `matchrep` fails.

## Numeric answers

Hours are open answers. Anything that does not read as a number is ignored, and commas are read
as decimal points. Values outside the bins of the chart are not shown.

Grades are open answers too. The following rules apply:
* `7` or `7.5` are read as is
* a value above 10 and up to 100 is taken as a grade written without its decimal point, and
  divided by 10 (`85` is `8.5`)
* a value above 100 or below 4 is ignored

Grades are summarized with the mean, rounded to one decimal, half to even.

## Configuration

`matchrep` reads its settings from a JSON file and from the command line. The command line wins.

```json
{
  "pdefPath": "refs/pdef.xlsx",
  "codingsPath": "refs/codings.xlsx",
  "programmesPath": "refs/programmes.xlsx",
  "responseSources": [
    { "provider": "xlsx", "filePath": "export/forms.xlsx", "excelWorksheetName": "export" }
  ],
  "programmes": ["BIOL"],
  "matchingDates": ["APRIL", "JUNI"],
  "language": "en",
  "outputDirectory": "reports",
  "templateDirectory": "templates"
}
```

Relative paths are resolved from the directory of the configuration file.

Without `outputFile`, the report is written to `<programmes>_<dates>_<language>.html`
in the output directory. Use `stdout` as output to print the report.

## Templates

The page layout, the chart snippet, the style sheet and the text snippets are embedded in the
library. A file with the same name in the template directory replaces the embedded one:
* `body.html`, `spec.html`, `style.css`
* `snippet_<name>_<language>.html` with the names `intro`, `introtable`, `author`, `logo` and `footer`

Placeholders are written `{{ name }}`. Other files in the template directory are ignored.

## Comparing with a reference

With `--reference <file>`, `matchrep` compares the report with a previous one, prints the
differences and fails when they differ. The generation date is part of the report: compare
reports generated on the same day.

*/
