use calamine::Reader;
use log::{debug, info};
use matching_report::{Coding, CodingKind, Localized, PdefAnswer, PdefQuestion, Programme, References};

use crate::report::io_common::{cell, RawTable};
use crate::report::io_forms::{get_range, open_xlsx, range_to_table, read_xlsx};
use crate::report::*;

const QUESTION_SHEET: &str = "ps";
const ANSWER_SHEET: &str = "antw";

fn localized(row: &[String], nl_idx: usize, en_idx: Option<usize>) -> Localized {
    let nl = cell(row, nl_idx).unwrap_or("");
    // Untranslated entries fall back to Dutch.
    let en = en_idx.and_then(|idx| cell(row, idx)).unwrap_or(nl);
    Localized::new(nl, en)
}

pub fn pdef_questions(table: &RawTable) -> ReportResult<Vec<PdefQuestion>> {
    let step_idx = table.required(&["PROCESSTAP"])?;
    let nl_idx = table.required(&["TEKST_NL", "NL"])?;
    let en_idx = table.column_of(&["TEKST_EN", "EN"]);
    let list_idx = table.column_of(&["SYSTEEMLIJST_IO", "SYSTEEMLIJST"]);
    let res: Vec<PdefQuestion> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let step = cell(row, step_idx)?;
            Some(PdefQuestion {
                step: step.to_string(),
                text: localized(row, nl_idx, en_idx),
                system_list: list_idx.and_then(|idx| cell(row, idx)).map(|s| s.to_string()),
            })
        })
        .collect();
    Ok(res)
}

pub fn pdef_answers(table: &RawTable) -> ReportResult<Vec<PdefAnswer>> {
    let step_idx = table.required(&["PROCESSTAP"])?;
    let code_idx = table.required(&["ANTWOORD_CODE", "CODE"])?;
    let nl_idx = table.required(&["ANTWOORD_NL", "NL"])?;
    let en_idx = table.column_of(&["ANTWOORD_EN", "EN"]);
    let res: Vec<PdefAnswer> = table
        .rows()
        .iter()
        .filter_map(|row| {
            Some(PdefAnswer {
                step: cell(row, step_idx)?.to_string(),
                code: cell(row, code_idx)?.to_string(),
                text: localized(row, nl_idx, en_idx),
            })
        })
        .collect();
    Ok(res)
}

pub fn codings(table: &RawTable) -> ReportResult<Vec<Coding>> {
    let code_idx = table.required(&["CODE"])?;
    let group_idx = table.required(&["PS", "PROCESSTAP"])?;
    let kind_idx = table.required(&["TYPE"])?;
    let nl_idx = table.required(&["NL"])?;
    let en_idx = table.column_of(&["EN"]);
    let mut res: Vec<Coding> = Vec::new();
    for row in table.rows() {
        let kind = match cell(row, kind_idx).map(|s| s.to_uppercase()).as_deref() {
            Some("Q") => CodingKind::Question,
            Some("A") => CodingKind::Answer,
            x => {
                debug!("codings: {}: skipping row of type {:?}", table.path, x);
                continue;
            }
        };
        if let (Some(code), Some(group)) = (cell(row, code_idx), cell(row, group_idx)) {
            res.push(Coding {
                code: code.to_string(),
                group: group.to_string(),
                kind,
                text: localized(row, nl_idx, en_idx),
            });
        }
    }
    Ok(res)
}

pub fn programmes(table: &RawTable) -> ReportResult<Vec<Programme>> {
    let code_idx = table.required(&["OPLEIDING", "CODE"])?;
    let nl_idx = table.required(&["NAAM_NL", "NL"])?;
    let en_idx = table.column_of(&["NAAM_EN", "EN"]);
    let res: Vec<Programme> = table
        .rows()
        .iter()
        .filter_map(|row| {
            Some(Programme {
                code: cell(row, code_idx)?.to_string(),
                name: localized(row, nl_idx, en_idx),
            })
        })
        .collect();
    Ok(res)
}

fn read_pdef(path: &str) -> ReportResult<(Vec<PdefQuestion>, Vec<PdefAnswer>)> {
    let mut workbook = open_xlsx(path)?;
    let has_question_sheet = workbook
        .sheet_names()
        .iter()
        .any(|s| s.as_str() == QUESTION_SHEET);
    let question_sheet = if has_question_sheet {
        Some(QUESTION_SHEET)
    } else {
        None
    };
    let questions = pdef_questions(&range_to_table(
        path,
        &get_range(&mut workbook, path, question_sheet)?,
    )?)?;
    let answers = pdef_answers(&range_to_table(
        path,
        &get_range(&mut workbook, path, Some(ANSWER_SHEET))?,
    )?)?;
    Ok((questions, answers))
}

pub fn read_references(
    pdef_path: &str,
    codings_path: &str,
    programmes_path: Option<&str>,
) -> ReportResult<References> {
    let (questions, answers) = read_pdef(pdef_path)?;
    let codings = codings(&read_xlsx(codings_path, None)?)?;
    let programmes = match programmes_path {
        Some(p) => programmes(&read_xlsx(p, None)?)?,
        None => Vec::new(),
    };
    info!(
        "read_references: {} questions, {} answers, {} codings, {} programmes",
        questions.len(),
        answers.len(),
        codings.len(),
        programmes.len()
    );
    Ok(References {
        questions,
        answers,
        codings,
        programmes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use matching_report::Lang;

    fn table(rows: &[&[&str]]) -> RawTable {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        RawTable::new("refs.xlsx", rows).unwrap()
    }

    #[test]
    fn questions_of_the_process_definition() {
        let t = table(&[
            &["processtap", "tekst_nl", "tekst_en", "systeemlijst_io"],
            &["U_VOOROPL", "Vooropleiding", "Pre-education", "VOOROPLEIDINGEN"],
            &["U_EERSTEKEUZE", "Eerste keuze?", "", ""],
            &["", "Zonder code", "No code", ""],
        ]);
        let qs = pdef_questions(&t).unwrap();
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].system_list.as_deref(), Some("VOOROPLEIDINGEN"));
        assert_eq!(qs[1].text, Localized::new("Eerste keuze?", "Eerste keuze?"));
        assert_eq!(qs[1].system_list, None);
    }

    #[test]
    fn answers_keep_sheet_order() {
        let t = table(&[
            &["PROCESSTAP", "ANTWOORD_CODE", "ANTWOORD_NL", "ANTWOORD_EN"],
            &["U_EERSTEKEUZE", "JA", "ja", "yes"],
            &["U_EERSTEKEUZE", "NEE", "nee", "no"],
            &["U_EERSTEKEUZE", "", "leeg", "empty"],
        ]);
        let answers = pdef_answers(&t).unwrap();
        let codes: Vec<&str> = answers.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["JA", "NEE"]);
        assert_eq!(answers[1].text.en, "no");
    }

    #[test]
    fn codings_by_type() {
        let t = table(&[
            &["CODE", "PS", "TYPE", "NL", "EN"],
            &["U_FACTOREN_1", "U_FACTOREN", "Q", "Open dag", "Open day"],
            &["ja", "U_FACTOREN", "a", "ja", "yes"],
            &["X", "U_FACTOREN", "?", "x", "x"],
        ]);
        let cs = codings(&t).unwrap();
        assert_eq!(cs.len(), 2);
        assert_eq!(cs[0].kind, CodingKind::Question);
        assert_eq!(cs[1].kind, CodingKind::Answer);
        assert!(codings(&table(&[&["CODE", "NL"]])).is_err());
    }

    #[test]
    fn programme_names() {
        let t = table(&[
            &["OPLEIDING", "NAAM_NL", "NAAM_EN"],
            &["BIOL", "Biologie", "Biology"],
        ]);
        let refs = References {
            programmes: programmes(&t).unwrap(),
            ..References::default()
        };
        assert_eq!(refs.programme_name("BIOL", Lang::En).as_deref(), Some("Biology"));
        assert_eq!(refs.programme_name("SCHK", Lang::En), None);
    }
}
