use log::{debug, info};
use std::collections::{BTreeMap, HashSet};

use crate::config::*;

/// Questions whose answer is the matching date of the form.
pub const DATE_STEP_PREFIX: &str = "O_DATUM_";

const FACULTIES: &[(&str, &[&str])] = &[
    (
        "BETA",
        &["BIOL", "INCA", "WSKT", "SCHK", "WISK", "INKU", "NAST"],
    ),
    ("GEO", &["INMB", "SGPB", "AARD"]),
    (
        "GW",
        &[
            "ISAB", "WBGB", "LITB", "TCSB", "HISB", "CIWB", "ENGB", "THEB", "GESB", "LASB",
            "FRAB", "KUNB", "TLWB", "SPAB", "DUIB", "NEDB", "MUZB", "KELB", "ITAB", "THEO",
        ],
    ),
    ("ECBB", &["ECBB"]),
    ("RGLB", &["RGLB"]),
    ("SW", &["ASWB", "PEDB", "SOCB", "OWKB", "CULB"]),
];

// Matching dates in calendar order.
const MATCHING_DATES: &[(&str, &str, &str)] = &[
    ("FEBRUARI", "februari", "February"),
    ("APRIL", "april", "April"),
    ("JUNI", "juni", "June"),
    ("JUNI_1", "juni (1)", "June (1)"),
    ("JUNI_2", "juni (2)", "June (2)"),
    ("JUNI_3", "juni (3)", "June (3)"),
    ("AUGUSTUS", "augustus", "August"),
    ("INDIVIDUEEL", "individueel", "Individual"),
];

/// The faculty a programme belongs to, if known.
pub fn faculty_of(programme: &str) -> Option<&'static str> {
    FACULTIES
        .iter()
        .find(|(_, progs)| progs.contains(&programme))
        .map(|(fac, _)| *fac)
}

/// The localized name of a matching date. Unknown codes are returned as is.
pub fn matching_date_name(code: &str, lang: Lang) -> String {
    match MATCHING_DATES.iter().find(|(c, _, _)| *c == code) {
        Some((_, nl, _)) if lang == Lang::Nl => nl.to_string(),
        Some((_, _, en)) => en.to_string(),
        None => code.to_string(),
    }
}

fn matching_date_rank(code: &str) -> usize {
    MATCHING_DATES
        .iter()
        .position(|(c, _, _)| *c == code)
        .unwrap_or(MATCHING_DATES.len())
}

impl Response {
    pub fn faculty(&self) -> Option<&str> {
        self.faculty
            .as_deref()
            .or_else(|| faculty_of(self.programme.as_str()))
    }

    pub fn answer_str(&self) -> Option<&str> {
        self.answer.as_deref()
    }
}

/// The normalized table of all the answers on all the forms.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ResponseTable {
    rows: Vec<Response>,
}

impl ResponseTable {
    pub fn new(rows: Vec<Response>) -> ResponseTable {
        ResponseTable { rows }
    }

    pub fn rows(&self) -> &[Response] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filter<F>(&self, predicate: F) -> ResponseTable
    where
        F: Fn(&Response) -> bool,
    {
        ResponseTable {
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// The forms that contain an answer accepted by the predicate.
    pub fn forms_where<F>(&self, predicate: F) -> HashSet<String>
    where
        F: Fn(&Response) -> bool,
    {
        self.rows
            .iter()
            .filter(|r| predicate(r))
            .map(|r| r.form_id.clone())
            .collect()
    }

    pub fn count_forms(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.form_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn count_students(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.student_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Keeps the forms of the given matching dates, and within these forms the
    /// rows of the given programmes.
    pub fn select_forms(&self, matching_dates: &[String], programmes: &[String]) -> ResponseTable {
        let forms = self.forms_where(|r| {
            r.step.starts_with(DATE_STEP_PREFIX)
                && r.answer
                    .as_ref()
                    .map(|a| matching_dates.contains(a))
                    .unwrap_or(false)
        });
        debug!(
            "select_forms: {} forms for dates {:?}",
            forms.len(),
            matching_dates
        );
        let res = self.filter(|r| forms.contains(&r.form_id) && programmes.contains(&r.programme));
        info!(
            "select_forms: {} rows for programmes {:?} and dates {:?}",
            res.len(),
            programmes,
            matching_dates
        );
        res
    }

    /// The distinct matching dates in the table, in calendar order.
    pub fn matching_dates(&self) -> Vec<String> {
        let mut dates: Vec<String> = self
            .rows
            .iter()
            .filter(|r| r.step.starts_with(DATE_STEP_PREFIX))
            .filter_map(|r| r.answer.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        dates.sort_by(|a, b| {
            matching_date_rank(a)
                .cmp(&matching_date_rank(b))
                .then_with(|| a.cmp(b))
        });
        dates
    }

    /// The number of forms per (faculty, programme).
    pub fn forms_per_programme(&self) -> BTreeMap<(String, String), usize> {
        let mut seen: BTreeMap<(String, String), HashSet<&str>> = BTreeMap::new();
        for r in self.rows.iter() {
            let faculty = r.faculty().unwrap_or("").to_string();
            seen.entry((faculty, r.programme.clone()))
                .or_default()
                .insert(r.form_id.as_str());
        }
        seen.into_iter().map(|(k, v)| (k, v.len())).collect()
    }
}

/// General statistics shown in the introduction of a report.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportProperties {
    pub generated_on: String,
    pub matching_dates: String,
    pub forms: usize,
}

pub fn report_properties(forms: &ResponseTable, lang: Lang, generated_on: &str) -> ReportProperties {
    let names: Vec<String> = forms
        .matching_dates()
        .iter()
        .map(|d| matching_date_name(d, lang))
        .collect();
    ReportProperties {
        generated_on: generated_on.to_string(),
        matching_dates: names.join(", "),
        forms: forms.count_forms(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_responses;

    #[test]
    fn faculties() {
        assert_eq!(faculty_of("BIOL"), Some("BETA"));
        assert_eq!(faculty_of("HISB"), Some("GW"));
        assert_eq!(faculty_of("XXXX"), None);
    }

    #[test]
    fn select_forms_by_date_and_programme() {
        let table = sample_responses();
        let sel = table.select_forms(&["APRIL".to_string()], &["BIOL".to_string()]);
        let forms: HashSet<&str> = sel.rows().iter().map(|r| r.form_id.as_str()).collect();
        assert_eq!(forms, HashSet::from(["F1", "F2"]));

        let none = table.select_forms(&["AUGUSTUS".to_string()], &["BIOL".to_string()]);
        assert!(none.is_empty());
    }

    #[test]
    fn dates_are_in_calendar_order() {
        let table = sample_responses();
        assert_eq!(table.matching_dates(), vec!["FEBRUARI", "APRIL", "JUNI"]);
    }

    #[test]
    fn properties() {
        let table = sample_responses().select_forms(
            &["APRIL".to_string(), "JUNI".to_string()],
            &["BIOL".to_string(), "HISB".to_string()],
        );
        let p = report_properties(&table, Lang::En, "01-09-2026");
        assert_eq!(p.matching_dates, "April, June");
        assert_eq!(p.forms, 3);
    }

    #[test]
    fn forms_are_grouped_by_faculty() {
        let table = sample_responses();
        let counts = table.forms_per_programme();
        assert_eq!(
            counts.get(&("BETA".to_string(), "BIOL".to_string())),
            Some(&3)
        );
        assert_eq!(counts.get(&("GW".to_string(), "HISB".to_string())), Some(&1));
    }
}
