// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The language of a report. All the labels, titles and snippets are resolved
/// in this language.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Lang {
    Nl,
    En,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::Nl => "nl",
            Lang::En => "en",
        }
    }
}

impl Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Lang {
    type Err = ReportErrors;

    fn from_str(s: &str) -> Result<Lang, ReportErrors> {
        match s.trim().to_lowercase().as_str() {
            "nl" => Ok(Lang::Nl),
            "en" => Ok(Lang::En),
            x => Err(ReportErrors::UnknownLanguage(x.to_string())),
        }
    }
}

/// A text available in both report languages.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Localized {
    pub nl: String,
    pub en: String,
}

impl Localized {
    pub fn new(nl: impl Into<String>, en: impl Into<String>) -> Localized {
        Localized {
            nl: nl.into(),
            en: en.into(),
        }
    }

    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::Nl => self.nl.as_str(),
            Lang::En => self.en.as_str(),
        }
    }
}

/// One answer on one form.
///
/// Multi-select questions store all the selected codes in a single answer,
/// joined with [MULTI_SELECT_DELIMITER].
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Response {
    pub form_id: String,
    pub student_id: String,
    pub programme: String,
    /// When not provided by the input, it is derived from the programme code.
    pub faculty: Option<String>,
    pub step: String,
    pub answer: Option<String>,
}

pub const MULTI_SELECT_DELIMITER: char = '|';

// ******** Reference tables *********

/// A question (processtap) from the process definition.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PdefQuestion {
    pub step: String,
    pub text: Localized,
    /// The system list that provides the answers for this question, if any.
    pub system_list: Option<String>,
}

/// A possible answer to a question from the process definition.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PdefAnswer {
    pub step: String,
    pub code: String,
    pub text: Localized,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CodingKind {
    Question,
    Answer,
}

/// An entry of the codings table. Codings group sub-questions and answer scales
/// that the process definition does not spell out.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Coding {
    pub code: String,
    pub group: String,
    pub kind: CodingKind,
    pub text: Localized,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Programme {
    pub code: String,
    pub name: Localized,
}

// ********* Errors **********

/// Errors that prevent a report from being configured.
///
/// Missing or malformed data is never an error: it is skipped.
#[derive(PartialEq, Debug, Clone)]
pub enum ReportErrors {
    UnknownLanguage(String),
    InvalidBreaks(Vec<f64>),
    LabelCountMismatch { breaks: usize, labels: usize },
}

impl Error for ReportErrors {}

impl Display for ReportErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportErrors::UnknownLanguage(s) => {
                write!(f, "unknown language {:?}, expected 'nl' or 'en'", s)
            }
            ReportErrors::InvalidBreaks(b) => {
                write!(f, "bin breaks must be increasing and at least 2: {:?}", b)
            }
            ReportErrors::LabelCountMismatch { breaks, labels } => write!(
                f,
                "{} breaks define {} bins but {} labels were given",
                breaks,
                breaks.saturating_sub(1),
                labels
            ),
        }
    }
}
