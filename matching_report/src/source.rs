use log::debug;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::binning::*;
use crate::config::*;
use crate::spec::{LabelKey, Spec};
use crate::table::ResponseTable;

/// Counts per question (rows) and answer (columns). Missing combinations are zero.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FrequencyTable {
    questions: Vec<String>,
    answers: Vec<String>,
    counts: Vec<Vec<u64>>,
}

/// One cell of a frequency table in long form, with the share of the row total.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Cell {
    pub question: String,
    pub answer: String,
    /// Position of the answer in the answer order.
    pub rank: usize,
    pub count: u64,
    pub total: u64,
    pub pct: f64,
}

impl FrequencyTable {
    /// Builds the table from (question, answer) observations.
    ///
    /// Rows follow `question_order`, followed by unexpected questions in order of
    /// appearance. Columns follow `answer_order`; observations with an answer
    /// outside of it are dropped. Unless `keep_unobserved` is set, answers that
    /// were never observed get no column.
    pub fn pivot(
        observations: &[(String, String)],
        question_order: &[String],
        answer_order: &[String],
        keep_unobserved: bool,
    ) -> Option<FrequencyTable> {
        let kept: Vec<&(String, String)> = observations
            .iter()
            .filter(|(_, a)| answer_order.contains(a))
            .collect();
        if kept.len() < observations.len() {
            debug!(
                "pivot: dropping {} observations with undeclared answers",
                observations.len() - kept.len()
            );
        }

        let seen_questions: HashSet<&str> = kept.iter().map(|(q, _)| q.as_str()).collect();
        let mut questions: Vec<String> = question_order
            .iter()
            .filter(|q| seen_questions.contains(q.as_str()))
            .cloned()
            .collect();
        for (q, _) in kept.iter() {
            if !questions.contains(q) {
                questions.push(q.clone());
            }
        }

        let seen_answers: HashSet<&str> = kept.iter().map(|(_, a)| a.as_str()).collect();
        let answers: Vec<String> = answer_order
            .iter()
            .filter(|a| keep_unobserved || seen_answers.contains(a.as_str()))
            .cloned()
            .collect();

        if questions.is_empty() || answers.is_empty() {
            return None;
        }

        let q_idx: HashMap<&str, usize> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.as_str(), i))
            .collect();
        let a_idx: HashMap<&str, usize> = answers
            .iter()
            .enumerate()
            .map(|(i, a)| (a.as_str(), i))
            .collect();
        let mut counts = vec![vec![0u64; answers.len()]; questions.len()];
        for (q, a) in kept {
            counts[q_idx[q.as_str()]][a_idx[a.as_str()]] += 1;
        }
        Some(FrequencyTable {
            questions,
            answers,
            counts,
        })
    }

    /// A table from explicit rows of counts, one per question.
    pub fn from_rows(answers: Vec<String>, rows: Vec<(String, Vec<u64>)>) -> Option<FrequencyTable> {
        if rows.is_empty() || answers.is_empty() || rows.iter().any(|(_, c)| c.len() != answers.len()) {
            return None;
        }
        let (questions, counts) = rows.into_iter().unzip();
        Some(FrequencyTable {
            questions,
            answers,
            counts,
        })
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn row(&self, question_idx: usize) -> &[u64] {
        &self.counts[question_idx]
    }

    pub fn get(&self, question: &str, answer: &str) -> Option<u64> {
        let qi = self.questions.iter().position(|q| q == question)?;
        let ai = self.answers.iter().position(|a| a == answer)?;
        Some(self.counts[qi][ai])
    }

    pub fn row_total(&self, question_idx: usize) -> u64 {
        self.counts[question_idx].iter().sum()
    }

    pub fn grand_total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// The share of an answer within its question row, 0 for an empty row.
    pub fn share(&self, question_idx: usize, answer_idx: usize) -> f64 {
        let total = self.row_total(question_idx);
        if total == 0 {
            0.0
        } else {
            self.counts[question_idx][answer_idx] as f64 / total as f64
        }
    }

    /// Folds the table to one cell per (question, answer).
    pub fn long_form(&self) -> Vec<Cell> {
        let mut res = Vec::with_capacity(self.questions.len() * self.answers.len());
        for (qi, q) in self.questions.iter().enumerate() {
            let total = self.row_total(qi);
            for (ai, a) in self.answers.iter().enumerate() {
                res.push(Cell {
                    question: q.clone(),
                    answer: a.clone(),
                    rank: ai,
                    count: self.counts[qi][ai],
                    total,
                    pct: self.share(qi, ai),
                });
            }
        }
        res
    }
}

/// The answers of a set of questions, translated and ordered as described by a spec.
///
/// An empty selection is not an error: the table is simply absent.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Source {
    table: Option<FrequencyTable>,
}

impl Source {
    /// All the answers to the questions of the `Spec`.
    pub fn new(responses: &ResponseTable, spec: &Spec) -> Source {
        Source::filtered(responses, spec, |_| true)
    }

    /// The answers to the questions of the `Spec` that are also accepted by the predicate
    /// (a programme or a cohort for example).
    pub fn filtered<F>(responses: &ResponseTable, spec: &Spec, predicate: F) -> Source
    where
        F: Fn(&Response) -> bool,
    {
        let observations: Vec<(String, String)> = responses
            .rows()
            .iter()
            .filter(|r| spec.questions().contains_key(&r.step) && predicate(r))
            .filter_map(|r| {
                let answer = r.answer_str()?;
                Some((
                    spec.questions().label_or_code(&r.step).to_string(),
                    spec.answers().label_or_code(answer).to_string(),
                ))
            })
            .collect();
        Source::from_observations(spec, &observations, false)
    }

    /// Multi-select question: every selected code becomes a row, with the number
    /// of students who selected it (yes) and of those who did not (no).
    pub fn multi_select(responses: &ResponseTable, spec: &Spec, step: &str) -> Source {
        let rows = responses.filter(|r| r.step == step && r.answer.is_some());
        if rows.is_empty() {
            debug!("multi_select: no answers for {:?}", step);
            return Source { table: None };
        }
        let students = rows.count_students() as u64;
        let mut selected: HashMap<String, u64> = HashMap::new();
        for r in rows.rows() {
            let codes: HashSet<&str> = r
                .answer_str()
                .unwrap_or("")
                .split(MULTI_SELECT_DELIMITER)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();
            for code in codes {
                *selected.entry(code.to_string()).or_default() += 1;
            }
        }
        debug!(
            "multi_select: {:?}: {} students, selections {:?}",
            step, students, selected
        );
        let table_rows: Vec<(String, Vec<u64>)> = spec
            .questions()
            .iter()
            .filter_map(|(code, label)| {
                let yes = *selected.get(code)?;
                Some((label.to_string(), vec![yes, students.saturating_sub(yes)]))
            })
            .collect();
        let answers = vec![
            spec.label(LabelKey::Yes).to_string(),
            spec.label(LabelKey::No).to_string(),
        ];
        Source {
            table: FrequencyTable::from_rows(answers, table_rows),
        }
    }

    /// Numeric answers (hours) grouped into the bins delimited by `breaks`. The
    /// answers of the `Spec` label the bins, in order. Values that cannot be read
    /// or that fall outside of the breaks are left out.
    pub fn binned(responses: &ResponseTable, spec: &Spec, breaks: &[f64]) -> Result<Source, ReportErrors> {
        let labels: Vec<String> = spec.answers().values().map(|s| s.to_string()).collect();
        let bins = Bins::new(breaks.to_vec(), labels.clone())?;
        let observations: Vec<(String, String)> = responses
            .rows()
            .iter()
            .filter(|r| spec.questions().contains_key(&r.step))
            .filter_map(|r| {
                let hours = validate_hours(r.answer_str()?)?;
                let label = bins.label_of(hours)?;
                Some((
                    spec.questions().label_or_code(&r.step).to_string(),
                    label.to_string(),
                ))
            })
            .collect();
        Ok(Source::from_observations(spec, &observations, true))
    }

    fn from_observations(spec: &Spec, observations: &[(String, String)], keep_unobserved: bool) -> Source {
        if observations.is_empty() {
            debug!("Source: no data for {:?}", spec.id());
            return Source { table: None };
        }
        let question_order: Vec<String> = spec.questions().values().map(|s| s.to_string()).collect();
        let answer_order: Vec<String> = spec.answers().values().map(|s| s.to_string()).collect();
        Source {
            table: FrequencyTable::pivot(observations, &question_order, &answer_order, keep_unobserved),
        }
    }

    pub fn table(&self) -> Option<&FrequencyTable> {
        self.table.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.table.is_some()
    }
}

/// Count, mean, min and max of the readable hours per question, in spec order.
/// Unlike the binned source, values outside of the bins are counted.
pub fn hours_summary(responses: &ResponseTable, spec: &Spec) -> Vec<(String, Summary)> {
    spec.questions()
        .iter()
        .filter_map(|(code, label)| {
            let values: Vec<f64> = responses
                .rows()
                .iter()
                .filter(|r| r.step == *code)
                .filter_map(|r| validate_hours(r.answer_str()?))
                .collect();
            summarize(&values).map(|s| (label.to_string(), s))
        })
        .collect()
}

/// Forms are only taken into account for a grade overview if the answer to
/// the gate question shows the matching diploma.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct DiplomaGate {
    pub step: &'static str,
    pub answers: &'static [&'static str],
}

pub const HAVO_GATE: DiplomaGate = DiplomaGate {
    step: "U_HBO_TOEGANG",
    answers: &["HAVO"],
};

pub const VWO_GATE: DiplomaGate = DiplomaGate {
    step: "U_DIPLOMA_BEH",
    answers: &["VWO_BEH", "VWO_NOG_BEH"],
};

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Grade {
    pub question: String,
    pub grade: f64,
}

/// Per-question statistics of the grades.
#[derive(PartialEq, Debug, Clone)]
pub struct GradeSummary {
    pub question: String,
    pub summary: Summary,
}

/// The valid grades given by the students of one diploma type.
#[derive(PartialEq, Debug, Clone)]
pub struct GradeSource {
    grades: Vec<Grade>,
    question_order: Vec<String>,
}

impl GradeSource {
    pub fn new(responses: &ResponseTable, spec: &Spec, gate: DiplomaGate) -> GradeSource {
        let forms = responses.forms_where(|r| {
            r.step == gate.step
                && r.answer_str()
                    .map(|a| gate.answers.contains(&a))
                    .unwrap_or(false)
        });
        let grades: Vec<Grade> = responses
            .rows()
            .iter()
            .filter(|r| forms.contains(&r.form_id) && spec.questions().contains_key(&r.step))
            .filter_map(|r| {
                let grade = round_half_even(validate_grades(r.answer_str()?)?);
                Some(Grade {
                    question: spec.questions().label_or_code(&r.step).to_string(),
                    grade,
                })
            })
            .collect();
        debug!(
            "GradeSource: {} forms pass {:?}, {} valid grades",
            forms.len(),
            gate.step,
            grades.len()
        );
        GradeSource {
            grades,
            question_order: spec.questions().values().map(|s| s.to_string()).collect(),
        }
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Statistics over all the grades, whatever the subject.
    pub fn overall(&self) -> Option<Summary> {
        let values: Vec<f64> = self.grades.iter().map(|g| g.grade).collect();
        summarize(&values)
    }

    /// Count, mean, min and max per question, in spec order. Questions without
    /// any valid grade are left out.
    pub fn summary(&self) -> Vec<GradeSummary> {
        self.question_order
            .iter()
            .filter_map(|q| {
                let values: Vec<f64> = self
                    .grades
                    .iter()
                    .filter(|g| g.question == *q)
                    .map(|g| g.grade)
                    .collect();
                summarize(&values).map(|summary| GradeSummary {
                    question: q.clone(),
                    summary,
                })
            })
            .collect()
    }
}
