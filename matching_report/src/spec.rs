use std::collections::HashMap;

use crate::config::*;
use crate::document::codify;
use crate::lookup::{LabelMap, References};

/// The fixed vocabulary used in axis titles, legends and tooltips.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum LabelKey {
    Question,
    Answer,
    Count,
    Total,
    Percentage,
    Mean,
    Yes,
    No,
}

impl LabelKey {
    pub const ALL: [LabelKey; 8] = [
        LabelKey::Question,
        LabelKey::Answer,
        LabelKey::Count,
        LabelKey::Total,
        LabelKey::Percentage,
        LabelKey::Mean,
        LabelKey::Yes,
        LabelKey::No,
    ];

    fn default_text(&self) -> Localized {
        match self {
            LabelKey::Question => Localized::new("vraag", "question"),
            LabelKey::Answer => Localized::new("antwoord", "answer"),
            LabelKey::Count => Localized::new("aantal", "count"),
            LabelKey::Total => Localized::new("totaal", "total"),
            LabelKey::Percentage => Localized::new("percentage", "percentage"),
            LabelKey::Mean => Localized::new("gem.", "mean"),
            LabelKey::Yes => Localized::new("ja", "yes"),
            LabelKey::No => Localized::new("nee", "no"),
        }
    }
}

/// The vocabulary resolved in one language, with optional overrides per key.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Labels {
    texts: HashMap<LabelKey, String>,
}

impl Labels {
    pub fn new(lang: Lang, overrides: &[(LabelKey, Localized)]) -> Labels {
        let mut texts: HashMap<LabelKey, String> = LabelKey::ALL
            .iter()
            .map(|k| (*k, k.default_text().get(lang).to_string()))
            .collect();
        for (k, text) in overrides {
            texts.insert(*k, text.get(lang).to_string());
        }
        Labels { texts }
    }

    pub fn get(&self, key: LabelKey) -> &str {
        self.texts.get(&key).map(|s| s.as_str()).unwrap_or("")
    }
}

/// The resolved description of one chart or table: which questions, which
/// answers in which order, and how to name them.
///
/// A spec is never modified: the `with_*` methods consume it and return a new one.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Spec {
    id: String,
    questions: LabelMap,
    answers: LabelMap,
    title: String,
    labels: Labels,
    lang: Lang,
}

impl Spec {
    /// The title defaults to the label of the first question.
    pub fn new(questions: LabelMap, answers: LabelMap, lang: Lang) -> Spec {
        let title = questions.first_value().unwrap_or("").to_string();
        let id = format!("vis_{}", codify(questions.keys().next().unwrap_or("spec")));
        Spec {
            id,
            questions,
            answers,
            title,
            labels: Labels::new(lang, &[]),
            lang,
        }
    }

    /// The question and its answers as defined in the process definition.
    pub fn from_pdef(refs: &References, step: &str, lang: Lang) -> Spec {
        Spec::new(
            refs.questions_from_pdef(&[step], lang),
            refs.answers_from_pdef(&[step], lang),
            lang,
        )
    }

    /// Sub-questions and answers taken from the codings table. The answers are
    /// those of `answer_group` when provided, of `step` otherwise. The title is
    /// the text of `step` in the process definition.
    pub fn from_codings(
        refs: &References,
        step: &str,
        answer_group: Option<&str>,
        lang: Lang,
    ) -> Spec {
        let questions = refs.questions_from_codings(step, lang);
        let answers = refs.answers_from_codings(answer_group.unwrap_or(step), lang);
        let title = refs.title_from_pdef(step, lang).unwrap_or_default();
        Spec::new(questions, answers, lang)
            .with_id(format!("vis_{}", codify(step)))
            .titled(title)
    }

    pub fn titled(self, title: impl Into<String>) -> Spec {
        Spec {
            title: title.into(),
            ..self
        }
    }

    pub fn with_labels(self, overrides: &[(LabelKey, Localized)]) -> Spec {
        Spec {
            labels: Labels::new(self.lang, overrides),
            ..self
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Spec {
        Spec {
            id: id.into(),
            ..self
        }
    }

    pub fn with_questions(self, questions: LabelMap) -> Spec {
        Spec { questions, ..self }
    }

    pub fn with_answers(self, answers: LabelMap) -> Spec {
        Spec { answers, ..self }
    }

    /// Reverses the answer scale (and thus the legend and stacking order).
    pub fn with_answers_reversed(self) -> Spec {
        let answers = self.answers.reversed();
        Spec { answers, ..self }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn questions(&self) -> &LabelMap {
        &self.questions
    }

    pub fn answers(&self) -> &LabelMap {
        &self.answers
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn label(&self, key: LabelKey) -> &str {
        self.labels.get(key)
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_references;

    #[test]
    fn from_pdef() {
        let refs = sample_references();
        let spec = Spec::from_pdef(&refs, "U_EERSTEKEUZE", Lang::En);
        assert_eq!(spec.title(), "Is this programme your first choice?");
        assert_eq!(spec.answers().keys().collect::<Vec<_>>(), vec!["JA", "NEE"]);
        assert_eq!(spec.label(LabelKey::Count), "count");
        assert_eq!(spec.id(), "vis_u_eerstekeuze");
    }

    #[test]
    fn from_codings_with_answer_group() {
        let refs = sample_references();
        let spec = Spec::from_codings(&refs, "U_STEL_CONSC", Some("STELLING_EENS"), Lang::Nl);
        assert_eq!(spec.questions().len(), 2);
        assert_eq!(spec.answers().first_value(), Some("helemaal eens"));
        // U_STEL_CONSC has no text in the process definition.
        assert_eq!(spec.title(), "");
    }

    #[test]
    fn label_overrides() {
        let refs = sample_references();
        let spec = Spec::from_pdef(&refs, "U_PROFIEL", Lang::Nl).with_labels(&[(
            LabelKey::Question,
            Localized::new("middel", "tool/activity"),
        )]);
        assert_eq!(spec.label(LabelKey::Question), "middel");
        assert_eq!(spec.label(LabelKey::Mean), "gem.");
        assert_eq!(spec.label(LabelKey::Yes), "ja");
    }

    #[test]
    fn reversing_creates_a_new_spec() {
        let refs = sample_references();
        let spec = Spec::from_codings(&refs, "U_ACTIV_MIDDEL", None, Lang::Nl);
        let reversed = spec.clone().with_answers_reversed();
        assert_eq!(spec.answers().keys().next(), Some("W-GEBR-W-GEH"));
        assert_eq!(reversed.answers().keys().next(), Some("N-GEBR"));
        assert_eq!(reversed.questions(), spec.questions());
    }
}
