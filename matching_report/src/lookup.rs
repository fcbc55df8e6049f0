use log::debug;

use crate::config::*;

/// An ordered mapping from codes to labels.
///
/// The order of insertion is significant: charts use it as the order of the
/// legends and of the stacks. Inserting an existing key replaces its label and
/// keeps its position.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct LabelMap {
    entries: Vec<(String, String)>,
}

impl LabelMap {
    pub fn new() -> LabelMap {
        LabelMap {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> LabelMap
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut res = LabelMap::new();
        for (k, v) in pairs {
            res.insert(k, v);
        }
        res
    }

    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The label for a code, or the code itself when it is unknown.
    pub fn label_or_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).unwrap_or(code)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn first_value(&self) -> Option<&str> {
        self.entries.first().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reversed(&self) -> LabelMap {
        LabelMap {
            entries: self.entries.iter().rev().cloned().collect(),
        }
    }
}

impl FromIterator<(String, String)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> LabelMap {
        LabelMap::from_pairs(iter)
    }
}

/// All the reference tables needed to resolve codes into text.
///
/// The tables are passed explicitly through the pipeline.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct References {
    pub questions: Vec<PdefQuestion>,
    pub answers: Vec<PdefAnswer>,
    pub codings: Vec<Coding>,
    pub programmes: Vec<Programme>,
}

impl References {
    /// The text of each requested question, in the order of the request.
    /// Unknown codes are left out.
    pub fn questions_from_pdef(&self, steps: &[&str], lang: Lang) -> LabelMap {
        let mut res = LabelMap::new();
        for step in steps {
            match self.questions.iter().find(|q| q.step == *step) {
                Some(q) => res.insert(q.step.clone(), q.text.get(lang)),
                None => debug!("questions_from_pdef: unknown step {:?}", step),
            }
        }
        res
    }

    pub fn title_from_pdef(&self, step: &str, lang: Lang) -> Option<String> {
        self.questions_from_pdef(&[step], lang)
            .first_value()
            .map(|s| s.to_string())
    }

    /// The text of all the questions accepted by the predicate, in reference order.
    pub fn questions_where_pdef<F>(&self, predicate: F, lang: Lang) -> LabelMap
    where
        F: Fn(&PdefQuestion) -> bool,
    {
        self.questions
            .iter()
            .filter(|q| predicate(q))
            .map(|q| (q.step.clone(), q.text.get(lang).to_string()))
            .collect()
    }

    /// The answer codes and their text for the given question(s), in reference order.
    pub fn answers_from_pdef(&self, steps: &[&str], lang: Lang) -> LabelMap {
        self.answers
            .iter()
            .filter(|a| steps.contains(&a.step.as_str()))
            .map(|a| (a.code.clone(), a.text.get(lang).to_string()))
            .collect()
    }

    pub fn questions_from_codings(&self, group: &str, lang: Lang) -> LabelMap {
        self.codings_of(group, CodingKind::Question, lang)
    }

    pub fn answers_from_codings(&self, group: &str, lang: Lang) -> LabelMap {
        self.codings_of(group, CodingKind::Answer, lang)
    }

    fn codings_of(&self, group: &str, kind: CodingKind, lang: Lang) -> LabelMap {
        self.codings
            .iter()
            .filter(|c| c.group == group && c.kind == kind)
            .map(|c| (c.code.clone(), c.text.get(lang).to_string()))
            .collect()
    }

    pub fn programme_name(&self, code: &str, lang: Lang) -> Option<String> {
        self.programmes
            .iter()
            .find(|p| p.code == code)
            .map(|p| p.name.get(lang).to_string())
    }
}
