mod binning;
mod catalog;
mod chart;
mod config;
mod document;
mod lookup;
mod source;
mod spec;
mod table;

pub mod manual;

#[cfg(test)]
mod fixtures;

use log::{debug, info};

pub use crate::binning::{round_half_even, round_to, summarize, validate_grades, validate_hours, Bins, Summary};
pub use crate::catalog::{build_chapter, is_grade_question, matching_sections, CatalogItem, Section, HOURS_BREAKS};
pub use crate::chart::{chart, grade_histogram, normstack_order, ChartKind, ChartProps};
pub use crate::config::*;
pub use crate::document::{codify, html_table, Block, Body, Chapter, ChartBlock, TableBlock, Templates};
pub use crate::lookup::{LabelMap, References};
pub use crate::source::*;
pub use crate::spec::{LabelKey, Labels, Spec};
pub use crate::table::*;

/// Builds the matching form report of the given programmes and matching
/// dates, with the embedded templates.
///
/// Returns `None` when no form matches the selection.
pub fn run(
    responses: &ResponseTable,
    refs: &References,
    programmes: &[String],
    matching_dates: &[String],
    lang: Lang,
    generated_on: &str,
) -> Option<Body> {
    run_with_templates(
        responses,
        refs,
        programmes,
        matching_dates,
        lang,
        generated_on,
        Templates::embedded(lang),
    )
}

/// Same as [run], with custom templates.
pub fn run_with_templates(
    responses: &ResponseTable,
    refs: &References,
    programmes: &[String],
    matching_dates: &[String],
    lang: Lang,
    generated_on: &str,
    templates: Templates,
) -> Option<Body> {
    let forms = responses.select_forms(matching_dates, programmes);
    if forms.is_empty() {
        info!(
            "No results for {}, {}",
            programmes.join(", "),
            matching_dates.join(", ")
        );
        return None;
    }
    let props = report_properties(&forms, lang, generated_on);
    info!(
        "run: {} forms, matching dates {}",
        props.forms, props.matching_dates
    );

    let lang_page = Localized::new("Statistieken matchingsformulier", "Statistics matching form");
    let (programme, programme_name) = match programmes {
        [p] => {
            let name = refs.programme_name(p, lang).unwrap_or_else(|| p.clone());
            (Some(p.clone()), Some(name))
        }
        _ => (None, None),
    };

    let mut paragraph = introduction(programme_name.as_deref(), &props, lang, &templates);
    if programme.is_none() {
        let head = Localized::new("Formulieren per opleiding", "Forms per programme");
        paragraph.push_str(&format!("<h4>{}</h4>\n", head.get(lang)));
        paragraph.push_str(&forms_per_programme_table(&forms, lang));
    }

    let page_name: Vec<String> = [
        programme.clone(),
        Some(props.matching_dates.to_uppercase()),
        Some(lang_page.get(lang).to_string()),
        programme_name.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();
    let title: Vec<String> = [Some(lang_page.get(lang).to_string()), programme_name]
        .into_iter()
        .flatten()
        .collect();

    let mut body = Body::new(title.join(" "), page_name.join(" "), lang).with_templates(templates);

    let mut intro = Chapter::new(Localized::new("Inleiding", "Introduction").get(lang));
    intro.add_par(paragraph);
    body.add(intro);

    for section in matching_sections() {
        let chapter = build_chapter(&section, &forms, refs, lang);
        debug!(
            "run: chapter {:?} with {} items",
            chapter.header,
            chapter.blocks.len()
        );
        body.add(chapter);
    }
    Some(body)
}

fn introduction(
    programme_name: Option<&str>,
    props: &ReportProperties,
    lang: Lang,
    templates: &Templates,
) -> String {
    let preposition = Localized::new("voor", "for");
    let programme_name = match programme_name {
        Some(name) => format!(
            "{} <b>{}</b> ",
            preposition.get(lang),
            html_escape::encode_text(name)
        ),
        None => String::new(),
    };
    let intro = document::fill(
        templates.snippet("intro"),
        &[("programme_name", programme_name.as_str())],
    );
    let forms = props.forms.to_string();
    let table = document::fill(
        templates.snippet("introtable"),
        &[
            ("now", props.generated_on.as_str()),
            ("matching_dates", props.matching_dates.as_str()),
            ("nforms", forms.as_str()),
        ],
    );
    format!("{}{}", intro, table)
}

fn forms_per_programme_table(forms: &ResponseTable, lang: Lang) -> String {
    let columns = vec![
        Localized::new("Faculteit", "Faculty").get(lang).to_string(),
        Localized::new("Opleiding", "Programme").get(lang).to_string(),
        Localized::new("Aantal", "Number").get(lang).to_string(),
    ];
    let rows: Vec<Vec<String>> = forms
        .forms_per_programme()
        .into_iter()
        .map(|((faculty, programme), n)| vec![faculty, programme, n.to_string()])
        .collect();
    html_table(&columns, &rows)
}
