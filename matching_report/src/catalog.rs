// The charts and tables of the matching form report, grouped in sections.

use html_escape::encode_text;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::binning::round_to;
use crate::chart::*;
use crate::config::*;
use crate::document::*;
use crate::lookup::{LabelMap, References};
use crate::source::*;
use crate::spec::{LabelKey, Spec};
use crate::table::ResponseTable;

/// Breaks of the time use bins, in hours per week.
pub const HOURS_BREAKS: [f64; 8] = [0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 100.0];

const HOURS_LABELS: [&str; 7] = [
    "[0-5)", "[5-10)", "[10-15)", "[15-20)", "[20-25)", "[25-30)", "30+",
];

static GRADE_QUESTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[OU]_CIJF_").unwrap());

pub type ChartBuilder = fn(&ResponseTable, &References, Lang, ChartProps) -> Option<ChartBlock>;
pub type TableBuilder = fn(&ResponseTable, &References, Lang) -> Option<TableBlock>;

#[derive(Clone, Copy)]
pub enum CatalogItem {
    Chart(ChartBuilder, ChartProps),
    Table(TableBuilder),
}

#[derive(Clone)]
pub struct Section {
    pub title: Localized,
    pub items: Vec<CatalogItem>,
    pub subsections: Vec<Section>,
}

impl Section {
    fn new(nl: &str, en: &str, items: Vec<CatalogItem>) -> Section {
        Section {
            title: Localized::new(nl, en),
            items,
            subsections: Vec::new(),
        }
    }
}

fn chart_item(build: ChartBuilder) -> CatalogItem {
    CatalogItem::Chart(build, ChartProps::default())
}

fn pie_item(build: ChartBuilder) -> CatalogItem {
    CatalogItem::Chart(build, ChartProps::NOBORDER)
}

/// All the sections of the matching form report, in order.
pub fn matching_sections() -> Vec<Section> {
    let mut grades = Section::new("Cijfers", "Grades", Vec::new());
    grades.subsections = vec![
        Section::new(
            "vwo",
            "vwo",
            vec![CatalogItem::Table(grades_table_vwo), chart_item(grades_chart_vwo)],
        ),
        Section::new(
            "havo",
            "havo",
            vec![CatalogItem::Table(grades_table_havo), chart_item(grades_chart_havo)],
        ),
    ];
    vec![
        Section::new(
            "Studiekeuze",
            "Study choice",
            vec![
                CatalogItem::Chart(choice_tools, ChartProps::NOBORDER),
                pie_item(first_choice),
                chart_item(choice_factors),
                pie_item(track_litb),
                pie_item(track_theb),
                pie_item(track_tlwb),
                chart_item(other_professions),
            ],
        ),
        Section::new(
            "Tijdsbesteding",
            "Time use",
            vec![chart_item(time_use_school), chart_item(time_use_study)],
        ),
        Section::new(
            "Stellingen",
            "Statements",
            vec![
                chart_item(conscientiousness),
                chart_item(statements_agree),
                chart_item(statements_fit),
            ],
        ),
        Section::new(
            "Vooropleiding",
            "Pre-education",
            vec![pie_item(pre_education), pie_item(profile)],
        ),
        grades,
        Section::new(
            "Honours",
            "Honours",
            vec![
                pie_item(honours),
                pie_item(extra_exam_subject),
                pie_item(plus_programme),
                pie_item(extra_activity),
                pie_item(deepening),
            ],
        ),
    ]
}

/// Builds the chapter of a section. Items without data are left out, as are
/// sub-chapters left without content. The chapter itself is always returned.
pub fn build_chapter(section: &Section, responses: &ResponseTable, refs: &References, lang: Lang) -> Chapter {
    let mut chapter = Chapter::new(section.title.get(lang));
    for item in section.items.iter() {
        match item {
            CatalogItem::Chart(build, props) => match build(responses, refs, lang, *props) {
                Some(c) => chapter.add_chart(c),
                None => debug!("build_chapter: {}: skipping a chart without data", chapter.header),
            },
            CatalogItem::Table(build) => match build(responses, refs, lang) {
                Some(t) => chapter.add_table(t),
                None => debug!("build_chapter: {}: skipping a table without data", chapter.header),
            },
        }
    }
    for sub in section.subsections.iter() {
        let c = build_chapter(sub, responses, refs, lang);
        if c.is_empty() {
            debug!("build_chapter: dropping empty sub-chapter {}", c.header);
        } else {
            chapter.add_chap(c);
        }
    }
    chapter
}

fn chart_block(kind: ChartKind, source: &Source, spec: &Spec, props: ChartProps) -> Option<ChartBlock> {
    let json = chart(kind, source, spec, props)?;
    Some(ChartBlock {
        key: spec.id().to_string(),
        json,
        title: spec.title().to_string(),
        undertitle: None,
    })
}

fn pie_from_pdef(step: &str, responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    let spec = Spec::from_pdef(refs, step, lang);
    let source = Source::new(responses, &spec);
    chart_block(ChartKind::Pie, &source, &spec, props)
}

fn yes_no(spec: Spec) -> Spec {
    let answers = LabelMap::from_pairs([
        ("ja", spec.label(LabelKey::Yes).to_string()),
        ("nee", spec.label(LabelKey::No).to_string()),
    ]);
    spec.with_answers(answers)
}

// ********* Study choice ***********

fn choice_tools(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    let spec = Spec::from_codings(refs, "U_ACTIV_MIDDEL", None, lang)
        .with_labels(&[(LabelKey::Question, Localized::new("middel", "tool/activity"))])
        .with_answers_reversed();
    let source = Source::new(responses, &spec);
    chart_block(ChartKind::NormStack, &source, &spec, props)
}

fn first_choice(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("U_EERSTEKEUZE", responses, refs, lang, props)
}

fn choice_factors(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    let spec = yes_no(
        Spec::from_codings(refs, "U_FACTOREN", None, lang)
            .with_labels(&[(LabelKey::Question, Localized::new("factor", "factor"))]),
    );
    let source = Source::multi_select(responses, &spec, "U_FACTOREN");
    chart_block(ChartKind::NormStack, &source, &spec, props)
}

fn track_litb(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("O_TRACK_LITB", responses, refs, lang, props)
}

fn track_theb(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("O_TRACK_THEB", responses, refs, lang, props)
}

fn track_tlwb(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("O_TRACK_TLWB", responses, refs, lang, props)
}

fn other_professions(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    // The answer codes of the question are the rows of the chart.
    let spec = Spec::from_pdef(refs, "O_BEROEP", lang)
        .with_labels(&[(LabelKey::Question, Localized::new("beroep", "profession"))]);
    let professions = spec.answers().clone();
    let spec = yes_no(spec.with_questions(professions));
    let source = Source::multi_select(responses, &spec, "O_BEROEP");
    chart_block(ChartKind::NormStack, &source, &spec, props)
}

// ********* Time use ***********

fn time_use(step: &str, responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    let answers = LabelMap::from_pairs(
        HOURS_LABELS
            .iter()
            .enumerate()
            .map(|(i, l)| (i.to_string(), l.to_string())),
    );
    let spec = Spec::from_codings(refs, step, None, lang)
        .with_answers(answers)
        .with_labels(&[
            (LabelKey::Question, Localized::new("tijdsbesteding", "time use")),
            (LabelKey::Answer, Localized::new("aantal uur", "time in hours")),
        ]);
    let source = Source::binned(responses, &spec, &HOURS_BREAKS).ok()?;
    let block = chart_block(ChartKind::Bar, &source, &spec, props)?;
    Some(ChartBlock {
        undertitle: hours_undertitle(responses, &spec, lang),
        ..block
    })
}

/// One line with the mean number of hours per question.
fn hours_undertitle(responses: &ResponseTable, spec: &Spec, lang: Lang) -> Option<String> {
    let mean = Localized::new("Gemiddelde", "Mean");
    let hours = Localized::new("uur", "hours");
    let lines: Vec<String> = hours_summary(responses, spec)
        .iter()
        .map(|(question, s)| {
            format!(
                "<p>{} {}: {} {}</p>",
                mean.get(lang),
                encode_text(question),
                round_to(s.mean, 1),
                hours.get(lang)
            )
        })
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn time_use_school(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    time_use("O_SCHOOLWK_TOE", responses, refs, lang, props)
}

fn time_use_study(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    time_use("U_STUDIEWK_TOEL", responses, refs, lang, props)
}

// ********* Statements ***********

fn conscientiousness(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    let title = refs.title_from_pdef("U_STELLING_TOEL", lang).unwrap_or_default();
    let spec = Spec::from_codings(refs, "U_STEL_CONSC", Some("STELLING_EENS"), lang)
        .titled(title)
        .with_labels(&[(LabelKey::Question, Localized::new("eigenschap", "trait"))]);
    let source = Source::new(responses, &spec);
    chart_block(ChartKind::NormStack, &source, &spec, props)
}

/// The statements answered on the given system list scale.
fn statements(
    system_list: &str,
    answer_group: &str,
    title_step: &str,
    responses: &ResponseTable,
    refs: &References,
    lang: Lang,
    props: ChartProps,
) -> Option<ChartBlock> {
    let questions = refs.questions_where_pdef(
        |q| q.step.contains("O_STELLING") && q.system_list.as_deref() == Some(system_list),
        lang,
    );
    let spec = Spec::new(questions, refs.answers_from_codings(answer_group, lang), lang)
        .titled(refs.title_from_pdef(title_step, lang).unwrap_or_default())
        .with_id(format!("vis_{}", codify(title_step)));
    let source = Source::new(responses, &spec);
    chart_block(ChartKind::BarOrdinal, &source, &spec, props)
}

fn statements_agree(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    statements("AANM_5PUNTS", "STELLING_EENS", "O_STELLING_TOEL", responses, refs, lang, props)
}

fn statements_fit(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    statements("AANM_5PUNTS_B", "STELLING_PAST", "O_STELLING_TOE2", responses, refs, lang, props)
}

// ********* Pre-education ***********

fn pre_education(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("U_DIPLOMA_BEH", responses, refs, lang, props)
}

fn profile(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("U_PROFIEL", responses, refs, lang, props)
}

// ********* Grades ***********

pub fn is_grade_question(q: &PdefQuestion) -> bool {
    GRADE_QUESTION.is_match(&q.step) && !q.step.contains("_CIJF_TOEL")
}

fn grades_spec(refs: &References, lang: Lang, id: &str) -> Spec {
    let answers = LabelMap::from_pairs((4..=10).map(|g| (g.to_string(), g.to_string())));
    Spec::new(refs.questions_where_pdef(is_grade_question, lang), answers, lang)
        .with_labels(&[
            (LabelKey::Question, Localized::new("vak", "subject")),
            (LabelKey::Answer, Localized::new("cijfer", "grade")),
        ])
        .with_id(id)
}

fn grades_chart(
    gate: DiplomaGate,
    title_step: &str,
    id: &str,
    responses: &ResponseTable,
    refs: &References,
    lang: Lang,
    props: ChartProps,
) -> Option<ChartBlock> {
    let spec = grades_spec(refs, lang, id).titled(refs.title_from_pdef(title_step, lang).unwrap_or_default());
    let source = GradeSource::new(responses, &spec, gate);
    let json = grade_histogram(&source, &spec, props)?;
    let mean = Localized::new("Gemiddeld cijfer", "Average grade");
    Some(ChartBlock {
        key: spec.id().to_string(),
        json,
        title: spec.title().to_string(),
        undertitle: source
            .overall()
            .map(|s| format!("<p>{}: {}</p>", mean.get(lang), round_to(s.mean, 1))),
    })
}

fn grades_chart_vwo(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    grades_chart(VWO_GATE, "O_CIJF_TOEL4", "vis_grades_vwo", responses, refs, lang, props)
}

fn grades_chart_havo(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    grades_chart(HAVO_GATE, "U_CIJF_TOEL3", "vis_grades_havo", responses, refs, lang, props)
}

fn grades_table(gate: DiplomaGate, title: Localized, responses: &ResponseTable, refs: &References, lang: Lang) -> Option<TableBlock> {
    let spec = grades_spec(refs, lang, "table_grades");
    let source = GradeSource::new(responses, &spec, gate);
    let summary = source.summary();
    if summary.is_empty() {
        return None;
    }
    let columns = vec![
        spec.label(LabelKey::Question).to_string(),
        "n".to_string(),
        spec.label(LabelKey::Mean).to_string(),
        "min".to_string(),
        "max".to_string(),
    ];
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|s| {
            vec![
                s.question.clone(),
                s.summary.count.to_string(),
                format!("{:.1}", round_to(s.summary.mean, 1)),
                format!("{}", s.summary.min),
                format!("{}", s.summary.max),
            ]
        })
        .collect();
    Some(TableBlock {
        title: title.get(lang).to_string(),
        html: html_table(&columns, &rows),
    })
}

fn grades_table_vwo(responses: &ResponseTable, refs: &References, lang: Lang) -> Option<TableBlock> {
    grades_table(
        VWO_GATE,
        Localized::new("Overzicht vwo-cijfers", "Overview vwo-grades"),
        responses,
        refs,
        lang,
    )
}

fn grades_table_havo(responses: &ResponseTable, refs: &References, lang: Lang) -> Option<TableBlock> {
    grades_table(
        HAVO_GATE,
        Localized::new("Overzicht havo-cijfers", "Overview havo-grades"),
        responses,
        refs,
        lang,
    )
}

// ********* Honours ***********

fn honours(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("U_INTERESSE_HON", responses, refs, lang, props)
}

fn extra_exam_subject(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("O_EXTRA EXVAK", responses, refs, lang, props)
}

fn plus_programme(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("O_PLUSPROGRAMMA", responses, refs, lang, props)
}

fn extra_activity(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("O_EXTRA_ACTIVIT", responses, refs, lang, props)
}

fn deepening(responses: &ResponseTable, refs: &References, lang: Lang, props: ChartProps) -> Option<ChartBlock> {
    pie_from_pdef("O_VERDIEPEN", responses, refs, lang, props)
}
