use log::debug;
use serde::Serialize;
use serde_json::{json, Map as JSMap, Value as JSValue};
use std::cmp::Ordering;

use crate::binning::*;
use crate::source::{FrequencyTable, GradeSource, Source};
use crate::spec::{LabelKey, Spec};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// The grade histogram covers the grades 4 up to and including 10.
pub const GRADE_EXTENT: (f64, f64) = (4.0, 11.0);

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartKind {
    /// One facet of horizontal bars per question, with the counts as text.
    Bar,
    /// Same as `Bar`, coloured by answer along the answer order.
    BarOrdinal,
    /// One normalized stacked bar per question.
    NormStack,
    /// Donut with the percentages.
    Pie,
}

/// Presentation settings applied on top of a chart.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct ChartProps {
    pub noborder: bool,
    pub nogrid: bool,
    pub small: bool,
}

impl ChartProps {
    pub const NOBORDER: ChartProps = ChartProps {
        noborder: true,
        nogrid: false,
        small: false,
    };

    pub fn with(self, other: ChartProps) -> ChartProps {
        ChartProps {
            noborder: self.noborder || other.noborder,
            nogrid: self.nogrid || other.nogrid,
            small: self.small || other.small,
        }
    }

    /// Reads a list of property names. Unknown names are ignored.
    pub fn from_names(names: &[&str]) -> ChartProps {
        let mut res = ChartProps::default();
        for name in names {
            match *name {
                "noborder" => res.noborder = true,
                "nogrid" => res.nogrid = true,
                "small" => res.small = true,
                x => debug!("ChartProps: ignoring unknown property {:?}", x),
            }
        }
        res
    }

    fn apply(&self, chart: &mut JSMap<String, JSValue>) {
        let mut view = JSMap::new();
        let mut config = JSMap::new();
        if self.noborder {
            view.insert("strokeWidth".to_string(), json!(0));
        }
        if self.small {
            view.insert("continuousWidth".to_string(), json!(260));
            view.insert("continuousHeight".to_string(), json!(150));
        }
        if !view.is_empty() {
            config.insert("view".to_string(), JSValue::Object(view));
        }
        if self.nogrid {
            config.insert("axis".to_string(), json!({"grid": false}));
        }
        if !config.is_empty() {
            chart.insert("config".to_string(), JSValue::Object(config));
        }
    }
}

/// Builds the Vega-Lite definition of a chart. Without data there is no chart.
pub fn chart(kind: ChartKind, source: &Source, spec: &Spec, props: ChartProps) -> Option<JSValue> {
    let table = match source.table() {
        Some(t) => t,
        None => {
            debug!("chart: no data for {}, skipping", spec.id());
            return None;
        }
    };
    let body = match kind {
        ChartKind::Bar => bar(table, spec, false),
        ChartKind::BarOrdinal => bar(table, spec, true),
        ChartKind::NormStack => normstack(table, spec),
        ChartKind::Pie => pie(table, spec),
    };
    Some(finish(body, props))
}

/// Histogram of the grades, one facet per subject, with the mean as a dashed rule.
pub fn grade_histogram(source: &GradeSource, spec: &Spec, props: ChartProps) -> Option<JSValue> {
    if source.is_empty() {
        debug!("grade_histogram: no grades for {}, skipping", spec.id());
        return None;
    }
    let rows = grade_bins(source).ok()?;
    let tooltip = json!([
        {"field": "question", "type": "nominal", "title": spec.label(LabelKey::Question)},
        {"field": "bin", "type": "nominal", "title": spec.label(LabelKey::Answer)},
        {"field": "total", "type": "quantitative", "title": spec.label(LabelKey::Total)},
        {"field": "count", "type": "quantitative", "title": spec.label(LabelKey::Count)},
        {"field": "pct", "type": "quantitative", "title": spec.label(LabelKey::Percentage), "format": ".0%"},
    ]);
    let body = json!({
        "data": {"values": rows},
        "facet": {"field": "question", "type": "nominal", "title": spec.label(LabelKey::Question)},
        "columns": 2,
        "spec": {
            "layer": [
                {
                    "mark": "bar",
                    "encoding": {
                        "x": {
                            "field": "bin_start",
                            "type": "quantitative",
                            "title": spec.label(LabelKey::Answer),
                            "scale": {"domain": [GRADE_EXTENT.0, GRADE_EXTENT.1]},
                            "axis": {"tickMinStep": 1},
                        },
                        "x2": {"field": "bin_end"},
                        "y": {
                            "field": "count",
                            "type": "quantitative",
                            "title": spec.label(LabelKey::Count),
                            "axis": {"tickMinStep": 1},
                        },
                        "tooltip": tooltip,
                    },
                },
                {
                    "mark": {"type": "rule", "color": "red", "strokeDash": [15, 5]},
                    "encoding": {
                        "x": {"field": "mean", "type": "quantitative"},
                        "size": {"value": 5},
                        "tooltip": [
                            {"field": "question", "type": "nominal", "title": spec.label(LabelKey::Question)},
                            {"field": "mean", "type": "quantitative", "title": spec.label(LabelKey::Mean), "format": ".1f"},
                        ],
                    },
                },
            ],
        },
        "resolve": {"axis": {"x": "independent"}},
    });
    Some(finish(body, props))
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct GradeBin {
    question: String,
    bin: String,
    bin_start: f64,
    bin_end: f64,
    count: u64,
    total: u64,
    pct: f64,
    mean: f64,
}

fn grade_bins(source: &GradeSource) -> Result<Vec<GradeBin>, crate::config::ReportErrors> {
    let bins = Bins::fixed_width(GRADE_EXTENT.0, GRADE_EXTENT.1, 1.0)?;
    let mut res = Vec::new();
    for s in source.summary() {
        let grades: Vec<f64> = source
            .grades()
            .iter()
            .filter(|g| g.question == s.question)
            .map(|g| g.grade)
            .collect();
        let mut counts = vec![0u64; bins.labels().len()];
        for g in grades.iter() {
            if let Some(idx) = bins.bin_index(*g) {
                counts[idx] += 1;
            }
        }
        let total = s.summary.count as u64;
        for (idx, count) in counts.into_iter().enumerate() {
            res.push(GradeBin {
                question: s.question.clone(),
                bin: bins.labels()[idx].clone(),
                bin_start: bins.breaks()[idx],
                bin_end: bins.breaks()[idx + 1],
                count,
                total,
                pct: count as f64 / total as f64,
                mean: round_to(s.summary.mean, 1),
            });
        }
    }
    Ok(res)
}

/// The questions of a normalized stacked bar chart, from the largest share of
/// the first declared answer to the smallest. Ties are broken by the second
/// declared answer. An answer without a column in the table has a share of 0.
pub fn normstack_order(table: &FrequencyTable, declared_answers: &[String]) -> Vec<String> {
    let columns: Vec<Option<usize>> = declared_answers
        .iter()
        .take(2)
        .map(|a| table.answers().iter().position(|x| x == a))
        .collect();
    let share = |q: usize, col: Option<usize>| col.map(|c| table.share(q, c)).unwrap_or(0.0);
    let mut idx: Vec<usize> = (0..table.questions().len()).collect();
    idx.sort_by(|a, b| {
        columns
            .iter()
            .map(|col| {
                share(*b, *col)
                    .partial_cmp(&share(*a, *col))
                    .unwrap_or(Ordering::Equal)
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    idx.into_iter()
        .map(|i| table.questions()[i].clone())
        .collect()
}

fn answer_order(spec: &Spec) -> Vec<String> {
    spec.answers().values().map(|s| s.to_string()).collect()
}

fn tooltip(spec: &Spec) -> JSValue {
    json!([
        {"field": "question", "type": "nominal", "title": spec.label(LabelKey::Question)},
        {"field": "answer", "type": "nominal", "title": spec.label(LabelKey::Answer)},
        {"field": "total", "type": "quantitative", "title": spec.label(LabelKey::Total)},
        {"field": "count", "type": "quantitative", "title": spec.label(LabelKey::Count)},
        {"field": "pct", "type": "quantitative", "title": spec.label(LabelKey::Percentage), "format": ".0%"},
    ])
}

fn ordinal_color(spec: &Spec) -> JSValue {
    let answers = answer_order(spec);
    json!({
        "field": "answer",
        "type": "ordinal",
        "sort": answers,
        "scale": {"domain": answers},
        "title": spec.label(LabelKey::Answer),
    })
}

fn bar(table: &FrequencyTable, spec: &Spec, ordinal: bool) -> JSValue {
    let mut encoding = json!({
        "x": {
            "field": "pct",
            "type": "quantitative",
            "axis": {"format": ".0%"},
            "title": spec.label(LabelKey::Percentage),
        },
        "y": {
            "field": "answer",
            "type": "ordinal",
            "sort": answer_order(spec),
            "title": spec.label(LabelKey::Answer),
        },
        "tooltip": tooltip(spec),
    });
    if ordinal {
        encoding["color"] = ordinal_color(spec);
        encoding["order"] = json!({"field": "rank", "type": "quantitative", "sort": "ascending"});
    }
    let mut text_encoding = encoding.clone();
    text_encoding["text"] = json!({"field": "count", "type": "quantitative"});
    text_encoding["opacity"] = json!({"condition": {"test": "datum.count < 1", "value": 0}, "value": 1});
    json!({
        "data": {"values": table.long_form()},
        "facet": {"field": "question", "type": "nominal", "title": spec.label(LabelKey::Question)},
        "columns": 1,
        "spec": {
            "layer": [
                {"mark": "bar", "encoding": encoding},
                {"mark": {"type": "text", "align": "left", "dx": 7}, "encoding": text_encoding},
            ],
        },
        "resolve": {"scale": {"x": "independent"}},
    })
}

fn normstack(table: &FrequencyTable, spec: &Spec) -> JSValue {
    json!({
        "data": {"values": table.long_form()},
        "mark": "bar",
        "encoding": {
            "x": {
                "field": "pct",
                "type": "quantitative",
                "stack": "normalize",
                "axis": {"format": ".0%"},
                "title": spec.label(LabelKey::Percentage),
            },
            "y": {
                "field": "question",
                "type": "nominal",
                "sort": normstack_order(table, &answer_order(spec)),
                "title": spec.label(LabelKey::Question),
            },
            "color": ordinal_color(spec),
            "order": {"field": "rank", "type": "quantitative", "sort": "ascending"},
            "tooltip": tooltip(spec),
        },
    })
}

fn pie(table: &FrequencyTable, spec: &Spec) -> JSValue {
    json!({
        "data": {"values": table.long_form()},
        "encoding": {
            "theta": {"field": "count", "type": "quantitative", "stack": true},
            "color": {
                "field": "answer",
                "type": "nominal",
                "scale": {"domain": answer_order(spec)},
                "title": spec.label(LabelKey::Answer),
            },
            "order": {"field": "count", "type": "quantitative", "sort": "descending"},
            "tooltip": tooltip(spec),
        },
        "layer": [
            {"mark": {"type": "arc", "innerRadius": 60, "outerRadius": 120}},
            {
                "mark": {"type": "text", "radius": 90},
                "encoding": {
                    "text": {
                        "field": "pct",
                        "type": "quantitative",
                        "format": ".0%",
                        "title": spec.label(LabelKey::Percentage),
                    },
                    "color": {"value": "white"},
                },
            },
        ],
    })
}

fn finish(body: JSValue, props: ChartProps) -> JSValue {
    let mut chart = JSMap::new();
    chart.insert("$schema".to_string(), json!(VEGA_LITE_SCHEMA));
    if let JSValue::Object(fields) = body {
        chart.extend(fields);
    }
    props.apply(&mut chart);
    JSValue::Object(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lang;
    use crate::fixtures::*;
    use crate::lookup::LabelMap;
    use crate::source::VWO_GATE;
    use crate::table::ResponseTable;

    #[test]
    fn no_data_no_chart() {
        let refs = sample_references();
        let spec = Spec::from_pdef(&refs, "U_PROFIEL", Lang::Nl);
        let source = Source::new(&ResponseTable::default(), &spec);
        for kind in [ChartKind::Bar, ChartKind::BarOrdinal, ChartKind::NormStack, ChartKind::Pie] {
            assert_eq!(chart(kind, &source, &spec, ChartProps::default()), None);
        }
    }

    #[test]
    fn pie_chart() {
        let refs = sample_references();
        let spec = Spec::from_pdef(&refs, "U_EERSTEKEUZE", Lang::En);
        let source = Source::new(&sample_responses(), &spec);
        let c = chart(ChartKind::Pie, &source, &spec, ChartProps::default()).unwrap();
        assert_eq!(c["$schema"], json!(VEGA_LITE_SCHEMA));
        assert_eq!(c["layer"][0]["mark"]["innerRadius"], json!(60));
        assert_eq!(c["layer"][1]["mark"]["radius"], json!(90));
        assert_eq!(c["encoding"]["color"]["scale"]["domain"], json!(["yes", "no"]));
        let values = c["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["count"], json!(3));
        assert_eq!(values[0]["pct"], json!(0.75));
        assert!(c.get("config").is_none());
    }

    #[test]
    fn bar_chart_is_faceted() {
        let refs = sample_references();
        let spec = Spec::from_pdef(&refs, "U_PROFIEL", Lang::Nl);
        let source = Source::new(&sample_responses(), &spec);
        let c = chart(ChartKind::Bar, &source, &spec, ChartProps::default()).unwrap();
        assert_eq!(c["columns"], json!(1));
        assert_eq!(c["facet"]["field"], json!("question"));
        let layer = &c["spec"]["layer"];
        assert!(layer[0]["encoding"].get("color").is_none());
        assert_eq!(layer[1]["encoding"]["text"]["field"], json!("count"));

        let c = chart(ChartKind::BarOrdinal, &source, &spec, ChartProps::default()).unwrap();
        assert_eq!(
            c["spec"]["layer"][0]["encoding"]["color"]["type"],
            json!("ordinal")
        );
    }

    #[test]
    fn normstack_sorts_by_first_then_second_answer() {
        let answers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let table = FrequencyTable::from_rows(
            answers,
            vec![
                ("low".to_string(), vec![1, 0, 9]),
                ("tie_b_low".to_string(), vec![5, 1, 4]),
                ("tie_b_high".to_string(), vec![5, 4, 1]),
                ("high".to_string(), vec![9, 1, 0]),
            ],
        )
        .unwrap();
        let declared = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            normstack_order(&table, &declared),
            vec!["high", "tie_b_high", "tie_b_low", "low"]
        );
    }

    #[test]
    fn normstack_sorts_by_declared_answers_even_when_unobserved() {
        // Nobody chose "a": the table only has columns for "b" and "c".
        let table = FrequencyTable::from_rows(
            vec!["b".to_string(), "c".to_string()],
            vec![
                ("few_b".to_string(), vec![1, 9]),
                ("many_b".to_string(), vec![8, 2]),
            ],
        )
        .unwrap();
        let declared = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(normstack_order(&table, &declared), vec!["many_b", "few_b"]);
        let declared = vec!["a".to_string(), "c".to_string(), "b".to_string()];
        assert_eq!(normstack_order(&table, &declared), vec!["few_b", "many_b"]);
    }

    #[test]
    fn normstack_chart_uses_the_reversed_scale() {
        let refs = sample_references();
        let spec = Spec::from_codings(&refs, "U_ACTIV_MIDDEL", None, Lang::Nl).with_answers_reversed();
        let source = Source::new(&sample_responses(), &spec);
        let c = chart(ChartKind::NormStack, &source, &spec, ChartProps::NOBORDER).unwrap();
        assert_eq!(
            c["encoding"]["color"]["scale"]["domain"],
            json!(["niet gebruikt", "gebruikt, niet nuttig", "gebruikt, nuttig"])
        );
        assert_eq!(c["config"]["view"]["strokeWidth"], json!(0));
        // open dag: 1 of 2 did not use it, website: 1 of 1.
        assert_eq!(c["encoding"]["y"]["sort"], json!(["website", "open dag"]));
    }

    #[test]
    fn props() {
        let p = ChartProps::from_names(&["small", "nogrid", "shiny"]);
        assert!(p.small && p.nogrid && !p.noborder);
        let mut m = JSMap::new();
        p.with(ChartProps::NOBORDER).apply(&mut m);
        let config = JSValue::Object(m)["config"].clone();
        assert_eq!(config["axis"]["grid"], json!(false));
        assert_eq!(config["view"]["continuousWidth"], json!(260));
        assert_eq!(config["view"]["continuousHeight"], json!(150));
        assert_eq!(config["view"]["strokeWidth"], json!(0));
    }

    #[test]
    fn grade_histogram_bins() {
        let refs = sample_references();
        let spec = Spec::new(
            refs.questions_where_pdef(|q| q.step == "O_CIJF_WISK", Lang::Nl),
            LabelMap::new(),
            Lang::Nl,
        );
        let source = GradeSource::new(&sample_responses(), &spec, VWO_GATE);
        let c = grade_histogram(&source, &spec, ChartProps::default()).unwrap();
        assert_eq!(c["columns"], json!(2));
        let values = c["data"]["values"].as_array().unwrap();
        // 7 bins for a single subject.
        assert_eq!(values.len(), 7);
        let nine = values.iter().find(|v| v["bin"] == json!("9")).unwrap();
        assert_eq!(nine["count"], json!(1));
        assert_eq!(nine["mean"], json!(8.5));
        let ten = values.iter().find(|v| v["bin"] == json!("10")).unwrap();
        assert_eq!(ten["bin_end"], json!(11.0));

        let empty = GradeSource::new(&ResponseTable::default(), &spec, VWO_GATE);
        assert!(grade_histogram(&empty, &spec, ChartProps::default()).is_none());
    }
}
