use html_escape::encode_text;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JSValue;
use std::collections::HashMap;

use crate::config::Lang;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9a-zA-Z]+").unwrap());

const TAB: &str = "    ";

/// Lowercases and replaces every run of non-alphanumeric characters with `_`.
pub fn codify(item: &str) -> String {
    NON_ALNUM.replace_all(&item.to_lowercase(), "_").into_owned()
}

/// Replaces each `{{ key }}` placeholder, in the given order.
pub fn fill(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut res = template.to_string();
    for (key, value) in replacements {
        res = res.replace(&format!("{{{{ {} }}}}", key), value);
    }
    res
}

// ********* Templates ***********

const SNIPPETS: &[&str] = &["author", "footer", "logo", "intro", "introtable"];

fn embedded_snippet(name: &str, lang: Lang) -> Option<&'static str> {
    let s = match (name, lang) {
        ("author", Lang::Nl) => include_str!("../templates/snippet_author_nl.html"),
        ("author", Lang::En) => include_str!("../templates/snippet_author_en.html"),
        ("footer", Lang::Nl) => include_str!("../templates/snippet_footer_nl.html"),
        ("footer", Lang::En) => include_str!("../templates/snippet_footer_en.html"),
        ("logo", Lang::Nl) => include_str!("../templates/snippet_logo_nl.html"),
        ("logo", Lang::En) => include_str!("../templates/snippet_logo_en.html"),
        ("intro", Lang::Nl) => include_str!("../templates/snippet_intro_nl.html"),
        ("intro", Lang::En) => include_str!("../templates/snippet_intro_en.html"),
        ("introtable", Lang::Nl) => include_str!("../templates/snippet_introtable_nl.html"),
        ("introtable", Lang::En) => include_str!("../templates/snippet_introtable_en.html"),
        _ => return None,
    };
    Some(s)
}

/// The page template, the chart template, the stylesheet and the snippets of
/// one language.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Templates {
    lang: Lang,
    body: String,
    spec: String,
    css: String,
    snippets: HashMap<String, String>,
}

impl Templates {
    pub fn embedded(lang: Lang) -> Templates {
        let snippets = SNIPPETS
            .iter()
            .filter_map(|name| embedded_snippet(name, lang).map(|s| (name.to_string(), s.to_string())))
            .collect();
        Templates {
            lang,
            body: include_str!("../templates/body.html").to_string(),
            spec: include_str!("../templates/spec.html").to_string(),
            css: include_str!("../templates/style.css").to_string(),
            snippets,
        }
    }

    /// The snippet a file name stands for, if it is `snippet_<name>_<lang>.html`
    /// in the language of the templates.
    fn snippet_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_prefix("snippet_")
            .and_then(|s| s.strip_suffix(&format!("_{}.html", self.lang.code())))
            .filter(|name| !name.is_empty())
    }

    /// Whether a file with this name would replace one of the templates.
    pub fn accepts(&self, file_name: &str) -> bool {
        matches!(file_name, "body.html" | "spec.html" | "style.css")
            || self.snippet_name(file_name).is_some()
    }

    /// Replaces a template by the content of a file with the given name:
    /// `body.html`, `spec.html`, `style.css` or `snippet_<name>_<lang>.html`.
    /// Snippets of the other language are ignored. Returns whether the file was used.
    pub fn override_with(&mut self, file_name: &str, content: &str) -> bool {
        match file_name {
            "body.html" => self.body = content.to_string(),
            "spec.html" => self.spec = content.to_string(),
            "style.css" => self.css = content.to_string(),
            _ => match self.snippet_name(file_name) {
                Some(name) => {
                    self.snippets.insert(name.to_string(), content.to_string());
                }
                None => {
                    debug!("Templates: ignoring {:?}", file_name);
                    return false;
                }
            },
        }
        debug!("Templates: using {:?}", file_name);
        true
    }

    pub fn snippet(&self, name: &str) -> &str {
        match self.snippets.get(name) {
            Some(s) => s.as_str(),
            None => {
                warn!("Templates: missing snippet {:?}", name);
                ""
            }
        }
    }
}

// ********* Report tree ***********

/// One chart, with its title and an optional text below the title.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartBlock {
    pub key: String,
    pub json: JSValue,
    pub title: String,
    pub undertitle: Option<String>,
}

/// A table rendered beforehand as html.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TableBlock {
    pub title: String,
    pub html: String,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Block {
    Chart(ChartBlock),
    Table(TableBlock),
}

#[derive(PartialEq, Debug, Clone)]
pub struct Chapter {
    pub header: String,
    pub paragraph: Option<String>,
    pub chapters: Vec<Chapter>,
    pub blocks: Vec<Block>,
}

impl Chapter {
    pub fn new(header: impl Into<String>) -> Chapter {
        Chapter {
            header: header.into(),
            paragraph: None,
            chapters: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn add_chap(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Sets the paragraph (raw html).
    pub fn add_par(&mut self, html: impl Into<String>) {
        self.paragraph = Some(html.into());
    }

    pub fn add_chart(&mut self, chart: ChartBlock) {
        self.blocks.push(Block::Chart(chart));
    }

    pub fn add_table(&mut self, table: TableBlock) {
        self.blocks.push(Block::Table(table));
    }

    pub fn is_empty(&self) -> bool {
        self.paragraph.is_none() && self.blocks.is_empty() && self.chapters.iter().all(|c| c.is_empty())
    }
}

/// A complete report.
#[derive(PartialEq, Debug, Clone)]
pub struct Body {
    pub title: String,
    pub page_name: String,
    pub lang: Lang,
    pub chapters: Vec<Chapter>,
    templates: Templates,
}

impl Body {
    pub fn new(title: impl Into<String>, page_name: impl Into<String>, lang: Lang) -> Body {
        Body {
            title: title.into(),
            page_name: page_name.into(),
            lang,
            chapters: Vec::new(),
            templates: Templates::embedded(lang),
        }
    }

    pub fn with_templates(self, templates: Templates) -> Body {
        Body { templates, ..self }
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    pub fn add(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    pub fn headers(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.header.as_str()).collect()
    }

    /// The whole page.
    pub fn html(&self) -> String {
        let page = encode_text(&self.page_name);
        let title = encode_text(&self.title);
        let toc = self.toc();
        let body = self.body();
        fill(
            &self.templates.body,
            &[
                ("author", self.templates.snippet("author")),
                ("footer", self.templates.snippet("footer")),
                ("logo", self.templates.snippet("logo")),
                ("css", self.templates.css.as_str()),
                ("page", &*page),
                ("title", &*title),
                ("toc", toc.as_str()),
                ("body", body.as_str()),
            ],
        )
    }

    pub fn toc(&self) -> String {
        let name = match self.lang {
            Lang::Nl => "Inhoudsopgave",
            Lang::En => "Table of contents",
        };
        let mut items = String::new();
        for header in self.headers() {
            items.push_str(&format!(
                "{}<li><a class=\"toc__link\" href=\"#{}\">{}</a></li>\n",
                TAB,
                codify(header),
                encode_text(header)
            ));
        }
        format!(
            "<div class=\"chapter\"><h2 id=\"toc\">{}</h2></div>\n<ol class=\"toc\">\n{}</ol>\n",
            name, items
        )
    }

    /// The chapters, depth first. Chart element ids are made unique.
    pub fn body(&self) -> String {
        let mut ids: HashMap<String, usize> = HashMap::new();
        self.unpack(&self.chapters, 0, &mut ids)
    }

    fn unpack(&self, chapters: &[Chapter], depth: usize, ids: &mut HashMap<String, usize>) -> String {
        let mut res: Vec<String> = Vec::new();
        for chapter in chapters {
            if depth == 0 {
                res.push(header(&chapter.header));
            } else {
                res.push(subheader(&chapter.header, depth + 3));
            }
            if !chapter.chapters.is_empty() {
                res.push(self.unpack(&chapter.chapters, depth + 1, ids));
            }
            if let Some(p) = &chapter.paragraph {
                res.push(p.clone());
            }
            for block in chapter.blocks.iter() {
                match block {
                    Block::Chart(c) => res.push(self.chart_html(c, ids)),
                    Block::Table(t) => res.push(format!(
                        "<div class=\"table\">\n<h4>{}</h4>\n{}</div>",
                        encode_text(&t.title),
                        t.html
                    )),
                }
            }
        }
        res.join("\n")
    }

    fn chart_html(&self, chart: &ChartBlock, ids: &mut HashMap<String, usize>) -> String {
        let id = unique_id(&codify(&chart.key), ids);
        let title = encode_text(&chart.title);
        // A `</script>` inside a label must not close the script element.
        let json = chart.json.to_string().replace('<', "\\u003c");
        fill(
            &self.templates.spec,
            &[
                ("title", &*title),
                ("undertitle", chart.undertitle.as_deref().unwrap_or("")),
                ("vis", id.as_str()),
                ("el", id.as_str()),
                ("json", json.as_str()),
            ],
        )
    }
}

fn unique_id(base: &str, ids: &mut HashMap<String, usize>) -> String {
    let n = ids.entry(base.to_string()).or_insert(0);
    *n += 1;
    if *n == 1 {
        base.to_string()
    } else {
        format!("{}_{}", base, n)
    }
}

fn header(item: &str) -> String {
    format!(
        "<a href=\"#toc\"><div class=\"chapter\" id=\"{}\"><h2>{}</h2><p>&#9651;</p></div></a>\n",
        codify(item),
        encode_text(item)
    )
}

fn subheader(item: &str, level: usize) -> String {
    format!("<h{}>{}</h{}>", level, encode_text(item), level)
}

/// A plain html table. Cells that parse as numbers are right-aligned.
pub fn html_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut res = String::from("<table class=\"overview\">\n");
    res.push_str(TAB);
    res.push_str("<tr>");
    for c in columns {
        res.push_str(&format!("<th>{}</th>", encode_text(c)));
    }
    res.push_str("</tr>\n");
    for row in rows {
        res.push_str(TAB);
        res.push_str("<tr>");
        for cell in row {
            if cell.parse::<f64>().is_ok() {
                res.push_str(&format!("<td class=\"number\">{}</td>", encode_text(cell)));
            } else {
                res.push_str(&format!("<td>{}</td>", encode_text(cell)));
            }
        }
        res.push_str("</tr>\n");
    }
    res.push_str("</table>\n");
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_chart(key: &str) -> ChartBlock {
        ChartBlock {
            key: key.to_string(),
            json: json!({"mark": "bar"}),
            title: "Keuze <1>".to_string(),
            undertitle: None,
        }
    }

    #[test]
    fn codify_slugs() {
        assert_eq!(codify("Studiekeuze & Keuzes!"), "studiekeuze_keuzes_");
        assert_eq!(codify("O_EXTRA EXVAK"), "o_extra_exvak");
        assert_eq!(codify("vis_U_PROFIEL"), "vis_u_profiel");
    }

    #[test]
    fn fill_placeholders() {
        let s = fill("{{ a }} and {{ b }} and {{ a }}", &[("a", "1"), ("b", "2")]);
        assert_eq!(s, "1 and 2 and 1");
    }

    #[test]
    fn depth_first_html() {
        let mut body = Body::new("Titel", "page", Lang::Nl);
        let mut chap = Chapter::new("Studiekeuze & Keuzes!");
        let mut sub = Chapter::new("Sub");
        sub.add_par("<p>inner</p>");
        chap.add_chap(sub);
        chap.add_par("<p>outer</p>");
        chap.add_chart(sample_chart("vis_x"));
        body.add(chap);
        let html = body.body();
        let h2 = html.find("id=\"studiekeuze_keuzes_\"").unwrap();
        let h4 = html.find("<h4>Sub</h4>").unwrap();
        let inner = html.find("<p>inner</p>").unwrap();
        let outer = html.find("<p>outer</p>").unwrap();
        let chart = html.find("id=\"vis_x\"").unwrap();
        assert!(h2 < h4 && h4 < inner && inner < outer && outer < chart);
        assert!(html.contains("Keuze &lt;1&gt;"));
        assert!(html.contains("var vis_x = {\"mark\":\"bar\"};"));
    }

    #[test]
    fn labels_cannot_close_the_script() {
        let mut body = Body::new("t", "p", Lang::Nl);
        let mut chap = Chapter::new("A");
        chap.add_chart(ChartBlock {
            json: json!({"data": {"values": [{"answer": "ja</script><script>alert(1)</script>"}]}}),
            ..sample_chart("vis_x")
        });
        body.add(chap);
        let html = body.body();
        assert!(!html.contains("ja</script>"));
        assert!(html.contains(r#"{"answer":"ja\u003c/script>\u003cscript>alert(1)\u003c/script>"}"#));
    }

    #[test]
    fn chart_ids_are_unique() {
        let mut body = Body::new("t", "p", Lang::En);
        let mut chap = Chapter::new("A");
        chap.add_chart(sample_chart("vis_x"));
        chap.add_chart(sample_chart("vis_x"));
        body.add(chap);
        let mut chap = Chapter::new("B");
        chap.add_chart(sample_chart("vis_x"));
        body.add(chap);
        let html = body.body();
        assert!(html.contains("id=\"vis_x\""));
        assert!(html.contains("id=\"vis_x_2\""));
        assert!(html.contains("id=\"vis_x_3\""));
    }

    #[test]
    fn page_and_toc() {
        let mut body = Body::new("Statistics", "BIOL page", Lang::En);
        body.add(Chapter::new("Introduction"));
        body.add(Chapter::new("Study choice"));
        let html = body.html();
        assert!(html.contains("<title>BIOL page</title>"));
        assert!(html.contains("Table of contents"));
        assert!(html.contains("href=\"#study_choice\""));
        assert!(html.contains("Education Analytics Team"));
        assert!(!html.contains("{{ "));
    }

    #[test]
    fn template_overrides() {
        let mut t = Templates::embedded(Lang::Nl);
        assert!(t.override_with("snippet_author_nl.html", "<p>Iemand</p>"));
        assert!(!t.override_with("snippet_author_en.html", "<p>Someone</p>"));
        assert!(!t.override_with("notes.txt", ""));
        assert!(!t.override_with("snippet__nl.html", ""));
        assert!(t.accepts("spec.html"));
        assert!(t.accepts("snippet_footer_nl.html"));
        assert!(!t.accepts("snippet_footer_en.html"));
        assert!(!t.accepts("logo.png"));
        assert!(t.override_with("style.css", "body {}"));
        assert_eq!(t.snippet("author"), "<p>Iemand</p>");
        let body = Body::new("t", "p", Lang::Nl).with_templates(t);
        assert!(body.html().contains("body {}"));
    }

    #[test]
    fn tables() {
        let html = html_table(
            &["vak".to_string(), "n".to_string()],
            &[vec!["Wiskunde & co".to_string(), "3".to_string()]],
        );
        assert!(html.contains("<th>vak</th><th>n</th>"));
        assert!(html.contains("<td>Wiskunde &amp; co</td><td class=\"number\">3</td>"));
    }

    #[test]
    fn empty_chapters() {
        let mut chap = Chapter::new("A");
        assert!(chap.is_empty());
        chap.add_chap(Chapter::new("B"));
        assert!(chap.is_empty());
        chap.add_table(TableBlock {
            title: "t".to_string(),
            html: String::new(),
        });
        assert!(!chap.is_empty());
    }
}
