use crate::report::*;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fs;
use std::path::Path;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "pdefPath")]
    pub pdef_path: String,
    #[serde(rename = "codingsPath")]
    pub codings_path: String,
    #[serde(rename = "programmesPath")]
    pub programmes_path: Option<String>,
    #[serde(rename = "responseSources")]
    pub response_sources: Vec<ResponseSource>,
    #[serde(default)]
    pub programmes: Vec<String>,
    #[serde(rename = "matchingDates", default)]
    pub matching_dates: Vec<String>,
    pub language: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "templateDirectory")]
    pub template_directory: Option<String>,
}

fn resolve(root: &Path, p: &str) -> String {
    let path = Path::new(p);
    if path.is_absolute() {
        p.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

impl ReportConfig {
    /// Makes all the paths relative to `root` (the directory of the configuration file).
    pub fn resolved(self, root: &Path) -> ReportConfig {
        ReportConfig {
            pdef_path: resolve(root, &self.pdef_path),
            codings_path: resolve(root, &self.codings_path),
            programmes_path: self.programmes_path.map(|p| resolve(root, &p)),
            response_sources: self
                .response_sources
                .into_iter()
                .map(|rs| ResponseSource {
                    file_path: resolve(root, &rs.file_path),
                    ..rs
                })
                .collect(),
            output_directory: self.output_directory.map(|p| resolve(root, &p)),
            output_file: self.output_file.map(|p| resolve(root, &p)),
            template_directory: self.template_directory.map(|p| resolve(root, &p)),
            ..self
        }
    }

    /// The output file, or `default_name` in the output directory.
    pub fn output_path(&self, default_name: &str) -> String {
        match (&self.output_file, &self.output_directory) {
            (Some(f), _) => f.clone(),
            (None, Some(d)) => Path::new(d).join(default_name).display().to_string(),
            (None, None) => default_name.to_string(),
        }
    }
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "pdefPath": "refs/pdef.xlsx",
        "codingsPath": "/data/codings.xlsx",
        "responseSources": [
            {"provider": "xlsx", "filePath": "answers.xlsx", "excelWorksheetName": "export"}
        ],
        "programmes": ["BIOL", "SCHK"],
        "matchingDates": ["APRIL"],
        "language": "en"
    }"#;

    #[test]
    fn parse_and_resolve() {
        let config: ReportConfig = serde_json::from_str(CONFIG).unwrap();
        assert_eq!(config.programmes, vec!["BIOL", "SCHK"]);
        assert_eq!(config.programmes_path, None);
        assert_eq!(
            config.response_sources[0].excel_worksheet_name.as_deref(),
            Some("export")
        );

        let root = Path::new("/home/reports");
        let config = config.resolved(root);
        assert_eq!(
            config.pdef_path,
            root.join("refs/pdef.xlsx").display().to_string()
        );
        assert_eq!(config.codings_path, "/data/codings.xlsx");
        assert_eq!(
            config.response_sources[0].file_path,
            root.join("answers.xlsx").display().to_string()
        );
        assert_eq!(config.output_path("x.html"), "x.html");
    }

    #[test]
    fn output_file_wins_over_directory() {
        let mut config: ReportConfig = serde_json::from_str(CONFIG).unwrap();
        config.output_directory = Some("out".to_string());
        assert_eq!(
            config.output_path("x.html"),
            Path::new("out").join("x.html").display().to_string()
        );
        config.output_file = Some("report.html".to_string());
        assert_eq!(config.output_path("x.html"), "report.html");
    }

    #[test]
    fn missing_config() {
        assert!(matches!(
            read_config("/nonexistent/report.json"),
            Err(ReportError::OpeningJson { .. })
        ));
    }
}
