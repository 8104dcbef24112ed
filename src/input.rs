//! Chain descriptions read from TOML, YAML or JSON documents.

use std::path::Path;

use serde::Deserialize;

use crate::chain::MarkovChain;
use crate::error::LoadError;
use crate::style::ChainStyle;

/// A chain as written in an input file.
///
/// ```toml
/// title = "Weather"
/// labels = ["Sunny", "Rainy"]
/// matrix = [[0.8, 0.2], [0.1, 0.9]]
/// initial = [0.4, 0.6]
/// means = [[0.1, 0.4], [0.2, 0.3]]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainDocument {
    #[serde(default)]
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub initial: Option<Vec<f64>>,
    #[serde(default)]
    pub means: Option<Vec<Vec<f64>>>,
}

impl ChainDocument {
    pub fn from_toml(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a document, picking the parser from the extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Validate and lay out the chain. A `title` overrides the document's own.
    pub fn into_chain(
        self,
        style: ChainStyle,
        title: Option<String>,
    ) -> Result<MarkovChain, LoadError> {
        let mut builder = MarkovChain::builder(self.matrix, self.labels).with_style(style);
        if let Some(initial) = self.initial {
            builder = builder.with_initial_probabilities(initial);
        }
        if let Some(means) = self.means {
            builder = builder.with_means(means);
        }
        if let Some(title) = title.or(self.title) {
            builder = builder.with_title(title);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::AnnotationMode;
    use crate::error::ChainError;

    const WEATHER_TOML: &str = r#"
title = "Weather"
labels = ["Sunny", "Rainy"]
matrix = [[0.8, 0.2], [0.1, 0.9]]
initial = [0.4, 0.6]
means = [[0.1, 0.4], [0.2, 0.3]]
"#;

    #[test]
    fn toml_document_parses() {
        let doc = ChainDocument::from_toml(WEATHER_TOML).expect("toml document");
        assert_eq!(doc.title.as_deref(), Some("Weather"));
        assert_eq!(doc.labels, vec!["Sunny", "Rainy"]);
        assert_eq!(doc.matrix, vec![vec![0.8, 0.2], vec![0.1, 0.9]]);
        assert_eq!(doc.initial, Some(vec![0.4, 0.6]));
    }

    #[test]
    fn yaml_and_json_documents_parse() {
        let yaml = "labels: [a, b, c]\nmatrix:\n  - [1, 0, 0]\n  - [0, 1, 0]\n  - [0, 0, 1]\n";
        let doc = ChainDocument::from_yaml(yaml).expect("yaml document");
        assert_eq!(doc.matrix.len(), 3);
        assert_eq!(doc.initial, None);

        let json = r#"{"labels": ["x", "y"], "matrix": [[0.5, 0.5], [0.5, 0.5]]}"#;
        let doc = ChainDocument::from_json(json).expect("json document");
        assert_eq!(doc.labels, vec!["x", "y"]);
        assert_eq!(doc.title, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ChainDocument::from_json(r#"{"labels": [], "matrix": [], "colour": 1}"#)
            .expect_err("unknown field");
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn document_becomes_an_annotated_chain() {
        let chain = ChainDocument::from_toml(WEATHER_TOML)
            .expect("toml document")
            .into_chain(ChainStyle::default(), None)
            .expect("valid chain");

        assert_eq!(chain.n_states(), 2);
        assert_eq!(chain.title(), Some("Weather"));
        assert!(matches!(chain.annotations(), AnnotationMode::Full { .. }));
    }

    #[test]
    fn explicit_title_wins() {
        let chain = ChainDocument::from_toml(WEATHER_TOML)
            .expect("toml document")
            .into_chain(ChainStyle::default(), Some("Override".to_string()))
            .expect("valid chain");
        assert_eq!(chain.title(), Some("Override"));
    }

    #[test]
    fn invalid_chain_surfaces_as_load_error() {
        let doc = ChainDocument::from_json(r#"{"labels": ["a"], "matrix": [[1.0]]}"#)
            .expect("json document");
        let err = doc
            .into_chain(ChainStyle::default(), None)
            .expect_err("one state");
        assert!(matches!(
            err,
            LoadError::Chain(ChainError::TooFewStates { n: 1 })
        ));
        assert_eq!(err.to_string(), "there should be at least 2 states, got 1");
    }

    #[test]
    fn documents_load_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");

        let toml_path = dir.path().join("weather.toml");
        std::fs::write(&toml_path, WEATHER_TOML).expect("write toml");
        assert_eq!(
            ChainDocument::from_path(&toml_path)
                .expect("toml file")
                .labels
                .len(),
            2
        );

        let txt_path = dir.path().join("weather.txt");
        std::fs::write(&txt_path, WEATHER_TOML).expect("write txt");
        let err = ChainDocument::from_path(&txt_path).expect_err("txt is not supported");
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));

        let missing = dir.path().join("missing.json");
        let err = ChainDocument::from_path(&missing).expect_err("missing file");
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
