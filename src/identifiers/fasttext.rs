//! Fasttext identifier
use std::path::{Path, PathBuf};

use fasttext::FastText as FastTextLib;
use log::debug;

use crate::error::Error;

use super::identifier::{normalize, Identifier};

/// Holds a [fasttext::FastText] instance and its parameters:
/// - [FastText::k], number of predicted languages on a text
/// - [FastText::threshold], prediction threshold
pub struct FastText {
    predictor: FastTextLib,
    pub k: i32,
    pub threshold: f32,
}

/// Builder for [FastText].
///
/// Defaults to `lid.176.bin` in the current directory and a `0.8` threshold.
/// Only the most probable language is predicted (`k = 1`).
#[derive(Debug, Clone)]
pub struct FastTextBuilder {
    path: PathBuf,
    threshold: f32,
}

impl Default for FastTextBuilder {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lid.176.bin"),
            threshold: 0.8,
        }
    }
}

impl FastTextBuilder {
    pub fn path(&mut self, path: &Path) -> &mut Self {
        self.path = path.to_path_buf();
        self
    }

    pub fn threshold(&mut self, threshold: f32) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Load the model.
    ///
    /// # Errors
    /// Fails if the path is not valid UTF-8 or if the model can't be loaded.
    pub fn build(&self) -> Result<FastText, Error> {
        let filename = self.path.to_str().ok_or_else(|| {
            Error::Custom(format!("invalid filepath for lid: {:?}", self.path))
        })?;

        let mut predictor = FastTextLib::new();
        predictor.load_model(filename).map_err(Error::FastText)?;
        debug!("loaded language identification model {}", filename);

        Ok(FastText {
            predictor,
            k: 1,
            threshold: self.threshold,
        })
    }
}

impl FastText {
    /// Predicted labels for `text`, cleaned and normalized, most probable first.
    pub fn predict(&self, text: &str) -> Result<Vec<(String, f32)>, Error> {
        let text = clean_input(text);
        let predictions = self
            .predictor
            .predict(&text, self.k, self.threshold)
            .map_err(Error::FastText)?;
        Ok(predictions
            .into_iter()
            .map(|p| (normalize(&p.label), p.prob))
            .collect())
    }
}

/// fasttext predicts on a single line, and null chars crash the underlying C++ code.
fn clean_input(text: &str) -> String {
    text.chars()
        .filter(|c| *c != char::from(0))
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

impl Identifier for FastText {
    fn identify(&self, text: &str) -> Result<Option<String>, Error> {
        let predictions = self
            .predict(text)
            .map_err(|e| Error::LanguageDetection(e.to_string()))?;
        Ok(predictions.into_iter().next().map(|(label, _)| label))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{clean_input, FastTextBuilder};
    use crate::identifiers::Identifier;

    #[test]
    fn clean() {
        let mut text = String::from("hello\nworld");
        text.push(char::from(0));
        text.push_str("\r\n!");
        assert_eq!(clean_input(&text), "hello world  !");
    }

    #[test]
    fn missing_model() {
        let res = FastTextBuilder::default()
            .path(Path::new("does/not/exist.bin"))
            .threshold(0.5)
            .build();
        assert!(res.is_err());
    }

    #[test]
    #[ignore = "needs lid.176.bin"]
    fn identify_en() {
        let classifier = FastTextBuilder::default()
            .build()
            .expect("could not instantiate a classifier");
        let sentence = "a perfectly, innocent, quite lengthy sentence. How lengthy and normal this sentence is, oh my! Lengthy lengthy.";
        assert_eq!(
            classifier.identify(sentence).unwrap(),
            Some("en".to_string())
        );
    }
}
