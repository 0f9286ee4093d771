//! Language gate.
use crate::document::Document;
use crate::filtering::Filter;

/// Keeps documents that have at least one wanted language and no unwanted one.
///
/// Documents without languages are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFilter {
    wanted: Vec<String>,
    unwanted: Vec<String>,
}

impl LanguageFilter {
    pub fn new(wanted: Vec<String>, unwanted: Vec<String>) -> Self {
        Self { wanted, unwanted }
    }

    /// Check a set of language codes.
    pub fn accepts<S: AsRef<str>>(&self, languages: &[S]) -> bool {
        let has = |code: &String| languages.iter().any(|l| l.as_ref() == code);
        self.wanted.iter().any(has) && !self.unwanted.iter().any(has)
    }
}

impl Default for LanguageFilter {
    /// Keeps chinese and english documents.
    fn default() -> Self {
        Self::new(vec!["zh".to_string(), "en".to_string()], Vec::new())
    }
}

impl Filter<&Document> for LanguageFilter {
    fn detect(&self, doc: &Document) -> bool {
        doc.languages()
            .map(|langs| self.accepts(langs))
            .unwrap_or(false)
    }
}
