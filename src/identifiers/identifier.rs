//! Identifier trait.
use crate::error::Error;

/// All identifiers should implement [Identifier] to be useable in stages.
pub trait Identifier: Sync {
    /// Returns the language code of `text`,
    /// or `None` if no reliable identification could be done.
    fn identify(&self, text: &str) -> Result<Option<String>, Error>;
}

/// Normalize a language code: lowercase, `__label__` prefix removed,
/// chinese variants (`zh-cn`, `zh-tw`) folded into `zh`.
pub fn normalize(label: &str) -> String {
    let label = label
        .strip_prefix("__label__")
        .unwrap_or(label)
        .trim()
        .to_lowercase();
    match label.as_str() {
        "zh-cn" | "zh-tw" => "zh".to_string(),
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, Identifier};
    use crate::error::Error;

    struct Constant(&'static str);

    impl Identifier for Constant {
        fn identify(&self, _: &str) -> Result<Option<String>, Error> {
            Ok(Some(normalize(self.0)))
        }
    }

    #[test]
    fn normalize_labels() {
        assert_eq!(normalize("__label__en"), "en");
        assert_eq!(normalize("zh-cn"), "zh");
        assert_eq!(normalize("zh-TW"), "zh");
        assert_eq!(normalize("__label__zh"), "zh");
        assert_eq!(normalize("fr"), "fr");
    }

    #[test]
    fn trait_object() {
        let id: &dyn Identifier = &Constant("__label__zh-cn");
        assert_eq!(id.identify("foo").unwrap(), Some("zh".to_string()));
    }
}
