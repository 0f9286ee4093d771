/*! Word segmentation.

The quality filter only needs a way to cut a line into tokens.
Any `fn(&str) -> Vec<&str>` is a [Tokenizer], which makes plugging an
external segmenter a one-liner.
!*/
use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Sync {
    /// Cut `line` into tokens, in order. Tokens borrow from `line`.
    fn segment<'a>(&self, line: &'a str) -> Vec<&'a str>;
}

impl<F> Tokenizer for F
where
    F: for<'a> Fn(&'a str) -> Vec<&'a str> + Sync,
{
    fn segment<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self(line)
    }
}

/// Unicode (UAX #29) word boundaries.
///
/// Punctuation is kept as its own token, whitespace runs are dropped.
/// Han characters end up one per token.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordBounds;

impl Tokenizer for WordBounds {
    fn segment<'a>(&self, line: &'a str) -> Vec<&'a str> {
        line.split_word_bounds()
            .filter(|token| !token.chars().all(char::is_whitespace))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Tokenizer, WordBounds};

    fn whitespace(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn word_bounds_latin() {
        let t = WordBounds;
        assert_eq!(
            t.segment("Hello, world! It's fine."),
            vec!["Hello", ",", "world", "!", "It's", "fine", "."]
        );
    }

    #[test]
    fn word_bounds_han() {
        let t = WordBounds;
        assert_eq!(t.segment("中文 abc"), vec!["中", "文", "abc"]);
    }

    #[test]
    fn word_bounds_empty() {
        assert!(WordBounds.segment("   ").is_empty());
        assert!(WordBounds.segment("").is_empty());
    }

    #[test]
    fn fn_as_tokenizer() {
        let t = whitespace;
        assert_eq!(t.segment("a  b\tc"), vec!["a", "b", "c"]);
    }
}
