/*! Language identification

Holds an [Identifier] trait for plugging other identifiers.

The shipped identifier uses [fasttext](https://fasttext.cc) and its `lid.176.bin` model. !*/
mod fasttext;
mod identifier;

pub use self::fasttext::{FastText, FastTextBuilder};
pub use identifier::{normalize, Identifier};
