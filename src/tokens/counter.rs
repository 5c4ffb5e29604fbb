//! Tokenizer capability consumed by the budget accessor.
//!
//! This crate does not own tokenization. Counters are supplied by the caller;
//! the ones here are conveniences for estimates and tests.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Failure reported by a tokenizer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// The text could not be encoded.
    #[error("{tokenizer} could not encode text: {message}")]
    Encoding { tokenizer: String, message: String },

    /// The tokenizer could not be loaded.
    #[error("{tokenizer} is unavailable: {message}")]
    Unavailable { tokenizer: String, message: String },
}

impl TokenizeError {
    pub fn encoding(tokenizer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            tokenizer: tokenizer.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(tokenizer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            tokenizer: tokenizer.into(),
            message: message.into(),
        }
    }
}

/// Counts tokens in text.
///
/// Implementations must be deterministic for a given text and tokenizer
/// version. A failure must be reported as an error, never as a zero count.
pub trait TokenCounter: Send + Sync {
    /// Tokenizer name for logging.
    fn name(&self) -> &str;

    fn count(&self, text: &str) -> Result<u64, TokenizeError>;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn count(&self, text: &str) -> Result<u64, TokenizeError> {
        (**self).count(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn count(&self, text: &str) -> Result<u64, TokenizeError> {
        (**self).count(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn count(&self, text: &str) -> Result<u64, TokenizeError> {
        (**self).count(text)
    }
}

/// Adapts a closure into a [`TokenCounter`].
pub struct FnCounter<F> {
    name: String,
    f: F,
}

impl<F> FnCounter<F>
where
    F: Fn(&str) -> Result<u64, TokenizeError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> std::fmt::Debug for FnCounter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCounter").field("name", &self.name).finish()
    }
}

impl<F> TokenCounter for FnCounter<F>
where
    F: Fn(&str) -> Result<u64, TokenizeError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self, text: &str) -> Result<u64, TokenizeError> {
        (self.f)(text)
    }
}

/// Counts whitespace-delimited words.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn name(&self) -> &str {
        "word"
    }

    fn count(&self, text: &str) -> Result<u64, TokenizeError> {
        Ok(text.split_whitespace().count() as u64)
    }
}

/// Default bytes per token for BPE tokenizers on English text.
pub const DEFAULT_BYTES_PER_TOKEN: u64 = 4;

/// Estimates tokens as `ceil(bytes / bytes_per_token)`.
#[derive(Debug, Clone, Copy)]
pub struct CharEstimator {
    bytes_per_token: u64,
}

impl Default for CharEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl CharEstimator {
    pub fn new() -> Self {
        Self {
            bytes_per_token: DEFAULT_BYTES_PER_TOKEN,
        }
    }

    /// Use a different ratio. Zero is clamped to one.
    pub fn bytes_per_token(mut self, ratio: u64) -> Self {
        self.bytes_per_token = ratio.max(1);
        self
    }
}

impl TokenCounter for CharEstimator {
    fn name(&self) -> &str {
        "chars"
    }

    fn count(&self, text: &str) -> Result<u64, TokenizeError> {
        Ok((text.len() as u64).div_ceil(self.bytes_per_token))
    }
}

/// Tokenizer selection used by configuration.
///
/// Deserializes through [`FromStr`](std::str::FromStr), so configuration
/// accepts the same names and aliases as `parse`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Word,
    #[default]
    Chars,
    Cl100k,
}

impl CounterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Chars => "chars",
            Self::Cl100k => "cl100k",
        }
    }

    /// Construct the counter.
    ///
    /// `Cl100k` needs the `tiktoken` feature; without it this returns
    /// [`TokenizeError::Unavailable`].
    pub fn build(&self) -> Result<Arc<dyn TokenCounter>, TokenizeError> {
        match self {
            Self::Word => Ok(Arc::new(WordCounter)),
            Self::Chars => Ok(Arc::new(CharEstimator::new())),
            #[cfg(feature = "tiktoken")]
            Self::Cl100k => Ok(Arc::new(super::tiktoken::TiktokenCounter::cl100k()?)),
            #[cfg(not(feature = "tiktoken"))]
            Self::Cl100k => Err(TokenizeError::unavailable(
                "cl100k",
                "built without the `tiktoken` feature",
            )),
        }
    }
}

impl std::str::FromStr for CounterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word" | "words" => Ok(Self::Word),
            "chars" | "char" | "estimate" => Ok(Self::Chars),
            "cl100k" | "cl100k_base" | "tiktoken" => Ok(Self::Cl100k),
            other => Err(format!("unknown tokenizer: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for CounterKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
