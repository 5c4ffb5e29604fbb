//! BPE counter backed by `tiktoken-rs`.

use tiktoken_rs::CoreBPE;

use super::counter::{TokenCounter, TokenizeError};

/// Counts tokens with the `cl100k_base` encoding.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Load `cl100k_base`. Load failures are reported, not panicked on.
    pub fn cl100k() -> Result<Self, TokenizeError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| TokenizeError::unavailable("cl100k", e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

impl TokenCounter for TiktokenCounter {
    fn name(&self) -> &str {
        "cl100k"
    }

    fn count(&self, text: &str) -> Result<u64, TokenizeError> {
        Ok(self.bpe.encode_ordinary(text).len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cl100k_counts() {
        let counter = TiktokenCounter::cl100k().unwrap();
        assert_eq!(counter.count("").unwrap(), 0);
        let n = counter.count("hello world").unwrap();
        assert!(n > 0 && n <= 3);
    }
}
