//! Token accounting for the fixed prompt parts.

mod counter;
pub mod global;
mod preflight;
mod prompt;
#[cfg(feature = "tiktoken")]
mod tiktoken;
mod window;

pub use counter::{
    CharEstimator, CounterKind, DEFAULT_BYTES_PER_TOKEN, FnCounter, TokenCounter, TokenizeError,
    WordCounter,
};
pub use preflight::PreflightResult;
pub use prompt::{PromptBudget, TokenTarget};
#[cfg(feature = "tiktoken")]
pub use tiktoken::TiktokenCounter;
pub use window::{
    ContextWindow, DEFAULT_CRITICAL_THRESHOLD, DEFAULT_WARNING_THRESHOLD, WindowStatus,
};
