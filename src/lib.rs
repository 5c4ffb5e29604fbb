//! # planner-prompts
//!
//! Prompt assembly and token accounting for a planning coding agent.
//!
//! The crate renders the fixed instruction text sent at the start of every
//! planning conversation, wraps each user turn in a formatting reminder, and
//! measures the token cost of both once at startup so an orchestrator can
//! work out how much of the context window is left for history and files.
//!
//! ## Quick Start
//!
//! ```rust
//! use planner_prompts::{ContextWindow, PromptBudget, WordCounter, wrap_user_prompt};
//!
//! # fn main() -> Result<(), planner_prompts::Error> {
//! let budget = PromptBudget::init(&WordCounter)?;
//! let window = ContextWindow::new(128_000)
//!     .reserve_output(4_096)
//!     .with_prompt_budget(&budget);
//!
//! let message = wrap_user_prompt("fix the bug");
//! assert!(message.contains("fix the bug"));
//! assert!(window.remaining() < 128_000);
//! # Ok(())
//! # }
//! ```
//!
//! Tokenizer failures are returned from [`PromptBudget::init`]; a failed count
//! is never reported as zero.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod prelude;
pub mod prompts;
pub mod tokens;

pub use config::{ConfigBuilder, ConfigError, PromptSettings};
pub use prompts::{
    InstructionTemplate, PlanEnding, instruction_text, wrap_user_prompt, wrapper_overhead_text,
};
#[cfg(feature = "tiktoken")]
pub use tokens::TiktokenCounter;
pub use tokens::{
    CharEstimator, ContextWindow, CounterKind, FnCounter, PreflightResult, PromptBudget,
    TokenCounter, TokenTarget, TokenizeError, WindowStatus, WordCounter,
};

/// Error type for planner-prompts operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The tokenizer failed while measuring prompt text.
    #[error("Token count for {target} failed: {source}")]
    Tokenization {
        target: TokenTarget,
        #[source]
        source: TokenizeError,
    },

    /// A process-wide prompt budget is already installed.
    #[error("Prompt budget already initialized")]
    AlreadyInitialized,

    /// Context window would be exceeded by request.
    #[error("Context window exceeded: {estimated} tokens > {limit} limit (overage: {overage})")]
    ContextWindowExceeded {
        estimated: u64,
        limit: u64,
        overage: u64,
    },

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or invalid.
    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration, parsing, or setup errors
    Configuration,
    /// The external tokenizer failed
    Tokenizer,
    /// Context window limits
    ResourceLimit,
    /// Internal errors (IO, JSON, unexpected states)
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::Env(_) | Error::AlreadyInitialized => {
                ErrorCategory::Configuration
            }
            Error::Tokenization { .. } => ErrorCategory::Tokenizer,
            Error::ContextWindowExceeded { .. } => ErrorCategory::ResourceLimit,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_tokenizer_error(&self) -> bool {
        self.category() == ErrorCategory::Tokenizer
    }

    pub fn is_resource_limit(&self) -> bool {
        self.category() == ErrorCategory::ResourceLimit
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::Env(e) => Error::Env(e),
            config::ConfigError::ValidationErrors(errors) => Error::Config(errors.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
