//! Prelude module for convenient imports.
//!
//! ```rust
//! use planner_prompts::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

// Prompt text
pub use crate::prompts::{
    InstructionTemplate, PlanEnding, instruction_text, wrap_user_prompt, wrapper_overhead_text,
};

// Token accounting
pub use crate::tokens::{
    CharEstimator, ContextWindow, CounterKind, PreflightResult, PromptBudget, TokenCounter,
    TokenizeError, WindowStatus, WordCounter,
};

// Configuration
pub use crate::config::{ConfigBuilder, PromptSettings};
