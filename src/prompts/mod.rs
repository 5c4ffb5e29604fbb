//! Prompt text sent to the model.
//!
//! Structure:
//! - `identity`: who the model is (replaceable)
//! - `create`: the fixed instruction template for planning conversations
//! - `wrapper`: per-turn scaffold around the user's literal message
//! - `markers`: fixed phrases the instructions ask the model to emit

pub mod create;
pub mod identity;
pub mod markers;
pub mod wrapper;

pub use create::{CONTEXT_HEADER, InstructionTemplate, RULES, instruction_text};
pub use identity::DEFAULT_IDENTITY;
pub use markers::PlanEnding;
pub use wrapper::{
    PROMPT_PLACEHOLDER, PROMPT_WRAPPER_FORMAT, extract_user_prompt, wrap_user_prompt,
    wrapper_overhead_text,
};
