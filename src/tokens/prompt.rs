//! Token cost of the fixed prompt text.
//!
//! [`PromptBudget`] is built once, before any request is served, and is
//! read-only afterwards. A tokenizer failure aborts construction: a count of
//! zero would read as "empty text" and let callers over-allocate the window.

use serde::Serialize;

use super::counter::TokenCounter;
use crate::prompts::{InstructionTemplate, wrapper_overhead_text};
use crate::{Error, Result};

/// Which text a token count was taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTarget {
    Instructions,
    WrapperOverhead,
    UserPrompt,
}

impl std::fmt::Display for TokenTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Instructions => "instruction text",
            Self::WrapperOverhead => "prompt wrapper overhead",
            Self::UserPrompt => "user prompt",
        })
    }
}

fn measure<C>(counter: &C, target: TokenTarget, text: &str) -> Result<u64>
where
    C: TokenCounter + ?Sized,
{
    counter.count(text).map_err(|source| {
        tracing::warn!(
            tokenizer = counter.name(),
            %target,
            error = %source,
            "Token count failed"
        );
        Error::Tokenization { target, source }
    })
}

/// Instruction text and the memoized token costs of the fixed prompt parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptBudget {
    instruction_text: String,
    instruction_tokens: u64,
    wrapper_overhead_tokens: u64,
    tokenizer: String,
}

impl PromptBudget {
    /// Measure the default instruction template and the wrapper overhead.
    pub fn init<C>(counter: &C) -> Result<Self>
    where
        C: TokenCounter + ?Sized,
    {
        Self::init_with(&InstructionTemplate::new(), counter)
    }

    /// Measure a custom instruction template and the wrapper overhead.
    ///
    /// Each count is taken exactly once. The first tokenizer failure is
    /// returned as [`Error::Tokenization`] naming the text that failed.
    pub fn init_with<C>(template: &InstructionTemplate, counter: &C) -> Result<Self>
    where
        C: TokenCounter + ?Sized,
    {
        let instruction_text = template.render();
        let instruction_tokens = measure(counter, TokenTarget::Instructions, &instruction_text)?;
        let wrapper_overhead_tokens = measure(
            counter,
            TokenTarget::WrapperOverhead,
            &wrapper_overhead_text(),
        )?;

        tracing::debug!(
            tokenizer = counter.name(),
            instruction_tokens,
            wrapper_overhead_tokens,
            "Prompt token budget initialized"
        );

        Ok(Self {
            instruction_text,
            instruction_tokens,
            wrapper_overhead_tokens,
            tokenizer: counter.name().to_string(),
        })
    }

    pub fn instruction_text(&self) -> &str {
        &self.instruction_text
    }

    pub fn instruction_tokens(&self) -> u64 {
        self.instruction_tokens
    }

    /// Cost of the wrapper scaffold alone, excluding the user's message.
    pub fn wrapper_overhead_tokens(&self) -> u64 {
        self.wrapper_overhead_tokens
    }

    /// Instruction tokens plus wrapper overhead.
    pub fn fixed_overhead(&self) -> u64 {
        self.instruction_tokens
            .saturating_add(self.wrapper_overhead_tokens)
    }

    /// Name of the tokenizer the counts were taken with.
    pub fn tokenizer(&self) -> &str {
        &self.tokenizer
    }

    /// Estimated cost of one wrapped user turn: wrapper overhead plus the
    /// user text counted on its own.
    pub fn wrapped_tokens<C>(&self, user_text: &str, counter: &C) -> Result<u64>
    where
        C: TokenCounter + ?Sized,
    {
        let user_tokens = measure(counter, TokenTarget::UserPrompt, user_text)?;
        Ok(self.wrapper_overhead_tokens.saturating_add(user_tokens))
    }
}
