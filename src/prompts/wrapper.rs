//! Per-turn scaffold around the user's message.
//!
//! The user text is inserted verbatim. Text containing triple backticks can
//! make the model misread the block boundaries; escaping or rejecting such
//! input is left to the caller, since it would change what the model sees.

/// Insertion point for the user's literal text.
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

/// Wrapper format with a single [`PROMPT_PLACEHOLDER`].
pub const PROMPT_WRAPPER_FORMAT: &str = "The user's latest prompt:\n```\n{prompt}\n```\n\n Please respond according to the 'Your instructions' section above. If you're making a plan, remember to precede code blocks with the file path *exactly* as described in 2a, and do not use any other formatting for file paths.";

fn scaffold() -> Option<(&'static str, &'static str)> {
    PROMPT_WRAPPER_FORMAT.split_once(PROMPT_PLACEHOLDER)
}

/// Wrap one user turn. Never fails; the empty string is valid input.
pub fn wrap_user_prompt(user_text: &str) -> String {
    PROMPT_WRAPPER_FORMAT.replacen(PROMPT_PLACEHOLDER, user_text, 1)
}

/// The wrapper with an empty body: its fixed, user-independent part.
pub fn wrapper_overhead_text() -> String {
    wrap_user_prompt("")
}

/// Recover the user text from a wrapped prompt.
pub fn extract_user_prompt(wrapped: &str) -> Option<&str> {
    let (head, tail) = scaffold()?;
    wrapped.strip_prefix(head)?.strip_suffix(tail)
}
