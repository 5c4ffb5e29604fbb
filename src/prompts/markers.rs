//! Fixed phrases the instruction template tells the model to emit.
//!
//! These are read-only helpers for callers that inspect responses. Nothing
//! here rejects or rewrites model output.

/// Emitted when context is clearly insufficient; no plan follows.
pub const NEED_MORE_CONTEXT: &str = "I need more information or context to make a plan for this task.";

/// Emitted before a numbered subtask list when the task needs several responses.
pub const BREAK_UP_TASK: &str = "Let's break up this task.";

/// Prefix of the one-line comment left in a file block whose contents were removed.
pub const REMOVED_MARKER_PREFIX: &str = "Plandex: removed";

/// Terminal statement: every step of the plan is done.
pub const PLAN_COMPLETE: &str = "All tasks have been completed.";

/// Terminal statement prefix: a one-sentence next step follows.
pub const NEXT_STEP_PREFIX: &str = "Next, ";

/// Terminal statement: the user has to act before the plan can proceed.
pub const CANNOT_CONTINUE: &str = "The plan cannot be continued.";

/// Which terminal statement a response ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEnding {
    Complete,
    /// Description of the next step, without the `Next, ` prefix.
    Next(String),
    /// What the user needs to do, possibly empty.
    CannotContinue(String),
}

impl PlanEnding {
    /// Inspect the final paragraph of `response`.
    ///
    /// Returns `None` when the last paragraph does not begin with one of the
    /// three terminal statements. `\r\n` line endings are accepted.
    pub fn detect(response: &str) -> Option<Self> {
        let response = response.replace("\r\n", "\n");
        let last = response
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .last()?;

        if last.starts_with(PLAN_COMPLETE) {
            Some(Self::Complete)
        } else if let Some(rest) = last.strip_prefix(NEXT_STEP_PREFIX) {
            Some(Self::Next(rest.trim().to_string()))
        } else {
            last.strip_prefix(CANNOT_CONTINUE)
                .map(|rest| Self::CannotContinue(rest.trim().to_string()))
        }
    }

    /// Whether an orchestrator should continue the plan automatically.
    pub fn continues(&self) -> bool {
        matches!(self, Self::Next(_))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}
