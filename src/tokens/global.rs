//! Process-wide prompt budget.
//!
//! Installed once during startup. Readers observe either `None` or the final
//! value; a partially computed or default budget is never visible.

use std::sync::{Mutex, OnceLock, PoisonError};

use super::PromptBudget;
use crate::{Error, Result};

static BUDGET: OnceLock<PromptBudget> = OnceLock::new();
static INIT: Mutex<()> = Mutex::new(());

/// Install an already-computed budget.
///
/// Fails with [`Error::AlreadyInitialized`] if a budget is already installed.
pub fn install(budget: PromptBudget) -> Result<&'static PromptBudget> {
    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    if BUDGET.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }
    Ok(BUDGET.get_or_init(|| budget))
}

/// The installed budget, if initialization has completed.
pub fn get() -> Option<&'static PromptBudget> {
    BUDGET.get()
}

/// Return the installed budget, running `init` if none is installed yet.
///
/// `init` runs at most once across all threads. If it fails the error is
/// returned and the slot stays empty, so a later call may retry.
pub fn get_or_try_init<F>(init: F) -> Result<&'static PromptBudget>
where
    F: FnOnce() -> Result<PromptBudget>,
{
    if let Some(budget) = BUDGET.get() {
        return Ok(budget);
    }

    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(budget) = BUDGET.get() {
        return Ok(budget);
    }

    let budget = init()?;
    tracing::debug!(
        tokenizer = budget.tokenizer(),
        fixed_overhead = budget.fixed_overhead(),
        "Prompt token budget installed"
    );
    Ok(BUDGET.get_or_init(|| budget))
}
