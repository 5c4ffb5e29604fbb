//! Process-wide budget slot.
//!
//! Kept in its own test binary: the slot can be filled only once per process.

use std::sync::atomic::{AtomicUsize, Ordering};

use planner_prompts::tokens::global;
use planner_prompts::{Error, PromptBudget, TokenTarget, TokenizeError, WordCounter};

#[test]
fn test_global_budget_lifecycle() {
    assert!(global::get().is_none());

    let failed = global::get_or_try_init(|| {
        Err(Error::Tokenization {
            target: TokenTarget::Instructions,
            source: TokenizeError::encoding("stub", "boom"),
        })
    });
    assert!(failed.is_err());
    assert!(global::get().is_none());

    let runs = AtomicUsize::new(0);
    let counts: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    global::get_or_try_init(|| {
                        runs.fetch_add(1, Ordering::SeqCst);
                        PromptBudget::init(&WordCounter)
                    })
                    .map(|budget| budget.instruction_tokens())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    let installed = global::get().unwrap();
    assert!(counts.iter().all(|&c| c == installed.instruction_tokens()));

    let again = global::install(PromptBudget::init(&WordCounter).unwrap());
    assert!(matches!(again, Err(Error::AlreadyInitialized)));
}
