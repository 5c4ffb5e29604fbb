//! Prompt Budget Tests
//!
//! Instruction text, prompt wrapper and token accounting as seen by an
//! orchestrator.
//!
//! Run: cargo nextest run --test prompt_budget_tests

use planner_prompts::prompts::{RULES, extract_user_prompt};
use planner_prompts::{
    ContextWindow, Error, FnCounter, InstructionTemplate, PreflightResult, PromptBudget,
    TokenCounter, TokenTarget, TokenizeError, WordCounter, instruction_text, wrap_user_prompt,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn word_count(text: &str) -> u64 {
    WordCounter.count(text).unwrap()
}

// =============================================================================
// Instruction Text
// =============================================================================

mod instruction_text_tests {
    use super::*;

    #[test]
    fn test_repeated_calls_are_byte_identical() {
        let first = instruction_text().to_string();
        for _ in 0..5 {
            assert_eq!(instruction_text().as_bytes(), first.as_bytes());
        }
        assert_eq!(InstructionTemplate::new().render(), first);
    }

    #[test]
    fn test_instruction_text_from_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| instruction_text().to_string()))
            .collect();
        let expected = instruction_text();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_terminal_statements_are_described() {
        let text = instruction_text();
        assert!(text.contains("\"All tasks have been completed.\""));
        assert!(text.contains("\"Next, \""));
        assert!(text.contains("\"The plan cannot be continued.\""));
        assert!(text.contains("You must not output any other text after this final paragraph."));
    }
}

// =============================================================================
// Prompt Wrapper
// =============================================================================

mod wrapper_tests {
    use super::*;

    #[test]
    fn test_empty_prompt_renders_scaffold() {
        let wrapped = wrap_user_prompt("");
        assert!(wrapped.starts_with("The user's latest prompt:\n```\n\n```\n\n"));
    }

    #[test]
    fn test_hello_world_between_delimiters() {
        let wrapped = wrap_user_prompt("hello world");
        let open = wrapped.find("```\n").unwrap() + 4;
        let close = wrapped.rfind("\n```").unwrap();
        assert_eq!(&wrapped[open..close], "hello world");
        assert!(wrapped.ends_with(
            " Please respond according to the 'Your instructions' section above. If you're making a plan, remember to precede code blocks with the file path *exactly* as described in 2a, and do not use any other formatting for file paths."
        ));
    }

    #[test]
    fn test_round_trip() {
        let inputs = [
            "",
            "hello world",
            "multi\nline\n\nprompt",
            "unicode: こんにちは 🌏",
            "  leading and trailing spaces  ",
            "%s and {} and {prompt}",
        ];
        for input in inputs {
            let wrapped = wrap_user_prompt(input);
            assert_eq!(extract_user_prompt(&wrapped), Some(input));
        }
    }

    #[test]
    fn test_delimiters_in_user_text_are_kept() {
        let input = "```\nnot closed";
        let wrapped = wrap_user_prompt(input);
        assert!(wrapped.contains("```\n```\nnot closed\n```"));
    }
}

// =============================================================================
// Token Budget
// =============================================================================

mod token_budget_tests {
    use super::*;

    #[test]
    fn test_overhead_equals_count_of_empty_wrapper() {
        init_tracing();
        let budget = PromptBudget::init(&WordCounter).unwrap();
        assert_eq!(
            budget.wrapper_overhead_tokens(),
            word_count(&wrap_user_prompt(""))
        );
        assert_eq!(budget.instruction_tokens(), word_count(instruction_text()));
    }

    #[test]
    fn test_failing_tokenizer_never_yields_zero() {
        init_tracing();
        let failing = FnCounter::new("failing", |_: &str| {
            Err(TokenizeError::unavailable("failing", "model file missing"))
        });

        let err = PromptBudget::init(&failing).unwrap_err();
        assert!(err.is_tokenizer_error());
        assert!(matches!(
            err,
            Error::Tokenization {
                target: TokenTarget::Instructions,
                ..
            }
        ));
    }

    #[test]
    fn test_word_count_scenario_with_empty_identity() {
        let template = InstructionTemplate::new().with_identity("");
        let budget = PromptBudget::init_with(&template, &WordCounter).unwrap();

        let expected = word_count(&format!(
            " A plan is a set of files with an attached context.Your instructions:\n\n```\n{}\n```\n\nUser-provided context:",
            RULES
        ));
        assert_eq!(budget.instruction_tokens(), expected);

        let wrapped = wrap_user_prompt("fix the bug");
        assert_eq!(word_count(&wrapped), budget.wrapper_overhead_tokens() + 3);
    }

    #[test]
    fn test_orchestrator_budgeting() {
        let budget = PromptBudget::init(&WordCounter).unwrap();
        let window = ContextWindow::new(4_000)
            .reserve_output(500)
            .with_prompt_budget(&budget);

        let remaining = window.remaining();
        assert_eq!(remaining, 3_500 - budget.fixed_overhead());

        let history = remaining - 10;
        match window.check(history) {
            PreflightResult::Warning { remaining, .. } => assert_eq!(remaining, 10),
            other => panic!("unexpected preflight: {other:?}"),
        }

        let err = window.check(remaining + 1).into_result().unwrap_err();
        assert!(err.is_resource_limit());
    }
}
