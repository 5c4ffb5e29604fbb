//! Prompt settings resolved from configuration providers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::provider::{ConfigProvider, ConfigProviderExt};
use super::{ConfigError, ConfigResult, ValidationErrors};
use crate::prompts::InstructionTemplate;
use crate::tokens::{ContextWindow, CounterKind, PromptBudget, TokenCounter};

pub const KEY_IDENTITY: &str = "identity";
pub const KEY_TOKENIZER: &str = "tokenizer";
pub const KEY_CONTEXT_WINDOW: &str = "context.window";
pub const KEY_RESERVED_OUTPUT: &str = "context.reserved_output";

/// Startup settings for the prompt subsystem. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Replaces the default identity; `Some("")` drops it entirely.
    pub identity: Option<String>,
    pub tokenizer: CounterKind,
    /// Model context size in tokens, when known.
    pub context_window: Option<u64>,
    /// Tokens kept free for the model's response.
    pub reserved_output: u64,
}

impl PromptSettings {
    pub async fn load<P>(provider: &P) -> ConfigResult<Self>
    where
        P: ConfigProvider + ?Sized,
    {
        let settings = Self {
            identity: provider.get::<String>(KEY_IDENTITY).await?,
            tokenizer: provider
                .get::<CounterKind>(KEY_TOKENIZER)
                .await?
                .unwrap_or_default(),
            context_window: provider.get::<u64>(KEY_CONTEXT_WINDOW).await?,
            reserved_output: provider
                .get::<u64>(KEY_RESERVED_OUTPUT)
                .await?
                .unwrap_or(0),
        };
        settings.validate()?;

        tracing::debug!(
            provider = provider.name(),
            tokenizer = %settings.tokenizer,
            context_window = settings.context_window,
            reserved_output = settings.reserved_output,
            custom_identity = settings.identity.is_some(),
            "Prompt settings loaded"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if let Some(window) = self.context_window {
            if window == 0 {
                errors.push(ConfigError::InvalidValue {
                    key: KEY_CONTEXT_WINDOW.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            } else if self.reserved_output >= window {
                errors.push(ConfigError::InvalidValue {
                    key: KEY_RESERVED_OUTPUT.to_string(),
                    message: format!(
                        "{} leaves no room in a {}-token window",
                        self.reserved_output, window
                    ),
                });
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::ValidationErrors(ValidationErrors(errors))),
        }
    }

    pub fn template(&self) -> InstructionTemplate {
        match &self.identity {
            Some(identity) => InstructionTemplate::new().with_identity(identity.clone()),
            None => InstructionTemplate::new(),
        }
    }

    pub fn counter(&self) -> ConfigResult<Arc<dyn TokenCounter>> {
        self.tokenizer
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: KEY_TOKENIZER.to_string(),
                message: e.to_string(),
            })
    }

    /// Build the template and counter, then measure the fixed prompt parts.
    pub fn init_budget(&self) -> crate::Result<PromptBudget> {
        let counter = self.counter()?;
        PromptBudget::init_with(&self.template(), counter.as_ref())
    }

    /// Context window charged with the budget's fixed overhead, if a window
    /// size is configured.
    pub fn context_window(&self, budget: &PromptBudget) -> Option<ContextWindow> {
        self.context_window.map(|limit| {
            ContextWindow::new(limit)
                .reserve_output(self.reserved_output)
                .with_prompt_budget(budget)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvConfigProvider, MemoryConfigProvider};
    use crate::prompts::DEFAULT_IDENTITY;

    #[tokio::test]
    async fn test_defaults() {
        let settings = PromptSettings::load(&MemoryConfigProvider::new())
            .await
            .unwrap();
        assert_eq!(settings, PromptSettings::default());
        assert_eq!(settings.tokenizer, CounterKind::Chars);
        assert_eq!(settings.template().identity(), DEFAULT_IDENTITY);
    }

    #[tokio::test]
    async fn test_load_values() {
        let provider = MemoryConfigProvider::new()
            .value(KEY_IDENTITY, "You are a planner.")
            .value(KEY_TOKENIZER, "word")
            .value(KEY_CONTEXT_WINDOW, "32000")
            .value(KEY_RESERVED_OUTPUT, "2000");

        let settings = PromptSettings::load(&provider).await.unwrap();
        assert_eq!(settings.identity.as_deref(), Some("You are a planner."));
        assert_eq!(settings.tokenizer, CounterKind::Word);
        assert_eq!(settings.context_window, Some(32_000));

        let budget = settings.init_budget().unwrap();
        assert!(budget.instruction_text().starts_with("You are a planner."));
        assert_eq!(budget.tokenizer(), "word");

        let window = settings.context_window(&budget).unwrap();
        assert_eq!(
            window.remaining(),
            32_000 - 2_000 - budget.fixed_overhead()
        );
    }

    #[tokio::test]
    async fn test_tokenizer_aliases() {
        for (raw, kind) in [
            ("cl100k_base", CounterKind::Cl100k),
            ("\"tiktoken\"", CounterKind::Cl100k),
            ("CHARS", CounterKind::Chars),
            (" Word ", CounterKind::Word),
        ] {
            let provider = MemoryConfigProvider::new().value(KEY_TOKENIZER, raw);
            let settings = PromptSettings::load(&provider).await.unwrap();
            assert_eq!(settings.tokenizer, kind, "{raw}");
        }

        let provider = MemoryConfigProvider::new().value(KEY_TOKENIZER, "sentencepiece");
        let err = PromptSettings::load(&provider).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == KEY_TOKENIZER));
    }

    #[tokio::test]
    async fn test_load_from_env() {
        let provider = EnvConfigProvider::prefixed("PLANNER_SETTINGS_ENV_");

        // SAFETY: Test-only environment setup with a unique prefix
        unsafe {
            std::env::set_var("PLANNER_SETTINGS_ENV_CONTEXT_WINDOW", "8000");
            std::env::set_var("PLANNER_SETTINGS_ENV_CONTEXT_RESERVED_OUTPUT", "10");
            std::env::set_var("PLANNER_SETTINGS_ENV_TOKENIZER", "cl100k_base");
        }
        let settings = PromptSettings::load(&provider).await;
        unsafe {
            std::env::remove_var("PLANNER_SETTINGS_ENV_CONTEXT_WINDOW");
            std::env::remove_var("PLANNER_SETTINGS_ENV_CONTEXT_RESERVED_OUTPUT");
            std::env::remove_var("PLANNER_SETTINGS_ENV_TOKENIZER");
        }

        let settings = settings.unwrap();
        assert_eq!(settings.context_window, Some(8_000));
        assert_eq!(settings.reserved_output, 10);
        assert_eq!(settings.tokenizer, CounterKind::Cl100k);
    }

    #[tokio::test]
    async fn test_quoted_identity() {
        let provider = MemoryConfigProvider::new().value(KEY_IDENTITY, "\"\"");
        let settings = PromptSettings::load(&provider).await.unwrap();
        assert_eq!(settings.identity.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_invalid_number() {
        let provider = MemoryConfigProvider::new().value(KEY_CONTEXT_WINDOW, "lots");
        let err = PromptSettings::load(&provider).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == KEY_CONTEXT_WINDOW));
    }

    #[test]
    fn test_validate() {
        let settings = PromptSettings {
            context_window: Some(1_000),
            reserved_output: 1_000,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = PromptSettings {
            context_window: Some(0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = PromptSettings {
            context_window: None,
            reserved_output: 10_000,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }
}
