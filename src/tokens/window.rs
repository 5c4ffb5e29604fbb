use super::{PreflightResult, PromptBudget};

/// Default warning threshold for context window utilization (80%)
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.80;

/// Default critical threshold for context window utilization (95%)
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowStatus {
    Ok { utilization: f64, remaining: u64 },
    Warning { utilization: f64, remaining: u64 },
    Critical { utilization: f64, remaining: u64 },
    Exceeded { overage: u64 },
}

impl WindowStatus {
    pub fn should_proceed(&self) -> bool {
        !matches!(self, Self::Exceeded { .. })
    }

    pub fn utilization(&self) -> Option<f64> {
        match self {
            Self::Ok { utilization, .. }
            | Self::Warning { utilization, .. }
            | Self::Critical { utilization, .. } => Some(*utilization),
            Self::Exceeded { .. } => None,
        }
    }
}

/// Partition of a model's context window.
///
/// `fixed` holds overheads known before the user's text (instructions,
/// wrapper scaffold, anything else the caller charges up front). `current`
/// tracks what has been added for history and file context.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    limit: u64,
    reserved_output: u64,
    fixed_usage: u64,
    current_usage: u64,
    peak_usage: u64,
    warning_threshold: f64,
    critical_threshold: f64,
}

impl ContextWindow {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            reserved_output: 0,
            fixed_usage: 0,
            current_usage: 0,
            peak_usage: 0,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }

    /// Keep `tokens` free for the model's response.
    pub fn reserve_output(mut self, tokens: u64) -> Self {
        self.reserved_output = tokens;
        self
    }

    /// Charge the instruction text and wrapper scaffold.
    pub fn with_prompt_budget(self, budget: &PromptBudget) -> Self {
        self.overhead(budget.fixed_overhead())
    }

    /// Charge an additional fixed overhead.
    pub fn overhead(mut self, tokens: u64) -> Self {
        self.fixed_usage = self.fixed_usage.saturating_add(tokens);
        self
    }

    pub fn thresholds(mut self, warning: f64, critical: f64) -> Self {
        self.warning_threshold = warning;
        self.critical_threshold = critical;
        self
    }

    /// Model context size.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Tokens available for input once the output reservation is taken.
    pub fn capacity(&self) -> u64 {
        self.limit.saturating_sub(self.reserved_output)
    }

    pub fn fixed(&self) -> u64 {
        self.fixed_usage
    }

    pub fn usage(&self) -> u64 {
        self.fixed_usage.saturating_add(self.current_usage)
    }

    pub fn remaining(&self) -> u64 {
        self.capacity().saturating_sub(self.usage())
    }

    pub fn utilization(&self) -> f64 {
        let capacity = self.capacity();
        if capacity == 0 {
            return 0.0;
        }
        self.usage() as f64 / capacity as f64
    }

    pub fn status(&self) -> WindowStatus {
        let capacity = self.capacity();
        let usage = self.usage();
        let utilization = self.utilization();

        if usage > capacity {
            WindowStatus::Exceeded {
                overage: usage - capacity,
            }
        } else if utilization >= self.critical_threshold {
            WindowStatus::Critical {
                utilization,
                remaining: self.remaining(),
            }
        } else if utilization >= self.warning_threshold {
            WindowStatus::Warning {
                utilization,
                remaining: self.remaining(),
            }
        } else {
            WindowStatus::Ok {
                utilization,
                remaining: self.remaining(),
            }
        }
    }

    pub fn can_fit(&self, additional: u64) -> bool {
        self.usage().saturating_add(additional) <= self.capacity()
    }

    /// Check an estimated addition without recording it.
    pub fn check(&self, estimated_tokens: u64) -> PreflightResult {
        let new_usage = self.usage().saturating_add(estimated_tokens);
        let capacity = self.capacity();

        if new_usage > capacity {
            return PreflightResult::Exceeded {
                estimated_tokens,
                limit: capacity,
                overage: new_usage - capacity,
            };
        }

        let utilization = if capacity == 0 {
            0.0
        } else {
            new_usage as f64 / capacity as f64
        };

        if utilization >= self.warning_threshold {
            PreflightResult::Warning {
                estimated_tokens,
                utilization,
                remaining: capacity - new_usage,
            }
        } else {
            PreflightResult::Ok {
                estimated_tokens,
                remaining: capacity - new_usage,
            }
        }
    }

    /// Set the variable usage (history, file context).
    pub fn update(&mut self, new_usage: u64) {
        self.current_usage = new_usage;
        let total = self.usage();
        if total > self.peak_usage {
            self.peak_usage = total;
        }
    }

    pub fn add(&mut self, tokens: u64) {
        self.update(self.current_usage.saturating_add(tokens));
    }

    /// Drop the variable usage back to `new_usage` without touching the peak.
    pub fn reset(&mut self, new_usage: u64) {
        self.current_usage = new_usage;
    }

    pub fn peak(&self) -> u64 {
        self.peak_usage
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }
}
