use crate::{Error, Result};

/// Outcome of checking an estimated addition against the context window.
#[derive(Debug, Clone, PartialEq)]
pub enum PreflightResult {
    Ok {
        estimated_tokens: u64,
        remaining: u64,
    },
    Warning {
        estimated_tokens: u64,
        utilization: f64,
        remaining: u64,
    },
    Exceeded {
        estimated_tokens: u64,
        limit: u64,
        overage: u64,
    },
}

impl PreflightResult {
    pub fn should_proceed(&self) -> bool {
        !matches!(self, Self::Exceeded { .. })
    }

    pub fn estimated_tokens(&self) -> u64 {
        match self {
            Self::Ok {
                estimated_tokens, ..
            }
            | Self::Warning {
                estimated_tokens, ..
            }
            | Self::Exceeded {
                estimated_tokens, ..
            } => *estimated_tokens,
        }
    }

    /// Tokens left after the addition, `None` when it does not fit.
    pub fn remaining(&self) -> Option<u64> {
        match self {
            Self::Ok { remaining, .. } | Self::Warning { remaining, .. } => Some(*remaining),
            Self::Exceeded { .. } => None,
        }
    }

    /// Convert an overflow into [`Error::ContextWindowExceeded`].
    pub fn into_result(self) -> Result<Self> {
        match self {
            Self::Exceeded {
                estimated_tokens,
                limit,
                overage,
            } => Err(Error::ContextWindowExceeded {
                estimated: estimated_tokens,
                limit,
                overage,
            }),
            other => Ok(other),
        }
    }
}
