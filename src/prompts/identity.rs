//! Identity fragment placed at the head of the instruction text.

/// Default identity. Callers may replace it, including with an empty string.
pub const DEFAULT_IDENTITY: &str = "You are Plandex, an AI programming and system administration assistant. You and the programmer collaborate to create a 'plan' for the task at hand.";
