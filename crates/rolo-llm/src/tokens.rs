//! Token accounting for gateway calls.
//!
//! Counts are observability-only: they feed the structured usage log and
//! never affect the request path. When the API response carries a `usage`
//! object those exact counts win; otherwise [`estimate_tokens`] supplies
//! an approximation.

use serde::Deserialize;

/// Estimate the token count of a text string.
///
/// Approximate: assumes 1 token ≈ 4 characters of English text, rounding
/// up with a minimum of 1. No exact tokenizer for the target model family
/// is linked, so callers must treat these values as estimates.
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
    len.div_ceil(4).max(1)
}

/// Token usage reported by the completions API, when present.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct ApiUsage {
    /// Tokens consumed by the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens produced in the completion.
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Per-call usage record emitted to the structured log.
#[derive(Clone, Copy, Debug)]
pub struct UsageRecord {
    /// Prompt-side token count.
    pub prompt_tokens: u32,
    /// Completion-side token count.
    pub completion_tokens: u32,
    /// Whether the counts came from the API `usage` object (exact) or
    /// from [`estimate_tokens`] (approximate).
    pub exact: bool,
}

impl UsageRecord {
    /// Build a usage record, preferring API-reported counts over estimates.
    #[must_use]
    pub fn from_call(usage: Option<ApiUsage>, prompt: &str, completion: &str) -> Self {
        match usage {
            Some(u) if u.prompt_tokens > 0 || u.completion_tokens > 0 => Self {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                exact: true,
            },
            _ => Self {
                prompt_tokens: estimate_tokens(prompt),
                completion_tokens: estimate_tokens(completion),
                exact: false,
            },
        }
    }

    /// Combined prompt + completion count.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_rounds_up() {
        assert_eq!(estimate_tokens("abcde"), 2); // 5 chars / 4, ceil
        assert_eq!(estimate_tokens("abcd"), 1);
    }

    #[test]
    fn estimate_minimum_is_one() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("a"), 1);
    }

    #[test]
    fn api_usage_wins_when_reported() {
        let usage = ApiUsage {
            prompt_tokens: 120,
            completion_tokens: 35,
        };
        let record = UsageRecord::from_call(Some(usage), "irrelevant", "irrelevant");
        assert!(record.exact);
        assert_eq!(record.prompt_tokens, 120);
        assert_eq!(record.total(), 155);
    }

    #[test]
    fn estimates_when_usage_missing() {
        let record = UsageRecord::from_call(None, "12345678", "1234");
        assert!(!record.exact);
        assert_eq!(record.prompt_tokens, 2);
        assert_eq!(record.completion_tokens, 1);
    }

    #[test]
    fn estimates_when_usage_all_zero() {
        let record = UsageRecord::from_call(Some(ApiUsage::default()), "12345678", "1234");
        assert!(!record.exact);
    }
}
