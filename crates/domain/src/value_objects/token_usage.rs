//! Token usage accounting

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Prompt and completion token counts for one or more model calls
///
/// Usage of a multi-call request is the component-wise sum of every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    #[must_use]
    pub const fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

impl Add for TokenUsage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            prompt_tokens: self.prompt_tokens.saturating_add(rhs.prompt_tokens),
            completion_tokens: self.completion_tokens.saturating_add(rhs.completion_tokens),
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for TokenUsage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_is_component_wise() {
        let total = TokenUsage::new(120, 300) + TokenUsage::new(80, 45);
        assert_eq!(total, TokenUsage::new(200, 345));
        assert_eq!(total.total(), 545);
    }

    #[test]
    fn add_assign_accumulates() {
        let mut usage = TokenUsage::default();
        usage += TokenUsage::new(1, 2);
        usage += TokenUsage::new(3, 4);
        assert_eq!(usage, TokenUsage::new(4, 6));
    }

    #[test]
    fn sum_of_empty_is_zero() {
        let usage: TokenUsage = Vec::<TokenUsage>::new().into_iter().sum();
        assert_eq!(usage, TokenUsage::default());
    }

    #[test]
    fn addition_saturates() {
        let usage = TokenUsage::new(u64::MAX, 0) + TokenUsage::new(1, 0);
        assert_eq!(usage.prompt_tokens, u64::MAX);
    }
}
