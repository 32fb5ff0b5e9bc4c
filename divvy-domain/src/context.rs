//! Numeric tolerances shared by balance calculation, settlement and validation.
//!
//! Balances are accumulated without rounding, so every comparison against zero
//! or against an expected total goes through one of these tolerances instead of
//! exact equality.

use crate::model::Money;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// How itemized expenses are turned into per-participant shares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemizedShares {
    /// Split the whole amount evenly over `split_among`; items are informational.
    #[default]
    Even,
    /// Split each item evenly among that item's own participants.
    PerItem,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown itemized share policy '{0}' (expected 'even' or 'per-item')")]
pub struct UnknownItemizedShares(pub String);

impl FromStr for ItemizedShares {
    type Err = UnknownItemizedShares;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "even" => Ok(Self::Even),
            "per-item" | "per_item" => Ok(Self::PerItem),
            other => Err(UnknownItemizedShares(other.to_owned())),
        }
    }
}

/// Tolerances and split policy for one ledger evaluation.
///
/// # Example
/// ```
/// use divvy_domain::{Money, SettlementContext};
///
/// let ctx = SettlementContext::standard();
/// assert!(ctx.is_settled(Money::new(5, 3)));
/// assert!(ctx.is_debtor(Money::new(-2, 2)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementContext {
    /// Balances within `[-epsilon, epsilon]` are treated as settled.
    pub epsilon: Money,
    /// Allowed gap between an expense amount and the sum of its exact or item shares.
    pub share_tolerance: Money,
    /// Allowed gap, in percentage points, between the sum of percentages and 100.
    pub percentage_tolerance: Decimal,
    pub itemized_shares: ItemizedShares,
}

impl SettlementContext {
    pub fn standard() -> Self {
        Self {
            epsilon: Money::new(1, 2),
            share_tolerance: Money::new(5, 2),
            percentage_tolerance: Decimal::new(5, 1),
            itemized_shares: ItemizedShares::Even,
        }
    }

    pub fn is_creditor(&self, balance: Money) -> bool {
        balance > self.epsilon
    }

    pub fn is_debtor(&self, balance: Money) -> bool {
        balance < -self.epsilon
    }

    pub fn is_settled(&self, balance: Money) -> bool {
        !self.is_creditor(balance) && !self.is_debtor(balance)
    }
}

impl Default for SettlementContext {
    fn default() -> Self {
        Self::standard()
    }
}

/// `|actual - expected| <= tolerance`
pub fn within(actual: Money, expected: Money, tolerance: Money) -> bool {
    (actual - expected).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exactly_epsilon(Money::new(1, 2), false, false)]
    #[case::negative_epsilon(Money::new(-1, 2), false, false)]
    #[case::just_above(Money::new(11, 3), true, false)]
    #[case::just_below(Money::new(-11, 3), false, true)]
    #[case::zero(Money::ZERO, false, false)]
    fn classifies_against_epsilon(
        #[case] balance: Money,
        #[case] creditor: bool,
        #[case] debtor: bool,
    ) {
        let ctx = SettlementContext::standard();
        assert_eq!(ctx.is_creditor(balance), creditor);
        assert_eq!(ctx.is_debtor(balance), debtor);
        assert_eq!(ctx.is_settled(balance), !creditor && !debtor);
    }

    #[rstest]
    #[case::even("even", Ok(ItemizedShares::Even))]
    #[case::per_item("per-item", Ok(ItemizedShares::PerItem))]
    #[case::underscore(" PER_ITEM ", Ok(ItemizedShares::PerItem))]
    #[case::unknown("weighted", Err(UnknownItemizedShares("weighted".to_owned())))]
    fn parses_itemized_policy(
        #[case] input: &str,
        #[case] expected: Result<ItemizedShares, UnknownItemizedShares>,
    ) {
        assert_eq!(input.parse::<ItemizedShares>(), expected);
    }

    #[test]
    fn within_is_inclusive() {
        assert!(within(Money::new(10005, 2), Money::from_i64(100), Money::new(5, 2)));
        assert!(!within(Money::new(10006, 2), Money::from_i64(100), Money::new(5, 2)));
    }
}
