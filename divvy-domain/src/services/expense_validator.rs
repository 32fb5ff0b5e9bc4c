use crate::{
    context::{SettlementContext, within},
    model::{Expense, Money, ParticipantId, SplitMode},
};
use fxhash::FxHashSet;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExpenseValidationError {
    #[error("amount must be greater than 0 (found {0})")]
    NonPositiveAmount(Money),
    #[error("expense has no payer")]
    MissingPayer,
    #[error("expense is not split among anyone")]
    EmptySplit,
    #[error("split total {total} must match expense amount {expected}")]
    UnequalTotalMismatch { total: Money, expected: Money },
    #[error("percentages must sum to 100 (found {total})")]
    PercentageTotalMismatch { total: Decimal },
    #[error("item total {total} must match expense amount {expected}")]
    ItemTotalMismatch { total: Money, expected: Money },
}

/// Checks that an expense is internally consistent.
///
/// Balance calculation never calls this on its own: an expense that fails
/// validation is still counted exactly as written.
pub struct ExpenseValidator {
    context: SettlementContext,
}

impl ExpenseValidator {
    pub fn new(context: SettlementContext) -> Self {
        Self { context }
    }

    pub fn validate(&self, expense: &Expense) -> Result<(), ExpenseValidationError> {
        if !expense.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(expense.amount));
        }
        if expense.payer.is_empty() {
            return Err(ExpenseValidationError::MissingPayer);
        }
        if expense.split_among.is_empty() {
            return Err(ExpenseValidationError::EmptySplit);
        }

        match &expense.split {
            SplitMode::Equal => Ok(()),
            SplitMode::Unequal(shares) => {
                let total: Money = shares.values().sum();
                if within(total, expense.amount, self.context.share_tolerance) {
                    Ok(())
                } else {
                    Err(ExpenseValidationError::UnequalTotalMismatch {
                        total,
                        expected: expense.amount,
                    })
                }
            }
            SplitMode::Percentage(percentages) => {
                let total = percentages
                    .values()
                    .fold(Decimal::ZERO, |acc, percent| acc.saturating_add(*percent));
                if total.saturating_sub(Decimal::ONE_HUNDRED).abs()
                    <= self.context.percentage_tolerance
                {
                    Ok(())
                } else {
                    Err(ExpenseValidationError::PercentageTotalMismatch { total })
                }
            }
            SplitMode::Itemized(items) => {
                let total: Money = items.iter().map(|item| item.amount).sum();
                if within(total, expense.amount, self.context.share_tolerance) {
                    Ok(())
                } else {
                    Err(ExpenseValidationError::ItemTotalMismatch {
                        total,
                        expected: expense.amount,
                    })
                }
            }
        }
    }

    /// Identifiers the expense mentions that are not among `participants`, deduplicated.
    pub fn unknown_participants(
        &self,
        expense: &Expense,
        participants: &[ParticipantId],
    ) -> Vec<ParticipantId> {
        let known: FxHashSet<&ParticipantId> = participants.iter().collect();
        let mut reported: FxHashSet<&ParticipantId> = FxHashSet::default();
        expense
            .referenced_participants()
            .filter(|id| !known.contains(id) && reported.insert(*id))
            .cloned()
            .collect()
    }
}

impl Default for ExpenseValidator {
    fn default() -> Self {
        Self::new(SettlementContext::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Percentages, Shares};
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn validator() -> ExpenseValidator {
        ExpenseValidator::default()
    }

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|name| ParticipantId::from(*name)).collect()
    }

    fn dinner(split: SplitMode) -> Expense {
        Expense::new("A".into(), Money::from_i64(100), ids(&["A", "B"])).with_split(split)
    }

    fn unequal(a: Money, b: Money) -> SplitMode {
        SplitMode::Unequal(Shares::from_iter([("A".into(), a), ("B".into(), b)]))
    }

    fn percentage(a: Decimal, b: Decimal) -> SplitMode {
        SplitMode::Percentage(Percentages::from_iter([("A".into(), a), ("B".into(), b)]))
    }

    fn itemized(amounts: &[Money]) -> SplitMode {
        SplitMode::Itemized(
            amounts
                .iter()
                .enumerate()
                .map(|(idx, amount)| Item {
                    name: format!("item {idx}"),
                    amount: *amount,
                    participants: ids(&["A"]),
                })
                .collect(),
        )
    }

    #[rstest]
    #[case::equal(dinner(SplitMode::Equal))]
    #[case::unequal_exact(dinner(unequal(Money::from_i64(20), Money::from_i64(80))))]
    #[case::unequal_within_tolerance(dinner(unequal(Money::new(2005, 2), Money::from_i64(80))))]
    #[case::percentage_exact(dinner(percentage(dec!(40), dec!(60))))]
    #[case::percentage_within_tolerance(dinner(percentage(dec!(33.3), dec!(66.3))))]
    #[case::itemized_exact(dinner(itemized(&[Money::from_i64(60), Money::from_i64(40)])))]
    fn accepts_consistent_expenses(validator: ExpenseValidator, #[case] expense: Expense) {
        assert_eq!(validator.validate(&expense), Ok(()));
    }

    #[rstest]
    #[case::zero_amount(
        Expense::new("A".into(), Money::ZERO, ids(&["A"])),
        ExpenseValidationError::NonPositiveAmount(Money::ZERO)
    )]
    #[case::missing_payer(
        Expense::new("".into(), Money::from_i64(10), ids(&["A"])),
        ExpenseValidationError::MissingPayer
    )]
    #[case::empty_split(
        Expense::new("A".into(), Money::from_i64(10), Vec::new()),
        ExpenseValidationError::EmptySplit
    )]
    #[case::unequal_short(
        dinner(unequal(Money::from_i64(20), Money::from_i64(70))),
        ExpenseValidationError::UnequalTotalMismatch {
            total: Money::from_i64(90),
            expected: Money::from_i64(100),
        }
    )]
    #[case::percentage_over(
        dinner(percentage(dec!(50), dec!(51))),
        ExpenseValidationError::PercentageTotalMismatch { total: dec!(101) }
    )]
    #[case::itemized_short(
        dinner(itemized(&[Money::from_i64(60)])),
        ExpenseValidationError::ItemTotalMismatch {
            total: Money::from_i64(60),
            expected: Money::from_i64(100),
        }
    )]
    fn rejects_inconsistent_expenses(
        validator: ExpenseValidator,
        #[case] expense: Expense,
        #[case] expected: ExpenseValidationError,
    ) {
        assert_eq!(validator.validate(&expense), Err(expected));
    }

    #[rstest]
    fn reports_each_unknown_participant_once(validator: ExpenseValidator) {
        let expense = Expense::new("ghost".into(), Money::from_i64(30), ids(&["A", "ghost", "C"]))
            .with_split(SplitMode::Unequal(Shares::from_iter([
                ("A".into(), Money::from_i64(10)),
                ("C".into(), Money::from_i64(20)),
            ])));
        assert_eq!(
            validator.unknown_participants(&expense, &ids(&["A", "B"])),
            ids(&["ghost", "C"])
        );
    }
}
