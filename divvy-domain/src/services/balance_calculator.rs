use crate::{
    context::{ItemizedShares, SettlementContext},
    model::{Expense, Money, ParticipantBalances, ParticipantId},
    services::ShareNormalizer,
};

/// Reduces a list of expenses into one net balance per known participant.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Every supplied participant appears in the result, starting at zero.
    ///
    /// Identifiers that are not in `participants` are ignored wherever they
    /// appear (payer, split list, exact or percentage shares). Their share is
    /// simply missing from the resulting balance sheet.
    pub fn calculate(
        &self,
        expenses: &[Expense],
        participants: &[ParticipantId],
        context: &SettlementContext,
    ) -> ParticipantBalances {
        let mut accumulator = BalanceAccumulator::new(participants, context.itemized_shares);
        for expense in expenses {
            accumulator.apply(expense);
        }
        tracing::debug!(
            expense_count = expenses.len(),
            participant_count = accumulator.balances().len(),
            "Balance calculation finished"
        );
        accumulator.into_balances()
    }
}

/// Incremental form of [`BalanceCalculator`], one expense at a time.
pub struct BalanceAccumulator {
    balances: ParticipantBalances,
    normalizer: ShareNormalizer,
    itemized: ItemizedShares,
}

impl BalanceAccumulator {
    pub fn new(participants: &[ParticipantId], itemized: ItemizedShares) -> Self {
        let balances = participants
            .iter()
            .cloned()
            .map(|participant| (participant, Money::ZERO))
            .collect();

        Self {
            balances,
            normalizer: ShareNormalizer,
            itemized,
        }
    }

    pub fn apply(&mut self, expense: &Expense) {
        let Some(shares) = self.normalizer.normalize(expense, self.itemized) else {
            tracing::debug!(
                payer = %expense.payer,
                amount = %expense.amount,
                "Skipping expense that is not split among anyone"
            );
            return;
        };

        self.adjust(&expense.payer, expense.amount);
        for (participant, owed) in shares.iter() {
            self.adjust(participant, -owed);
        }
    }

    pub fn balances(&self) -> &ParticipantBalances {
        &self.balances
    }

    pub fn into_balances(self) -> ParticipantBalances {
        self.balances
    }

    fn adjust(&mut self, participant: &ParticipantId, delta: Money) {
        match self.balances.get_mut(participant) {
            Some(balance) => *balance += delta,
            None => tracing::debug!(
                participant = %participant,
                delta = %delta,
                "Ignoring amount for unknown participant"
            ),
        }
    }
}

/// Net balances using [`SettlementContext::standard`].
pub fn compute_balances(expenses: &[Expense], participants: &[ParticipantId]) -> ParticipantBalances {
    BalanceCalculator.calculate(expenses, participants, &SettlementContext::standard())
}
