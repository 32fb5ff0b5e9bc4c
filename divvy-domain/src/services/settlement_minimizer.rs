use crate::{
    context::SettlementContext,
    model::{Expense, Money, ParticipantBalances, ParticipantId, Transfer},
    services::BalanceCalculator,
};

struct Position<'a> {
    id: &'a ParticipantId,
    remaining: Money,
}

/// Greedy largest-creditor / largest-debtor matching.
///
/// Not a global minimum-transfer solver: it emits at most
/// `creditors + debtors - 1` transfers and is fully deterministic for a given
/// balance map.
pub struct SettlementMinimizer {
    epsilon: Money,
}

impl SettlementMinimizer {
    pub fn new(epsilon: Money) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    pub fn from_context(context: &SettlementContext) -> Self {
        Self::new(context.epsilon)
    }

    pub fn minimize(&self, balances: &ParticipantBalances) -> Vec<Transfer> {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();
        for (id, &balance) in balances {
            if balance > self.epsilon {
                creditors.push(Position {
                    id,
                    remaining: balance,
                });
            } else if balance < -self.epsilon {
                debtors.push(Position {
                    id,
                    remaining: -balance,
                });
            }
        }

        // Stable sorts: equal amounts keep participant-list order.
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut transfers =
            Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let (mut i, mut j) = (0, 0);

        while let (Some(creditor), Some(debtor)) = (creditors.get_mut(i), debtors.get_mut(j)) {
            let settled = creditor.remaining.min(debtor.remaining);
            transfers.push(Transfer {
                from: debtor.id.clone(),
                to: creditor.id.clone(),
                amount: settled,
            });

            creditor.remaining -= settled;
            debtor.remaining -= settled;

            if self.is_exhausted(creditor.remaining) {
                i += 1;
            }
            if self.is_exhausted(debtor.remaining) {
                j += 1;
            }
        }

        let unmatched = creditors[i..].iter().map(|p| p.remaining).sum::<Money>()
            - debtors[j..].iter().map(|p| p.remaining).sum::<Money>();
        if unmatched.abs() > self.epsilon {
            tracing::debug!(
                unmatched = %unmatched,
                "Ledger does not net to zero; leftover balance left unmatched"
            );
        }

        tracing::debug!(
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            transfer_count = transfers.len(),
            "Settlement minimization finished"
        );

        transfers
    }

    // A zero epsilon still has to advance on an exact zero.
    fn is_exhausted(&self, remaining: Money) -> bool {
        remaining < self.epsilon || remaining.is_zero()
    }
}

/// Transfers that clear the ledger, using [`SettlementContext::standard`].
pub fn compute_settlements(expenses: &[Expense], participants: &[ParticipantId]) -> Vec<Transfer> {
    let context = SettlementContext::standard();
    let balances = BalanceCalculator.calculate(expenses, participants, &context);
    SettlementMinimizer::from_context(&context).minimize(&balances)
}
