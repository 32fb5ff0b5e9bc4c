use divvy_application::SettlementOptimizer;
use divvy_domain::{ParticipantBalances, SettlementContext, SettlementMinimizer, Transfer};

/// Greedy largest-to-largest matching from the domain layer.
#[derive(Default)]
pub struct GreedySettlementOptimizer;

impl SettlementOptimizer for GreedySettlementOptimizer {
    fn optimize(
        &self,
        balances: &ParticipantBalances,
        context: &SettlementContext,
    ) -> Vec<Transfer> {
        SettlementMinimizer::from_context(context).minimize(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divvy_domain::{Money, ParticipantId};

    #[test]
    fn optimize_pairs_largest_balances_first() {
        let balances: ParticipantBalances = [
            ("A", Money::from_i64(30)),
            ("B", Money::from_i64(70)),
            ("C", Money::from_i64(-100)),
        ]
        .into_iter()
        .map(|(id, amount)| (ParticipantId::from(id), amount))
        .collect();

        let transfers =
            GreedySettlementOptimizer.optimize(&balances, &SettlementContext::standard());

        let pairs: Vec<(&str, &str, Money)> = transfers
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str(), t.amount))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("C", "B", Money::from_i64(70)),
                ("C", "A", Money::from_i64(30)),
            ]
        );
    }
}
