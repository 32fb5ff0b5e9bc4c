use crate::model::{Expense, ParticipantBalances, Settlement, Transfer};

/// Converts paid transfers back into ledger entries.
pub struct SettlementRecorder;

impl SettlementRecorder {
    /// A paid transfer becomes an expense fronted by `from` and owed entirely by `to`.
    pub fn record(&self, transfer: &Transfer) -> Expense {
        Expense::new(
            transfer.from.clone(),
            transfer.amount,
            vec![transfer.to.clone()],
        )
    }

    /// Applies transfers to a balance map in place. Unknown participants are skipped.
    pub fn replay(&self, balances: &mut ParticipantBalances, transfers: &[Transfer]) {
        for transfer in transfers {
            if let Some(balance) = balances.get_mut(&transfer.from) {
                *balance += transfer.amount;
            }
            if let Some(balance) = balances.get_mut(&transfer.to) {
                *balance -= transfer.amount;
            }
        }
    }

    /// Pairs balances with the transfers chosen for them and what stays open once they are paid.
    pub fn conclude(&self, balances: ParticipantBalances, transfers: Vec<Transfer>) -> Settlement {
        let mut remaining = balances.clone();
        self.replay(&mut remaining, &transfers);
        Settlement {
            balances,
            transfers,
            remaining,
        }
    }
}
