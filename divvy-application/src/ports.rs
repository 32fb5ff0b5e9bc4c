use crate::{
    error::RepositoryError,
    model::{GroupId, LedgerScope},
};
use divvy_domain::{Expense, ParticipantBalances, ParticipantId, SettlementContext, Transfer};

pub trait ParticipantDirectory: Send + Sync {
    /// All known participants, in registration order.
    fn participants(&self) -> Result<Vec<ParticipantId>, RepositoryError>;

    /// Members of `group`, or `None` if the group does not exist.
    fn group_members(
        &self,
        group: &GroupId,
    ) -> Result<Option<Vec<ParticipantId>>, RepositoryError>;
}

pub trait ExpenseRepository: Send + Sync {
    /// Expenses visible in `scope`, in the order they were added.
    fn expenses(&self, scope: &LedgerScope) -> Result<Vec<Expense>, RepositoryError>;

    fn append(&self, scope: &LedgerScope, expense: Expense) -> Result<(), RepositoryError>;
}

pub trait SettlementOptimizer: Send + Sync {
    fn optimize(
        &self,
        balances: &ParticipantBalances,
        context: &SettlementContext,
    ) -> Vec<Transfer>;
}
