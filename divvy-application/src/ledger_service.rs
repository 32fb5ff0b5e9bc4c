use crate::{
    error::LedgerError,
    model::{ExpenseIssue, IssueKind, LedgerScope},
    ports::{ExpenseRepository, ParticipantDirectory, SettlementOptimizer},
};
use divvy_domain::{
    BalanceCalculator, Expense, ExpenseValidator, ParticipantBalances, ParticipantId, Settlement,
    SettlementContext, SettlementRecorder, Transfer,
};

/// Entry point used by front ends: loads the scoped ledger and runs the domain services on it.
#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    directory: &'a dyn ParticipantDirectory,
    expenses: &'a dyn ExpenseRepository,
    optimizer: &'a dyn SettlementOptimizer,
    context: SettlementContext,
}

impl<'a> LedgerService<'a> {
    pub fn new(
        directory: &'a dyn ParticipantDirectory,
        expenses: &'a dyn ExpenseRepository,
        optimizer: &'a dyn SettlementOptimizer,
        context: SettlementContext,
    ) -> Self {
        Self {
            directory,
            expenses,
            optimizer,
            context,
        }
    }

    pub fn context(&self) -> &SettlementContext {
        &self.context
    }

    pub fn balances(&self, scope: &LedgerScope) -> Result<ParticipantBalances, LedgerError> {
        let (participants, expenses) = self.load(scope)?;
        Ok(BalanceCalculator.calculate(&expenses, &participants, &self.context))
    }

    pub fn settle(&self, scope: &LedgerScope) -> Result<Settlement, LedgerError> {
        let balances = self.balances(scope)?;
        let transfers = self.optimizer.optimize(&balances, &self.context);
        let settlement = SettlementRecorder.conclude(balances, transfers);

        let unsettled = settlement
            .remaining
            .values()
            .filter(|balance| !self.context.is_settled(**balance))
            .count();
        if unsettled > 0 {
            tracing::warn!(
                scope = ?scope,
                unsettled,
                "Ledger does not balance; some participants stay open after settlement"
            );
        }

        tracing::info!(
            scope = ?scope,
            participant_count = settlement.balances.len(),
            transfer_count = settlement.transfers.len(),
            "Settlement computed"
        );

        Ok(settlement)
    }

    /// Validation findings for every expense in scope. Findings never change balances.
    pub fn audit(&self, scope: &LedgerScope) -> Result<Vec<ExpenseIssue>, LedgerError> {
        let (participants, expenses) = self.load(scope)?;
        let validator = ExpenseValidator::new(self.context);
        let mut issues = Vec::new();

        for (index, expense) in expenses.iter().enumerate() {
            if let Err(err) = validator.validate(expense) {
                issues.push(ExpenseIssue {
                    index,
                    kind: IssueKind::Invalid(err),
                });
            }
            for unknown in validator.unknown_participants(expense, &participants) {
                issues.push(ExpenseIssue {
                    index,
                    kind: IssueKind::UnknownParticipant(unknown),
                });
            }
        }

        for issue in &issues {
            tracing::warn!(index = issue.index, issue = %issue.kind, "Expense issue");
        }

        Ok(issues)
    }

    /// Stores a paid transfer as an expense so later balances account for it.
    pub fn record_settlement(
        &self,
        scope: &LedgerScope,
        transfer: &Transfer,
    ) -> Result<Expense, LedgerError> {
        self.participants(scope)?;
        let expense = SettlementRecorder.record(transfer);
        self.expenses.append(scope, expense.clone())?;

        tracing::info!(
            from = %transfer.from,
            to = %transfer.to,
            amount = %transfer.amount,
            "Settlement recorded"
        );

        Ok(expense)
    }

    fn participants(&self, scope: &LedgerScope) -> Result<Vec<ParticipantId>, LedgerError> {
        match scope {
            LedgerScope::All => Ok(self.directory.participants()?),
            LedgerScope::Group(group) => self
                .directory
                .group_members(group)?
                .ok_or_else(|| LedgerError::UnknownGroup(group.clone())),
        }
    }

    fn load(&self, scope: &LedgerScope) -> Result<(Vec<ParticipantId>, Vec<Expense>), LedgerError> {
        let participants = self.participants(scope)?;
        let expenses = self.expenses.expenses(scope)?;
        tracing::debug!(
            scope = ?scope,
            participant_count = participants.len(),
            expense_count = expenses.len(),
            "Ledger loaded"
        );
        Ok((participants, expenses))
    }
}
