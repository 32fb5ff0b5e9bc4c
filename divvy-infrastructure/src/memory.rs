use dashmap::{DashMap, mapref::entry::Entry};
use divvy_application::{
    ExpenseRepository, GroupId, LedgerScope, ParticipantDirectory, RepositoryError,
};
use divvy_domain::{Expense, ParticipantId};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Clone, Debug)]
struct StoredExpense {
    group: Option<GroupId>,
    expense: Expense,
}

/// Shared in-process ledger store.
///
/// Clones share the same maps. Every insert takes a sequence number so reads
/// come back in insertion order regardless of map iteration order.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    participants: Arc<DashMap<ParticipantId, u64>>,
    groups: Arc<DashMap<GroupId, Vec<ParticipantId>>>,
    expenses: Arc<DashMap<u64, StoredExpense>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a participant. Returns `false` if the identifier was already known.
    pub fn add_participant(&self, id: ParticipantId) -> bool {
        match self.participants.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(self.next_sequence());
                true
            }
        }
    }

    /// Registers or replaces a group's member list.
    pub fn add_group(&self, id: GroupId, members: Vec<ParticipantId>) {
        self.groups.insert(id, members);
    }

    pub fn has_group(&self, id: &GroupId) -> bool {
        self.groups.contains_key(id)
    }

    /// Stores an expense, optionally tagged with a registered group.
    pub fn add_expense(
        &self,
        group: Option<GroupId>,
        expense: Expense,
    ) -> Result<(), RepositoryError> {
        if let Some(group) = &group {
            self.ensure_group(group)?;
        }
        let seq = self.next_sequence();
        self.expenses.insert(seq, StoredExpense { group, expense });
        Ok(())
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    fn ensure_group(&self, id: &GroupId) -> Result<(), RepositoryError> {
        if self.has_group(id) {
            Ok(())
        } else {
            Err(RepositoryError::UnknownGroup(id.clone()))
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn registered(&self) -> Vec<ParticipantId> {
        let mut entries: Vec<(u64, ParticipantId)> = self
            .participants
            .iter()
            .map(|entry| (*entry.value(), entry.key().clone()))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, id)| id).collect()
    }
}

impl ParticipantDirectory for InMemoryLedger {
    fn participants(&self) -> Result<Vec<ParticipantId>, RepositoryError> {
        Ok(self.registered())
    }

    // Members keep directory order; identifiers that were never registered are left out.
    fn group_members(
        &self,
        group: &GroupId,
    ) -> Result<Option<Vec<ParticipantId>>, RepositoryError> {
        let Some(members) = self.groups.get(group).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        let members = self
            .registered()
            .into_iter()
            .filter(|id| members.contains(id))
            .collect();
        Ok(Some(members))
    }
}

impl ExpenseRepository for InMemoryLedger {
    fn expenses(&self, scope: &LedgerScope) -> Result<Vec<Expense>, RepositoryError> {
        if let LedgerScope::Group(group) = scope {
            self.ensure_group(group)?;
        }

        let mut entries: Vec<(u64, Expense)> = self
            .expenses
            .iter()
            .filter(|entry| match scope {
                LedgerScope::All => true,
                LedgerScope::Group(group) => entry.value().group.as_ref() == Some(group),
            })
            .map(|entry| (*entry.key(), entry.value().expense.clone()))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, expense)| expense).collect())
    }

    fn append(&self, scope: &LedgerScope, expense: Expense) -> Result<(), RepositoryError> {
        let group = match scope {
            LedgerScope::All => None,
            LedgerScope::Group(group) => Some(group.clone()),
        };
        tracing::debug!(scope = ?scope, payer = %expense.payer, "Appending expense");
        self.add_expense(group, expense)
    }
}
