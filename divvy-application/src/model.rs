use divvy_domain::{ExpenseValidationError, ParticipantId};
use std::fmt;

/// Identifier of a group of participants sharing a ledger.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Which part of the ledger an operation looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LedgerScope {
    /// Every known participant and every expense.
    #[default]
    All,
    /// Members of the group and the expenses tagged with it.
    Group(GroupId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueKind {
    Invalid(ExpenseValidationError),
    UnknownParticipant(ParticipantId),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Invalid(err) => fmt::Display::fmt(err, f),
            IssueKind::UnknownParticipant(id) => {
                write!(f, "'{id}' is not a known participant; their share is ignored")
            }
        }
    }
}

/// A validation finding for the expense at `index` within the audited scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseIssue {
    pub index: usize,
    pub kind: IssueKind,
}
