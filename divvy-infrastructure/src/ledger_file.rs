use crate::memory::InMemoryLedger;
use divvy_application::{GroupId, RepositoryError};
use divvy_domain::{Expense, Item, Money, ParticipantId, Percentages, Shares, SplitMode};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerFileError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid ledger document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expense #{index} is tagged with undeclared group '{group}'")]
    UndeclaredGroup { index: usize, group: String },
}

/// Participant identifier as written in the document: text or a JSON number.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ParticipantToken {
    Text(String),
    Number(serde_json::Number),
}

impl From<ParticipantToken> for ParticipantId {
    fn from(token: ParticipantToken) -> Self {
        match token {
            ParticipantToken::Text(text) => ParticipantId::from(text),
            ParticipantToken::Number(number) => ParticipantId::from(number.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    #[serde(default)]
    pub members: Vec<ParticipantToken>,
}

#[derive(Debug, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub participants: Vec<ParticipantToken>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SplitRecord {
    Equal,
    Unequal { shares: IndexMap<String, Decimal> },
    Percentage { percentages: IndexMap<String, Decimal> },
    Itemized { items: Vec<ItemRecord> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    pub payer: ParticipantToken,
    pub amount: Decimal,
    #[serde(default)]
    pub split_among: Vec<ParticipantToken>,
    #[serde(flatten)]
    pub split: SplitRecord,
}

impl ExpenseRecord {
    fn into_expense(self) -> Expense {
        let split = match self.split {
            SplitRecord::Equal => SplitMode::Equal,
            SplitRecord::Unequal { shares } => SplitMode::Unequal(
                shares
                    .into_iter()
                    .map(|(id, owed)| (ParticipantId::from(id), Money::from_decimal(owed)))
                    .collect::<Shares>(),
            ),
            SplitRecord::Percentage { percentages } => SplitMode::Percentage(
                percentages
                    .into_iter()
                    .map(|(id, percent)| (ParticipantId::from(id), percent))
                    .collect::<Percentages>(),
            ),
            SplitRecord::Itemized { items } => SplitMode::Itemized(
                items
                    .into_iter()
                    .map(|item| Item {
                        name: item.name,
                        amount: Money::from_decimal(item.amount),
                        participants: item.participants.into_iter().map(Into::into).collect(),
                    })
                    .collect(),
            ),
        };

        Expense::new(
            self.payer.into(),
            Money::from_decimal(self.amount),
            self.split_among.into_iter().map(Into::into).collect(),
        )
        .with_split(split)
    }
}

/// JSON ledger document read by the command line front end.
///
/// ```json
/// {
///   "participants": ["alice", "bob", 3],
///   "groups": [{ "id": "trip", "members": ["alice", "bob"] }],
///   "expenses": [
///     { "payer": "alice", "amount": 90, "splitAmong": ["alice", "bob", 3], "mode": "equal" },
///     { "group": "trip", "payer": "bob", "amount": "40.00", "splitAmong": ["alice", "bob"],
///       "mode": "unequal", "shares": { "alice": 30, "bob": 10 } }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct LedgerFile {
    pub participants: Vec<ParticipantToken>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

impl LedgerFile {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, LedgerFileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LedgerFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, LedgerFileError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads `path` and loads it into a fresh store.
    pub fn load(path: impl AsRef<Path>) -> Result<InMemoryLedger, LedgerFileError> {
        Self::read(path)?.into_ledger()
    }

    pub fn into_ledger(self) -> Result<InMemoryLedger, LedgerFileError> {
        let ledger = InMemoryLedger::new();

        for token in self.participants {
            let id = ParticipantId::from(token);
            if !ledger.add_participant(id.clone()) {
                tracing::warn!(participant = %id, "Duplicate participant in ledger document");
            }
        }

        for group in self.groups {
            ledger.add_group(
                GroupId::new(group.id),
                group.members.into_iter().map(Into::into).collect(),
            );
        }

        for (index, record) in self.expenses.into_iter().enumerate() {
            tracing::debug!(
                index,
                description = record.description.as_deref().unwrap_or(""),
                "Loading expense"
            );
            let group = record.group.clone().map(GroupId::new);
            ledger
                .add_expense(group, record.into_expense())
                .map_err(|err| match err {
                    RepositoryError::UnknownGroup(group) => LedgerFileError::UndeclaredGroup {
                        index,
                        group: group.to_string(),
                    },
                })?;
        }

        Ok(ledger)
    }
}
