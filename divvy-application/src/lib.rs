#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use error::{LedgerError, RepositoryError};
pub use ledger_service::LedgerService;
pub use model::{ExpenseIssue, GroupId, IssueKind, LedgerScope};
pub use ports::{ExpenseRepository, ParticipantDirectory, SettlementOptimizer};
