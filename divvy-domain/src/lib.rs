#![warn(clippy::uninlined_format_args)]

pub mod context;
pub mod model;
pub mod services;

pub use context::{ItemizedShares, SettlementContext, UnknownItemizedShares};
pub use model::{
    Expense, Item, Money, OwedShares, ParticipantBalances, ParticipantId, Percentages, Settlement,
    Shares, SplitMode, Transfer,
};
pub use services::{
    BalanceAccumulator, BalanceCalculator, ExpenseValidationError, ExpenseValidator,
    SettlementMinimizer, SettlementRecorder, ShareNormalizer, compute_balances,
    compute_settlements,
};
