pub mod balance_calculator;
pub mod expense_validator;
pub mod settlement_minimizer;
pub mod settlement_recorder;
pub mod share_normalizer;

pub use balance_calculator::{BalanceAccumulator, BalanceCalculator, compute_balances};
pub use expense_validator::{ExpenseValidationError, ExpenseValidator};
pub use settlement_minimizer::{SettlementMinimizer, compute_settlements};
pub use settlement_recorder::SettlementRecorder;
pub use share_normalizer::ShareNormalizer;
