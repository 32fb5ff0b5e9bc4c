#![warn(clippy::uninlined_format_args)]

pub mod ledger_file;
pub mod memory;
pub mod optimizer;

pub use ledger_file::{LedgerFile, LedgerFileError};
pub use memory::InMemoryLedger;
pub use optimizer::GreedySettlementOptimizer;
