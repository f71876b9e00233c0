pub mod ledger_calculator;


pub use ledger_calculator::{LedgerCalculator, LedgerState};
