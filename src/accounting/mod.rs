//! Accounting: settled token balances and native collateral counters.

pub mod ledger;
pub mod treasury;

pub use ledger::{Ledger, TokenBalances};
pub use treasury::Treasury;
