mod budget_store;
mod ledger_store;

pub use budget_store::*;
pub use ledger_store::*;
