mod expense;
mod ledger;
mod money;
mod month;

pub use expense::*;
pub use ledger::*;
pub use money::*;
pub use month::*;
