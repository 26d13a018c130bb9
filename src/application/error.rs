use thiserror::Error;

use crate::domain::{Cents, ExpenseError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ExpenseError),

    #[error("Budget must be non-negative, got {0} cents")]
    InvalidBudget(Cents),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
