use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::Cents;

#[derive(Debug, Serialize, Deserialize)]
struct BudgetFile {
    budget_cents: Cents,
}

/// Persistence for the single monthly budget ceiling.
/// A missing file means no budget set (0 = alerts disabled).
pub struct BudgetStore {
    path: PathBuf,
}

impl BudgetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Cents> {
        if !self.path.exists() {
            return Ok(0);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read budget file: {}", self.path.display()))?;
        let file: BudgetFile = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed budget file: {}", self.path.display()))?;
        Ok(file.budget_cents)
    }

    pub fn save(&self, budget_cents: Cents) -> Result<()> {
        let contents = serde_json::to_string_pretty(&BudgetFile { budget_cents })?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write budget file: {}", self.path.display()))?;
        Ok(())
    }
}
