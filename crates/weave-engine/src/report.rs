use std::fmt;

use serde::{Deserialize, Serialize};

/// The outcome of executing an atomic op batch.
///
/// Execution stops at the first failing op, so `executed < total` together
/// with a non-empty `errors` list means a partial application: everything
/// before the failure is committed, nothing is rolled back. Hosts surface
/// this to the narrating layer as a partial failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Number of ops applied successfully.
    pub executed: usize,
    /// Number of ops in the batch.
    pub total: usize,
    /// Human-readable errors; at most one under abort-on-first-error,
    /// plus any translation failure.
    pub errors: Vec<String>,
}

impl ExecutionReport {
    /// A report for a batch that failed before any op could run.
    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            executed: 0,
            total: 0,
            errors: vec![error.to_string()],
        }
    }

    /// True when every op applied cleanly.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.executed == self.total
    }

    /// True when the batch stopped early.
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "executed {}/{} operations", self.executed, self.total)?;
        for error in &self.errors {
            write!(f, "; error: {error}")?;
        }
        Ok(())
    }
}
