//! Salary raise request and outcome values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, RaiseRate};

use crate::strategy::UpdateStrategy;

/// A request to raise every salary in one company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRaise {
    pub company_id: CompanyId,
    pub rate: RaiseRate,
    pub strategy: UpdateStrategy,
}

impl SalaryRaise {
    pub fn new(company_id: CompanyId, rate: RaiseRate, strategy: UpdateStrategy) -> Self {
        Self {
            company_id,
            rate,
            strategy,
        }
    }
}

/// Result of a committed salary raise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseOutcome {
    pub company_id: CompanyId,
    pub strategy: UpdateStrategy,
    /// Employee rows touched by the raise
    pub employees_updated: u64,
    /// Timestamp written to the company
    pub updated_at: DateTime<Utc>,
}
