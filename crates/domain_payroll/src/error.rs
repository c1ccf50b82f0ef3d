//! Payroll domain errors

use thiserror::Error;

use core_kernel::{CompanyId, PortError};

/// Errors surfaced by the salary raise operation
#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("The company with Id: {0} was not found")]
    CompanyNotFound(CompanyId),

    #[error("Persistence failure: {0}")]
    Persistence(#[source] PortError),
}

impl PayrollError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PayrollError::CompanyNotFound(_))
    }
}
