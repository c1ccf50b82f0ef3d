//! Salary raise application service
//!
//! One operation, parameterised by [`UpdateStrategy`]. The service owns the
//! configured raise rate, logs each raise with its latency, and translates
//! port errors into domain errors.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use core_kernel::{CompanyId, RaiseRate};

use crate::error::PayrollError;
use crate::ports::PayrollPort;
use crate::raise::{RaiseOutcome, SalaryRaise};
use crate::strategy::UpdateStrategy;

/// Applies proportional salary raises through a [`PayrollPort`]
#[derive(Clone)]
pub struct SalaryService {
    port: Arc<dyn PayrollPort>,
    rate: RaiseRate,
}

impl SalaryService {
    /// Creates a service applying the default 10% raise
    pub fn new(port: Arc<dyn PayrollPort>) -> Self {
        Self {
            port,
            rate: RaiseRate::default(),
        }
    }

    /// Overrides the raise rate
    pub fn with_rate(mut self, rate: RaiseRate) -> Self {
        self.rate = rate;
        self
    }

    pub fn rate(&self) -> RaiseRate {
        self.rate
    }

    pub fn port(&self) -> &Arc<dyn PayrollPort> {
        &self.port
    }

    /// Raises every salary of `company_id` by the configured rate
    ///
    /// Not idempotent: calling twice compounds the raise.
    ///
    /// # Errors
    ///
    /// * `PayrollError::CompanyNotFound` if no company has that id
    /// * `PayrollError::Persistence` if the store failed; no change is kept
    #[instrument(skip(self), fields(rate = %self.rate))]
    pub async fn increase_salaries(
        &self,
        company_id: CompanyId,
        strategy: UpdateStrategy,
    ) -> Result<RaiseOutcome, PayrollError> {
        let started = Instant::now();
        let raise = SalaryRaise::new(company_id, self.rate, strategy);

        match self.port.increase_salaries(raise).await {
            Ok(outcome) => {
                info!(
                    company_id = %company_id,
                    strategy = %strategy,
                    employees_updated = outcome.employees_updated,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Salaries increased"
                );
                Ok(outcome)
            }
            Err(e) if e.is_not_found() => {
                warn!(company_id = %company_id, strategy = %strategy, "Company not found");
                Err(PayrollError::CompanyNotFound(company_id))
            }
            Err(e) => {
                error!(
                    company_id = %company_id,
                    strategy = %strategy,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Salary raise failed"
                );
                Err(PayrollError::Persistence(e))
            }
        }
    }
}

impl std::fmt::Debug for SalaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalaryService")
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}
