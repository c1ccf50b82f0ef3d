//! Salary raise DTOs

use serde::{Deserialize, Serialize};

/// Query string of every salary raise endpoint: `?companyId=1`
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct IncreaseSalariesQuery {
    #[serde(rename = "companyId")]
    pub company_id: i32,
}
