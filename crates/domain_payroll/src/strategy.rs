//! Data-access strategies for the salary raise
//!
//! The three strategies are observably equivalent; they differ only in how
//! much data crosses the wire and in who guarantees atomicity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a salary raise is executed against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStrategy {
    /// Load the company with all employees, mutate in memory, flush the
    /// tracked changes in one transaction
    ObjectGraph,
    /// Single `UPDATE` composed by the query builder, inside an explicit
    /// transaction shared with the timestamp flush
    InterpolatedSql,
    /// Single fixed `UPDATE` with bound parameters, inside an explicit
    /// transaction shared with the timestamp flush
    BoundSql,
}

impl UpdateStrategy {
    pub const ALL: [UpdateStrategy; 3] = [
        UpdateStrategy::ObjectGraph,
        UpdateStrategy::InterpolatedSql,
        UpdateStrategy::BoundSql,
    ];

    /// HTTP path that exposes this strategy
    pub fn route(&self) -> &'static str {
        match self {
            UpdateStrategy::ObjectGraph => "/increase-salaries",
            UpdateStrategy::InterpolatedSql => "/increase-salaries-sql",
            UpdateStrategy::BoundSql => "/increase-salaries-dapper",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpdateStrategy::ObjectGraph => "object_graph",
            UpdateStrategy::InterpolatedSql => "interpolated_sql",
            UpdateStrategy::BoundSql => "bound_sql",
        }
    }
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
