//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! salary raise service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built companies and timestamps
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL testcontainer management, seeding and read-back
//! - `assertions`: Custom assertion helpers for payroll state
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
