//! Salary raise handlers
//!
//! The three routes differ only in the update strategy they request.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
};

use core_kernel::CompanyId;
use domain_payroll::UpdateStrategy;

use crate::dto::salaries::IncreaseSalariesQuery;
use crate::{error::ApiError, AppState};

/// `PUT /increase-salaries`: object graph
pub async fn increase_salaries(
    state: State<AppState>,
    query: Result<Query<IncreaseSalariesQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    raise(state, query, UpdateStrategy::ObjectGraph).await
}

/// `PUT /increase-salaries-sql`: interpolated bulk statement
pub async fn increase_salaries_sql(
    state: State<AppState>,
    query: Result<Query<IncreaseSalariesQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    raise(state, query, UpdateStrategy::InterpolatedSql).await
}

/// `PUT /increase-salaries-dapper`: bound-parameter bulk statement
pub async fn increase_salaries_dapper(
    state: State<AppState>,
    query: Result<Query<IncreaseSalariesQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    raise(state, query, UpdateStrategy::BoundSql).await
}

async fn raise(
    State(state): State<AppState>,
    query: Result<Query<IncreaseSalariesQuery>, QueryRejection>,
    strategy: UpdateStrategy,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query?;
    state
        .service
        .increase_salaries(CompanyId::new(query.company_id), strategy)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
