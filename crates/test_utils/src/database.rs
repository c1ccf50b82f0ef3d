//! Database Test Utilities
//!
//! Provides helpers for database testing including testcontainer management,
//! seeding, and read-back of the `companies`/`employees` tables.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use core_kernel::CompanyId;
use domain_payroll::Company;

/// Default PostgreSQL image for testing
const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "payroll_test";

/// Connection attempts made while the container finishes initdb
const CONNECT_ATTEMPTS: u32 = 20;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    /// Creates the database connection URL
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A wrapper around a PostgreSQL test container
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a new PostgreSQL container for testing
    ///
    /// # Returns
    ///
    /// A new TestDatabase instance with the reference schema applied
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or schema fails to initialize
    pub async fn new() -> Result<Self, BoxError> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();

        let config = TestDatabaseConfig {
            host,
            port,
            ..TestDatabaseConfig::default()
        };

        let pool = connect_with_retry(&config.connection_url()).await?;

        let test_db = Self {
            _container: container,
            config,
            pool,
        };

        test_db.init_schema().await?;

        Ok(test_db)
    }

    /// Initializes the database schema from the migrations file
    async fn init_schema(&self) -> Result<(), BoxError> {
        let schema = include_str!("../../../migrations/20240101000001_initial_schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Clears all data from the database while preserving the schema
    pub async fn clear_data(&self) -> Result<(), BoxError> {
        sqlx::query("TRUNCATE TABLE employees, companies RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Inserts a company and its employees with their explicit ids
    pub async fn seed_company(&self, company: &Company) -> Result<(), BoxError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO companies (id, name, last_salary_update_utc) VALUES ($1, $2, $3)",
        )
        .bind(company.id.value())
        .bind(&company.name)
        .bind(company.last_salary_update_utc)
        .execute(&mut *tx)
        .await?;

        for employee in &company.employees {
            sqlx::query(
                "INSERT INTO employees (id, company_id, name, salary) VALUES ($1, $2, $3, $4)",
            )
            .bind(employee.id.value())
            .bind(company.id.value())
            .bind(&employee.name)
            .bind(employee.salary.amount())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Seeds several companies
    pub async fn seed_companies(&self, companies: &[Company]) -> Result<(), BoxError> {
        for company in companies {
            self.seed_company(company).await?;
        }
        Ok(())
    }

    /// Reads the salaries of a company's employees in employee id order
    pub async fn salaries(&self, company_id: CompanyId) -> Result<Vec<Decimal>, BoxError> {
        let salaries = sqlx::query_scalar::<_, Decimal>(
            "SELECT salary FROM employees WHERE company_id = $1 ORDER BY id",
        )
        .bind(company_id.value())
        .fetch_all(&self.pool)
        .await?;
        Ok(salaries)
    }

    /// Reads every salary in the database in employee id order
    pub async fn all_salaries(&self) -> Result<Vec<Decimal>, BoxError> {
        let salaries = sqlx::query_scalar::<_, Decimal>("SELECT salary FROM employees ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(salaries)
    }

    /// Reads a company's last salary update timestamp
    pub async fn last_salary_update(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<DateTime<Utc>>, BoxError> {
        let at = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT last_salary_update_utc FROM companies WHERE id = $1",
        )
        .bind(company_id.value())
        .fetch_one(&self.pool)
        .await?;
        Ok(at)
    }
}

/// Connects, retrying while the server restarts at the end of initdb
async fn connect_with_retry(url: &str) -> Result<PgPool, BoxError> {
    let mut last_error = None;
    for _ in 0..CONNECT_ATTEMPTS {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                last_error = Some(e);
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
        }
    }
    match last_error {
        Some(e) => Err(Box::new(e)),
        None => Err("could not connect to the test database".into()),
    }
}

/// Creates an isolated test database for a single test
pub async fn create_isolated_test_database() -> Result<TestDatabase, BoxError> {
    TestDatabase::new().await
}

/// Helper macro for running database tests against a fresh container
///
/// Tests are ignored by default because they need a Docker daemon; run them
/// with `cargo test -- --ignored`.
#[macro_export]
macro_rules! db_test {
    ($name:ident, |$db:ident| $body:block) => {
        #[tokio::test]
        #[ignore = "requires a Docker daemon for testcontainers"]
        async fn $name() {
            let $db = $crate::database::create_isolated_test_database()
                .await
                .expect("Failed to create test database");
            $body
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_connection_url() {
        let config = TestDatabaseConfig::default();
        let url = config.connection_url();

        assert!(url.starts_with("postgres://"));
        assert!(url.contains(POSTGRES_USER));
        assert!(url.contains(POSTGRES_DB));
    }
}
