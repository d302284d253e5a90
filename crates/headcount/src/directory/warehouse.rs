use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tokio::runtime::Runtime;

use crate::config::DatabaseConfig;

use super::domain::{EmployeeId, OrgRecord, Snapshot};
use super::{RetrievalError, SnapshotSource};

/// One row per employee for the requested day. The view can carry several
/// rows for an employee (rehires); the most recent hire wins.
const SNAPSHOT_QUERY: &str = "\
SELECT DISTINCT ON (employee_id)
       employee_id,
       employee_name,
       worker_status,
       employee_type,
       job_code,
       job_title,
       job_family,
       business_title,
       cost_center,
       location,
       manager,
       management_level,
       email_primary_work,
       snap_date AS effective_date
FROM v_headcount_daily
WHERE snap_date = $1
ORDER BY employee_id, hire_date DESC";

/// Row shape of `v_headcount_daily`.
#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    employee_id: String,
    employee_name: Option<String>,
    worker_status: Option<String>,
    employee_type: Option<String>,
    job_code: Option<String>,
    job_title: Option<String>,
    job_family: Option<String>,
    business_title: Option<String>,
    cost_center: Option<String>,
    location: Option<String>,
    manager: Option<String>,
    management_level: Option<String>,
    email_primary_work: Option<String>,
    effective_date: NaiveDate,
}

impl EmployeeRow {
    fn into_record(self) -> OrgRecord {
        OrgRecord {
            employee_id: EmployeeId(self.employee_id),
            employee_name: self.employee_name,
            worker_status: self.worker_status,
            employee_type: self.employee_type,
            job_code: self.job_code,
            job_title: self.job_title,
            job_family: self.job_family,
            business_title: self.business_title,
            cost_center: self.cost_center,
            location: self.location,
            manager: self.manager,
            management_level: self.management_level,
            email_primary_work: self.email_primary_work,
            effective_date: self.effective_date,
        }
    }
}

/// Thin wrapper around the sqlx Postgres pool allowing the synchronous
/// pipeline to query the warehouse without exposing async details.
#[derive(Debug)]
pub struct WarehouseClient {
    pool: PgPool,
    runtime: Runtime,
}

impl WarehouseClient {
    /// Connect eagerly so a bad host or credential fails before any report
    /// work starts.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, RetrievalError> {
        let runtime = Runtime::new()
            .map_err(|err| RetrievalError::Unreachable(format!("tokio runtime: {err}")))?;

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.username)
            .password(&config.password);

        let pool = runtime
            .block_on(
                PgPoolOptions::new()
                    .max_connections(2)
                    .connect_with(options),
            )
            .map_err(|err| RetrievalError::Unreachable(err.to_string()))?;

        Ok(Self { pool, runtime })
    }
}

impl SnapshotSource for WarehouseClient {
    fn snapshot(&self, day: NaiveDate) -> Result<Snapshot, RetrievalError> {
        let rows: Vec<EmployeeRow> = self
            .runtime
            .block_on(
                sqlx::query_as::<_, EmployeeRow>(SNAPSHOT_QUERY)
                    .bind(day)
                    .fetch_all(&self.pool),
            )
            .map_err(retrieval_error)?;

        if rows.is_empty() {
            return Err(RetrievalError::Empty(day));
        }

        Ok(Snapshot::from_records(
            day,
            rows.into_iter().map(EmployeeRow::into_record),
        ))
    }
}

fn retrieval_error(err: sqlx::Error) -> RetrievalError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => RetrievalError::Unreachable(err.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => RetrievalError::Malformed(err.to_string()),
        _ => RetrievalError::Query(err.to_string()),
    }
}
