use crate::errors::{AppError, ResultExt};
use crate::models::{CreditReport, StoredReport};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

/// Database storage service for normalized credit reports.
///
/// Assigns the report identifier and upload timestamp at insert time; the
/// extraction layer stays pure. The full normalized record is stored as
/// JSONB alongside a few denormalized columns for querying.
pub struct ReportStorage {
    pool: PgPool,
}

impl ReportStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table and index when missing. Runs at startup.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS credit_reports (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                mobile_phone TEXT NOT NULL,
                pan TEXT NOT NULL,
                credit_score BIGINT NOT NULL,
                current_balance NUMERIC,
                report JSONB NOT NULL,
                uploaded_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("creating credit_reports table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_credit_reports_uploaded_at
             ON credit_reports (uploaded_at DESC)",
        )
        .execute(&self.pool)
        .await
        .context("creating uploaded_at index")?;

        Ok(())
    }

    /// Persist a freshly extracted report.
    ///
    /// Storage is only attempted after extraction fully completed, so a
    /// failed write never leaves a partial record behind.
    ///
    /// # Arguments
    ///
    /// * `report` - The normalized report to store.
    ///
    /// # Returns
    ///
    /// * `Result<StoredReport, AppError>` - The stored report with its
    ///   assigned id and upload timestamp.
    pub async fn store_report(&self, report: &CreditReport) -> Result<StoredReport, AppError> {
        let id = Uuid::new_v4();
        let uploaded_at = Utc::now();

        // NUMERIC column keeps the summary balance exact for SQL aggregation
        let balance =
            BigDecimal::from_str(&report.report_summary.current_balance.to_string()).ok();

        let report_json = serde_json::to_value(report)
            .map_err(|e| AppError::InternalError(format!("failed to serialize report: {}", e)))?;

        sqlx::query(
            "INSERT INTO credit_reports
             (id, name, mobile_phone, pan, credit_score, current_balance, report, uploaded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(&report.name)
        .bind(&report.mobile_phone)
        .bind(&report.pan)
        .bind(report.credit_score)
        .bind(balance)
        .bind(&report_json)
        .bind(uploaded_at)
        .execute(&self.pool)
        .await
        .context("inserting credit report")?;

        Ok(StoredReport {
            id,
            report: report.clone(),
            uploaded_at,
        })
    }

    /// Full collection, newest upload first.
    pub async fn fetch_all(&self) -> Result<Vec<StoredReport>, AppError> {
        let rows = sqlx::query(
            "SELECT id, report, uploaded_at FROM credit_reports ORDER BY uploaded_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("listing credit reports")?;

        rows.into_iter().map(row_to_stored).collect()
    }

    /// Single report by identifier.
    pub async fn fetch_by_id(&self, id: Uuid) -> Result<StoredReport, AppError> {
        let row = sqlx::query("SELECT id, report, uploaded_at FROM credit_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("loading credit report")?
            .ok_or_else(|| AppError::NotFound(format!("Report with id {} not found", id)))?;

        row_to_stored(row)
    }
}

fn row_to_stored(row: PgRow) -> Result<StoredReport, AppError> {
    let id: Uuid = row.get("id");
    let report_json: serde_json::Value = row.get("report");
    let uploaded_at: DateTime<Utc> = row.get("uploaded_at");

    let report: CreditReport = serde_json::from_value(report_json)
        .map_err(|e| AppError::InternalError(format!("corrupt stored report {}: {}", id, e)))?;

    Ok(StoredReport {
        id,
        report,
        uploaded_at,
    })
}
