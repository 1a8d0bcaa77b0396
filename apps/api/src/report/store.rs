//! Saved reports. Only the generated text and its metadata are stored.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::{NewReport, ReportRow};
use crate::report::document::DEFAULT_TITLE;

/// All saved reports, newest first.
pub async fn list_reports(pool: &PgPool) -> Result<Vec<ReportRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ReportRow>("SELECT * FROM reports ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn get_report(pool: &PgPool, id: Uuid) -> Result<ReportRow, AppError> {
    sqlx::query_as::<_, ReportRow>("SELECT * FROM reports WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
}

/// Inserts a report. A blank title is stored as the default document title.
pub async fn create_report(pool: &PgPool, report: &NewReport) -> Result<ReportRow, AppError> {
    if report.content.trim().is_empty() {
        return Err(AppError::Validation("content must not be empty".to_string()));
    }
    let title = report
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        INSERT INTO reports
            (id, title, content, author, doc_number, template_type, work_category)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(&report.content)
    .bind(&report.author)
    .bind(&report.doc_number)
    .bind(&report.template_type)
    .bind(&report.work_category)
    .fetch_one(pool)
    .await?;

    tracing::info!(report_id = %row.id, "Report saved");
    Ok(row)
}

pub async fn delete_report(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM reports WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Report {id} not found")));
    }
    Ok(())
}
