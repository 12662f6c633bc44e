use sqlx::PgPool;

use super::category::CrimeCategory;
use super::status::ReportStatus;
use super::types::*;
use crate::auth::csrf::random_hex;

const TRACK_ID_ATTEMPTS: usize = 5;

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i64,
    track_id: String,
    category: String,
    subtype: String,
    details: String,
    district: String,
    local_address: String,
    image_url: Option<String>,
    status: String,
    feedback: Option<String>,
    feedback_at: Option<String>,
    feedback_by: Option<String>,
    created_at: String,
}

impl TryFrom<ReportRow> for Report {
    type Error = sqlx::Error;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let category = CrimeCategory::parse(&row.category)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown report category '{}'", row.category).into()))?;
        let status = ReportStatus::parse(&row.status)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown report status '{}'", row.status).into()))?;
        Ok(Report {
            id: row.id,
            track_id: row.track_id,
            category,
            subtype: row.subtype,
            details: row.details,
            district: row.district,
            local_address: row.local_address,
            image_url: row.image_url,
            status,
            feedback: row.feedback,
            feedback_at: row.feedback_at,
            feedback_by: row.feedback_by,
            created_at: row.created_at,
        })
    }
}

const REPORT_COLUMNS: &str = "\
    id, track_id, category, subtype, details, district, local_address, image_url, status, \
    feedback, \
    to_char(feedback_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"') AS feedback_at, \
    feedback_by, \
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"') AS created_at";

/// Human-facing tracking code, e.g. `RPT-3F9A1C20`.
pub fn generate_track_id() -> String {
    format!("RPT-{}", random_hex(4).to_uppercase())
}

/// Insert a validated report with status `submitted` and a fresh track id.
pub async fn create(pool: &PgPool, new: &NewReport) -> Result<Report, sqlx::Error> {
    let sql = format!(
        "INSERT INTO reports (track_id, category, subtype, details, district, local_address, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (track_id) DO NOTHING \
         RETURNING {REPORT_COLUMNS}"
    );

    for _ in 0..TRACK_ID_ATTEMPTS {
        let row = sqlx::query_as::<_, ReportRow>(&sql)
            .bind(generate_track_id())
            .bind(new.category.as_str())
            .bind(&new.subtype)
            .bind(&new.details)
            .bind(&new.district)
            .bind(&new.local_address)
            .bind(new.image_url.as_deref())
            .fetch_optional(pool)
            .await?;
        if let Some(row) = row {
            return Report::try_from(row);
        }
        log::warn!("Track id collision, retrying");
    }

    Err(sqlx::Error::Protocol("could not allocate a unique track id".to_string()))
}

/// Reports of one category, newest first.
pub async fn find_by_category(pool: &PgPool, category: CrimeCategory) -> Result<Vec<Report>, sqlx::Error> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports WHERE category = $1 ORDER BY created_at DESC, id DESC"
    );
    sqlx::query_as::<_, ReportRow>(&sql)
        .bind(category.as_str())
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Report::try_from)
        .collect()
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Report>, sqlx::Error> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");
    sqlx::query_as::<_, ReportRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(Report::try_from)
        .transpose()
}

/// Lookup by tracking code; case-insensitive and tolerant of surrounding whitespace.
pub async fn find_by_track_id(pool: &PgPool, track_id: &str) -> Result<Option<Report>, sqlx::Error> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE track_id = $1");
    sqlx::query_as::<_, ReportRow>(&sql)
        .bind(track_id.trim().to_uppercase())
        .fetch_optional(pool)
        .await?
        .map(Report::try_from)
        .transpose()
}

/// Set a report's status. Writing the current value again is a no-op.
/// Returns `None` when the report does not exist.
pub async fn update_status(
    pool: &PgPool,
    report_id: i64,
    new_status: ReportStatus,
) -> Result<Option<StatusChange>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let current: Option<String> = sqlx::query_scalar("SELECT status FROM reports WHERE id = $1 FOR UPDATE")
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(current) = current else {
        tx.rollback().await?;
        return Ok(None);
    };
    let current = ReportStatus::parse(&current)
        .ok_or_else(|| sqlx::Error::Decode(format!("unknown report status '{current}'").into()))?;

    if current == new_status {
        tx.rollback().await?;
        return Ok(Some(StatusChange::Unchanged));
    }

    sqlx::query("UPDATE reports SET status = $2 WHERE id = $1")
        .bind(report_id)
        .bind(new_status.as_str())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(Some(StatusChange::Updated { from: current, to: new_status }))
}

/// Attach reviewer feedback. Always moves the report to `under_review`,
/// whatever its previous status. Returns whether the report exists.
pub async fn submit_feedback(
    pool: &PgPool,
    report_id: i64,
    feedback: &str,
    feedback_by: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE reports \
         SET feedback = $2, feedback_at = NOW(), feedback_by = $3, status = $4 \
         WHERE id = $1",
    )
    .bind(report_id)
    .bind(feedback.trim())
    .bind(feedback_by)
    .bind(ReportStatus::UnderReview.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_ids_have_prefix_and_uppercase_hex() {
        let id = generate_track_id();
        assert!(id.starts_with("RPT-"));
        let code = &id[4..];
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
