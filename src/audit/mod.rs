use serde_json::Value;
use sqlx::PgPool;

/// One recorded admin action.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub actor_id: i64,
    pub actor_name: String,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: String,
    pub created_at: String,
}

impl AuditEntry {
    /// The `summary` field of the details, if the action recorded one.
    pub fn summary(&self) -> String {
        serde_json::from_str::<Value>(&self.details)
            .ok()
            .and_then(|v| v.get("summary").and_then(Value::as_str).map(String::from))
            .unwrap_or_default()
    }
}

/// Record an admin action. Callers ignore the result; a failed audit write
/// never blocks the action itself.
pub async fn log(
    pool: &PgPool,
    actor_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO audit_log (actor_id, action, target_type, target_id, details) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(actor_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .execute(pool)
    .await;

    if let Err(e) = &res {
        log::error!("Audit write failed for {action} on {target_type} {target_id}: {e}");
    }
    res.map(|_| ())
}

/// Most recent entries first.
pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditEntry>, sqlx::Error> {
    sqlx::query_as::<_, AuditEntry>(
        "SELECT a.id, a.actor_id, COALESCE(p.username, '(deleted)') AS actor_name, \
                a.action, a.target_type, a.target_id, a.details, \
                to_char(a.created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI') AS created_at \
         FROM audit_log a \
         LEFT JOIN profiles p ON p.id = a.actor_id \
         ORDER BY a.created_at DESC, a.id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
