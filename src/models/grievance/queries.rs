use std::collections::HashMap;

use sqlx::PgPool;

use super::types::*;

#[derive(sqlx::FromRow)]
struct GrievanceRow {
    id: i64,
    title: String,
    description: String,
    photo_url: Option<String>,
    likes_count: i64,
    created_at: String,
    liked: bool,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    grievance_id: i64,
    text: String,
    author_role: String,
    created_at: String,
}

impl From<CommentRow> for GrievanceComment {
    fn from(row: CommentRow) -> Self {
        GrievanceComment {
            id: row.id,
            grievance_id: row.grievance_id,
            text: row.text,
            author: CommentAuthor::parse(&row.author_role),
            created_at: row.created_at,
        }
    }
}

impl GrievanceRow {
    fn into_grievance(self, comments: Vec<GrievanceComment>) -> Grievance {
        Grievance {
            id: self.id,
            title: self.title,
            description: self.description,
            photo_url: self.photo_url,
            likes_count: self.likes_count,
            created_at: self.created_at,
            comments,
            liked: self.liked,
        }
    }
}

/// `$1` is the visitor id (nullable) used for the `liked` flag.
const SELECT_GRIEVANCE: &str = "\
    SELECT g.id, g.title, g.description, g.photo_url, \
           g.likes_count::BIGINT AS likes_count, \
           to_char(g.created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"') AS created_at, \
           EXISTS (SELECT 1 FROM grievance_likes l \
                   WHERE l.grievance_id = g.id AND l.visitor_id = $1) AS liked \
    FROM grievances g";

const SELECT_COMMENT: &str = "\
    SELECT id, grievance_id, text, author_role, \
           to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"') AS created_at \
    FROM grievance_comments";

/// Insert a grievance. Returns the new id.
pub async fn create(
    pool: &PgPool,
    title: &str,
    description: &str,
    photo_url: Option<&str>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO grievances (title, description, photo_url) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(title.trim())
    .bind(description.trim())
    .bind(photo_url)
    .fetch_one(pool)
    .await
}

/// All grievances, newest first, each with its comments.
pub async fn find_all(pool: &PgPool, visitor_id: Option<&str>) -> Result<Vec<Grievance>, sqlx::Error> {
    let sql = format!("{SELECT_GRIEVANCE} ORDER BY g.created_at DESC, g.id DESC");
    let rows = sqlx::query_as::<_, GrievanceRow>(&sql)
        .bind(visitor_id)
        .fetch_all(pool)
        .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut by_grievance = comments_for_many(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let comments = by_grievance.remove(&row.id).unwrap_or_default();
            row.into_grievance(comments)
        })
        .collect())
}

pub async fn find_by_id(
    pool: &PgPool,
    id: i64,
    visitor_id: Option<&str>,
) -> Result<Option<Grievance>, sqlx::Error> {
    let sql = format!("{SELECT_GRIEVANCE} WHERE g.id = $2");
    let row = sqlx::query_as::<_, GrievanceRow>(&sql)
        .bind(visitor_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let comments = find_comments(pool, id).await?;
            Ok(Some(row.into_grievance(comments)))
        }
        None => Ok(None),
    }
}

/// Comments of one grievance, oldest first.
pub async fn find_comments(pool: &PgPool, grievance_id: i64) -> Result<Vec<GrievanceComment>, sqlx::Error> {
    let sql = format!("{SELECT_COMMENT} WHERE grievance_id = $1 ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(grievance_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(GrievanceComment::from).collect())
}

async fn comments_for_many(
    pool: &PgPool,
    grievance_ids: &[i64],
) -> Result<HashMap<i64, Vec<GrievanceComment>>, sqlx::Error> {
    if grievance_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!("{SELECT_COMMENT} WHERE grievance_id = ANY($1) ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(grievance_ids)
        .fetch_all(pool)
        .await?;

    let mut map: HashMap<i64, Vec<GrievanceComment>> = HashMap::new();
    for row in rows {
        map.entry(row.grievance_id).or_default().push(row.into());
    }
    Ok(map)
}

/// Add a comment. Returns `None` when the grievance does not exist.
pub async fn add_comment(
    pool: &PgPool,
    grievance_id: i64,
    text: &str,
    author: CommentAuthor,
) -> Result<Option<GrievanceComment>, sqlx::Error> {
    let row = sqlx::query_as::<_, CommentRow>(
        "INSERT INTO grievance_comments (grievance_id, text, author_role) \
         SELECT id, $2, $3 FROM grievances WHERE id = $1 \
         RETURNING id, grievance_id, text, author_role, \
                   to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"') AS created_at",
    )
    .bind(grievance_id)
    .bind(text.trim())
    .bind(author.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(row.map(GrievanceComment::from))
}

/// Delete one comment, matched on both ids. Returns whether a row was removed.
pub async fn delete_comment(pool: &PgPool, grievance_id: i64, comment_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM grievance_comments WHERE id = $1 AND grievance_id = $2")
        .bind(comment_id)
        .bind(grievance_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Toggle the visitor's like in one transaction.
///
/// The grievance row is locked first, so concurrent toggles on the same
/// grievance serialize and `likes_count` always equals the number of like rows.
/// Returns `None` when the grievance does not exist.
pub async fn toggle_like(
    pool: &PgPool,
    grievance_id: i64,
    visitor_id: &str,
) -> Result<Option<LikeToggle>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM grievances WHERE id = $1 FOR UPDATE")
        .bind(grievance_id)
        .fetch_optional(&mut *tx)
        .await?;
    if locked.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    let removed = sqlx::query("DELETE FROM grievance_likes WHERE grievance_id = $1 AND visitor_id = $2")
        .bind(grievance_id)
        .bind(visitor_id)
        .execute(&mut *tx)
        .await?
        .rows_affected() as i64;

    let (liked, delta) = if removed > 0 {
        (false, -removed)
    } else {
        let inserted = sqlx::query(
            "INSERT INTO grievance_likes (grievance_id, visitor_id) VALUES ($1, $2) \
             ON CONFLICT (grievance_id, visitor_id) DO NOTHING",
        )
        .bind(grievance_id)
        .bind(visitor_id)
        .execute(&mut *tx)
        .await?
        .rows_affected() as i64;
        (true, inserted)
    };

    let likes: i64 = sqlx::query_scalar(
        "UPDATE grievances SET likes_count = likes_count + $2 WHERE id = $1 \
         RETURNING likes_count::BIGINT",
    )
    .bind(grievance_id)
    .bind(delta as i32)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(LikeToggle { liked, likes }))
}

/// Number of like rows for a grievance.
pub async fn count_like_rows(pool: &PgPool, grievance_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM grievance_likes WHERE grievance_id = $1")
        .bind(grievance_id)
        .fetch_one(pool)
        .await
}

pub async fn has_liked(pool: &PgPool, grievance_id: i64, visitor_id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM grievance_likes WHERE grievance_id = $1 AND visitor_id = $2)",
    )
    .bind(grievance_id)
    .bind(visitor_id)
    .fetch_one(pool)
    .await
}

/// Delete a grievance with its likes and comments, in that order, in one transaction.
/// Returns whether the grievance existed.
pub async fn delete(pool: &PgPool, grievance_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM grievance_likes WHERE grievance_id = $1")
        .bind(grievance_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM grievance_comments WHERE grievance_id = $1")
        .bind(grievance_id)
        .execute(&mut *tx)
        .await?;
    let removed = sqlx::query("DELETE FROM grievances WHERE id = $1")
        .bind(grievance_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(removed > 0)
}
