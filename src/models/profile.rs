use sqlx::PgPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Viewer,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }
}

/// Profile used for sign-in. Carries the password hash; never rendered.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            // Unknown roles get no privileges.
            role: Role::parse(&row.role).unwrap_or(Role::Viewer),
        }
    }
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await
}

pub async fn create(pool: &PgPool, username: &str, password_hash: &str, role: Role) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO profiles (username, password_hash, role) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Profile>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, username, password_hash, role FROM profiles WHERE username = $1",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Profile::from))
}

/// Current role of a profile, `None` when the profile no longer exists.
pub async fn find_role(pool: &PgPool, profile_id: i64) -> Result<Option<Role>, sqlx::Error> {
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
        .bind(profile_id)
        .fetch_optional(pool)
        .await?;
    Ok(role.map(|r| Role::parse(&r).unwrap_or(Role::Viewer)))
}
