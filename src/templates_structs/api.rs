use serde::{Deserialize, Serialize};

use crate::models::grievance::{GrievanceComment, LikeToggle};

/// Body of `POST /api/grievances/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct ApiCommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ApiCommentResponse {
    pub id: i64,
    pub grievance_id: i64,
    pub text: String,
    pub created_at: String,
    pub created_label: String,
}

impl From<GrievanceComment> for ApiCommentResponse {
    fn from(c: GrievanceComment) -> Self {
        ApiCommentResponse {
            created_label: c.created_label(),
            id: c.id,
            grievance_id: c.grievance_id,
            text: c.text,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiLikeResponse {
    pub liked: bool,
    pub likes: i64,
}

impl From<LikeToggle> for ApiLikeResponse {
    fn from(t: LikeToggle) -> Self {
        ApiLikeResponse { liked: t.liked, likes: t.likes }
    }
}
