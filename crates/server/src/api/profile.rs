//! Profile query endpoint polled by the landing page.

use crate::AppResources;
use crate::auth::Session;
use crate::error::AppError;
use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

/// Tag for OpenAPI documentation.
pub const PROFILE_TAG: &str = "Profile";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProfileUser {
    pub name: String,
    pub email: String,
}

/// Login state of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub logged_in: bool,
    /// Present only when `logged_in` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ProfileUser>,
}

impl ProfileResponse {
    pub fn anonymous() -> Self {
        Self {
            logged_in: false,
            user: None,
        }
    }
}

/// Report who is logged in.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = PROFILE_TAG,
    operation_id = "Get Profile",
    summary = "Current login state",
    description = "Returns the name and email of the logged-in user, or `{\"logged_in\": false}`. \
                   A session referring to an unknown user counts as logged out.",
    responses(
        (status = 200, description = "Login state", body = ProfileResponse, content_type = "application/json"),
        (status = 500, description = "User store unavailable"),
    )
)]
pub async fn profile(
    State(resources): State<AppResources>,
    session: Session,
) -> Result<Json<ProfileResponse>, AppError> {
    let Some(user_id) = session.user_id() else {
        return Ok(Json(ProfileResponse::anonymous()));
    };

    let response = match resources.users.get(&user_id).await? {
        Some(user) => ProfileResponse {
            logged_in: true,
            user: Some(ProfileUser {
                name: user.name,
                email: user.email,
            }),
        },
        None => {
            tracing::debug!(user_id = %user_id, "Session refers to an unknown user");
            ProfileResponse::anonymous()
        }
    };
    Ok(Json(response))
}
