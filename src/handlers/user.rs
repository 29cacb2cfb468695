use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::{
    auth::Caller,
    error::{AppError, Result},
    models::user::Role,
    policy::authorize_role_assignment,
    startup::AppState,
};

#[derive(Debug, serde::Deserialize)]
pub struct AssignRoleModel {
    role: Role,
}

#[derive(Debug, serde::Serialize)]
pub struct AssignRoleResponse {
    user_id: i64,
    role: Role,
}

#[instrument(skip(state, payload))]
pub async fn assign_role(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(payload): Json<AssignRoleModel>,
) -> Result<Json<AssignRoleResponse>> {
    let role = payload.role;

    authorize_role_assignment(&state.engine, caller.role, role)?;

    if !state.users.set_user_role(user_id, role).await? {
        return Err(AppError::UserNotFound(user_id));
    }

    tracing::info!(
        "User {} ({}) assigned role {role} to user {user_id}",
        caller.user_id,
        caller.role
    );

    Ok(Json(AssignRoleResponse { user_id, role }))
}
