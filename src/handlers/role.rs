use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::{
    auth::Caller,
    models::user::Role,
    permission::{Permission, PermissionEngine},
    policy::assignable_roles,
    startup::AppState,
};

#[derive(Debug, serde::Serialize)]
pub struct RolePermissionsResponse {
    role: Role,
    permissions: Vec<&'static str>,
}

impl RolePermissionsResponse {
    fn new(engine: &PermissionEngine, role: Role) -> Self {
        let permissions = engine
            .role_permissions(role)
            .into_iter()
            .flat_map(Permission::names)
            .collect();

        Self { role, permissions }
    }
}

#[instrument(skip(state))]
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<RolePermissionsResponse>> {
    Json(
        Role::ALL
            .into_iter()
            .map(|role| RolePermissionsResponse::new(&state.engine, role))
            .collect(),
    )
}

/// Permission names of a role. Unknown role names list nothing.
#[instrument(skip(state))]
pub async fn role_permissions(
    State(state): State<Arc<AppState>>,
    Path(role): Path<String>,
) -> Json<Vec<&'static str>> {
    let permissions = match role.parse::<Role>() {
        Ok(role) => RolePermissionsResponse::new(&state.engine, role).permissions,
        Err(e) => {
            tracing::debug!("{e}");
            Vec::new()
        }
    };

    Json(permissions)
}

#[derive(Debug, serde::Serialize)]
pub struct MyPermissionsResponse {
    user_id: i64,
    #[serde(flatten)]
    grant: RolePermissionsResponse,
    assignable_roles: Vec<Role>,
}

#[instrument(skip(state))]
pub async fn my_permissions(
    caller: Caller,
    State(state): State<Arc<AppState>>,
) -> Json<MyPermissionsResponse> {
    Json(MyPermissionsResponse {
        user_id: caller.user_id,
        grant: RolePermissionsResponse::new(&state.engine, caller.role),
        assignable_roles: assignable_roles(&state.engine, caller.role),
    })
}

#[derive(Debug, Default, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    #[default]
    All,
    Any,
}

#[derive(Debug, serde::Deserialize)]
pub struct CheckPermissionsModel {
    permissions: Vec<String>,
    #[serde(default)]
    mode: CheckMode,
}

#[derive(Debug, serde::Serialize)]
pub struct CheckPermissionsResponse {
    granted: bool,
    unknown: Vec<String>,
}

/// Asks whether the caller holds all (or any) of the named permissions.
///
/// Unknown names can never be held: they fail an `all` check and are ignored
/// by an `any` check.
#[instrument(skip(state, payload))]
pub async fn check_my_permissions(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckPermissionsModel>,
) -> Json<CheckPermissionsResponse> {
    let (permissions, unknown) = Permission::parse_list(payload.permissions.as_slice());

    let granted = match payload.mode {
        CheckMode::All => {
            unknown.is_empty() && state.engine.has_all_permissions(caller.role, &permissions)
        }
        CheckMode::Any => state.engine.has_any_permission(caller.role, &permissions),
    };

    Json(CheckPermissionsResponse {
        granted,
        unknown: unknown.into_iter().map(str::to_string).collect(),
    })
}
