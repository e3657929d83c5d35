use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Role, User, UserCreate, UserInfo, UserUpdate};
use shared::{ApiResponse, AppError, ErrorCode};

use crate::db::repository::user as user_repo;
use crate::import::{self, ImportReport, MAX_UPLOAD_BYTES};
use crate::server::ServerState;
use crate::server::auth::{Capability, CurrentUser, hash_password};

#[derive(Debug, Default, Deserialize)]
pub struct TeamListQuery {
    /// Narrow the listing to one role
    pub role: Option<Role>,
}

/// Drop every field the actor's role may not touch on this target.
///
/// Nothing errors here: a field outside the actor's reach is silently
/// discarded, so a mixed patch applies only its permitted part.
/// Compensation (salary, rating) additionally requires the target to
/// be an Employee.
fn narrow_update(actor: &CurrentUser, target: &User, patch: UserUpdate) -> UserUpdate {
    let mut narrowed = UserUpdate::default();

    if actor.can(Capability::EditUserProfile) {
        narrowed.full_name = patch.full_name;
        narrowed.phone = patch.phone;
        narrowed.role = patch.role;
        narrowed.password = patch.password;
    }

    if actor.can(Capability::EditCompensation) && target.role == Role::Employee {
        narrowed.salary = patch.salary;
        narrowed.rating = patch.rating;
    }

    narrowed
}

/// GET /api/team
///
/// Supervisors only ever see the active Employee slice; the role
/// filter is forced for them regardless of what they ask for.
pub async fn list_team(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<TeamListQuery>,
) -> Result<ApiResponse<Vec<UserInfo>>, AppError> {
    let role_filter = if current.can(Capability::ManageUsers) {
        query.role
    } else {
        Some(Role::Employee)
    };
    let users = user_repo::list_active(&state.pool, role_filter).await?;
    Ok(ApiResponse::success(users.iter().map(User::info).collect()))
}

/// GET /api/team/deleted
pub async fn list_deleted(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse<Vec<UserInfo>>, AppError> {
    current.require(Capability::ManageUsers)?;

    let users = user_repo::list_deleted(&state.pool).await?;
    Ok(ApiResponse::success(users.iter().map(User::info).collect()))
}

/// POST /api/team
pub async fn create_member(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> Result<ApiResponse<UserInfo>, AppError> {
    current.require(Capability::ManageUsers)?;

    if payload.password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let hash = hash_password(&payload.password)?;
    let user = user_repo::create_user(&state.pool, &payload, &hash).await?;

    tracing::info!(
        actor_id = current.id,
        user_id = user.id,
        username = %user.username,
        role = %user.role,
        "Team member created"
    );

    Ok(ApiResponse::success_with_message("User created", user.info()))
}

/// GET /api/team/{id}
///
/// Outside the viewer's slice the account simply does not exist.
pub async fn get_member(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<UserInfo>, AppError> {
    let user = user_repo::get_user(&state.pool, id)
        .await?
        .ok_or_else(AppError::user_not_found)?;
    if !current.can(Capability::ManageUsers) && (user.is_deleted || user.role != Role::Employee) {
        return Err(AppError::user_not_found());
    }
    Ok(ApiResponse::success(user.info()))
}

/// PUT /api/team/{id}
///
/// Applies the narrowed patch. A patch narrowed down to nothing is a
/// no-op that answers with the unchanged row.
pub async fn update_member(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(patch): Json<UserUpdate>,
) -> Result<ApiResponse<UserInfo>, AppError> {
    let target = user_repo::get_user(&state.pool, id)
        .await?
        .ok_or_else(AppError::user_not_found)?;
    if target.is_deleted {
        return Err(AppError::user_not_found());
    }

    let narrowed = narrow_update(&current, &target, patch);
    if narrowed.is_empty() {
        return Ok(ApiResponse::success(target.info()));
    }

    let hash = match narrowed.password.as_deref() {
        Some("") => return Err(AppError::validation("Password cannot be empty")),
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let updated = user_repo::update_user(&state.pool, id, &narrowed, hash.as_deref()).await?;

    tracing::info!(actor_id = current.id, user_id = id, "Team member updated");

    Ok(ApiResponse::success(updated.info()))
}

/// DELETE /api/team/{id}
pub async fn delete_member(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, AppError> {
    current.require(Capability::ManageUsers)?;

    if id == current.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    user_repo::soft_delete_user(&state.pool, id).await?;

    tracing::info!(actor_id = current.id, user_id = id, "Team member deleted");

    Ok(ApiResponse::ok())
}

/// POST /api/team/{id}/restore
pub async fn restore_member(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<UserInfo>, AppError> {
    current.require(Capability::ManageUsers)?;

    user_repo::restore_user(&state.pool, id).await?;
    let user = user_repo::get_user(&state.pool, id)
        .await?
        .ok_or_else(AppError::user_not_found)?;

    tracing::info!(actor_id = current.id, user_id = id, "Team member restored");

    Ok(ApiResponse::success(user.info()))
}

/// POST /api/team/import
///
/// Multipart upload, field name `file`, .csv only, capped at 1 MiB.
pub async fn import_team(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<ApiResponse<ImportReport>, AppError> {
    current.require(Capability::ImportRoster)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::import_failed(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::import_failed(e.to_string()))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) = upload.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;

    if !filename.to_ascii_lowercase().ends_with(".csv") {
        return Err(AppError::new(ErrorCode::InvalidFileExtension).with_detail("filename", filename));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(
            AppError::new(ErrorCode::FileTooLarge).with_detail("limit_bytes", MAX_UPLOAD_BYTES as i64)
        );
    }

    let report = import::import_roster(&state.pool, &data).await?;

    tracing::info!(
        actor_id = current.id,
        file = %filename,
        created = report.created,
        skipped = report.skipped,
        "Roster imported"
    );

    Ok(ApiResponse::success(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "actor".to_string(),
            role,
        }
    }

    fn target(role: Role) -> User {
        User {
            id: 2,
            username: "target".to_string(),
            full_name: String::new(),
            phone: String::new(),
            hash_pass: String::new(),
            role,
            salary: role.default_salary(),
            rating: 5,
            is_deleted: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn full_patch() -> UserUpdate {
        UserUpdate {
            full_name: Some("New Name".to_string()),
            phone: Some("555-0101".to_string()),
            role: Some(Role::Supervisor),
            password: Some("changed".to_string()),
            salary: Some(70000.0),
            rating: Some(2),
        }
    }

    #[test]
    fn test_admin_patch_keeps_profile_drops_compensation() {
        let narrowed = narrow_update(&actor(Role::Admin), &target(Role::Employee), full_patch());
        assert_eq!(narrowed.full_name.as_deref(), Some("New Name"));
        assert_eq!(narrowed.phone.as_deref(), Some("555-0101"));
        assert_eq!(narrowed.role, Some(Role::Supervisor));
        assert_eq!(narrowed.password.as_deref(), Some("changed"));
        assert!(narrowed.salary.is_none());
        assert!(narrowed.rating.is_none());
    }

    #[test]
    fn test_supervisor_patch_keeps_compensation_drops_profile() {
        let narrowed =
            narrow_update(&actor(Role::Supervisor), &target(Role::Employee), full_patch());
        assert!(narrowed.full_name.is_none());
        assert!(narrowed.phone.is_none());
        assert!(narrowed.role.is_none());
        assert!(narrowed.password.is_none());
        assert_eq!(narrowed.salary, Some(70000.0));
        assert_eq!(narrowed.rating, Some(2));
    }

    #[test]
    fn test_supervisor_cannot_touch_staff_compensation() {
        for role in [Role::Supervisor, Role::Admin] {
            let narrowed = narrow_update(&actor(Role::Supervisor), &target(role), full_patch());
            assert!(narrowed.is_empty(), "patch against {role} must vanish");
        }
    }

    #[test]
    fn test_employee_patch_vanishes_entirely() {
        let narrowed = narrow_update(&actor(Role::Employee), &target(Role::Employee), full_patch());
        assert!(narrowed.is_empty());
    }

    #[test]
    fn test_partial_patch_stays_partial() {
        let patch = UserUpdate {
            phone: Some("555-0102".to_string()),
            ..Default::default()
        };
        let narrowed = narrow_update(&actor(Role::Admin), &target(Role::Employee), patch);
        assert_eq!(narrowed.phone.as_deref(), Some("555-0102"));
        assert!(narrowed.full_name.is_none());
    }
}
