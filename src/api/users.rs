//! Staff account endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::user::{CreateUser, CreatedUser, UpdateUser, UserQuery, UserShort},
};

/// List staff accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(
        ("search" = Option<String>, Query, description = "Search in name or email")
    ),
    responses(
        (status = 200, description = "List of users", body = Vec<UserShort>),
        (status = 403, description = "Not allowed for the active role")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<UserShort>>> {
    let users = state.services.users.search_users(&query).await?;
    Ok(Json(users))
}

/// Get a staff account by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserShort),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserShort>> {
    let user = state.services.users.get_user(&id).await?;
    Ok(Json(user))
}

/// Create a staff account and send its activation email
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = CreatedUser),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not allowed for the active role"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<CreatedUser>)> {
    let created = state.services.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a staff account
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserShort),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(user): Json<UpdateUser>,
) -> AppResult<Json<UserShort>> {
    let updated = state.services.users.update_user(&id, user).await?;
    Ok(Json(updated))
}

/// Delete a staff account
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.users.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
