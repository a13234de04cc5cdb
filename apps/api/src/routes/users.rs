use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;
use crate::store::release;

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub status: &'static str,
    pub count: usize,
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub user_id: i64,
}

/// GET /users
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let mut conn = state.store.connect().await?;
    let users = conn.list_users(None).await?;
    release(conn).await;

    Ok(Json(UserListResponse {
        status: "success",
        count: users.len(),
        users,
    }))
}

/// POST /users
/// Presence check only; email uniqueness is left to the store.
pub async fn handle_create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreateUserResponse>, AppError> {
    let new_user = parse_new_user(&body)?;

    let mut conn = state.store.connect().await?;
    let user_id = conn.insert_user(&new_user).await?;
    release(conn).await;

    info!("Created user {user_id}");
    Ok(Json(CreateUserResponse {
        status: "success",
        message: "User added successfully",
        user_id,
    }))
}

fn parse_new_user(body: &[u8]) -> Result<NewUser, AppError> {
    let missing = || AppError::Validation("Name and email are required".to_string());

    // An object is required; derived Deserialize would also take a positional array.
    let object: Map<String, Value> = serde_json::from_slice(body).map_err(|_| missing())?;
    let req: CreateUserRequest =
        serde_json::from_value(Value::Object(object)).map_err(|_| missing())?;
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    match (present(req.name), present(req.email)) {
        (Some(name), Some(email)) => Ok(NewUser { name, email }),
        _ => Err(missing()),
    }
}
