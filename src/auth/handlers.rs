use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{CreateUserRequest, CreateUserResponse, LoginRequest, LoginResponse},
        errors::AuthError,
        extractors::AuthUser,
        jwt::JwtKeys,
        repo_types::User,
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/createuser", post(create_user))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/getuserdata", get(get_user_data))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<CreateUserResponse>, AuthError> {
    let Json(payload) = body?;
    let keys = JwtKeys::from_ref(&state);
    let auth_token = services::register(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(CreateUserResponse {
        success: true,
        auth_token,
    }))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(payload) = body?;
    let keys = JwtKeys::from_ref(&state);
    let auth_token = services::login(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(LoginResponse {
        success: true,
        msg: "User verified successfully!",
        auth_token,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id, username = %auth.name))]
pub async fn get_user_data(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, AuthError> {
    let user = services::profile(state.users.as_ref(), auth.id).await?;
    Ok(Json(user))
}
