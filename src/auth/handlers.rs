use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::{
    auth::{
        cookie::session_cookie,
        dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
        errors::AuthError,
        services::Registration,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    state
        .auth
        .register(Registration {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            photo: payload.photo,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    let out = state.auth.login(&payload.email, payload.password).await?;

    let cookie = session_cookie(
        out.session.token.clone(),
        out.session.expires_at,
        state.config.environment,
    );
    let role = out.user.role.clone();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".into(),
            data: out.user,
            token: out.session.token,
            role,
        }),
    ))
}
