use axum::{extract::State, Json};

use crate::{
    dtos::{AuthToken, Credentials, Payload, UserView},
    error::{AppError, ResultExt},
    store::Store,
};

pub async fn register(
    State(store): State<Store>,
    Payload(credentials): Payload<Credentials>,
) -> Result<Json<UserView>, AppError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let user = tokio::task::spawn_blocking(move || {
        store.register(&credentials.username, &credentials.password)
    })
    .await?
    .or_failed("Registration failed")?;

    tracing::info!(user_id = %user.id, username = %user.username, "registered user");
    Ok(Json(user.into()))
}

pub async fn login(
    State(store): State<Store>,
    Payload(credentials): Payload<Credentials>,
) -> Result<Json<AuthToken>, AppError> {
    let username = credentials.username.clone();
    let auth_token = tokio::task::spawn_blocking(move || {
        store.login(&credentials.username, &credentials.password)
    })
    .await?
    .or_failed("Login failed")?;

    tracing::info!(%username, "user logged in");
    Ok(Json(AuthToken { auth_token }))
}
