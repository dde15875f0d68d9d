use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dtos::{Payload, TweetText},
    error::{AppError, ResultExt},
    models,
    store::Store,
};

/// Tweet ids that do not parse are treated like ids that do not exist.
fn tweet_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

pub async fn create(
    State(store): State<Store>,
    AuthUser(user): AuthUser,
    Payload(dto): Payload<TweetText>,
) -> Result<Json<models::Tweet>, AppError> {
    let tweet = store
        .create_tweet(dto.text, user.id, None)
        .or_failed("Tweet failed")?;
    Ok(Json(tweet))
}

pub async fn get(
    State(store): State<Store>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<models::Tweet>, AppError> {
    let tweet = store.get_tweet(&tweet_id(&id)?).or_failed("No tweet found")?;
    Ok(Json(tweet))
}

pub async fn update(
    State(store): State<Store>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
    Payload(dto): Payload<TweetText>,
) -> Result<Json<models::Tweet>, AppError> {
    let tweet = store
        .update_tweet(&tweet_id(&id)?, dto.text)
        .or_failed("No tweet found")?;
    Ok(Json(tweet))
}

pub async fn delete(
    State(store): State<Store>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<models::Tweet>, AppError> {
    let tweet = store.remove_tweet(&tweet_id(&id)?).or_failed("No tweet found")?;
    tracing::info!(tweet_id = %tweet.id, user_id = %user.id, "deleted tweet");
    Ok(Json(tweet))
}

pub async fn like(
    State(store): State<Store>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<models::Tweet>, AppError> {
    let tweet = store
        .toggle_like(&tweet_id(&id)?, user.id)
        .or_failed("Like failed")?;
    Ok(Json(tweet))
}

pub async fn retweet(
    State(store): State<Store>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<models::Tweet>, AppError> {
    let tweet = store
        .retweet(&tweet_id(&id)?, user.id)
        .or_failed("Retweet failed")?;
    Ok(Json(tweet))
}

pub async fn thread(
    State(store): State<Store>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<models::Tweet>>, AppError> {
    let tweets = store.thread(&tweet_id(&id)?).or_failed("Thread failed")?;
    Ok(Json(tweets))
}
