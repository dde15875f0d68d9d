use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models};

/// JSON request body. Same as `axum::Json`, but a body that does not parse
/// is reported through `AppError` instead of axum's default rejection.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TweetText {
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub auth_token: String,
}

/// Public view of a user.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
}

impl From<models::User> for UserView {
    fn from(user: models::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: String,
}
