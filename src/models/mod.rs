use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. This is the persisted document; it carries the
/// password hash and must never be sent to clients as is (see `dtos::UserView`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            session_token: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub author: Uuid,
    /// Users who like this tweet. Membership is unique.
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    pub fn new(text: String, author: Uuid, parent: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author,
            likes: vec![],
            parent,
            created_at: Utc::now(),
        }
    }

    /// A new tweet authored by `author` that repeats this tweet's text and
    /// points back at it. Likes are not carried over.
    pub fn retweet(&self, author: Uuid) -> Self {
        Self::new(self.text.clone(), author, Some(self.id))
    }

    /// Unlikes if `user_id` already likes the tweet, likes it otherwise.
    pub fn toggle_like(&mut self, user_id: Uuid) {
        match self.likes.iter().position(|like| *like == user_id) {
            Some(index) => {
                self.likes.remove(index);
            }
            None => self.likes.push(user_id),
        }
    }

    /// Whether this tweet belongs to the one-level thread rooted at `root`.
    pub fn in_thread_of(&self, root: &Uuid) -> bool {
        self.id == *root || self.parent.as_ref() == Some(root)
    }
}
