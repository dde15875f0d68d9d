//! Persistence for users and tweets on top of sled.
//!
//! Every document is stored as JSON under its 16-byte UUID key. Two extra
//! trees index users by username and by session token.

mod tweets;
mod users;

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// bcrypt work factor used for stored passwords.
pub const PASSWORD_COST: u32 = 10;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("username is already taken")]
    DuplicateUsername,

    /// Unknown username or wrong password. The two cases are not told apart.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("document not found")]
    NotFound,

    #[error("invalid document: {0}")]
    InvalidDocument(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("failed to (de)serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Throw-away database, deleted when the last handle is dropped.
    pub temporary: bool,
    pub hash_cost: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./db"),
            temporary: false,
            hash_cost: PASSWORD_COST,
        }
    }
}

/// Handle on the database. Cheap to clone; every clone shares the same trees.
#[derive(Clone)]
pub struct Store {
    db: sled::Db,
    users: sled::Tree,
    usernames: sled::Tree,
    sessions: sled::Tree,
    tweets: sled::Tree,
    hash_cost: u32,
}

impl Store {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db = if config.temporary {
            sled::Config::new().temporary(true).open()?
        } else {
            sled::open(&config.path)?
        };

        Ok(Self {
            users: db.open_tree("users")?,
            usernames: db.open_tree("usernames")?,
            sessions: db.open_tree("sessions")?,
            tweets: db.open_tree("tweets")?,
            hash_cost: config.hash_cost,
            db,
        })
    }

    /// Writes all buffered changes to disk.
    pub fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

fn encode<T: Serialize>(document: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}

fn get<T: DeserializeOwned>(tree: &sled::Tree, id: &Uuid) -> Result<Option<T>> {
    tree.get(id.as_bytes())?
        .map(|bytes| decode(&bytes))
        .transpose()
}

/// Read-modify-write of a single document. Retries only when another writer
/// changed the document between the read and the swap.
fn modify<T, F>(tree: &sled::Tree, id: &Uuid, mut apply: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnMut(&mut T),
{
    loop {
        let current = tree.get(id.as_bytes())?.ok_or(Error::NotFound)?;
        let mut document: T = decode(&current)?;
        apply(&mut document);

        let updated = encode(&document)?;
        let swapped = tree.compare_and_swap(id.as_bytes(), Some(&current), Some(updated))?;
        if swapped.is_ok() {
            return Ok(document);
        }
    }
}

#[cfg(test)]
pub(crate) fn temporary() -> Store {
    Store::open(&StoreConfig {
        temporary: true,
        // lowest cost bcrypt accepts
        hash_cost: 4,
        ..StoreConfig::default()
    })
    .expect("temporary store")
}
