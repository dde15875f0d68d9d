use uuid::Uuid;

use super::{encode, get, modify, Error, Result, Store};
use crate::{models::User, session};

impl Store {
    /// Creates an account. The password is stored as a salted bcrypt hash.
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        let password_hash = bcrypt::hash(password, self.hash_cost)?;
        let user = User::new(username.to_owned(), password_hash);
        let document = encode(&user)?;

        let claimed = self.usernames.compare_and_swap(
            username.as_bytes(),
            None::<&[u8]>,
            Some(user.id.as_bytes().to_vec()),
        )?;
        if claimed.is_err() {
            return Err(Error::DuplicateUsername);
        }

        if let Err(err) = self.users.insert(user.id.as_bytes(), document) {
            self.usernames.remove(username.as_bytes())?;
            return Err(err.into());
        }

        Ok(user)
    }

    /// Checks the credentials and starts a new session, replacing any
    /// previous one. Returns the new session token.
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let user = self
            .find_by_username(username)?
            .ok_or(Error::InvalidCredentials)?;
        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(Error::InvalidCredentials);
        }

        // Index the token before it becomes visible on the user, otherwise a
        // concurrent login can replace it before its entry exists.
        let token = session::generate();
        self.sessions.insert(token.as_bytes(), user.id.as_bytes().to_vec())?;

        let mut previous = None;
        let swapped = modify(&self.users, &user.id, |user: &mut User| {
            previous = user.session_token.replace(token.clone());
        });
        if let Err(err) = swapped {
            self.sessions.remove(token.as_bytes())?;
            return Err(err);
        }

        if let Some(previous) = previous {
            self.sessions.remove(previous.as_bytes())?;
        }

        Ok(token)
    }

    /// The user whose current session token is exactly `token`, if any.
    pub fn resolve(&self, token: &str) -> Result<Option<User>> {
        if token.is_empty() {
            return Ok(None);
        }
        let Some(id) = self.sessions.get(token.as_bytes())? else {
            return Ok(None);
        };
        let Ok(id) = Uuid::from_slice(&id) else {
            return Ok(None);
        };

        let user: Option<User> = get(&self.users, &id)?;
        Ok(user.filter(|user| user.session_token.as_deref() == Some(token)))
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let Some(id) = self.usernames.get(username.as_bytes())? else {
            return Ok(None);
        };
        match Uuid::from_slice(&id) {
            Ok(id) => get(&self.users, &id),
            Err(_) => Ok(None),
        }
    }
}
