//! Implements a struct that holds the state of the server.

use std::path::PathBuf;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{auth_cookie::DEFAULT_COOKIE_DURATION, user_store::UserStore};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The store for creating and fetching [users](crate::User).
    pub user_store: U,

    /// The directory containing the file served by the download route.
    pub assets_dir: PathBuf,
}

impl<U> AppState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// Create a new [AppState].
    ///
    /// `cookie_secret` seeds the cookie signing key. Passing `None` generates
    /// a random key, which invalidates every session when the process
    /// restarts. Pass a stable secret to keep sessions alive across restarts.
    pub fn new(cookie_secret: Option<&str>, user_store: U, assets_dir: PathBuf) -> Self {
        let cookie_key = match cookie_secret {
            Some(secret) => create_cookie_key(secret),
            None => Key::generate(),
        };

        Self {
            cookie_key,
            cookie_duration: DEFAULT_COOKIE_DURATION,
            user_store,
            assets_dir,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl<U> FromRef<AppState<U>> for Key
where
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<U>) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
