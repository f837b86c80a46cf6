//! Authentication middleware that validates the session cookie and loads the
//! current user for protected routes.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState, Error, app_state, auth_cookie::get_user_id_from_auth_cookie, endpoints,
    user_store::UserStore,
};

/// The state needed for the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The store used to load the logged-in user by their ID.
    pub user_store: U,
}

impl<U> AuthState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// Create the cookie key from a string and wrap the user store.
    pub fn new(cookie_secret: &str, user_store: U) -> Self {
        Self {
            cookie_key: app_state::create_cookie_key(cookie_secret),
            user_store,
        }
    }
}

impl<U> FromRef<AppState<U>> for AuthState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<U>) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            user_store: state.user_store.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl<U> FromRef<AuthState<U>> for Key
where
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AuthState<U>) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid authorization cookie and loads the matching user.
/// The user is placed into the request and then the request executed normally if the cookie is
/// valid, otherwise a redirect to the log-in page is returned.
///
/// The redirect is the same whether the cookie is missing, forged, expired, or refers to a user
/// that no longer exists, so the response does not reveal whether the gated resource exists.
///
/// **Note**: Route handlers can use the function argument `Extension(user): Extension<User>` to
/// receive the logged-in user.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting and
/// verifying the cookie contents.
pub async fn auth_guard<U>(
    State(state): State<AuthState<U>>,
    request: Request,
    next: Next,
) -> Response
where
    U: UserStore + Clone + Send + Sync + 'static,
{
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return Redirect::to(endpoints::LOG_IN).into_response();
        }
    };

    let user_id = match get_user_id_from_auth_cookie(&jar) {
        Ok(user_id) => user_id,
        Err(_) => return Redirect::to(endpoints::LOG_IN).into_response(),
    };

    // A valid cookie can outlive its user, e.g. after the database file is
    // replaced. Treat that the same as an anonymous request.
    let user = match state.user_store.get(user_id) {
        Ok(user) => user,
        Err(Error::NotFound) => return Redirect::to(endpoints::LOG_IN).into_response(),
        Err(error) => {
            tracing::error!("Error loading the logged-in user: {error}");
            return error.into_response();
        }
    };

    parts.extensions.insert(user);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
