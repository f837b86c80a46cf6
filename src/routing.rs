//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth_middleware::{AuthState, auth_guard},
    download::get_download,
    endpoints,
    home::get_home_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    register::{get_register_page, post_register},
    secrets::get_secrets_page,
    user_store::UserStore,
};

/// Return a router with all the app's routes.
pub fn build_router<U>(state: AppState<U>) -> Router
where
    U: UserStore + Clone + Send + Sync + 'static,
{
    let auth_state = AuthState::from_ref(&state);

    let protected_routes = Router::new()
        .route(endpoints::SECRETS, get(get_secrets_page))
        .route(endpoints::DOWNLOAD, get(get_download))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_guard::<U>));

    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(post_register::<U>),
        )
        .route(
            endpoints::LOG_IN,
            get(get_log_in_page).post(post_log_in::<U>),
        )
        .route(endpoints::LOG_OUT, get(get_log_out));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
