//! The members-only page. Only reachable through the auth middleware.

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{User, endpoints, html::base};

/// Display the gated page, greeting the logged-in user by name.
///
/// The auth middleware guarantees `user` is present; an unauthenticated
/// request is redirected before this handler runs.
pub async fn get_secrets_page(Extension(user): Extension<User>) -> Response {
    let content = html! {
        section class="secrets"
        {
            h1 { "Welcome, " (user.name) }

            p { "You are now part of a very exclusive club." }

            p
            {
                a href=(endpoints::DOWNLOAD) class="btn-primary" download { "Download Your File" }
            }

            p
            {
                a href=(endpoints::LOG_OUT) class="link" { "Log Out" }
            }
        }
    };

    base("Secrets", &content).into_response()
}
