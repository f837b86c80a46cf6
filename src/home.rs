//! The landing page.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::PrivateCookieJar;
use maud::html;

use crate::{auth_cookie::get_user_id_from_auth_cookie, endpoints, html::base};

/// Display the landing page.
///
/// The page adapts to whether the caller is logged in: visitors see log-in and
/// register links, members see links to the gated content.
pub async fn get_home_page(jar: PrivateCookieJar) -> Response {
    let logged_in = get_user_id_from_auth_cookie(&jar).is_ok();

    let content = html! {
        section class="hero"
        {
            h1 { "Welcome to Members Only" }

            p { "A private club for people who appreciate a good cheat sheet." }

            @if logged_in
            {
                div class="hero-actions"
                {
                    a href=(endpoints::SECRETS) class="btn-primary" { "Go to Secrets" }
                    a href=(endpoints::LOG_OUT) class="btn-secondary" { "Log Out" }
                }
            }
            @else
            {
                div class="hero-actions"
                {
                    a href=(endpoints::LOG_IN) class="btn-primary" { "Login" }
                    a href=(endpoints::REGISTER) class="btn-secondary" { "Register" }
                }
            }
        }
    };

    base("Home", &content).into_response()
}
