//! The registration page for creating a new user account.

use std::str::FromStr;

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use email_address::EmailAddress;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    auth_cookie::set_auth_cookie,
    endpoints,
    html::{base, email_input, form_card, link, name_input, password_input, submit_button},
    log_in::log_in_page,
    user_store::UserStore,
};

/// The message shown above the log-in form when registration is attempted
/// with an email that is already taken.
pub const DUPLICATE_EMAIL_ERROR_MSG: &str = "Email already exists! Login instead.";

fn register_page(name: &str, email: &str, email_error: Option<&str>) -> Markup {
    let form = html! {
        form method="post" action=(endpoints::REGISTER) class="form-stack"
        {
            (name_input(name))
            (email_input(email, email_error))
            (password_input(None))
            (submit_button("Sign Me Up!"))

            p class="form-footnote"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN, "Log in here"))
            }
        }
    };

    base("Register", &form_card("Register", None, &form))
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    register_page("", "", None).into_response()
}

/// The raw data entered by the user in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    /// The display name for the new account.
    pub name: String,
    /// The email for the new account. Must not belong to an existing user.
    pub email: String,
    /// The plaintext password. Only its hash is stored.
    pub password: String,
}

/// Handler for registration requests via the POST method.
///
/// On success the new user is logged in immediately and redirected to the
/// gated page. If the email is already registered, the log-in form is
/// rendered with a message telling the user to log in instead.
///
/// The duplicate check is the database's `UNIQUE` constraint on the email
/// column. Racing registrations for the same email therefore cannot both
/// succeed; the loser sees the same message as any duplicate.
pub async fn post_register<U>(
    State(mut state): State<AppState<U>>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response
where
    U: UserStore + Clone + Send + Sync,
{
    let email = match EmailAddress::from_str(&user_data.email) {
        Ok(email) => email,
        // Due to the client-side validation, the below error will not happen very often, but it
        // still pays to check.
        Err(e) => {
            return register_page(
                &user_data.name,
                &user_data.email,
                Some(&format!("Invalid email address: {e}")),
            )
            .into_response();
        }
    };

    let password_hash = match PasswordHash::new(&user_data.password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("an error occurred while hashing a password: {e}");
            return e.into_response();
        }
    };

    match state
        .user_store
        .create(email, password_hash, user_data.name.clone())
    {
        Ok(user) => {
            let jar = set_auth_cookie(jar, user.id, state.cookie_duration);

            (jar, Redirect::to(endpoints::SECRETS)).into_response()
        }
        Err(Error::DuplicateEmail) => {
            log_in_page(&user_data.email, Some(DUPLICATE_EMAIL_ERROR_MSG)).into_response()
        }
        Err(e) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {e}");
            e.into_response()
        }
    }
}

#[cfg(test)]
mod get_register_page_tests {
    use axum::http::header::CONTENT_TYPE;

    use crate::endpoints;

    use super::get_register_page;

    #[tokio::test]
    async fn render_register_page() {
        let response = get_register_page().await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        let document = scraper::Html::parse_document(&text);

        let form_selector = scraper::Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());
        let form = forms.first().unwrap();
        assert_eq!(
            form.value().attr("action"),
            Some(endpoints::REGISTER),
            "want form that posts to {}",
            endpoints::REGISTER
        );

        for (input_type, count) in [("text", 1), ("email", 1), ("password", 1)] {
            let selector_string = format!("input[type={input_type}]");
            let input_selector = scraper::Selector::parse(&selector_string).unwrap();
            let inputs = form.select(&input_selector).collect::<Vec<_>>();
            assert_eq!(
                inputs.len(),
                count,
                "want {count} {input_type} input, got {}",
                inputs.len()
            );
        }
    }
}
