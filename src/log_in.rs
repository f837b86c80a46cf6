//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth_cookie module handles the lower level cookie logic.

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
    AppState, Error,
    auth_cookie::set_auth_cookie,
    endpoints,
    html::{base, email_input, form_card, link, password_input, submit_button},
    user_store::UserStore,
};

/// The error message shown when the email or password is wrong.
///
/// The same message is used for an unknown email and a wrong password so the
/// response does not reveal which emails are registered.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid username or password. Please try again!";

/// Renders the full log-in page.
///
/// `flash` is rendered above the form. The register route reuses this page to
/// tell users with an existing account to log in instead.
pub(crate) fn log_in_page(email: &str, flash: Option<&str>) -> Markup {
    let form = html! {
        form method="post" action=(endpoints::LOG_IN) class="form-stack"
        {
            (email_input(email, None))
            (password_input(None))
            (submit_button("Let Me In!"))

            p class="form-footnote"
            {
                "Don't have an account? "
                (link(endpoints::REGISTER, "Register here"))
            }
        }
    };

    base("Login", &form_card("Login", flash, &form))
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    log_in_page("", None).into_response()
}

/// The raw data entered by the user in the log-in form.
///
/// The email and password are stored as plain strings. There is no need for validation here since
/// they will be compared against the email and password in the database, which have been verified.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is redirected to the
/// gated page. Otherwise, the form is returned with an error message explaining the problem.
///
/// An email that does not belong to a registered user takes the same path as a
/// wrong password: the store's not-found result is folded into the generic
/// invalid-credentials response rather than surfacing separately.
pub async fn post_log_in<U>(
    State(state): State<AppState<U>>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response
where
    U: UserStore + Clone + Send + Sync,
{
    // The login key is stored as a validated email, so an address that does
    // not parse cannot belong to any user.
    let user = EmailAddress::from_str(&user_data.email)
        .map_err(|_| Error::InvalidCredentials)
        .and_then(|email| state.user_store.get_by_email(&email));

    let user = match user {
        Ok(user) => user,
        Err(Error::NotFound) | Err(Error::InvalidCredentials) => {
            return log_in_page(&user_data.email, Some(INVALID_CREDENTIALS_ERROR_MSG))
                .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while looking up user at log-in: {error}");
            return error.into_response();
        }
    };

    if !user.password_hash.verify(&user_data.password) {
        return log_in_page(&user_data.email, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response();
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration);

    (jar, Redirect::to(endpoints::SECRETS)).into_response()
}


#[cfg(test)]
mod log_in_tests {
    use std::{
        path::PathBuf,
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        AppState, PasswordHash, SQLiteUserStore, UserStore,
        auth_cookie::COOKIE_USER_ID,
        db::initialize,
        endpoints,
    };

    use super::{INVALID_CREDENTIALS_ERROR_MSG, LogInData, get_log_in_page, post_log_in};

    const TEST_EMAIL: &str = "test@test.com";
    const TEST_PASSWORD: &str = "averysafeandsecurepassword";

    fn get_test_server(with_test_user: bool) -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        let mut user_store = SQLiteUserStore::new(Arc::new(Mutex::new(connection)));

        if with_test_user {
            user_store
                .create(
                    EmailAddress::from_str(TEST_EMAIL).unwrap(),
                    PasswordHash::new(TEST_PASSWORD, 4).unwrap(),
                    "Test User".to_owned(),
                )
                .expect("Could not create test user");
        }

        let state = AppState::new(Some("foobar"), user_store, PathBuf::from("assets"));

        let app = Router::new()
            .route(
                endpoints::LOG_IN,
                get(get_log_in_page).post(post_log_in::<SQLiteUserStore>),
            )
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN)
            .form(&LogInData {
                email: TEST_EMAIL.to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::SECRETS);
        assert!(
            response.maybe_cookie(COOKIE_USER_ID).is_some(),
            "want an auth cookie on successful log-in"
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let server = get_test_server(false);

        server
            .post(endpoints::LOG_IN)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN)
            .form(&LogInData {
                email: TEST_EMAIL.to_string(),
                password: "wrongpassword".to_string(),
            })
            .await;

        response.assert_status_ok();
        response.assert_text_contains(INVALID_CREDENTIALS_ERROR_MSG);
        assert!(
            response.maybe_cookie(COOKIE_USER_ID).is_none(),
            "must not set an auth cookie on failed log-in"
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN)
            .form(&LogInData {
                email: "wrong@email.com".to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await;

        // Identical outcome to a wrong password: same status, same message,
        // no cookie.
        response.assert_status_ok();
        response.assert_text_contains(INVALID_CREDENTIALS_ERROR_MSG);
        assert!(
            response.maybe_cookie(COOKIE_USER_ID).is_none(),
            "must not set an auth cookie for an unknown email"
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_malformed_email() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN)
            .form(&LogInData {
                email: "not-an-email".to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await;

        response.assert_status_ok();
        response.assert_text_contains(INVALID_CREDENTIALS_ERROR_MSG);
    }
}
