//! The endpoint URIs for the application's routes.

/// The landing page, which tells visitors whether they are logged in.
pub const ROOT: &str = "/";
/// The page for creating a new account. GET renders the form, POST submits it.
pub const REGISTER: &str = "/register";
/// The page for logging in. GET renders the form, POST submits it.
pub const LOG_IN: &str = "/login";
/// The route that logs out the current user and clears their session cookie.
pub const LOG_OUT: &str = "/logout";
/// The members-only page. Requires a valid session.
pub const SECRETS: &str = "/secrets";
/// The members-only file download. Requires a valid session.
pub const DOWNLOAD: &str = "/download";
/// The route for static files (stylesheets).
pub const STATIC: &str = "/static";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::REGISTER);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::SECRETS);
        assert_endpoint_is_valid_uri(endpoints::DOWNLOAD);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }
}
