//! Markup shared between pages: the base document, form controls, and error
//! pages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, html};

use crate::endpoints;

/// The base HTML document that every page is rendered into.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Members Only" }
                link href="/static/main.css" rel="stylesheet";
            }

            body
            {
                (content)
            }
        }
    }
}

/// The centered card used by the log-in and register pages.
///
/// `flash` is an optional error message rendered above the form, e.g. when
/// registration is rejected because the email is taken.
pub fn form_card(form_title: &str, flash: Option<&str>, form: &Markup) -> Markup {
    html! {
        div class="form-card-container"
        {
            a href=(endpoints::ROOT) class="brand" { "Members Only" }

            div class="form-card"
            {
                h1 { (form_title) }

                @if let Some(flash) = flash
                {
                    p class="flash-error" { (flash) }
                }

                (form)
            }
        }
    }
}

pub fn name_input(name: &str) -> Markup {
    html! {
        div
        {
            label for="name" class="form-label" { "Name" }

            input
                type="text"
                name="name"
                id="name"
                placeholder="Jane Doe"
                class="text-input"
                required
                value=(name);
        }
    }
}

pub fn email_input(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="email" class="form-label" { "Email" }

            input
                type="email"
                name="email"
                id="email"
                placeholder="name@example.com"
                class="text-input"
                required
                value=(email);

            @if let Some(error_message) = error_message
            {
                p class="form-error" { (error_message) }
            }
        }
    }
}

pub fn password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="password" class="form-label" { "Password" }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                class="text-input"
                required;

            @if let Some(error_message) = error_message
            {
                p class="form-error" { (error_message) }
            }
        }
    }
}

pub fn submit_button(label: &str) -> Markup {
    html! {
        button type="submit" class="btn-primary" { (label) }
    }
}

/// A link styled for use inside a paragraph.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class="link" { (text) }
    )
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="error-page"
        {
            h1 { (header) }

            p class="error-description" { (description) }

            p { (fix) }

            a href=(endpoints::ROOT) class="btn-primary" { "Back to Homepage" }
        }
    );

    base(title, &content)
}

/// The generic 500 response. Details stay in the server logs; the client only
/// sees boilerplate.
pub(crate) fn render_internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_view(
            "Error",
            "500",
            "Sorry, something went wrong.",
            "Try again later or check the server logs.",
        ),
    )
        .into_response()
}
