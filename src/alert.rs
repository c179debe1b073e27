//! Alert partials for displaying success and error messages to users.
//!
//! Alerts are swapped into the base template's `#alert-container` by HTMX
//! (`hx-target-error`), leaving the rest of the page untouched. Every alert
//! is dismissible.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A dismissible alert message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation succeeded, with extra detail text.
    Success {
        /// Short summary of what succeeded.
        message: String,
        /// Supporting detail shown under the summary.
        details: String,
    },
    /// An operation succeeded.
    SuccessSimple {
        /// Short summary of what succeeded.
        message: String,
    },
    /// An operation failed, with extra detail text.
    Error {
        /// Short summary of what went wrong.
        message: String,
        /// Supporting detail shown under the summary.
        details: String,
    },
}

impl Alert {
    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Alert::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a success alert with details.
    pub fn success(message: &str, details: &str) -> Self {
        Alert::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert and attach a non-200 status code so that HTMX routes
    /// it to the error target.
    pub fn with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_markup()).into_response()
    }

    fn into_markup(self) -> Markup {
        let (message, details, container_style, text_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "p-4 mb-4 rounded-lg bg-green-50 dark:bg-gray-800",
                "text-green-800 dark:text-green-400",
            ),
            Alert::SuccessSimple { message } => (
                message,
                String::new(),
                "p-4 mb-4 rounded-lg bg-green-50 dark:bg-gray-800",
                "text-green-800 dark:text-green-400",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "p-4 mb-4 rounded-lg bg-red-50 dark:bg-gray-800",
                "text-red-800 dark:text-red-400",
            ),
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/#dismissing
        html! {
            div class=(container_style) role="alert"
            {
                div class="flex items-center justify-between"
                {
                    p class={ "font-semibold " (text_style) } { (message) }

                    button
                        type="button"
                        aria-label="Close"
                        onclick="this.closest('[role=alert]').remove()"
                        class={
                            "ms-2 rounded-lg p-1.5 inline-flex items-center "
                            "justify-center h-8 w-8 hover:bg-gray-200 "
                            "dark:hover:bg-gray-700 " (text_style)
                        }
                    {
                        "✕"
                    }
                }

                @if !details.is_empty() {
                    p class={ "text-sm " (text_style) } { (details) }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_markup().into_response()
    }
}
