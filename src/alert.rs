//! Alert messages for failed form submissions and HTMX requests.
//!
//! Alerts are returned as HTML fragments and swapped into the page's alert
//! container by HTMX.

use maud::{Markup, html};

/// An alert message with a short summary and optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let Alert::Error { message, details } = self;
        let container_style = "text-red-800 border-red-300 bg-red-50 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html!(
            div
                id="alert"
                role="alert"
                class={ "flex items-start gap-3 p-4 mb-4 text-sm border rounded-lg shadow " (container_style) }
            {
                span class="font-bold" aria-hidden="true" { "!" }

                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto font-bold"
                    aria-label="Dismiss"
                    data-dismiss-alert
                {
                    "×"
                }
            }
        )
    }
}
