//! The dashboard page: record forms on top, the analysis section below.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    analysis::{AnalysisView, RecordsState, render_analysis},
    auth::Session,
    backend::Category,
    dashboard::forms::{expense_form, income_form},
    endpoints,
    html::{ECHARTS_SCRIPT, HeadElement, PAGE_CONTAINER_STYLE, dollar_input_styles, themed_base},
    navigation::NavBar,
    settings::get_theme,
    theme::Theme,
};

/// Display the dashboard for the period and details toggle in the query string.
pub async fn get_dashboard_page(
    State(state): State<RecordsState>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
    Query(view): Query<AnalysisView>,
) -> Result<Response, Error> {
    let theme = get_theme(&jar);

    let (categories, analysis) = tokio::join!(
        state.backend.list_categories(),
        render_analysis(&state, &session, view, theme)
    );

    // The forms are still usable for income without categories.
    let categories = categories.unwrap_or_else(|error| {
        tracing::warn!("Could not load expense categories: {error}");
        Vec::new()
    });

    Ok(dashboard_view(&session.user_name, &categories, &analysis?, theme).into_response())
}

fn dashboard_view(user_name: &str, categories: &[Category], analysis: &Markup, theme: Theme) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 id="welcome" class="mb-6 text-2xl font-bold" { "Welcome, " (user_name) }

            div class="flex flex-wrap justify-center gap-6 w-full max-w-5xl mb-8"
            {
                (expense_form(categories))
                (income_form())
            }

            div class="w-full max-w-5xl"
            {
                (analysis)
            }
        }
    };

    themed_base(
        "Dashboard",
        theme,
        &[
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            dollar_input_styles(),
        ],
        &content,
    )
}
