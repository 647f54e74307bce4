//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    analysis::get_analysis_fragment,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::{create_expense_endpoint, create_income_endpoint, get_dashboard_page},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    settings::{get_settings_page, post_theme},
    user::{get_register_page, post_register, put_profile},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::REGISTER_API, post(post_register))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by HTMX and need the HX-REDIRECT header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::ANALYSIS_API, get(get_analysis_fragment))
            .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
            .route(endpoints::INCOME_API, post(create_income_endpoint))
            .route(endpoints::THEME_API, post(post_theme))
            .route(endpoints::PROFILE_API, put(put_profile))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        AppState, endpoints,
        record::NormalizationMode,
        test_utils::{FAKE_PASSWORD, FakeBackend},
    };

    use super::build_router;

    fn get_test_server(backend: FakeBackend) -> TestServer {
        let state = AppState::new(
            "router test secret",
            "Etc/UTC",
            NormalizationMode::Lenient,
            Arc::new(backend),
        )
        .unwrap();

        let mut server = TestServer::try_new(build_router(state)).expect("Could not create test server.");
        server.save_cookies();
        server
    }

    async fn log_in(server: &TestServer) {
        server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "ana@example.com"), ("password", FAKE_PASSWORD)])
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn dashboard_requires_log_in() {
        let server = get_test_server(FakeBackend::new());

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        assert!(
            response
                .header("location")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn analysis_api_uses_hx_redirect_without_session() {
        let server = get_test_server(FakeBackend::new());

        let response = server.get(endpoints::ANALYSIS_API).await;

        response.assert_status_ok();
        assert!(
            response
                .header("hx-redirect")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn logged_in_user_sees_dashboard_and_analysis() {
        let today = OffsetDateTime::now_utc().date().to_string();
        let backend = FakeBackend::new()
            .with_income(vec![json!({"cantidadIngreso": "10", "fechaIngreso": today})]);
        let server = get_test_server(backend);
        log_in(&server).await;

        server.get(endpoints::DASHBOARD_VIEW).await.assert_status_ok();

        let response = server
            .get(endpoints::ANALYSIS_API)
            .add_query_param("period", "monthly")
            .add_query_param("details", "true")
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("$10.00"));
    }

    #[tokio::test]
    async fn invalid_period_is_rejected() {
        let server = get_test_server(FakeBackend::new());
        log_in(&server).await;

        server
            .get(endpoints::ANALYSIS_API)
            .add_query_param("period", "yearly")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn log_out_ends_the_session() {
        let server = get_test_server(FakeBackend::new());
        log_in(&server).await;

        server.get(endpoints::LOG_OUT).await.assert_status_see_other();

        server
            .get(endpoints::SETTINGS_VIEW)
            .await
            .assert_status_see_other();
    }

    const NEW_USER: [(&str, &str); 7] = [
        ("first_name", "Luis"),
        ("last_name", "Pérez"),
        ("email", "luis@example.com"),
        ("phone", "5587654321"),
        ("country", "Chile"),
        ("birth_date", "1985-11-20"),
        ("password", "Secreta123"),
    ];

    #[tokio::test]
    async fn visitor_can_register_without_session() {
        let server = get_test_server(FakeBackend::new());

        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();

        let response = server.post(endpoints::REGISTER_API).form(&NEW_USER).await;
        response.assert_status_see_other();
        assert_eq!(
            response.header("hx-redirect").to_str().unwrap(),
            endpoints::LOG_IN_VIEW
        );
    }

    #[tokio::test]
    async fn changed_details_show_on_settings_page() {
        let server = get_test_server(FakeBackend::new());
        log_in(&server).await;

        let mut details = NEW_USER;
        details[0] = ("first_name", "Anita");
        details[6] = ("password", "");
        server
            .put(endpoints::PROFILE_API)
            .form(&details)
            .await
            .assert_status_ok();

        let page = server.get(endpoints::SETTINGS_VIEW).await;
        page.assert_status_ok();
        let text = page.text();
        assert!(text.contains("Signed in as Anita"));
        assert!(text.contains("luis@example.com"));
    }

    #[tokio::test]
    async fn profile_api_requires_log_in() {
        let server = get_test_server(FakeBackend::new());

        let response = server.put(endpoints::PROFILE_API).form(&NEW_USER).await;

        assert!(
            response
                .header("hx-redirect")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server(FakeBackend::new());

        server
            .get("/does/not/exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
