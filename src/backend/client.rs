//! The HTTP client for the finance backend's JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::{
    Error,
    backend::{
        FinanceBackend,
        models::{
            Category, Credentials, ExpenseBody, IncomeBody, LogInResponse, LoggedInUser,
            NewExpense, NewIncome, NewUser, Profile, ProfileUpdate, Token, UpdateUserResponse,
            UserBody,
        },
    },
};

/// Where the backend listens when run locally.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_LOG_IN_ERROR: &str = "Could not log in. Check your email and password.";

/// Talks to the finance backend over HTTP.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for the API rooted at `base_url`, e.g. "http://localhost:4000/api".
    ///
    /// # Errors
    /// Returns [Error::InvalidBackendUrl] if `base_url` is not an absolute
    /// HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let trimmed = base_url.trim();
        // Url::join replaces the last path segment unless the base ends with a slash.
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };

        let parsed =
            Url::parse(&with_slash).map_err(|_| Error::InvalidBackendUrl(base_url.to_owned()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidBackendUrl(base_url.to_owned()));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| Error::BackendUnavailable(error.to_string()))?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// The API root, always ending with a slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|_| Error::InvalidBackendUrl(format!("{}{path}", self.base_url)))
    }

    async fn get_records(&self, path: &str, token: &Token) -> Result<Vec<Value>, Error> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {url}");

        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let response = check_status(response)?;

        // The backend sends `null` instead of an empty array for new users.
        let records: Option<Vec<Value>> = response.json().await?;
        Ok(records.unwrap_or_default())
    }

    /// Send `body` as JSON and return the response text.
    ///
    /// An `error` field in the response counts as a rejection even when the
    /// status code says otherwise.
    async fn send_json<T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&Token>,
        body: &T,
    ) -> Result<String, Error>
    where
        T: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(path)?;
        tracing::debug!("{method} {url}");

        let mut request = self.http.request(method, url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await?;

        let status = response.status();
        if is_auth_failure(status) {
            return Err(Error::Unauthorized);
        }

        let text = response.text().await?;
        if let Some(message) = error_message(&text) {
            return Err(Error::BackendRejected(message));
        }

        if !status.is_success() {
            return Err(Error::BackendStatus(status.as_u16()));
        }

        Ok(text)
    }

    async fn post_record<T>(&self, path: &str, token: &Token, body: &T) -> Result<(), Error>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.send_json(Method::POST, path, Some(token), body)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl FinanceBackend for BackendClient {
    async fn log_in(&self, credentials: &Credentials) -> Result<LoggedInUser, Error> {
        let url = self.endpoint("usuarios/login")?;
        tracing::debug!("POST {url}");

        let response = self.http.post(url).json(credentials).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(Error::BackendStatus(status.as_u16()));
        }

        let text = response.text().await?;
        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| DEFAULT_LOG_IN_ERROR.to_owned());
            return Err(Error::InvalidCredentials(message));
        }

        let body: LogInResponse =
            serde_json::from_str(&text).map_err(|error| Error::BackendResponse(error.to_string()))?;

        body.into_logged_in_user()
            .ok_or_else(|| Error::InvalidCredentials(DEFAULT_LOG_IN_ERROR.to_owned()))
    }

    async fn register(&self, user: &NewUser) -> Result<(), Error> {
        self.send_json(Method::POST, "usuarios/registrar", None, &UserBody::from(user))
            .await
            .map(|_| ())
    }

    async fn update_user(&self, token: &Token, update: &ProfileUpdate) -> Result<Profile, Error> {
        let text = self
            .send_json(
                Method::PUT,
                "usuarios/actualizar",
                Some(token),
                &UserBody::from(update),
            )
            .await?;

        // Without a stored user in the response, the sent details are what was stored.
        let stored = serde_json::from_str::<UpdateUserResponse>(&text)
            .ok()
            .and_then(|response| response.usuario)
            .filter(|usuario| usuario.is_object())
            .map(|usuario| Profile::from_backend(&usuario));

        Ok(stored.unwrap_or_else(|| update.profile.clone()))
    }

    async fn list_expenses(&self, token: &Token) -> Result<Vec<Value>, Error> {
        self.get_records("gastos", token).await
    }

    async fn list_income(&self, token: &Token) -> Result<Vec<Value>, Error> {
        self.get_records("ingresos", token).await
    }

    async fn create_expense(&self, token: &Token, expense: &NewExpense) -> Result<(), Error> {
        self.post_record("gastos", token, &ExpenseBody::from(expense))
            .await
    }

    async fn create_income(&self, token: &Token, income: &NewIncome) -> Result<(), Error> {
        self.post_record("ingresos", token, &IncomeBody::from(income))
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        let url = self.endpoint("categorias")?;
        tracing::debug!("GET {url}");

        let response = check_status(self.http.get(url).send().await?)?;
        let categories: Option<Vec<Category>> = response.json().await?;

        Ok(categories.unwrap_or_default())
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();

    if is_auth_failure(status) {
        Err(Error::Unauthorized)
    } else if !status.is_success() {
        Err(Error::BackendStatus(status.as_u16()))
    } else {
        Ok(response)
    }
}

/// The `error` field of a JSON response body, if there is one.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode, header::AUTHORIZATION},
        response::{IntoResponse, Response},
        routing::{get, post, put},
    };
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use time::macros::date;
    use tokio::net::TcpListener;

    use crate::{
        Error,
        backend::{
            Credentials, FinanceBackend, NewExpense, NewIncome, NewUser, Profile, ProfileUpdate,
            Token,
        },
    };

    use super::{BackendClient, error_message};

    const GOOD_TOKEN: &str = "good-token";

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn spawn_backend(router: Router) -> BackendClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        BackendClient::new(&format!("http://{address}/api")).unwrap()
    }

    fn is_authorized(headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some(format!("Bearer {GOOD_TOKEN}").as_str())
    }

    async fn list_expenses(headers: HeaderMap) -> Response {
        if !is_authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        Json(json!([
            {"cantidadGasto": "12.50", "fechaGasto": "2024-03-01", "descripcionGasto": "Lunch"}
        ]))
        .into_response()
    }

    async fn record_body(State(received): State<Received>, Json(body): Json<Value>) -> Response {
        received.lock().unwrap().push(body);
        Json(json!({"mensaje": "ok"})).into_response()
    }

    fn fake_backend(received: Received) -> Router {
        Router::new()
            .route("/api/gastos", get(list_expenses).post(record_body))
            .route("/api/ingresos", get(|| async { Json(Value::Null) }))
            .route(
                "/api/categorias",
                get(|| async { Json(json!([{"id": 1, "nombre": "Food"}])) }),
            )
            .route(
                "/api/usuarios/login",
                post(|Json(body): Json<Value>| async move {
                    if body["contrasena"] == "correct" {
                        Json(json!({"usuario": {"nombreUsuario": "Ana"}, "token": GOOD_TOKEN}))
                            .into_response()
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"error": "Contraseña incorrecta"})),
                        )
                            .into_response()
                    }
                }),
            )
            .with_state(received)
    }

    #[test]
    fn joins_paths_under_base_path() {
        for base in ["http://localhost:4000/api", "http://localhost:4000/api/"] {
            let client = BackendClient::new(base).unwrap();

            assert_eq!(
                client.endpoint("gastos").unwrap().as_str(),
                "http://localhost:4000/api/gastos"
            );
        }
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert_eq!(
            BackendClient::new("not a url").unwrap_err(),
            Error::InvalidBackendUrl("not a url".to_owned())
        );
        assert_eq!(
            BackendClient::new("ftp://localhost/api").unwrap_err(),
            Error::InvalidBackendUrl("ftp://localhost/api".to_owned())
        );
    }

    #[test]
    fn reads_error_field() {
        assert_eq!(
            error_message(r#"{"error": "bad amount"}"#),
            Some("bad amount".to_owned())
        );
        assert_eq!(error_message(r#"{"error": null}"#), None);
        assert_eq!(error_message(r#"{"ok": true}"#), None);
        assert_eq!(error_message("not json"), None);
    }

    #[tokio::test]
    async fn lists_expenses_with_bearer_token() {
        let client = spawn_backend(fake_backend(Received::default())).await;

        let expenses = client.list_expenses(&Token::new(GOOD_TOKEN)).await.unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0]["descripcionGasto"], "Lunch");
    }

    #[tokio::test]
    async fn rejected_token_is_unauthorized() {
        let client = spawn_backend(fake_backend(Received::default())).await;

        let result = client.list_expenses(&Token::new("expired")).await;

        assert_eq!(result, Err(Error::Unauthorized));
    }

    #[tokio::test]
    async fn null_list_is_empty() {
        let client = spawn_backend(fake_backend(Received::default())).await;

        let income = client.list_income(&Token::new(GOOD_TOKEN)).await.unwrap();

        assert!(income.is_empty());
    }

    #[tokio::test]
    async fn lists_categories() {
        let client = spawn_backend(fake_backend(Received::default())).await;

        let categories = client.list_categories().await.unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, 1);
        assert_eq!(categories[0].name, "Food");
    }

    #[tokio::test]
    async fn log_in_returns_token_and_name() {
        let client = spawn_backend(fake_backend(Received::default())).await;

        let user = client
            .log_in(&Credentials {
                email: "ana@example.com".to_owned(),
                password: "correct".to_owned(),
            })
            .await
            .unwrap();

        assert_eq!(user.token, Token::new(GOOD_TOKEN));
        assert_eq!(user.user_name(), Some("Ana"));
    }

    #[tokio::test]
    async fn log_in_failure_uses_backend_message() {
        let client = spawn_backend(fake_backend(Received::default())).await;

        let result = client
            .log_in(&Credentials {
                email: "ana@example.com".to_owned(),
                password: "wrong".to_owned(),
            })
            .await;

        assert_eq!(
            result,
            Err(Error::InvalidCredentials("Contraseña incorrecta".to_owned()))
        );
    }

    #[tokio::test]
    async fn create_expense_posts_backend_fields() {
        let received = Received::default();
        let client = spawn_backend(fake_backend(received.clone())).await;
        let expense = NewExpense {
            description: "Bus fare".to_owned(),
            amount: "2.50".parse().unwrap(),
            category: 1,
        };

        client
            .create_expense(&Token::new(GOOD_TOKEN), &expense)
            .await
            .unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["nombreGasto"], "Bus fare");
        assert_eq!(received[0]["cantidadGasto"], "2.50");
        assert_eq!(received[0]["idCategoria"], 1);
    }

    #[tokio::test]
    async fn create_error_body_is_rejection() {
        let router = Router::new().route(
            "/api/ingresos",
            post(|| async { Json(json!({"error": "Origen requerido"})) }),
        );
        let client = spawn_backend(router).await;
        let income = NewIncome {
            amount: Decimal::from(10),
            origin: "Gift".to_owned(),
        };

        let result = client.create_income(&Token::new(GOOD_TOKEN), &income).await;

        assert_eq!(
            result,
            Err(Error::BackendRejected("Origen requerido".to_owned()))
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let client = BackendClient::new(&format!("http://{address}/api")).unwrap();

        let result = client.list_categories().await;

        assert!(
            matches!(result, Err(Error::BackendUnavailable(_))),
            "want BackendUnavailable, got {result:?}"
        );
    }

    fn profile() -> Profile {
        Profile {
            first_name: "Ana".to_owned(),
            last_name: "García".to_owned(),
            email: "ana@example.com".to_owned(),
            phone: "5512345678".to_owned(),
            country: "México".to_owned(),
            birth_date: Some(date!(1990 - 04 - 02)),
        }
    }

    #[tokio::test]
    async fn register_posts_user_without_token() {
        let received = Received::default();
        let router = Router::new()
            .route(
                "/api/usuarios/registrar",
                post(
                    |State(received): State<Received>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        assert!(headers.get(AUTHORIZATION).is_none());
                        received.lock().unwrap().push(body);
                        (StatusCode::CREATED, Json(json!({"mensaje": "Usuario registrado"})))
                    },
                ),
            )
            .with_state(received.clone());
        let client = spawn_backend(router).await;

        client
            .register(&NewUser {
                profile: profile(),
                password: "Secreta123".to_owned(),
            })
            .await
            .unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["correoElectronico"], "ana@example.com");
        assert_eq!(received[0]["fechaNacimiento"], "1990-04-02");
        assert_eq!(received[0]["contrasena"], "Secreta123");
    }

    #[tokio::test]
    async fn register_error_body_is_rejection() {
        let router = Router::new().route(
            "/api/usuarios/registrar",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "El correo ya está registrado"})),
                )
            }),
        );
        let client = spawn_backend(router).await;

        let result = client
            .register(&NewUser {
                profile: profile(),
                password: "Secreta123".to_owned(),
            })
            .await;

        assert_eq!(
            result,
            Err(Error::BackendRejected("El correo ya está registrado".to_owned()))
        );
    }

    #[tokio::test]
    async fn update_user_puts_with_bearer_token() {
        let router = Router::new().route(
            "/api/usuarios/actualizar",
            put(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if !is_authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }

                assert!(body.get("contrasena").is_none());
                let mut stored = body;
                stored["pais"] = json!("Chile");
                Json(json!({"usuario": stored})).into_response()
            }),
        );
        let client = spawn_backend(router).await;
        let update = ProfileUpdate {
            profile: profile(),
            new_password: None,
        };

        let stored = client
            .update_user(&Token::new(GOOD_TOKEN), &update)
            .await
            .unwrap();
        assert_eq!(stored.country, "Chile");
        assert_eq!(stored.email, "ana@example.com");

        let result = client.update_user(&Token::new("expired"), &update).await;
        assert_eq!(result, Err(Error::Unauthorized));
    }

    #[tokio::test]
    async fn update_user_without_stored_user_returns_sent_profile() {
        let router = Router::new().route(
            "/api/usuarios/actualizar",
            put(|| async { Json(json!({"mensaje": "ok"})) }),
        );
        let client = spawn_backend(router).await;
        let update = ProfileUpdate {
            profile: profile(),
            new_password: Some("Nueva1234".to_owned()),
        };

        let stored = client
            .update_user(&Token::new(GOOD_TOKEN), &update)
            .await
            .unwrap();

        assert_eq!(stored, profile());
    }
}
