use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use url::Url;

use jobdeck_core::error::AppError;
use jobdeck_core::listing::{Listing, ListingDraft, ModerationStatus, UserAccount, UserStatus};
use jobdeck_core::query::QueryParams;
use jobdeck_core::traits::ListingSource;

use crate::session::Session;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the job-board REST API.
///
/// The board is a black box: this client serializes queries and payloads,
/// maps transport and status failures into [`AppError`], and hands
/// records back untouched. All requests share one bounded timeout so a
/// dead board surfaces as [`AppError::Timeout`] instead of a hang.
///
/// Authenticated endpoints take an explicit [`Session`] — nothing here
/// reads tokens from ambient state.
#[derive(Clone)]
pub struct BoardClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl BoardClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid API base URL: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::ConfigError(format!(
                    "API base URL scheme '{scheme}' is not allowed (only http/https)"
                )));
            }
        }

        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(concat!("jobdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_err(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {e}"))
        } else {
            AppError::HttpError(e.to_string())
        }
    }

    /// Reject non-2xx responses, folding the server's error body into an
    /// [`AppError::ApiError`].
    async fn check_status(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();

        Err(AppError::ApiError {
            message: parse_error_message(&body, status_code),
            status_code,
            retryable: status_code == 429 || status_code >= 500,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to parse response body: {e}")))
    }

    // -----------------------------------------------------------------------
    // Public listing search
    // -----------------------------------------------------------------------

    /// `GET /jobs` with the given query parameters.
    pub async fn search_listings(&self, params: &QueryParams) -> Result<Vec<Listing>, AppError> {
        tracing::debug!(query = %params.to_query_string(), "Searching listings");

        let response = self
            .client
            .get(self.url("/jobs"))
            .query(params.as_pairs())
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::read_json(response).await
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// `POST /auth/login`. The returned token's payload carries the role.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        let auth: AuthResponse = Self::read_json(response).await.map_err(as_auth_error)?;
        Session::from_token(auth.token)
    }

    /// `POST /auth/register`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Session, AppError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&RegisterRequest {
                name,
                email,
                password,
                role,
            })
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        let auth: AuthResponse = Self::read_json(response).await.map_err(as_auth_error)?;
        Session::from_token(auth.token)
    }

    // -----------------------------------------------------------------------
    // Employer listings
    // -----------------------------------------------------------------------

    /// `GET /jobs/mine` — the caller's own listings, any status.
    pub async fn my_listings(&self, session: &Session) -> Result<Vec<Listing>, AppError> {
        let response = self
            .client
            .get(self.url("/jobs/mine"))
            .header("Authorization", session.bearer())
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::read_json(response).await
    }

    /// `POST /jobs` — submit a new listing; it enters moderation as PENDING.
    pub async fn create_listing(
        &self,
        session: &Session,
        draft: &ListingDraft,
    ) -> Result<Listing, AppError> {
        let response = self
            .client
            .post(self.url("/jobs"))
            .header("Authorization", session.bearer())
            .json(draft)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::read_json(response).await
    }

    /// `PUT /jobs/{id}`.
    pub async fn update_listing(
        &self,
        session: &Session,
        id: &str,
        draft: &ListingDraft,
    ) -> Result<Listing, AppError> {
        let response = self
            .client
            .put(self.url(&format!("/jobs/{id}")))
            .header("Authorization", session.bearer())
            .json(draft)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::read_json(response).await
    }

    /// `DELETE /jobs/{id}`.
    pub async fn delete_listing(&self, session: &Session, id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url(&format!("/jobs/{id}")))
            .header("Authorization", session.bearer())
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::check_status(response).await.map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Admin: listing moderation
    // -----------------------------------------------------------------------

    /// `GET /jobs?status=PENDING` — the moderation queue.
    pub async fn pending_listings(&self, session: &Session) -> Result<Vec<Listing>, AppError> {
        let mut params = QueryParams::new();
        params.set("status", ModerationStatus::Pending.as_str());

        let response = self
            .client
            .get(self.url("/jobs"))
            .query(params.as_pairs())
            .header("Authorization", session.bearer())
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::read_json(response).await
    }

    /// `PUT /admin/jobs/{id}/approve`. Returns the status the board settled on.
    pub async fn approve_listing(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<ModerationStatus, AppError> {
        self.moderate_listing(session, id, "approve").await
    }

    /// `PUT /admin/jobs/{id}/reject`.
    pub async fn reject_listing(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<ModerationStatus, AppError> {
        self.moderate_listing(session, id, "reject").await
    }

    async fn moderate_listing(
        &self,
        session: &Session,
        id: &str,
        action: &str,
    ) -> Result<ModerationStatus, AppError> {
        let response = self
            .client
            .put(self.url(&format!("/admin/jobs/{id}/{action}")))
            .header("Authorization", session.bearer())
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        let moderated: ModeratedResponse = Self::read_json(response).await?;
        Ok(moderated.status)
    }

    // -----------------------------------------------------------------------
    // Admin: user accounts
    // -----------------------------------------------------------------------

    /// `GET /admin/users`.
    pub async fn list_users(&self, session: &Session) -> Result<Vec<UserAccount>, AppError> {
        let response = self
            .client
            .get(self.url("/admin/users"))
            .header("Authorization", session.bearer())
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::read_json(response).await
    }

    /// `PUT /admin/users/{id}/approve`.
    pub async fn approve_user(&self, session: &Session, id: &str) -> Result<UserStatus, AppError> {
        self.moderate_user(session, id, "approve")
            .await
            .map(|_| UserStatus::Approved)
    }

    /// `PUT /admin/users/{id}/suspend`.
    pub async fn suspend_user(&self, session: &Session, id: &str) -> Result<UserStatus, AppError> {
        self.moderate_user(session, id, "suspend")
            .await
            .map(|_| UserStatus::Suspended)
    }

    async fn moderate_user(
        &self,
        session: &Session,
        id: &str,
        action: &str,
    ) -> Result<(), AppError> {
        let response = self
            .client
            .put(self.url(&format!("/admin/users/{id}/{action}")))
            .header("Authorization", session.bearer())
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::check_status(response).await.map(|_| ())
    }

    /// `DELETE /admin/users/{id}`.
    pub async fn delete_user(&self, session: &Session, id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url(&format!("/admin/users/{id}")))
            .header("Authorization", session.bearer())
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        Self::check_status(response).await.map(|_| ())
    }
}

impl ListingSource for BoardClient {
    async fn search(&self, params: &QueryParams) -> Result<Vec<Listing>, AppError> {
        self.search_listings(params).await
    }
}

// ---- Board API types ----

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Deserialize)]
struct ModeratedResponse {
    status: ModerationStatus,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Pull a human-readable message out of an error body, falling back to
/// the raw text.
fn parse_error_message(body: &str, status_code: u16) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            return message;
        }
    }
    if body.is_empty() {
        format!("HTTP {status_code}")
    } else {
        format!("HTTP {status_code}: {body}")
    }
}

/// Credential rejections on the auth endpoints read better as auth
/// failures than as generic API errors.
fn as_auth_error(err: AppError) -> AppError {
    match err {
        AppError::ApiError {
            message,
            status_code: 401 | 403,
            ..
        } => AppError::AuthError(message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalised() {
        let client = BoardClient::new("http://board.example/api/").unwrap();
        assert_eq!(client.url("/jobs"), "http://board.example/api/jobs");

        let client = BoardClient::new("https://board.example").unwrap();
        assert_eq!(
            client.url("/admin/users"),
            "https://board.example/admin/users"
        );
    }

    #[test]
    fn bad_base_urls_are_config_errors() {
        assert!(matches!(
            BoardClient::new("not a url"),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            BoardClient::new("ftp://board.example"),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn error_message_parsing_prefers_structured_bodies() {
        assert_eq!(
            parse_error_message(r#"{"message": "job not found"}"#, 404),
            "job not found"
        );
        assert_eq!(
            parse_error_message(r#"{"error": "forbidden"}"#, 403),
            "forbidden"
        );
        assert_eq!(parse_error_message("", 502), "HTTP 502");
        assert_eq!(
            parse_error_message("<html>oops</html>", 500),
            "HTTP 500: <html>oops</html>"
        );
    }

    #[test]
    fn credential_rejections_become_auth_errors() {
        let err = as_auth_error(AppError::ApiError {
            message: "bad password".into(),
            status_code: 401,
            retryable: false,
        });
        assert!(matches!(err, AppError::AuthError(m) if m == "bad password"));

        // Server-side failures stay what they are.
        let err = as_auth_error(AppError::ApiError {
            message: "boom".into(),
            status_code: 500,
            retryable: true,
        });
        assert!(matches!(err, AppError::ApiError { status_code: 500, .. }));
    }
}
