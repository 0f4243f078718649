//! Session-bound HTTP client for the fitness backend.
//!
//! Every protected call goes through [`Client::request`], which attaches the
//! bearer token and enforces the expired-session policy:
//!
//! - a 401 from any path ends the session: the user is notified, the three
//!   session keys are cleared, the navigator is sent to the login route, and
//!   the call fails with [`Error::Unauthorized`]
//! - a 401 from a path ending in `/password` is a wrong current password and
//!   is handed back as a normal response, session untouched
//! - every other status is handed back for the caller to inspect
//!
//! There are no retries, no backoff, and no timeouts.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::api::{AdminApi, AuthApi, ExercisesApi, RoutinesApi, UsersApi, WorkoutsApi};
use crate::error::{Error, Result};
use crate::navigator::{LogNavigator, Navigator};
use crate::session::{
    ACCESS_TOKEN_KEY, MemorySessionStore, SessionEvent, SessionState, SessionStore, USER_KEY,
    UserRecord,
};
use crate::types::ErrorBody;

/// Route the navigator is sent to when the server rejects the token.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
/// Route the navigator is sent to on logout.
pub const DEFAULT_ROOT_ROUTE: &str = "/";
/// Notice shown when the server rejects the token.
pub const DEFAULT_EXPIRY_NOTICE: &str = "Your session has expired. Please log in again.";

/// Path suffix whose 401 responses do not end the session.
const PASSWORD_PATH_SUFFIX: &str = "/password";

/// Description of one outbound call.
///
/// Caller headers are merged over the defaults: a caller header with the
/// same name as a default replaces it, everything else is added.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// JSON body, serialized as-is.
    pub body: Option<serde_json::Value>,
    /// Caller headers, merged over the defaults.
    pub headers: HeaderMap,
    /// Query parameters, appended in order.
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    #[must_use]
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add or replace a header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Validation(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Validation(format!("invalid value for header {name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Append query parameters.
    #[must_use]
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// Whether a 401 from `path` is the password-change carve-out.
pub fn is_password_change_path(path: &str) -> bool {
    path.ends_with(PASSWORD_PATH_SUFFIX)
}

/// Build a request path from segments, percent-encoding each one.
///
/// `path_for(&["api", "users", id])` never lets `id` add segments, a query
/// or a fragment. Blank, `.` and `..` segments are rejected.
pub fn path_for(segments: &[&str]) -> Result<String> {
    if let Some(bad) = segments
        .iter()
        .find(|s| s.trim().is_empty() || **s == "." || **s == "..")
    {
        return Err(Error::Validation(format!("invalid path segment {bad:?}")));
    }
    let mut url = Url::parse("http://localhost/")?;
    url.path_segments_mut()
        .map_err(|()| Error::Validation("URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.path().to_string())
}

/// Default headers for an authenticated call, with caller headers merged on
/// top. A missing token omits `Authorization` entirely.
pub fn merge_headers(token: Option<&str>, caller: &HeaderMap) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            Error::Storage(format!("stored access token is not a valid header value: {e}"))
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    headers.extend(caller.clone());
    Ok(headers)
}

/// Routes and wording used by the session policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    /// Where an expired session is sent.
    pub login: String,
    /// Where an explicit logout is sent.
    pub root: String,
    /// Notice shown before the expiry redirect.
    pub expiry_notice: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_ROUTE.to_string(),
            root: DEFAULT_ROOT_ROUTE.to_string(),
            expiry_notice: DEFAULT_EXPIRY_NOTICE.to_string(),
        }
    }
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    http: Option<reqwest::Client>,
    store: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    routes: Routes,
}

impl ClientBuilder {
    /// Use a custom reqwest client.
    #[must_use]
    pub fn http(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Inject the session store. Defaults to a fresh [`MemorySessionStore`].
    #[must_use]
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Inject the navigator. Defaults to [`LogNavigator`].
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    #[must_use]
    pub fn routes(mut self, routes: Routes) -> Self {
        self.routes = routes;
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = Url::parse(&self.base_url)?;
        Ok(Client {
            inner: Arc::new(ClientInner {
                base_url,
                http: self.http.unwrap_or_default(),
                store: self
                    .store
                    .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
                navigator: self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
                routes: self.routes,
            }),
        })
    }
}

/// HTTP client bound to one client-side session.
///
/// Cloning is cheap and shares the store and navigator.
///
/// # Example
///
/// ```rust,no_run
/// use fitness_client::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8080")?;
///
/// client.auth().login("ana@example.com", "secret12").await?;
/// let routines = client.routines().mine().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    base_url: Url,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    routes: Routes,
}

impl Client {
    /// Create a client with an in-memory store and a logging navigator.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Start building a client.
    pub fn builder(base_url: impl AsRef<str>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.as_ref().to_string(),
            http: None,
            store: None,
            navigator: None,
            routes: Routes::default(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The injected session store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    pub fn routes(&self) -> &Routes {
        &self.inner.routes
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access login, registration and token refresh.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Access the exercise catalogue.
    pub fn exercises(&self) -> ExercisesApi<'_> {
        ExercisesApi::new(self)
    }

    /// Access routines.
    pub fn routines(&self) -> RoutinesApi<'_> {
        RoutinesApi::new(self)
    }

    /// Access workouts and workout stats.
    pub fn workouts(&self) -> WorkoutsApi<'_> {
        WorkoutsApi::new(self)
    }

    /// Access user profiles.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Access admin statistics.
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// The stored access token. Format and expiry are not checked locally.
    pub fn token(&self) -> Result<Option<String>> {
        self.inner.store.get(ACCESS_TOKEN_KEY)
    }

    /// The stored user record.
    ///
    /// With no stored user this logs out (clearing the session and
    /// redirecting to the root route) and returns `None`; the caller should
    /// abort whatever it was doing.
    pub fn current_user(&self) -> Result<Option<UserRecord>> {
        match self.inner.store.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => {
                self.logout()?;
                Ok(None)
            }
        }
    }

    /// Current explicit session state.
    pub fn state(&self) -> Result<SessionState> {
        SessionState::load(self.inner.store.as_ref())
    }

    /// Clear the session and redirect to the root route. Safe to call with
    /// no session.
    pub fn logout(&self) -> Result<()> {
        self.transition(SessionEvent::LoggedOut)?;
        info!(name: "session.logout", "Session cleared");
        self.inner.navigator.redirect(&self.inner.routes.root);
        Ok(())
    }

    /// Apply a session event and persist the resulting state.
    ///
    /// Profile and token updates need an active session; against a
    /// logged-out store they fail with [`Error::Unauthorized`] and the store
    /// is left untouched.
    pub(crate) fn transition(&self, event: SessionEvent) -> Result<SessionState> {
        let current = match event {
            SessionEvent::LoggedIn(_) | SessionEvent::LoggedOut | SessionEvent::Expired => {
                SessionState::LoggedOut
            }
            SessionEvent::ProfileUpdated(_) | SessionEvent::TokenRefreshed(_) => {
                let current = self.state()?;
                if !current.is_logged_in() {
                    return Err(Error::Unauthorized);
                }
                current
            }
        };
        let next = current.apply(event);
        next.save(self.inner.store.as_ref())?;
        Ok(next)
    }

    /// Notify, clear, and redirect to the login route.
    pub(crate) fn expire_session(&self) {
        warn!(name: "session.expired", "Server rejected the session token");
        self.inner.navigator.notify(&self.inner.routes.expiry_notice);
        if let Err(e) = self.transition(SessionEvent::Expired) {
            error!(name: "session.clear_failed", error = %e, "Failed to clear expired session");
        }
        self.inner.navigator.redirect(&self.inner.routes.login);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Dispatch an authenticated request.
    ///
    /// Returns the response for every status except an intercepted 401.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Response> {
        let token = self.token()?;
        let headers = merge_headers(token.as_deref(), &options.headers)?;
        let response = self.dispatch(path, options, headers).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if is_password_change_path(path) {
                debug!(name: "api.password_rejected", path, "401 on password change, session kept");
            } else {
                self.expire_session();
                return Err(Error::Unauthorized);
            }
        }
        Ok(response)
    }

    /// Dispatch an unauthenticated request. No bearer token is attached and
    /// a 401 is returned like any other status.
    pub(crate) async fn request_public(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers.clone());
        self.dispatch(path, options, headers).await
    }

    async fn dispatch(
        &self,
        path: &str,
        options: RequestOptions,
        headers: HeaderMap,
    ) -> Result<Response> {
        let url = self.url(path)?;
        debug!(name: "api.request", method = %options.method, %url, "Dispatching request");

        let mut builder = self.inner.http.request(options.method, url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        debug!(name: "api.response", status = response.status().as_u16(), path, "Response received");
        Ok(response)
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Response helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode a successful JSON body, or turn the response into an API error.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        response: Response,
        fallback: &str,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::api_error(response, fallback).await);
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like [`Self::handle_response`] for collections: 204 and a `null` body
    /// are an empty list.
    pub(crate) async fn handle_collection<T: DeserializeOwned>(
        response: Response,
        fallback: &str,
    ) -> Result<Vec<T>> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let items: Option<Vec<T>> = Self::handle_response(response, fallback).await?;
        Ok(items.unwrap_or_default())
    }

    /// Check for success and discard the body.
    pub(crate) async fn handle_empty(response: Response, fallback: &str) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response, fallback).await)
        }
    }

    /// Build an API error from the server's `{ "error": ... }` body.
    pub(crate) async fn api_error(response: Response, fallback: &str) -> Error {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Error::Api { status, message }
    }
}
