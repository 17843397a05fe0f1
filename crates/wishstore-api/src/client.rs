// wishstore HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, bearer-token injection,
// the response interceptor chain and status-to-error mapping. Typed CRUD per
// entity lives in `resource`; this module only knows about transport.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Account, Credentials, LoginRequest, TokenResponse};
use crate::error::Error;
use crate::interceptor::ResponseInterceptor;
use crate::transport::TransportConfig;

/// Raw HTTP client for a wishstore server.
///
/// All endpoint paths are relative to `{base_url}/api/`. Once a token is
/// set, every request carries `Authorization: Bearer <token>`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    app_name: String,
    token: RwLock<Option<SecretString>>,
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `app_name` selects the `X-{app}-alert` / `X-{app}-error` header family.
    pub fn new(base_url: &str, app_name: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, app_name, http)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, app_name: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        // `Url::join` drops the last path segment unless it ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            app_name: app_name.to_owned(),
            token: RwLock::new(None),
            interceptors: Vec::new(),
        })
    }

    /// Append a response interceptor. Interceptors run in insertion order.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Name of the header carrying success alert keys.
    pub fn alert_header(&self) -> String {
        format!("X-{}-alert", self.app_name)
    }

    /// Name of the header carrying the single alert parameter.
    pub fn params_header(&self) -> String {
        format!("X-{}-params", self.app_name)
    }

    /// Name of the header carrying server error keys.
    pub fn error_header(&self) -> String {
        format!("X-{}-error", self.app_name)
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Install a bearer token for all subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Exchange a username and password for a JWT and install it.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
        remember_me: bool,
    ) -> Result<(), Error> {
        let url = self.api_url("authenticate")?;
        debug!("POST {url} (login as {username})");

        let body = LoginRequest {
            username,
            password: password.expose_secret(),
            remember_me,
        };
        let resp = self.send(self.http.post(url).json(&body)).await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "bad credentials".into(),
            });
        }
        let resp = self.check(resp).await?;
        let token: TokenResponse = Self::decode(resp).await?;
        self.set_token(SecretString::from(token.id_token));
        Ok(())
    }

    /// Apply credentials: install a token directly, or log in for one.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), Error> {
        match credentials {
            Credentials::Token(token) => {
                self.set_token(token.clone());
                Ok(())
            }
            Credentials::Password { username, password } => {
                self.authenticate(username, password, false).await
            }
        }
    }

    /// `GET api/account`: the signed-in principal and its authorities.
    pub async fn account(&self) -> Result<Account, Error> {
        let url = self.api_url("account")?;
        self.get(url).await
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/{path}`
    pub fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.send(self.http.get(url)).await?;
        let resp = self.check(resp).await?;
        Self::decode(resp).await
    }

    /// GET with query parameters, returning the response headers alongside the body.
    pub(crate) async fn get_with_headers<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<(T, HeaderMap), Error> {
        debug!("GET {url} {query:?}");
        let resp = self.send(self.http.get(url).query(query)).await?;
        let resp = self.check(resp).await?;
        let headers = resp.headers().clone();
        Ok((Self::decode(resp).await?, headers))
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.send(self.http.post(url).json(body)).await?;
        let resp = self.check(resp).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        let resp = self.send(self.http.put(url).json(body)).await?;
        let resp = self.check(resp).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.send(self.http.delete(url)).await?;
        self.check(resp).await?;
        Ok(())
    }

    // ── Response pipeline ────────────────────────────────────────────

    /// Attach the bearer token, send, and run the interceptor chain.
    async fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        let req = {
            let token = self.token.read().unwrap_or_else(PoisonError::into_inner);
            match token.as_ref() {
                Some(t) => req.header(AUTHORIZATION, format!("Bearer {}", t.expose_secret())),
                None => req,
            }
        };

        let resp = req.send().await?;
        for interceptor in &self.interceptors {
            interceptor.on_response(resp.status(), resp.headers());
        }
        Ok(resp)
    }

    /// Map non-success statuses to errors; pass successes through.
    async fn check(&self, resp: Response) -> Result<Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "token missing, expired or rejected".into(),
            });
        }

        let error_key = resp
            .headers()
            .get(self.error_header())
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp.text().await.unwrap_or_default();
        let message = problem_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        });
        warn!(status = status.as_u16(), ?error_key, "request failed: {message}");

        Err(Error::Http {
            status: status.as_u16(),
            message,
            error_key,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Extract a human message from a problem+json error body.
fn problem_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "title", "message"]
        .iter()
        .find_map(|k| value.get(k).and_then(|v| v.as_str()))
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_url_keeps_base_path() {
        let client =
            ApiClient::from_reqwest("http://shop.local/store", "storeApp", reqwest::Client::new())
                .unwrap();
        let url = client.api_url("wishlists/3").unwrap();
        assert_eq!(url.as_str(), "http://shop.local/store/api/wishlists/3");
    }

    #[test]
    fn header_names_follow_app_name() {
        let client =
            ApiClient::from_reqwest("http://localhost:8080", "storeApp", reqwest::Client::new())
                .unwrap();
        assert_eq!(client.alert_header(), "X-storeApp-alert");
        assert_eq!(client.params_header(), "X-storeApp-params");
        assert_eq!(client.error_header(), "X-storeApp-error");
    }

    #[test]
    fn problem_message_prefers_detail() {
        let body = r#"{"title":"Bad Request","detail":"name must not be null","message":"error.validation"}"#;
        assert_eq!(problem_message(body).as_deref(), Some("name must not be null"));
        assert_eq!(problem_message("<html>"), None);
    }
}
