// Blink REST HTTP client
//
// Wraps `reqwest::Client` with token-header injection, regional URL
// construction, retry-on-401 and JSON decoding. Endpoint groups
// (network, camera, videos) are inherent methods in separate files to
// keep this module focused on transport mechanics.

use std::sync::RwLock;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Header carrying the session token on every authenticated request.
pub const TOKEN_HEADER: &str = "TOKEN_AUTH";

/// Email/password pair kept after a successful login so an expired
/// token can be renewed transparently.
#[derive(Clone)]
pub(crate) struct StoredCredentials {
    pub(crate) email: String,
    pub(crate) password: SecretString,
}

/// Raw HTTP client for the Blink cloud API.
///
/// Before [`login()`](Self::login) only the login endpoint is usable.
/// Afterwards every request carries the `TOKEN_AUTH` header and is sent
/// to the regional REST host reported by the login response.
pub struct BlinkClient {
    http: reqwest::Client,
    login_url: Url,
    /// Regional REST host; equals `login_url` until login tells us better.
    base_url: RwLock<Url>,
    region_id: RwLock<Option<String>>,
    token: RwLock<Option<SecretString>>,
    credentials: RwLock<Option<StoredCredentials>>,
}

impl BlinkClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `login_url` is the root of the login host, normally
    /// [`DEFAULT_LOGIN_URL`](crate::DEFAULT_LOGIN_URL).
    pub fn new(login_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, login_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, login_url: Url) -> Self {
        Self {
            http,
            base_url: RwLock::new(login_url.clone()),
            login_url,
            region_id: RwLock::new(None),
            token: RwLock::new(None),
            credentials: RwLock::new(None),
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The login host root.
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// The current REST base URL (regional after login).
    pub fn base_url(&self) -> Url {
        self.base_url.read().expect("base URL lock poisoned").clone()
    }

    /// The region id reported by the last login, if any.
    pub fn region_id(&self) -> Option<String> {
        self.region_id.read().expect("region lock poisoned").clone()
    }

    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Turn a server-relative path (e.g. a thumbnail path) into an
    /// absolute URL on the current REST host.
    pub fn absolute_url(&self, path: &str) -> String {
        let base = self.base_url();
        let base = base.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    // ── Session state ────────────────────────────────────────────────

    pub(crate) fn set_session(&self, token: SecretString, region_id: Option<String>, base: Url) {
        *self.token.write().expect("token lock poisoned") = Some(token);
        *self.region_id.write().expect("region lock poisoned") = region_id;
        *self.base_url.write().expect("base URL lock poisoned") = base;
    }

    pub(crate) fn clear_session(&self) {
        *self.token.write().expect("token lock poisoned") = None;
        *self.credentials.write().expect("credentials lock poisoned") = None;
    }

    pub(crate) fn store_credentials(&self, email: &str, password: &SecretString) {
        *self.credentials.write().expect("credentials lock poisoned") = Some(StoredCredentials {
            email: email.to_owned(),
            password: password.clone(),
        });
    }

    fn stored_credentials(&self) -> Option<StoredCredentials> {
        self.credentials
            .read()
            .expect("credentials lock poisoned")
            .clone()
    }

    fn current_token(&self) -> Result<SecretString, Error> {
        self.token
            .read()
            .expect("token lock poisoned")
            .clone()
            .ok_or(Error::NotAuthenticated)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path on the regional host.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(&self.absolute_url(path)).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.send_authenticated(Method::GET, url, None).await?;
        decode_json(resp).await
    }

    /// Send a POST request with an optional JSON body and decode the reply.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.send_authenticated(Method::POST, url, body).await?;
        decode_json(resp).await
    }

    /// Send a bodiless POST without the re-login retry.
    pub(crate) async fn post_once(&self, url: Url) -> Result<(), Error> {
        let resp = self.send_once(Method::POST, url, None).await?;
        check_status(resp).await.map(|_| ())
    }

    /// Fetch a binary resource (thumbnail image, video clip) by absolute URL.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes, Error> {
        let url = Url::parse(url)?;
        debug!("GET {} (binary)", url);
        let resp = self.send_authenticated(Method::GET, url, None).await?;
        resp.bytes().await.map_err(Error::Transport)
    }

    /// Send an authenticated request. A `401` triggers one re-login with
    /// the stored credentials and a single retry.
    async fn send_authenticated(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, Error> {
        let resp = self.send_once(method.clone(), url.clone(), body).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return check_status(resp).await;
        }

        let Some(creds) = self.stored_credentials() else {
            return Err(Error::Authentication {
                message: "token expired or invalid".into(),
            });
        };

        debug!("token rejected, re-authenticating");
        self.login(&creds.email, &creds.password).await?;

        let resp = self.send_once(method, url, body).await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "token rejected after re-authentication".into(),
            });
        }
        check_status(resp).await
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, Error> {
        let token = self.current_token()?;
        let mut builder = self
            .http
            .request(method, url)
            .header(TOKEN_HEADER, token.expose_secret());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.send().await.map_err(Error::Transport)
    }
}

/// Map non-2xx responses to `Error::Api`, keeping a body preview.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let preview: String = body.chars().take(200).collect();
    Err(Error::Api {
        status: status.as_u16(),
        message: if preview.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_owned()
        } else {
            preview
        },
    })
}

/// Read the body as text and decode it, keeping the raw body on failure.
pub(crate) async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(len = body.len(), "decoding response body");
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
