// Blink authentication
//
// Email/password login against the global login host. The response
// carries the session token and the account's region, which selects
// the REST host for every later request.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::client::{BlinkClient, decode_json};
use crate::error::Error;
use crate::models::LoginResponse;

/// Global login host used when no override is configured.
pub const DEFAULT_LOGIN_URL: &str = "https://rest.prod.immedia-semi.com";

/// Domain of the vendor's REST hosts.
pub const VENDOR_DOMAIN: &str = "immedia-semi.com";

/// Identifies this client to the login endpoint.
const CLIENT_SPECIFIER: &str = concat!("blinkly ", env!("CARGO_PKG_VERSION"));

/// Derive the regional REST host from the login host and region id.
///
/// Only hosts on the vendor domain are rewritten to
/// `https://rest.{region}.immedia-semi.com`. Any other login host
/// (local mock servers, proxies) is used as the base unchanged.
pub fn regional_base_url(login_url: &Url, region_id: Option<&str>) -> Result<Url, Error> {
    let on_vendor_domain = login_url
        .host_str()
        .is_some_and(|host| host.ends_with(VENDOR_DOMAIN));

    match region_id {
        Some(region) if on_vendor_domain => {
            Url::parse(&format!("https://rest.{region}.{VENDOR_DOMAIN}")).map_err(Error::InvalidUrl)
        }
        _ => Ok(login_url.clone()),
    }
}

impl BlinkClient {
    /// Authenticate with email and password.
    ///
    /// `POST {login}/login`
    ///
    /// On success the token, region and regional base URL are stored in
    /// the client and the credentials are kept for re-login on `401`.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let base = self.login_url().as_str().trim_end_matches('/').to_owned();
        let url = Url::parse(&format!("{base}/login"))?;

        debug!("logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "client_specifier": CLIENT_SPECIFIER,
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let login: LoginResponse = decode_json(resp).await?;
        if login.authtoken.authtoken.is_empty() {
            return Err(Error::Authentication {
                message: "login response carried an empty token".into(),
            });
        }

        let region = login.region_id().map(str::to_owned);
        let base_url = regional_base_url(self.login_url(), region.as_deref())?;
        debug!(region = ?region, base = %base_url, "login successful");

        self.set_session(
            SecretString::from(login.authtoken.authtoken.clone()),
            region,
            base_url,
        );
        self.store_credentials(email, password);
        Ok(login)
    }

    /// End the current session.
    ///
    /// `POST {base}/logout`. The local token is dropped even if the
    /// server call fails.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.is_authenticated() {
            self.clear_session();
            return Ok(());
        }

        let url = self.api_url("/logout")?;
        debug!("logging out at {}", url);

        // Logout never triggers a re-login.
        let result = self.post_once(url).await;
        if let Err(ref e) = result {
            warn!(error = %e, "server-side logout failed");
        }
        self.clear_session();
        result
    }
}
