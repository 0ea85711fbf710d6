//! Session-authenticated Redfish REST client.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempsight_collector_framework::{CollectorError, FetchError, Result};
use tracing::{debug, trace};

use crate::config::RedfishConfig;

/// Header carrying the session token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

const SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";

/// Redfish REST client bound to one BMC.
#[derive(Clone)]
pub struct RedfishClient {
    client: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

/// An open Redfish session.
///
/// Created by [`RedfishClient::login`] and consumed by
/// [`RedfishClient::logout`].
pub struct RedfishSession {
    token: HeaderValue,
    /// URL of the session resource.
    location: String,
}

impl RedfishSession {
    /// URL of the session resource, deleted on logout.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Debug for RedfishSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedfishSession")
            .field("token", &"<redacted>")
            .field("location", &self.location)
            .finish()
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    #[serde(rename = "UserName")]
    user_name: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
}

impl RedfishClient {
    /// Create a client for the configured BMC.
    pub fn new(config: &RedfishConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(header::HeaderMap::from_iter([
                (header::ACCEPT, HeaderValue::from_static("application/json")),
                (
                    header::HeaderName::from_static("odata-version"),
                    HeaderValue::from_static("4.0"),
                ),
            ]));
        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| CollectorError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.host),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Base URL of the BMC, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a resource path.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Open a session with the configured credentials.
    pub async fn login(&self) -> Result<RedfishSession> {
        let url = self.resolve(SESSIONS_PATH);
        let response = self
            .client
            .post(&url)
            .json(&Credentials {
                user_name: &self.user,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| FetchError::request(&url, e))?;

        let response = check_status(&url, response)?;

        let mut token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .cloned()
            .ok_or_else(|| FetchError::Auth(format!("{} returned no {}", url, AUTH_TOKEN_HEADER)))?;
        token.set_sensitive(true);

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| FetchError::missing("Location", "session response headers"))?;
        let location = self.resolve(location);

        debug!(user = %self.user, session = %location, "Redfish session opened");

        Ok(RedfishSession { token, location })
    }

    /// Delete the session resource.
    pub async fn logout(&self, session: RedfishSession) -> Result<()> {
        let response = self
            .client
            .delete(&session.location)
            .header(AUTH_TOKEN_HEADER, session.token.clone())
            .send()
            .await
            .map_err(|e| FetchError::request(&session.location, e))?;

        check_status(&session.location, response)?;
        debug!(session = %session.location, "Redfish session closed");

        Ok(())
    }

    /// GET a resource and decode its JSON body.
    ///
    /// A body that does not match `T` is a parse error.
    pub async fn get<T: DeserializeOwned>(&self, session: &RedfishSession, path: &str) -> Result<T> {
        let url = self.resolve(path);
        let response = self
            .client
            .get(&url)
            .header(AUTH_TOKEN_HEADER, session.token.clone())
            .send()
            .await
            .map_err(|e| FetchError::request(&url, e))?;

        let body = check_status(&url, response)?
            .text()
            .await
            .map_err(|e| FetchError::request(&url, e))?;
        trace!(url = %url, bytes = body.len(), "Redfish resource received");

        serde_json::from_str(&body)
            .map_err(|e| CollectorError::parse(format!("unexpected JSON from {}: {}", url, e)))
    }
}

impl fmt::Debug for RedfishClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedfishClient")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

fn check_status(url: &str, response: Response) -> std::result::Result<Response, FetchError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Auth(format!(
            "{} returned HTTP {}",
            url,
            response.status().as_u16()
        ))),
        status => Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }),
    }
}

/// Turn a configured host into a base URL.
///
/// `https://` is assumed when no scheme is given; trailing slashes are
/// removed.
pub fn normalize_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
