//! Form-encoded POST transport with bounded retry.
//!
//! Requests go to `https://music.163.com{path}` as
//! `application/x-www-form-urlencoded` bodies. The server answers with a JSON
//! envelope:
//!
//! ```json
//! { "code": 200, ...endpoint-specific fields... }
//! ```
//!
//! Codes `200` and `803` (QR login confirmed) are accepted. Anything else is
//! classified by [`RetryPolicy`]: data endpoints treat it like a network
//! failure and retry, login endpoints hand it straight back as
//! [`Error::BadCode`](crate::Error::BadCode).
//!
//! Network errors, undecodable bodies and envelopes without `code` are
//! retried under either policy. After [`RECONNECTION`] retries
//! (`RECONNECTION + 1` attempts in total) the call fails with
//! [`Error::ConnectionExhausted`](crate::Error::ConnectionExhausted).

use crate::auth::SessionToken;
use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, REFERER, SET_COOKIE, USER_AGENT};
use serde_json::Value;
use std::fmt::Display;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Host every path is resolved against.
pub const BASE_URL: &str = "https://music.163.com";

/// Number of retries after the first attempt before giving up.
pub const RECONNECTION: u32 = 3;

/// Remote `code` values that count as success.
pub const ACCEPTED_CODES: [i64; 2] = [200, 803];

/// Desktop browser User-Agent sent with every request.
pub const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const TIMEOUT: Duration = Duration::from_secs(30);

static HTTP: OnceCell<reqwest::Client> = OnceCell::new();

/// Process-wide connection pool, built on first use.
fn shared_client() -> Result<reqwest::Client> {
    let client = HTTP.get_or_try_init(|| reqwest::Client::builder().timeout(TIMEOUT).build())?;
    Ok(client.clone())
}

/// Ordered form parameters for a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form(Vec<(String, String)>);

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`. Booleans encode as `true`/`false`.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.0.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append `key=value` only when `value` is `Some`.
    #[must_use]
    pub fn param_opt(self, key: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL-encoded request body.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A successful response together with the cookies it set.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Parsed JSON body.
    pub body: Value,
    /// Cookies from `Set-Cookie`; empty when the server set none.
    pub token: SessionToken,
}

impl Reply {
    pub fn code(&self) -> Option<i64> {
        self.body.get("code").and_then(Value::as_i64)
    }
}

/// How an unaccepted remote `code` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry it like a network failure.
    Data,
    /// Fail immediately with [`Error::BadCode`].
    Business,
}

/// Shared HTTP transport.
///
/// Cheap to share behind an `Arc`; the login manager and every API client
/// built from it use the same instance.
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    real_ip: RwLock<Option<String>>,
}

impl Transport {
    /// Transport for the production host.
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Transport for another host (a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(shared_client()?, base_url))
    }

    /// Transport on a caller-built HTTP client instead of the shared pool
    /// (custom proxy, one client per runtime).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            real_ip: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `X-Real-IP` / `X-Forwarded-For: ip` on every following request.
    ///
    /// The setting is shared by every client using this transport; the last
    /// write wins, including for requests already queued by other tasks.
    pub fn set_real_ip(&self, ip: impl Into<String>) {
        *self.real_ip.write().unwrap_or_else(PoisonError::into_inner) = Some(ip.into());
    }

    pub fn clear_real_ip(&self) {
        *self.real_ip.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn real_ip(&self) -> Option<String> {
        self.real_ip
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// POST to a data endpoint and return the body.
    pub async fn post(&self, path: &str, form: &Form, token: Option<&SessionToken>) -> Result<Value> {
        let reply = self.execute(path, form, token, RetryPolicy::Data).await?;
        Ok(reply.body)
    }

    /// POST to a login endpoint and return the body with the cookies it set.
    pub async fn post_login(
        &self,
        path: &str,
        form: &Form,
        token: Option<&SessionToken>,
    ) -> Result<Reply> {
        self.execute(path, form, token, RetryPolicy::Business).await
    }

    /// Run the request, retrying under `policy` until it succeeds or the
    /// reconnection limit is passed.
    pub async fn execute(
        &self,
        path: &str,
        form: &Form,
        token: Option<&SessionToken>,
        policy: RetryPolicy,
    ) -> Result<Reply> {
        let mut attempt: u32 = 0;
        loop {
            let err = match self.send(path, form, token).await {
                Ok(reply) => match reply.code() {
                    Some(code) if ACCEPTED_CODES.contains(&code) => return Ok(reply),
                    Some(code) => {
                        let err = Error::BadCode {
                            code,
                            body: reply.body,
                        };
                        if policy == RetryPolicy::Business {
                            debug!(path, code, "rejected");
                            return Err(err);
                        }
                        err
                    }
                    None => Error::BadData(reply.body),
                },
                Err(err) => err,
            };

            attempt += 1;
            if attempt > RECONNECTION {
                error!(path, %err, "giving up after {RECONNECTION} reconnections");
                return Err(Error::ConnectionExhausted {
                    path: path.to_owned(),
                    source: Box::new(err),
                });
            }
            warn!(path, attempt, %err, "request failed, retrying");
        }
    }

    /// One attempt, no classification of the remote code.
    async fn send(&self, path: &str, form: &Form, token: Option<&SessionToken>) -> Result<Reply> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "POST");

        let mut req = self
            .http
            .post(&url)
            .header(ACCEPT, "*/*")
            .header(REFERER, BASE_URL)
            .header(USER_AGENT, BROWSER_UA)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            req = req.header(COOKIE, token.as_str());
        }
        if let Some(ip) = self.real_ip() {
            req = req.header("X-Real-IP", &ip).header("X-Forwarded-For", ip);
        }

        let resp = req.body(form.encode()).send().await?;
        let token = SessionToken::from_set_cookie(
            resp.headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        );
        // Content-Type is not reliable on this API; parse whatever came back.
        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(Reply { body, token })
    }
}
