//! Login flows.
//!
//! Three ways to obtain a [`SessionToken`]:
//!
//! | Method                  | Endpoint                          | Rejection codes |
//! |-------------------------|-----------------------------------|-----------------|
//! | [`Login::email`]        | `/api/login`                      | 501, 502        |
//! | [`Login::cellphone`]    | `/api/login/cellphone`            | 400, 501, 502, 503 |
//! | [`Login::qr`]           | `/api/login/qrcode/client/login`  | 800 (expired)   |
//!
//! Passwords are sent as lowercase hex MD5. Rejections come back as
//! [`Error::BadCode`] after a single request; only network-level failures are
//! retried underneath by the [`Transport`].
//!
//! # QR login
//!
//! ```no_run
//! # async fn run() -> cloudmusic_api::Result<()> {
//! use cloudmusic_api::{DEFAULT_QR_INTERVAL, Login};
//!
//! let mut login = Login::new()?;
//! let (key, url) = login.qr_key().await?;
//! println!("scan: {url}");
//! let (token, api) = login.qr(&key, DEFAULT_QR_INTERVAL).await?;
//! if token.is_empty() {
//!     println!("QR code expired");
//! } else {
//!     println!("{}", api.my().await?.profile.nickname);
//! }
//! # Ok(())
//! # }
//! ```

use crate::auth::{SessionToken, md5_hex};
use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::transport::{Form, Reply, RetryPolicy, Transport};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Country code used when none is given.
pub const DEFAULT_COUNTRY_CODE: &str = "86";

/// Pause between two QR status polls.
pub const DEFAULT_QR_INTERVAL: Duration = Duration::from_secs(3);

const QR_LOGIN_URL: &str = "https://music.163.com/login?codekey=";

const QR_EXPIRED: i64 = 800;
const QR_WAITING: i64 = 801;
const QR_SCANNED: i64 = 802;

/// Secret for [`Login::cellphone`].
#[derive(Clone, Copy)]
pub enum PhoneCredential<'a> {
    /// Account password, hashed before sending.
    Password(&'a str),
    /// SMS code from [`Login::send_captcha`], sent verbatim.
    Captcha(&'a str),
}

impl std::fmt::Debug for PhoneCredential<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(..)"),
            Self::Captcha(_) => f.write_str("Captcha(..)"),
        }
    }
}

/// Login session manager.
///
/// Remembers the last token it obtained and sends it along with later login
/// calls, the way the web client does. Each successful login replaces the
/// token and hands out a fresh [`Music163Api`] bound to it.
#[derive(Debug)]
pub struct Login {
    transport: Arc<Transport>,
    token: Option<SessionToken>,
}

impl Login {
    /// Login manager for the production host.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(Arc::new(Transport::new()?)))
    }

    pub fn with_transport(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Resume from a token obtained earlier, e.g. to call [`Login::logout`].
    pub fn with_token(transport: Arc<Transport>, token: SessionToken) -> Self {
        Self {
            transport,
            token: Some(token),
        }
    }

    /// The most recent token, if any login succeeded.
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// See [`Transport::set_real_ip`].
    pub fn set_real_ip(&self, ip: impl Into<String>) {
        self.transport.set_real_ip(ip);
    }

    fn client(&self, token: &SessionToken) -> Music163Api {
        Music163Api::with_transport(Arc::clone(&self.transport), Some(token.clone()))
    }

    async fn login(&mut self, path: &str, form: &Form) -> Result<Reply> {
        let reply = self
            .transport
            .post_login(path, form, self.token.as_ref())
            .await?;
        if !reply.token.is_empty() {
            self.token = Some(reply.token.clone());
        }
        Ok(reply)
    }

    /// `login`, but an accepted reply must also set cookies.
    async fn login_with_cookie(&mut self, path: &str, form: &Form) -> Result<SessionToken> {
        let reply = self.login(path, form).await?;
        if reply.token.is_empty() {
            warn!(path, "login accepted without Set-Cookie");
            return Err(Error::BadData(reply.body));
        }
        Ok(reply.token)
    }

    /// Log in with an email account.
    ///
    /// # Errors
    ///
    /// - [`Error::BadCode`] with 501: not registered
    /// - [`Error::BadCode`] with 502: wrong password
    /// - [`Error::BadData`]: accepted, but no session cookie was set
    pub async fn email(&mut self, email: &str, password: &str) -> Result<(SessionToken, Music163Api)> {
        let form = Form::new()
            .param("username", email)
            .param("password", md5_hex(password))
            .param("rememberLogin", true);
        let token = self.login_with_cookie("/api/login", &form).await?;
        info!("email login succeeded");
        let api = self.client(&token);
        Ok((token, api))
    }

    /// Send an SMS code to `phone`.
    ///
    /// The number is not checked locally; a malformed one comes back as
    /// [`Error::BadCode`] with 400.
    pub async fn send_captcha(&self, phone: &str, country_code: &str) -> Result<Value> {
        let form = Form::new()
            .param("ctcode", country_code)
            .param("cellphone", phone);
        let reply = self
            .transport
            .execute("/api/sms/captcha/sent", &form, None, RetryPolicy::Business)
            .await?;
        Ok(reply.body)
    }

    /// Log in with a phone number and either a password or an SMS code.
    ///
    /// # Errors
    ///
    /// [`Error::BadCode`] with 400 (bad number), 501 (not registered),
    /// 502 (wrong password) or 503 (wrong captcha).
    /// [`Error::BadData`] when the login is accepted without a session cookie.
    pub async fn cellphone(
        &mut self,
        phone: &str,
        credential: PhoneCredential<'_>,
        country_code: &str,
    ) -> Result<(SessionToken, Music163Api)> {
        let form = Form::new()
            .param("phone", phone)
            .param("countrycode", country_code);
        let form = match credential {
            PhoneCredential::Password(password) => form.param("password", md5_hex(password)),
            PhoneCredential::Captcha(code) => form.param("captcha", code),
        };
        let form = form.param("rememberLogin", true);

        let token = self.login_with_cookie("/api/login/cellphone", &form).await?;
        info!("phone login succeeded");
        let api = self.client(&token);
        Ok((token, api))
    }

    /// Request a QR ticket. Returns `(unikey, url to encode as a QR code)`.
    pub async fn qr_key(&self) -> Result<(String, String)> {
        let resp = self
            .transport
            .post("/api/login/qrcode/unikey", &Form::new().param("type", 1), None)
            .await?;
        let Some(key) = resp["unikey"].as_str().map(String::from) else {
            return Err(Error::BadData(resp));
        };
        let url = format!("{QR_LOGIN_URL}{key}");
        Ok((key, url))
    }

    /// Poll the ticket once.
    ///
    /// Returns the token once the user has confirmed (803). Every other state
    /// is an [`Error::BadCode`]: 801 waiting for a scan, 802 scanned but not
    /// confirmed, 800 expired or unknown.
    pub async fn check_qr(&mut self, key: &str) -> Result<SessionToken> {
        let form = Form::new().param("key", key).param("type", 1);
        let reply = self.login("/api/login/qrcode/client/login", &form).await?;
        Ok(reply.token)
    }

    /// Poll the ticket every `interval` until it is confirmed or expires.
    ///
    /// An expired ticket is not an error: the best token known so far
    /// (usually empty) is returned together with a client built from it.
    /// Check [`SessionToken::is_empty`] to tell the two outcomes apart.
    ///
    /// There is no overall timeout. Drop the future to stop polling.
    pub async fn qr(&mut self, key: &str, interval: Duration) -> Result<(SessionToken, Music163Api)> {
        loop {
            match self.check_qr(key).await {
                Ok(token) if !token.is_empty() => {
                    info!("QR login confirmed");
                    let api = self.client(&token);
                    return Ok((token, api));
                }
                Ok(_) => debug!("QR confirmed without cookies, polling again"),
                Err(Error::BadCode { code: QR_WAITING, .. }) => debug!("QR waiting for scan"),
                Err(Error::BadCode { code: QR_SCANNED, .. }) => debug!("QR scanned, waiting for confirmation"),
                Err(Error::BadCode { code: QR_EXPIRED, .. }) => {
                    warn!("QR ticket expired");
                    let token = self.token.clone().unwrap_or_default();
                    let api = self.client(&token);
                    return Ok((token, api));
                }
                Err(err) => return Err(err),
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Raw account info for the current token.
    pub async fn login_status(&self) -> Result<Value> {
        self.transport
            .post("/api/w/nuser/account/get", &Form::new(), self.token.as_ref())
            .await
    }

    /// Extend the current session.
    pub async fn refresh_login(&self) -> Result<Value> {
        self.transport
            .post("/api/login/token/refresh", &Form::new(), self.token.as_ref())
            .await
    }

    /// Invalidate the current token on the server.
    pub async fn logout(&self) -> Result<Value> {
        self.transport
            .post("/api/logout", &Form::new(), self.token.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_hides_secret() {
        let shown = format!("{:?}", PhoneCredential::Password("hunter2"));
        assert_eq!(shown, "Password(..)");
    }

    #[test]
    fn new_login_has_no_token() {
        let login = Login::new().unwrap();
        assert!(login.token().is_none());
    }
}
