//! General-purpose API client.
//!
//! Every request is a form-encoded POST to `https://music.163.com/api/...`
//! sent through the shared [`Transport`], with the client's session token
//! attached as the `Cookie` header. Unaccepted codes are retried by the
//! transport and surface as
//! [`Error::ConnectionExhausted`](crate::Error::ConnectionExhausted).
//!
//! API methods are implemented in separate modules (`track`, `playlist`,
//! `search`, `user`, `artist`, `album`, `mv`, `radio`) as `impl Music163Api`
//! blocks.

use crate::auth::SessionToken;
use crate::error::Result;
use crate::transport::{Form, Transport};
use serde_json::Value;
use std::sync::Arc;

/// Client for the read endpoints (songs, playlists, users, search, feeds).
///
/// Holds a shared [`Transport`] and an optional [`SessionToken`]. Cloning is
/// cheap and keeps both.
#[derive(Debug, Clone)]
pub struct Music163Api {
    transport: Arc<Transport>,
    token: Option<SessionToken>,
}

impl Music163Api {
    /// Create a client for the production host.
    ///
    /// `token` may be `None` for anonymous access to public resources.
    pub fn new(token: Option<SessionToken>) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(Transport::new()?), token))
    }

    /// Create a client on an existing transport, e.g. the one a
    /// [`Login`](crate::Login) used.
    pub fn with_transport(transport: Arc<Transport>, token: Option<SessionToken>) -> Self {
        Self { transport, token }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Set `X-Real-IP` / `X-Forwarded-For` on the shared transport.
    ///
    /// See [`Transport::set_real_ip`] for the sharing rules.
    pub fn set_real_ip(&self, ip: impl Into<String>) {
        self.transport.set_real_ip(ip);
    }

    /// POST `form` to `path` with this client's token.
    pub(crate) async fn request(&self, path: &str, form: &Form) -> Result<Value> {
        self.transport.post(path, form, self.token.as_ref()).await
    }

    /// Raw "discover" page of the mobile app.
    ///
    /// The block layout changes too often to be worth mapping; the JSON is
    /// returned as-is. Pass the previous page's `cursor` to continue.
    pub async fn home_page(&self, refresh: bool, cursor: Option<&str>) -> Result<Value> {
        let form = Form::new()
            .param("refresh", refresh)
            .param_opt("cursor", cursor);
        self.request("/api/homepage/block/page", &form).await
    }
}
