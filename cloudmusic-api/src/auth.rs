//! Session token and credential hashing.
//!
//! A successful login answers with one or more `Set-Cookie` headers:
//!
//! ```text
//! Set-Cookie: MUSIC_U=00AABBCC...; Max-Age=1296000; Expires=...; Path=/
//! Set-Cookie: __csrf=5f1e...; Max-Age=1296010; Path=/
//! ```
//!
//! Only the `name=value` pairs are kept and joined into a single `Cookie`
//! header value (`MUSIC_U=00AABBCC...; __csrf=5f1e...`). The server decides
//! when it stops being valid; nothing here tracks expiry.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque credential assembled from `Set-Cookie` response headers.
///
/// Never modified after construction. A new login yields a new token.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a cookie string obtained elsewhere (browser devtools, a previous run).
    pub fn new(cookie: impl Into<String>) -> Self {
        Self(cookie.into())
    }

    /// Build a token from raw `Set-Cookie` header values.
    ///
    /// Attributes (`Path`, `Max-Age`, ...) are dropped. A cookie set twice
    /// keeps its first position and its last value.
    pub fn from_set_cookie<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        for header in headers {
            let Some(pair) = header.split(';').next().map(str::trim) else {
                continue;
            };
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            match pairs.iter_mut().find(|(n, _)| *n == name) {
                Some(existing) => existing.1 = value.trim(),
                None => pairs.push((name, value.trim())),
            }
        }

        let joined = pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Self(joined)
    }

    /// The `Cookie` header value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when no cookie was captured, e.g. after an expired QR ticket.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Look up a single cookie by name, e.g. `MUSIC_U`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.split(';').filter(|p| !p.trim().is_empty()).count();
        write!(f, "SessionToken(<{count} cookies>)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionToken {
    fn from(cookie: String) -> Self {
        Self(cookie)
    }
}

impl From<&str> for SessionToken {
    fn from(cookie: &str) -> Self {
        Self(cookie.to_owned())
    }
}

/// Lowercase hex MD5 of `input`, the password format the login endpoints expect.
///
/// Every call hashes from a fresh state.
pub fn md5_hex(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}
