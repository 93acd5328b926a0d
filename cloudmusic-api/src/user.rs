//! User profile API.
//!
//! ## `my`: `POST /api/w/nuser/account/get`
//!
//! Authentication is via cookie; the body is empty.
//!
//! ```json
//! {
//!   "code": 200,
//!   "account": { "id": 413184081, "userName": "1_13800000000", "vipType": 0 },
//!   "profile": { "userId": 413184081, "nickname": "用户名", "avatarUrl": "https://..." }
//! }
//! ```
//!
//! An invalid cookie still yields code 200, with `account` and `profile`
//! set to `null`.
//!
//! ## `user`: `POST /api/v1/user/detail/{id}`
//!
//! `{ "code": 200, "level": 9, "listenSongs": 1234, "profile": {...} }`

use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::mapper;
use crate::transport::Form;
use crate::types::{My, User};

impl Music163Api {
    /// Get the account behind this client's token.
    ///
    /// # Errors
    ///
    /// - [`Error::BadData`](crate::Error::BadData): token missing, invalid or expired
    pub async fn my(&self) -> Result<My> {
        let resp = self.request("/api/w/nuser/account/get", &Form::new()).await?;
        mapper::my(&resp)
    }

    /// Get any user's public profile.
    pub async fn user(&self, id: u64) -> Result<User> {
        let resp = self
            .request(&format!("/api/v1/user/detail/{id}"), &Form::new())
            .await?;
        if !resp["profile"].is_object() {
            return Err(Error::BadData(resp));
        }
        Ok(mapper::user(&resp))
    }
}
