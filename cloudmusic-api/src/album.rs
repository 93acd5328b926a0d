//! Album API.
//!
//! Endpoint: `POST /api/v1/album/{id}`
//!
//! ```json
//! {
//!   "code": 200,
//!   "album": { "id": 34209, "name": "...", "size": 10, "artists": [...], "publishTime": 746812800000 },
//!   "songs": [ ... ]
//! }
//! ```

use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::mapper;
use crate::transport::Form;
use crate::types::Album;

impl Music163Api {
    /// Get an album with its songs.
    pub async fn album(&self, id: u64) -> Result<Album> {
        let resp = self.request(&format!("/api/v1/album/{id}"), &Form::new()).await?;
        if !resp["album"].is_object() {
            return Err(Error::BadData(resp));
        }
        Ok(mapper::album(&resp))
    }
}
