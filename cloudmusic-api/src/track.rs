//! Song detail and song feeds.
//!
//! # Endpoints
//!
//! ## `music` / `musics`: `POST /api/v3/song/detail`
//!
//! Request: `c=[{"id":347230},{"id":186016}]` (at most 1000 ids).
//!
//! Response:
//! ```json
//! {
//!   "code": 200,
//!   "songs": [{
//!     "id": 347230, "name": "歌名",
//!     "ar": [{ "id": 1, "name": "歌手" }],
//!     "al": { "id": 2, "name": "专辑", "picUrl": "https://..." },
//!     "dt": 240000
//!   }]
//! }
//! ```
//!
//! Unknown ids are silently left out of `songs`.
//!
//! ## `personalized_new_song`: `POST /api/personalized/newsong`
//!
//! Songs come wrapped as `result[].song`, in the legacy shape.
//!
//! ## `top_song`: `POST /api/v1/discovery/new/songs`
//!
//! New releases for an area, as `data[]`.

use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::mapper;
use crate::transport::Form;
use crate::types::{Music, NewSongArea};
use serde_json::{Value, json};

impl Music163Api {
    /// Get one song by id.
    ///
    /// # Errors
    ///
    /// [`Error::BadData`] if the server does not know the id.
    pub async fn music(&self, id: u64) -> Result<Music> {
        let resp = self.song_detail(&[id]).await?;
        resp["songs"]
            .as_array()
            .and_then(|songs| songs.first())
            .map(mapper::music)
            .ok_or_else(|| Error::BadData(resp.clone()))
    }

    /// Get several songs in one request. At most 1000 ids per call.
    ///
    /// Unknown ids are left out of the result. A response without a `songs`
    /// array is [`Error::BadData`].
    pub async fn musics(&self, ids: &[u64]) -> Result<Vec<Music>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self.song_detail(ids).await?;
        mapper::list(&resp, "/songs", mapper::music)
    }

    async fn song_detail(&self, ids: &[u64]) -> Result<Value> {
        let c = Value::Array(ids.iter().map(|id| json!({ "id": id })).collect());
        let form = Form::new().param("c", c);
        self.request("/api/v3/song/detail", &form).await
    }

    /// Recommended new songs (works anonymously).
    pub async fn personalized_new_song(&self, limit: u32) -> Result<Vec<Music>> {
        let form = Form::new()
            .param("type", "recommend")
            .param("limit", limit)
            .param("areaId", 0);
        let resp = self.request("/api/personalized/newsong", &form).await?;
        mapper::list(&resp, "/result", |item| mapper::music(&item["song"]))
    }

    /// Latest releases for `area`.
    pub async fn top_song(&self, area: NewSongArea) -> Result<Vec<Music>> {
        let form = Form::new()
            .param("areaId", area.code())
            .param("total", true);
        let resp = self.request("/api/v1/discovery/new/songs", &form).await?;
        mapper::list(&resp, "/data", mapper::music)
    }
}
