//! Search API.
//!
//! Endpoint: `POST /api/cloudsearch/pc`
//!
//! Request parameters:
//! - `s`: search keyword
//! - `type`: search type, see [`SearchType`]
//! - `limit`: page size
//! - `offset`: `page * limit`
//! - `total`: always `true`
//!
//! Response JSON:
//! ```json
//! {
//!   "code": 200,
//!   "result": {
//!     "songCount": 268,          // type=1
//!     "songs": [ ... ],
//!     "playlistCount": 12,       // type=1000
//!     "playlists": [ ... ],
//!     "userprofileCount": 3,     // type=1002
//!     "userprofiles": [ ... ]
//!   }
//! }
//! ```
//!
//! `result` is absent (or has no count) when nothing matched.

use crate::client::Music163Api;
use crate::error::Result;
use crate::mapper;
use crate::transport::Form;
use crate::types::{Album, Artist, DjRadio, Music, Mv, Playlist, SearchPage, SearchType, User};
use serde_json::Value;

impl Music163Api {
    /// Run a search and return the raw response.
    ///
    /// `page` is 0-based. Use the typed `search_*` methods unless you need a
    /// type without a mapper ([`SearchType::Lyric`], [`SearchType::Video`]).
    pub async fn search(&self, key: &str, kind: SearchType, page: u32, limit: u32) -> Result<Value> {
        let form = Form::new()
            .param("s", key)
            .param("type", kind.code())
            .param("limit", limit)
            .param("offset", u64::from(page) * u64::from(limit))
            .param("total", true);
        self.request("/api/cloudsearch/pc", &form).await
    }

    async fn search_as<T>(
        &self,
        key: &str,
        kind: SearchType,
        page: u32,
        limit: u32,
        f: impl Fn(&Value) -> T,
    ) -> Result<SearchPage<T>> {
        let resp = self.search(key, kind, page, limit).await?;
        Ok(mapper::search_page(&resp, kind, f))
    }

    pub async fn search_music(&self, key: &str, page: u32, limit: u32) -> Result<SearchPage<Music>> {
        self.search_as(key, SearchType::Music, page, limit, mapper::music).await
    }

    pub async fn search_playlist(
        &self,
        key: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchPage<Playlist>> {
        self.search_as(key, SearchType::Playlist, page, limit, mapper::playlist)
            .await
    }

    pub async fn search_album(&self, key: &str, page: u32, limit: u32) -> Result<SearchPage<Album>> {
        self.search_as(key, SearchType::Album, page, limit, mapper::album).await
    }

    pub async fn search_artist(&self, key: &str, page: u32, limit: u32) -> Result<SearchPage<Artist>> {
        self.search_as(key, SearchType::Artist, page, limit, mapper::artist).await
    }

    pub async fn search_user(&self, key: &str, page: u32, limit: u32) -> Result<SearchPage<User>> {
        self.search_as(key, SearchType::User, page, limit, mapper::user).await
    }

    pub async fn search_mv(&self, key: &str, page: u32, limit: u32) -> Result<SearchPage<Mv>> {
        self.search_as(key, SearchType::Mv, page, limit, mapper::mv).await
    }

    pub async fn search_dj(&self, key: &str, page: u32, limit: u32) -> Result<SearchPage<DjRadio>> {
        self.search_as(key, SearchType::DjRadio, page, limit, mapper::dj_radio)
            .await
    }
}
