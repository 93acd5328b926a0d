//! Playlist API.
//!
//! Endpoint: `POST /api/v6/playlist/detail`
//!
//! Request: `id=123456&n=100000`
//!
//! Response:
//! ```json
//! {
//!   "code": 200,
//!   "playlist": {
//!     "id": 123456,
//!     "name": "歌单名",
//!     "trackCount": 1500,
//!     "creator": { "userId": 789, "nickname": "用户名" },
//!     "trackIds": [ { "id": 1 }, ... ],
//!     "tracks": [ { "id": 1, "name": "歌名", "ar": [...], "al": {...}, "dt": 240000 }, ... ]
//!   }
//! }
//! ```
//!
//! `trackIds` always lists every song, but `tracks` stops at 1000 no matter
//! what `n` asks for. The rest has to be fetched through song detail, which
//! also takes at most 1000 ids per request.

use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::mapper;
use crate::transport::Form;
use crate::types::{Music, Playlist};
use std::collections::HashMap;
use tracing::debug;

/// Ids per song-detail request.
const TRACK_BATCH: usize = 1000;

impl Music163Api {
    /// Get a playlist with every track, in playlist order.
    ///
    /// Does not require login for public playlists.
    pub async fn playlist(&self, id: u64) -> Result<Playlist> {
        let form = Form::new().param("id", id).param("n", 100_000);
        let resp = self.request("/api/v6/playlist/detail", &form).await?;
        if !resp["playlist"].is_object() {
            return Err(Error::BadData(resp));
        }

        let mut playlist = mapper::playlist(&resp["playlist"]);
        let embedded = playlist.tracks.len();
        let remaining: Vec<u64> = playlist.track_ids.iter().skip(embedded).copied().collect();

        for batch in remaining.chunks(TRACK_BATCH) {
            debug!(playlist = id, count = batch.len(), "fetching tracks past the embedded ones");
            let songs = self.musics(batch).await?;
            playlist.tracks.extend(in_id_order(batch, songs));
        }

        Ok(playlist)
    }

    /// Recommended playlists (works anonymously).
    pub async fn personalized_playlist(&self, limit: u32) -> Result<Vec<Playlist>> {
        let form = Form::new()
            .param("limit", limit)
            .param("total", true)
            .param("n", 1000);
        let resp = self.request("/api/personalized/playlist", &form).await?;
        mapper::list(&resp, "/result", mapper::playlist)
    }
}

/// Reorder `songs` to follow `ids`; ids the server did not return are skipped.
fn in_id_order(ids: &[u64], songs: Vec<Music>) -> Vec<Music> {
    let mut by_id: HashMap<u64, Music> = songs.into_iter().map(|m| (m.id, m)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
